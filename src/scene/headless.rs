//! In-memory scene with no rendering
//!
//! Keeps just enough per-visual state (transform, visibility, size) to answer
//! the queries the simulation makes, and remembers the last camera, sky and
//! beam it was handed so runners and tests can inspect them.

use glam::{Mat3, Quat, Vec3};

use super::{Aabb, CameraPose, Lighting, Scene, SceneError, VisualId, VisualKind};
use crate::sim::{BeamPose, SkyState};

/// Default ship hull half extents (beam, height, length)
pub const DEFAULT_SHIP_HALF_EXTENTS: Vec3 = Vec3::new(2.0, 1.5, 6.0);

#[derive(Debug, Clone)]
struct Visual {
    kind: VisualKind,
    position: Vec3,
    rotation: Quat,
    visible: bool,
}

/// Scene that tracks visuals without drawing them
#[derive(Debug, Clone)]
pub struct HeadlessScene {
    /// Slot per issued id; `None` once removed
    visuals: Vec<Option<Visual>>,
    ship_half_extents: Vec3,
    pub lighting: Option<Lighting>,
    pub camera: Option<CameraPose>,
    pub sky: Option<SkyState>,
    pub beam: Option<BeamPose>,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new(DEFAULT_SHIP_HALF_EXTENTS)
    }
}

impl HeadlessScene {
    pub fn new(ship_half_extents: Vec3) -> Self {
        Self {
            visuals: Vec::new(),
            ship_half_extents: ship_half_extents.abs(),
            lighting: None,
            camera: None,
            sky: None,
            beam: None,
        }
    }

    /// Number of visuals currently attached
    pub fn live_count(&self) -> usize {
        self.visuals.iter().filter(|v| v.is_some()).count()
    }

    /// Number of attached visuals of the given kind family
    pub fn count_ships(&self) -> usize {
        self.visuals
            .iter()
            .flatten()
            .filter(|v| v.kind == VisualKind::Ship)
            .count()
    }

    pub fn count_rocks(&self) -> usize {
        self.visuals
            .iter()
            .flatten()
            .filter(|v| matches!(v.kind, VisualKind::Rock { .. }))
            .count()
    }

    fn get(&self, id: VisualId) -> Result<&Visual, SceneError> {
        self.visuals
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(SceneError::UnknownVisual(id))
    }

    fn get_mut(&mut self, id: VisualId) -> Result<&mut Visual, SceneError> {
        self.visuals
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(SceneError::UnknownVisual(id))
    }
}

impl Scene for HeadlessScene {
    fn add(&mut self, kind: VisualKind) -> VisualId {
        let id = VisualId(self.visuals.len() as u32);
        self.visuals.push(Some(Visual {
            kind,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            visible: true,
        }));
        id
    }

    fn remove(&mut self, id: VisualId) -> Result<(), SceneError> {
        let slot = self
            .visuals
            .get_mut(id.0 as usize)
            .ok_or(SceneError::UnknownVisual(id))?;
        match slot.take() {
            Some(_) => Ok(()),
            None => Err(SceneError::UnknownVisual(id)),
        }
    }

    fn set_transform(
        &mut self,
        id: VisualId,
        position: Vec3,
        rotation: Quat,
    ) -> Result<(), SceneError> {
        let visual = self.get_mut(id)?;
        visual.position = position;
        visual.rotation = rotation;
        Ok(())
    }

    fn transform(&self, id: VisualId) -> Result<(Vec3, Quat), SceneError> {
        let visual = self.get(id)?;
        Ok((visual.position, visual.rotation))
    }

    fn set_visible(&mut self, id: VisualId, visible: bool) -> Result<(), SceneError> {
        self.get_mut(id)?.visible = visible;
        Ok(())
    }

    fn is_visible(&self, id: VisualId) -> Result<bool, SceneError> {
        Ok(self.get(id)?.visible)
    }

    fn bounds(&self, id: VisualId) -> Result<Aabb, SceneError> {
        let visual = self.get(id)?;
        let local = match visual.kind {
            VisualKind::Ship => self.ship_half_extents,
            VisualKind::Rock { radius } => Vec3::splat(radius.abs()),
        };
        // Box of a rotated box: project each local axis onto world axes
        let m = Mat3::from_quat(visual.rotation);
        let half = m.x_axis.abs() * local.x + m.y_axis.abs() * local.y + m.z_axis.abs() * local.z;
        Ok(Aabb::from_center_half_extents(visual.position, half))
    }

    fn set_lighting(&mut self, lighting: Lighting) {
        self.lighting = Some(lighting);
    }

    fn set_camera(&mut self, pose: CameraPose) {
        self.camera = Some(pose);
    }

    fn apply_sky(&mut self, sky: &SkyState) {
        self.sky = Some(*sky);
    }

    fn set_beam(&mut self, beam: &BeamPose) {
        self.beam = Some(*beam);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_lifecycle() {
        let mut scene = HeadlessScene::default();
        let a = scene.add(VisualKind::Ship);
        let b = scene.add(VisualKind::Rock { radius: 4.0 });
        assert_eq!(scene.live_count(), 2);
        assert_eq!(scene.count_ships(), 1);
        assert_eq!(scene.count_rocks(), 1);

        scene.remove(a).unwrap();
        assert_eq!(scene.live_count(), 1);
        assert_eq!(scene.remove(a), Err(SceneError::UnknownVisual(a)));
        assert!(scene.set_visible(a, false).is_err());
        assert!(scene.is_visible(b).unwrap());
    }

    #[test]
    fn test_unknown_handle_is_error() {
        let mut scene = HeadlessScene::default();
        let ghost = VisualId(42);
        assert!(scene.bounds(ghost).is_err());
        assert!(scene.set_transform(ghost, Vec3::ZERO, Quat::IDENTITY).is_err());
    }

    #[test]
    fn test_ship_bounds_follow_rotation() {
        let mut scene = HeadlessScene::new(Vec3::new(1.0, 1.0, 5.0));
        let ship = scene.add(VisualKind::Ship);
        let rot = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        scene.set_transform(ship, Vec3::new(10.0, 0.0, 0.0), rot).unwrap();

        let half = scene.bounds(ship).unwrap().half_extents();
        assert!((half.x - 5.0).abs() < 1e-4);
        assert!((half.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rock_bounds_are_cube_of_radius() {
        let mut scene = HeadlessScene::default();
        let rock = scene.add(VisualKind::Rock { radius: 3.0 });
        let aabb = scene.bounds(rock).unwrap();
        assert_eq!(aabb.half_extents(), Vec3::splat(3.0));
    }
}
