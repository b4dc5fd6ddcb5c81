//! Renderer boundary
//!
//! The simulation never touches meshes, materials or shaders. It talks to the
//! renderer through [`Scene`]: add/remove visuals, move them, show/hide them,
//! and ask once for a bounding box to size colliders.
//!
//! [`HeadlessScene`] is an in-memory implementation used by the native runner
//! and the tests.

mod headless;

pub use headless::HeadlessScene;

use core::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::sim::{BeamPose, SkyState};

/// Opaque handle to a visual owned by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualId(pub u32);

impl fmt::Display for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visual#{}", self.0)
    }
}

/// What kind of visual to build
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualKind {
    Ship,
    /// Rock with its visual (not collider) radius
    Rock { radius: f32 },
}

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Radius of the sphere enclosing the box
    pub fn bounding_radius(&self) -> f32 {
        self.half_extents().length()
    }
}

/// Which lighting rig is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lighting {
    Intro,
    Play,
}

/// Camera position and look-at target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Component-wise interpolation of position and target
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            target: self.target.lerp(other.target, t),
        }
    }
}

/// Errors raised by per-visual scene operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle was never issued or has already been removed
    UnknownVisual(VisualId),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVisual(id) => write!(f, "unknown or removed {id}"),
        }
    }
}

impl std::error::Error for SceneError {}

/// Remove every visual in `ids`, continuing past failures
///
/// Returns the first error encountered, if any.
pub fn detach_all(
    scene: &mut dyn Scene,
    ids: impl IntoIterator<Item = VisualId>,
) -> Result<(), SceneError> {
    let mut first_err = None;
    for id in ids {
        if let Err(e) = scene.remove(id) {
            first_err.get_or_insert(e);
        }
    }
    first_err.map_or(Ok(()), Err)
}

/// Everything the simulation needs from the renderer
pub trait Scene {
    /// Build and attach a new visual
    fn add(&mut self, kind: VisualKind) -> VisualId;
    /// Detach and drop a visual
    fn remove(&mut self, id: VisualId) -> Result<(), SceneError>;

    fn set_transform(&mut self, id: VisualId, position: Vec3, rotation: Quat)
    -> Result<(), SceneError>;
    fn transform(&self, id: VisualId) -> Result<(Vec3, Quat), SceneError>;

    fn set_visible(&mut self, id: VisualId, visible: bool) -> Result<(), SceneError>;
    fn is_visible(&self, id: VisualId) -> Result<bool, SceneError>;

    /// World-space bounds of the visual at its current transform
    fn bounds(&self, id: VisualId) -> Result<Aabb, SceneError>;

    fn set_lighting(&mut self, lighting: Lighting);
    fn set_camera(&mut self, pose: CameraPose);
    fn apply_sky(&mut self, sky: &SkyState);
    fn set_beam(&mut self, beam: &BeamPose);
}
