//! Beam centerline to water-plane projection
//!
//! Ships react to where the keeper points the lamp, so the beam has to be
//! reduced to a single point on the plane ships sail on.

use glam::Vec3;

use crate::consts::SPOT_EPSILON;

/// Point where the ray `origin + direction * t` crosses the plane `y = plane_y`
///
/// Returns `None` when:
/// - the beam is nearly horizontal (`|direction.y| < SPOT_EPSILON`)
/// - the plane is behind the lamp (`t <= 0`)
/// - the crossing is beyond the beam's reach (`t > max_length`)
///
/// `direction` is expected to be unit length so that `t` is a distance.
pub fn project_onto_plane(origin: Vec3, direction: Vec3, plane_y: f32, max_length: f32) -> Option<Vec3> {
    let dy = direction.y;
    if dy.abs() < SPOT_EPSILON {
        return None;
    }

    let t = (plane_y - origin.y) / dy;
    if t <= 0.0 || t > max_length {
        return None;
    }

    Some(origin + direction * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_down_hits_below_lamp() {
        let origin = Vec3::new(3.0, 50.0, -2.0);
        let spot = project_onto_plane(origin, Vec3::NEG_Y, 0.0, 100.0).unwrap();
        assert_eq!(spot, Vec3::new(3.0, 0.0, -2.0));
    }

    #[test]
    fn test_returns_exact_point() {
        let origin = Vec3::new(0.0, 60.0, 0.0);
        let dir = Vec3::new(0.0, -0.6, 0.8);
        let spot = project_onto_plane(origin, dir, 0.0, 600.0).unwrap();
        // t = 100
        assert!((spot - Vec3::new(0.0, 0.0, 80.0)).length() < 1e-4);
        assert!((spot - (origin + dir * 100.0)).length() < 1e-6);
    }

    #[test]
    fn test_nearly_horizontal_is_none() {
        let origin = Vec3::new(0.0, 60.0, 0.0);
        let dir = Vec3::new(0.0, -0.5 * SPOT_EPSILON, 1.0).normalize();
        assert_eq!(project_onto_plane(origin, dir, 0.0, f32::MAX), None);
        assert_eq!(project_onto_plane(origin, Vec3::Z, 0.0, f32::MAX), None);
    }

    #[test]
    fn test_epsilon_boundary_is_outside_band() {
        // |dy| == epsilon is not inside the band, so it projects
        let origin = Vec3::new(0.0, SPOT_EPSILON, 0.0);
        let dir = Vec3::new(0.0, -SPOT_EPSILON, 1.0);
        assert!(project_onto_plane(origin, dir, 0.0, 10.0).is_some());
    }

    #[test]
    fn test_plane_behind_lamp_is_none() {
        // Pointing up, plane below
        let origin = Vec3::new(0.0, 60.0, 0.0);
        assert_eq!(project_onto_plane(origin, Vec3::Y, 0.0, 1000.0), None);
    }

    #[test]
    fn test_lamp_on_plane_is_none() {
        // t == 0 is rejected
        assert_eq!(project_onto_plane(Vec3::ZERO, Vec3::NEG_Y, 0.0, 10.0), None);
    }

    #[test]
    fn test_beyond_length_is_none() {
        let origin = Vec3::new(0.0, 50.0, 0.0);
        assert_eq!(project_onto_plane(origin, Vec3::NEG_Y, 0.0, 49.0), None);
        // t == length is still in reach
        assert!(project_onto_plane(origin, Vec3::NEG_Y, 0.0, 50.0).is_some());
    }
}
