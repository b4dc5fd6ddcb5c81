//! Sphere and circle predicates
//!
//! Every test compares squared distances so the boundary is exact: touching
//! counts as intersecting.

use glam::Vec3;

/// True if two spheres overlap or touch
#[inline]
pub fn spheres_intersect(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    center_a.distance_squared(center_b) <= reach * reach
}

/// True if the XZ projections of two circles overlap or touch (Y ignored)
#[inline]
pub fn circles_intersect_xz(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    distance_squared_xz(center_a, center_b) <= reach * reach
}

/// Squared distance between the XZ projections of two points
#[inline]
pub fn distance_squared_xz(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

/// Drop the Y component
#[inline]
pub fn flatten_xz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Signed angle in the XZ plane that rotates `from` onto `to`
///
/// Magnitude comes from the dot product, sign from the 2D cross product, with
/// the same orientation as [`rotate_y`]. Both inputs should be unit length.
pub fn signed_angle_xz(from: Vec3, to: Vec3) -> f32 {
    let dot = (from.x * to.x + from.z * to.z).clamp(-1.0, 1.0);
    let cross = from.x * to.z - from.z * to.x;
    let angle = dot.acos();
    if cross < 0.0 { -angle } else { angle }
}

/// Rotate a vector in the XZ plane by `angle` radians
///
/// Positive angles turn +X toward +Z. Y passes through unchanged.
#[inline]
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}
