//! Lighthouse Keeper - simulation core for a coastal night-watch vignette
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ships, rocks, beam, day/night cycle)
//! - `scene`: Boundary to the renderer, plus a headless in-memory scene
//! - `settings`: Data-driven configuration loaded from JSON

pub mod scene;
pub mod settings;
pub mod sim;

pub use scene::{HeadlessScene, Scene, SceneError};
pub use settings::Settings;

/// Simulation constants
pub mod consts {
    /// Nominal frame step used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Upper bound for a single frame step. Longer pauses are clamped so ships
    /// cannot tunnel through rocks or skip more than one cycle boundary.
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// Beam directions with |y| below this never reach the water plane
    pub const SPOT_EPSILON: f32 = 1e-4;

    /// Rock collider radius relative to its visual radius
    pub const ROCK_COLLIDER_SCALE: f32 = 0.9;
    /// Rock center height above the ocean, relative to its visual radius
    pub const ROCK_LIFT: f32 = 0.25;
    /// Placement attempts granted per requested rock
    pub const ROCK_ATTEMPTS_PER_ROCK: u32 = 50;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
