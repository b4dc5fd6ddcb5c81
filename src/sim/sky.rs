//! Day/night environment derived from cycle progress
//!
//! Progress 0 is noon, 0.5 is midnight. The renderer turns this into sky
//! color, fog and sun light; the simulation only uses the night factor to
//! fade the lamp in.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::smoothstep;

/// Night factor where the lamp starts to show
const LAMP_ON_START: f32 = 0.35;
/// Night factor where the lamp reaches full opacity
const LAMP_ON_END: f32 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyState {
    /// Cycle progress in `[0, 1)`
    pub progress: f32,
    /// Sun angle around the sky in radians (0 = overhead)
    pub sun_angle: f32,
    /// 1 at noon, 0 at midnight
    pub daylight: f32,
    /// Lamp strength in `[0, 1]`
    pub night_factor: f32,
}

impl SkyState {
    pub fn at(progress: f32) -> Self {
        let sun_angle = progress * TAU;
        let daylight = 0.5 + 0.5 * sun_angle.cos();
        let night_factor = smoothstep(LAMP_ON_START, LAMP_ON_END, 1.0 - daylight);
        Self {
            progress,
            sun_angle,
            daylight,
            night_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noon_and_midnight() {
        let noon = SkyState::at(0.0);
        assert!((noon.daylight - 1.0).abs() < 1e-6);
        assert_eq!(noon.night_factor, 0.0);

        let midnight = SkyState::at(0.5);
        assert!(midnight.daylight.abs() < 1e-6);
        assert_eq!(midnight.night_factor, 1.0);
    }

    #[test]
    fn test_dusk_is_partial() {
        let dusk = SkyState::at(0.25);
        assert!((dusk.daylight - 0.5).abs() < 1e-5);
        assert!(dusk.night_factor > 0.0 && dusk.night_factor < 1.0);
    }
}
