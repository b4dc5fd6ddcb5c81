//! Intro flythrough: an eased camera move from the opening pose to the
//! keeper's viewpoint.

use crate::scene::CameraPose;
use crate::settings::IntroSettings;
use crate::smoothstep;

#[derive(Debug, Clone)]
pub struct IntroFlight {
    start: CameraPose,
    end: CameraPose,
    duration: f32,
    elapsed: f32,
}

impl IntroFlight {
    pub fn new(settings: &IntroSettings) -> Self {
        Self {
            start: settings.start,
            end: settings.end,
            duration: settings.duration,
            elapsed: 0.0,
        }
    }

    /// Linear progress in `[0, 1]`. A non-positive duration is already done.
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advance the flight and return the new progress
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        self.progress()
    }

    /// Camera pose at the current progress, eased in and out
    pub fn pose(&self) -> CameraPose {
        self.start.lerp(&self.end, smoothstep(0.0, 1.0, self.progress()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_reaches_end_pose() {
        let settings = IntroSettings::default();
        let mut intro = IntroFlight::new(&settings);
        assert_eq!(intro.pose(), settings.start);

        let mut steps = 0;
        while !intro.is_complete() {
            intro.advance(0.5);
            steps += 1;
        }
        assert_eq!(steps, 16);
        assert_eq!(intro.pose(), settings.end);
        assert_eq!(intro.advance(1.0), 1.0);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        let intro = IntroFlight::new(&IntroSettings {
            duration: 0.0,
            ..IntroSettings::default()
        });
        assert!(intro.is_complete());
    }
}
