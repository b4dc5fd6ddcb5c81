//! The keeper's lamp
//!
//! Four keys swing the lamp: left/right change yaw, up/down change pitch.
//! Controls only respond while the rig is enabled, which the orchestrator
//! does on entering play.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::spotlight::project_onto_plane;
use crate::normalize_angle;
use crate::settings::BeamSettings;

/// Raw directional key state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl KeyState {
    /// -1, 0 or 1 from a pair of opposing keys
    fn axis(negative: bool, positive: bool) -> f32 {
        (positive as i8 - negative as i8) as f32
    }
}

/// World-space beam, as handed to the renderer and the projector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamPose {
    pub origin: Vec3,
    /// Unit forward axis
    pub direction: Vec3,
    pub length: f32,
    pub radius: f32,
    pub opacity: f32,
}

/// Lamp orientation and controls
#[derive(Debug, Clone)]
pub struct BeamRig {
    origin: Vec3,
    /// Radians, 0 looks toward +Z; left turns toward +X
    yaw: f32,
    /// Radians, negative looks down
    pitch: f32,
    yaw_speed: f32,
    pitch_speed: f32,
    pitch_min: f32,
    pitch_max: f32,
    length: f32,
    radius: f32,
    max_opacity: f32,
    opacity: f32,
    enabled: bool,
}

impl BeamRig {
    pub fn new(settings: &BeamSettings) -> Self {
        let (pitch_min, pitch_max) = if settings.pitch_min <= settings.pitch_max {
            (settings.pitch_min, settings.pitch_max)
        } else {
            (settings.pitch_max, settings.pitch_min)
        };
        Self {
            origin: settings.origin,
            yaw: normalize_angle(settings.yaw),
            pitch: settings.pitch.clamp(pitch_min, pitch_max),
            yaw_speed: settings.yaw_speed,
            pitch_speed: settings.pitch_speed,
            pitch_min,
            pitch_max,
            length: settings.length,
            radius: settings.radius,
            max_opacity: settings.max_opacity,
            opacity: 0.0,
            enabled: false,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Set opacity as a fraction of the configured maximum
    pub fn set_night_factor(&mut self, factor: f32) {
        self.opacity = self.max_opacity * factor.clamp(0.0, 1.0);
    }

    /// Swing the lamp from held keys. Ignored while disabled.
    pub fn apply_keys(&mut self, keys: KeyState, dt: f32) {
        if !self.enabled {
            return;
        }
        let yaw_axis = KeyState::axis(keys.right, keys.left);
        let pitch_axis = KeyState::axis(keys.down, keys.up);

        self.yaw = normalize_angle(self.yaw + yaw_axis * self.yaw_speed * dt);
        self.pitch = (self.pitch + pitch_axis * self.pitch_speed * dt).clamp(self.pitch_min, self.pitch_max);
    }

    /// Unit forward axis from yaw and pitch
    pub fn direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch)
    }

    pub fn pose(&self) -> BeamPose {
        BeamPose {
            origin: self.origin,
            direction: self.direction(),
            length: self.length,
            radius: self.radius,
            opacity: self.opacity,
        }
    }

    /// Where the beam centerline meets the plane `y = plane_y`, if in reach
    pub fn spot_on_plane(&self, plane_y: f32) -> Option<Vec3> {
        project_onto_plane(self.origin, self.direction(), plane_y, self.length)
    }
}
