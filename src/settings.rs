//! Vignette settings
//!
//! Everything the simulation consumes as plain numbers lives here. Settings
//! are loaded from JSON; any field left out falls back to its default, so a
//! file only needs to name what it changes.

use core::fmt;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, ROCK_ATTEMPTS_PER_ROCK};
use crate::scene::CameraPose;

/// Where ships appear along the spawn line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnLine {
    /// Uniformly random X within `[min, max]`
    Range { min: f32, max: f32 },
    /// Fixed lanes, used round-robin in spawn order
    Lanes(Vec<f32>),
}

impl Default for SpawnLine {
    fn default() -> Self {
        SpawnLine::Range {
            min: -120.0,
            max: 120.0,
        }
    }
}

/// Intro flythrough
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroSettings {
    /// Seconds from start pose to end pose
    pub duration: f32,
    pub start: CameraPose,
    pub end: CameraPose,
}

impl Default for IntroSettings {
    fn default() -> Self {
        Self {
            duration: 8.0,
            start: CameraPose::new(Vec3::new(0.0, 260.0, 700.0), Vec3::new(0.0, 0.0, 200.0)),
            end: CameraPose::new(Vec3::new(0.0, 62.0, -10.0), Vec3::new(0.0, 20.0, 120.0)),
        }
    }
}

/// Day/night cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleSettings {
    /// Seconds per full day/night cycle
    pub period: f32,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self { period: 120.0 }
    }
}

/// Ship fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipSettings {
    /// Ships per cycle
    pub count: u32,
    /// Far Z where ships appear
    pub spawn_z: f32,
    /// Shore Z; a ship at or past it has arrived
    pub arrive_z: f32,
    pub spawn_line: SpawnLine,
    /// Fixed seconds between spawns. When unset, ships are spread evenly over
    /// `spawn_window` of the cycle.
    pub spawn_interval: Option<f32>,
    /// Fraction of the cycle period used for spawning when no interval is set
    pub spawn_window: f32,
    /// Radius around the spot center where ships start steering toward it
    pub steer_range: f32,
    /// Maximum heading change in radians per second
    pub turn_rate: f32,
    /// Water line for ship hulls
    pub base_y: f32,
    pub bob_amplitude: f32,
    /// Radians per second
    pub bob_frequency: f32,
}

impl Default for ShipSettings {
    fn default() -> Self {
        Self {
            count: 6,
            spawn_z: 550.0,
            arrive_z: 30.0,
            spawn_line: SpawnLine::default(),
            spawn_interval: None,
            spawn_window: 0.5,
            steer_range: 40.0,
            turn_rate: 0.6,
            base_y: 0.0,
            bob_amplitude: 0.6,
            bob_frequency: 1.7,
        }
    }
}

impl ShipSettings {
    /// Seconds between spawns for the given cycle period
    pub fn effective_spawn_interval(&self, cycle_period: f32) -> f32 {
        match self.spawn_interval {
            Some(interval) => interval,
            None if self.count == 0 => 0.0,
            None => cycle_period * self.spawn_window.clamp(0.0, 1.0) / self.count as f32,
        }
    }

    /// Speed at which a ship spawned at cycle start reaches shore exactly as
    /// the next cycle begins
    pub fn cycle_speed(&self, cycle_period: f32) -> f32 {
        if cycle_period > 0.0 {
            (self.spawn_z - self.arrive_z) / cycle_period
        } else {
            0.0
        }
    }
}

/// Rock field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RockSettings {
    pub count: u32,
    pub x_range: [f32; 2],
    pub z_range: [f32; 2],
    /// Visual radius range; colliders are slightly smaller
    pub radius_range: [f32; 2],
    /// Clearance required between a new rock and each placed rock's collider
    pub min_spacing: f32,
    pub ocean_height: f32,
    pub attempts_per_rock: u32,
}

impl Default for RockSettings {
    fn default() -> Self {
        Self {
            count: 10,
            x_range: [-140.0, 140.0],
            z_range: [90.0, 420.0],
            radius_range: [4.0, 12.0],
            min_spacing: 30.0,
            ocean_height: 0.0,
            attempts_per_rock: ROCK_ATTEMPTS_PER_ROCK,
        }
    }
}

/// Lighthouse lamp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamSettings {
    /// Lamp position at the top of the tower
    pub origin: Vec3,
    /// Initial yaw (radians, 0 = looking toward +Z, out to sea)
    pub yaw: f32,
    /// Initial pitch (radians, negative = down)
    pub pitch: f32,
    /// Radians per second while a key is held
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    /// Reach of the beam centerline
    pub length: f32,
    /// Cone radius at full length
    pub radius: f32,
    /// Opacity at full night
    pub max_opacity: f32,
    /// Height of the plane ships sail on
    pub plane_y: f32,
}

impl Default for BeamSettings {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 60.0, 0.0),
            yaw: 0.0,
            pitch: -0.35,
            yaw_speed: 0.9,
            pitch_speed: 0.5,
            pitch_min: -1.2,
            pitch_max: -0.05,
            length: 600.0,
            radius: 45.0,
            max_opacity: 0.55,
            plane_y: 0.0,
        }
    }
}

/// Complete vignette configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for every random draw (rock placement, spawn X, speed, bob phase)
    pub seed: u64,
    /// Clamp for a single frame step in seconds
    pub max_frame_dt: f32,
    pub intro: IntroSettings,
    /// Keeper's viewpoint during play
    pub play_camera: CameraPose,
    pub cycle: CycleSettings,
    pub ships: ShipSettings,
    pub rocks: RockSettings,
    pub beam: BeamSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x4C49_4748,
            max_frame_dt: MAX_FRAME_DT,
            intro: IntroSettings::default(),
            play_camera: CameraPose::new(Vec3::new(0.0, 62.0, -10.0), Vec3::new(0.0, 20.0, 120.0)),
            cycle: CycleSettings::default(),
            ships: ShipSettings::default(),
            rocks: RockSettings::default(),
            beam: BeamSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json).map_err(SettingsError::Parse)?;
        settings.warn_degenerate();
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(SettingsError::Parse)
    }

    /// Degenerate values are allowed (they produce a trivial simulation) but
    /// worth a warning.
    fn warn_degenerate(&self) {
        if !(self.cycle.period > 0.0) {
            log::warn!("Cycle period {} is not positive; cycle will stay at 0", self.cycle.period);
        }
        if self.ships.spawn_z <= self.ships.arrive_z {
            log::warn!(
                "spawn_z {} is not beyond arrive_z {}; fleet will not sail",
                self.ships.spawn_z,
                self.ships.arrive_z
            );
        }
        if self.ships.count == 0 {
            log::warn!("Ship count is 0; fleet will stay empty");
        }
        if self.rocks.radius_range[0] > self.rocks.radius_range[1] {
            log::warn!("Rock radius range is inverted; bounds will be swapped");
        }
    }
}

/// Errors loading settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read settings: {e}"),
            Self::Parse(e) => write!(f, "invalid settings JSON: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "ships": { "count": 2 } }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.ships.count, 2);
        assert_eq!(settings.ships.spawn_z, 550.0);
        assert_eq!(settings.cycle.period, 120.0);
        assert_eq!(settings.rocks.attempts_per_rock, ROCK_ATTEMPTS_PER_ROCK);
    }

    #[test]
    fn test_lanes_spawn_line_parses() {
        let settings =
            Settings::from_json(r#"{ "ships": { "spawn_line": { "lanes": [-40.0, 0.0, 40.0] } } }"#)
                .unwrap();
        assert_eq!(settings.ships.spawn_line, SpawnLine::Lanes(vec![-40.0, 0.0, 40.0]));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("invalid settings JSON"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let mut settings = Settings::default();
        settings.ships.turn_rate = 1.25;
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back.ships.turn_rate, 1.25);
    }

    #[test]
    fn test_cycle_speed_matches_crossing_time() {
        let ships = ShipSettings::default();
        let speed = ships.cycle_speed(120.0);
        assert!((speed - 520.0 / 120.0).abs() < 1e-5);
        assert_eq!(ships.cycle_speed(0.0), 0.0);
    }

    #[test]
    fn test_effective_spawn_interval() {
        let mut ships = ShipSettings::default();
        ships.count = 4;
        ships.spawn_window = 0.5;
        assert!((ships.effective_spawn_interval(120.0) - 15.0).abs() < 1e-5);
        ships.spawn_interval = Some(3.0);
        assert_eq!(ships.effective_spawn_interval(120.0), 3.0);
        ships.spawn_interval = None;
        ships.count = 0;
        assert_eq!(ships.effective_spawn_interval(120.0), 0.0);
    }
}
