//! Deterministic simulation module
//!
//! All vignette logic lives here. This module must be pure and deterministic:
//! - One tick per frame, with a clamped step
//! - Seeded RNG only, passed in through `SimulationContext`
//! - Stable iteration order (spawn order for ships, placement order for rocks)
//! - No rendering beyond the `Scene` trait

pub mod beam;
pub mod cycle;
pub mod fleet;
pub mod geometry;
pub mod intro;
pub mod rocks;
pub mod sky;
pub mod spotlight;
pub mod state;
pub mod tick;

pub use beam::{BeamPose, BeamRig, KeyState};
pub use cycle::{CycleManager, CycleTick};
pub use fleet::{Fleet, FleetConfig, Ship, ShipState};
pub use geometry::{circles_intersect_xz, spheres_intersect};
pub use intro::IntroFlight;
pub use rocks::{Collision, Rock, RockField};
pub use sky::SkyState;
pub use spotlight::project_onto_plane;
pub use state::{Mode, PlaySession, SimulationContext};
pub use tick::{Simulation, TickInput};
