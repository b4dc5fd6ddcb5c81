//! Simulation state shared across components
//!
//! Nothing here is global: the scene and the RNG travel together in a
//! `SimulationContext` that the orchestrator builds for each tick and lends to
//! whichever component needs them.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::cycle::CycleManager;
use super::fleet::{Fleet, FleetConfig};
use super::rocks::RockField;
use crate::scene::{Scene, SceneError};
use crate::settings::Settings;

/// Vignette mode. `Intro` hands over to `Play` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Camera flythrough; beam controls are disabled
    Intro,
    /// Day/night loop with ships, rocks and a steerable beam
    Play,
}

/// Renderer and randomness lent to components for one operation
pub struct SimulationContext<'a> {
    pub scene: &'a mut dyn Scene,
    pub rng: &'a mut Pcg32,
}

impl<'a> SimulationContext<'a> {
    pub fn new(scene: &'a mut dyn Scene, rng: &'a mut Pcg32) -> Self {
        Self { scene, rng }
    }
}

/// Seeded RNG for a run
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Uniform sample between two bounds in either order
///
/// Equal bounds return the bound without consuming randomness, so a fixed
/// configuration stays fully deterministic.
pub(crate) fn sample_between<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == hi || !(lo.is_finite() && hi.is_finite()) {
        return lo;
    }
    rng.random_range(lo..=hi)
}

/// Everything that exists only while playing
///
/// Rebuilt from scratch on every entry into `Mode::Play`.
pub struct PlaySession {
    pub fleet: Fleet,
    pub rocks: RockField,
    pub cycle: CycleManager,
    /// Seconds since play began
    pub play_time: f32,
    /// Latest cycle progress in `[0, 1)`
    pub progress: f32,
    /// Boundaries crossed after the first cycle
    pub cycles_completed: u32,
}

impl PlaySession {
    /// Build a fresh fleet, rock field and cycle clock from settings
    pub fn new(settings: &Settings, ctx: &mut SimulationContext) -> Result<Self, SceneError> {
        let fleet = Fleet::new(FleetConfig::from_settings(&settings.ships, settings.cycle.period));
        let mut rocks = RockField::new(settings.rocks.clone());
        if let Err(e) = rocks.place(ctx) {
            if let Err(cleanup) = rocks.reset(ctx.scene) {
                log::warn!("Could not release partly placed rocks: {cleanup}");
            }
            return Err(e);
        }
        let cycle = CycleManager::new(settings.cycle.period);

        Ok(Self {
            fleet,
            rocks,
            cycle,
            play_time: 0.0,
            progress: 0.0,
            cycles_completed: 0,
        })
    }

    /// Detach every visual the session owns
    pub fn release(&mut self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        let fleet = self.fleet.reset(scene);
        let rocks = self.rocks.reset(scene);
        fleet.and(rocks)
    }
}
