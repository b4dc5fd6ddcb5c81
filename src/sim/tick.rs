//! Per-frame simulation tick
//!
//! `Simulation` owns the mode machine and everything built for play. Each
//! rendered frame calls `frame` once; the step is clamped, the tick runs to
//! completion, and a failing tick is logged without stopping the next one.

use rand_pcg::Pcg32;

use super::beam::{BeamRig, KeyState};
use super::fleet::ShipState;
use super::intro::IntroFlight;
use super::sky::SkyState;
use super::state::{Mode, PlaySession, SimulationContext, seeded_rng};
use crate::scene::{Lighting, Scene, SceneError};
use crate::settings::Settings;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Beam controls (only honored in play)
    pub keys: KeyState,
}

/// The vignette: intro flythrough, then the endless day/night loop
pub struct Simulation {
    settings: Settings,
    mode: Mode,
    rng: Pcg32,
    intro: IntroFlight,
    beam: BeamRig,
    session: Option<PlaySession>,
    /// Ticks that failed and were skipped
    faults: u32,
    started: bool,
}

impl Simulation {
    pub fn new(settings: Settings) -> Self {
        log::info!("Simulation created with seed {}", settings.seed);
        Self {
            rng: seeded_rng(settings.seed),
            intro: IntroFlight::new(&settings.intro),
            beam: BeamRig::new(&settings.beam),
            mode: Mode::Intro,
            session: None,
            faults: 0,
            started: false,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn beam(&self) -> &BeamRig {
        &self.beam
    }

    pub fn session(&self) -> Option<&PlaySession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut PlaySession> {
        self.session.as_mut()
    }

    pub fn fault_count(&self) -> u32 {
        self.faults
    }

    /// Clamp a raw frame step to `[0, max_frame_dt]`
    pub fn clamp_dt(&self, raw_dt: f32) -> f32 {
        if raw_dt.is_finite() {
            raw_dt.clamp(0.0, self.settings.max_frame_dt.max(0.0))
        } else {
            0.0
        }
    }

    /// Run one frame. Faults are logged and counted; the simulation keeps
    /// going.
    pub fn frame(&mut self, scene: &mut dyn Scene, input: &TickInput, raw_dt: f32) {
        let dt = self.clamp_dt(raw_dt);
        if let Err(e) = self.tick(scene, input, dt) {
            self.faults += 1;
            log::error!("Tick failed ({:?} mode, fault #{}): {}", self.mode, self.faults, e);
        }
    }

    /// Advance by an already-clamped `dt`
    pub fn tick(&mut self, scene: &mut dyn Scene, input: &TickInput, dt: f32) -> Result<(), SceneError> {
        if !self.started {
            scene.set_lighting(Lighting::Intro);
            self.started = true;
        }

        match self.mode {
            Mode::Intro => {
                self.intro.advance(dt);
                scene.set_camera(self.intro.pose());
                if self.intro.is_complete() {
                    self.enter_play(scene)?;
                }
                Ok(())
            }
            Mode::Play => self.tick_play(scene, input, dt),
        }
    }

    /// Switch from intro to play. Only ever happens once.
    ///
    /// The session is built before anything is committed, so a failed entry
    /// leaves the simulation in intro and the next frame tries again.
    fn enter_play(&mut self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        let mut ctx = SimulationContext::new(scene, &mut self.rng);
        let session = PlaySession::new(&self.settings, &mut ctx)?;

        log::info!("Intro complete, entering play");
        self.session = Some(session);
        self.mode = Mode::Play;
        scene.set_lighting(Lighting::Play);
        scene.set_camera(self.settings.play_camera);
        self.beam.set_enabled(true);
        Ok(())
    }

    fn tick_play(&mut self, scene: &mut dyn Scene, input: &TickInput, dt: f32) -> Result<(), SceneError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        session.play_time += dt;
        let mut new_cycle = None;
        session.progress = session.cycle.update_with(session.play_time, |index| new_cycle = Some(index));
        if let Some(index) = new_cycle {
            if index > 0 {
                session.cycles_completed += 1;
            }
            log::info!(
                "Cycle {} begins ({} ships arrived, {} crashed last cycle)",
                index,
                session.fleet.count_in(ShipState::Arrived),
                session.fleet.count_in(ShipState::Crashed),
            );
            session.fleet.reset(scene)?;
        }

        let sky = SkyState::at(session.progress);
        scene.apply_sky(&sky);
        self.beam.set_night_factor(sky.night_factor);

        self.beam.apply_keys(input.keys, dt);
        scene.set_beam(&self.beam.pose());
        let spot = self.beam.spot_on_plane(self.settings.beam.plane_y);

        let mut ctx = SimulationContext::new(scene, &mut self.rng);
        session.fleet.update(&mut ctx, dt, session.play_time, spot)?;

        // Crashes end the ship; nothing else reacts to them yet
        let hits = session.rocks.check_collisions(session.fleet.ships_mut(), ctx.scene)?;
        for hit in hits {
            log::info!("Ship #{} wrecked on rock #{}", hit.ship_index, hit.rock_index);
        }

        Ok(())
    }

    /// Release every visual owned by the play session
    pub fn shutdown(&mut self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        match self.session.take() {
            Some(mut session) => session.release(scene),
            None => Ok(()),
        }
    }
}
