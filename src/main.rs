//! Lighthouse Keeper headless runner
//!
//! Runs the vignette without a renderer and logs what happens.
//!
//! Usage: `lighthouse-keeper [settings.json] [seconds]`
//! Set `RUST_LOG=debug` to see individual spawns, arrivals and wrecks.

use anyhow::{Context, Result};

use lighthouse_keeper::consts::FRAME_DT;
use lighthouse_keeper::sim::{KeyState, Mode, ShipState, Simulation, TickInput};
use lighthouse_keeper::{HeadlessScene, Settings};

/// Seconds the scripted keeper holds each sweep direction
const SWEEP_SECS: f32 = 4.0;
const DEFAULT_RUN_SECS: f32 = 300.0;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Lighthouse Keeper (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path).with_context(|| format!("loading settings from {path}"))?,
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };
    let run_secs = match args.next() {
        Some(secs) => secs
            .parse::<f32>()
            .with_context(|| format!("invalid run length {secs:?}"))?,
        None => DEFAULT_RUN_SECS,
    };

    let mut scene = HeadlessScene::default();
    let mut sim = Simulation::new(settings);

    let frames = (run_secs / FRAME_DT).ceil() as u64;
    let mut arrived = 0usize;
    let mut crashed = 0usize;
    let mut last_cycle = 0u32;

    for frame in 0..frames {
        let t = frame as f32 * FRAME_DT;
        let input = TickInput {
            keys: sweep_keys(t),
        };
        sim.frame(&mut scene, &input, FRAME_DT);

        // Tally each cycle's outcome just before the fleet is reset
        if let Some(session) = sim.session() {
            if session.cycles_completed != last_cycle {
                last_cycle = session.cycles_completed;
            } else {
                arrived = arrived.max(session.fleet.count_in(ShipState::Arrived));
                crashed = crashed.max(session.fleet.count_in(ShipState::Crashed));
            }
        }
    }

    let (cycles, progress) = sim
        .session()
        .map(|s| (s.cycles_completed, s.progress))
        .unwrap_or((0, 0.0));
    log::info!(
        "Ran {:.1}s: mode={:?} cycles_completed={} progress={:.2} faults={}",
        run_secs,
        sim.mode(),
        cycles,
        progress,
        sim.fault_count()
    );
    if sim.mode() == Mode::Play {
        log::info!("Best cycle so far: {arrived} ships reached shore, {crashed} wrecked");
    }

    sim.shutdown(&mut scene).context("releasing scene visuals")?;
    log::info!("Shut down cleanly ({} visuals left)", scene.live_count());
    Ok(())
}

/// Scripted keeper: swing the lamp left, then right, and repeat
fn sweep_keys(t: f32) -> KeyState {
    let left = (t / SWEEP_SECS) as u32 % 2 == 0;
    KeyState {
        left,
        right: !left,
        ..Default::default()
    }
}
