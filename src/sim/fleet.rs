//! Ship fleet: spawning, steering, bobbing and shore arrival
//!
//! Ships sail from the far spawn line toward shore. When the keeper's beam
//! lands close enough, a ship turns toward the lit spot at a bounded rate.
//! A ship's life ends when it reaches shore or strikes a rock; it then stays in
//! the fleet, hidden, until the fleet is reset at the next cycle.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;

use super::geometry::{circles_intersect_xz, flatten_xz, rotate_y, signed_angle_xz};
use super::state::{SimulationContext, sample_between};
use crate::scene::{Scene, SceneError, VisualId, VisualKind};
use crate::settings::{ShipSettings, SpawnLine};

/// Direction of travel toward shore
pub const SHORE_HEADING: Vec3 = Vec3::NEG_Z;

/// Lifecycle of a single ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipState {
    /// Sailing straight for shore
    Spawned,
    /// Has turned toward the beam at least once
    Steering,
    /// Reached the shore line (terminal)
    Arrived,
    /// Struck a rock (terminal)
    Crashed,
}

impl ShipState {
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, ShipState::Spawned | ShipState::Steering)
    }
}

/// A ship entity
#[derive(Debug, Clone)]
pub struct Ship {
    pub id: u32,
    pub visual: VisualId,
    pub position: Vec3,
    /// Water line the hull bobs around
    pub base_y: f32,
    /// Unit length, always level (y == 0)
    pub heading: Vec3,
    pub speed: f32,
    /// Radians per second
    pub turn_rate: f32,
    /// Fixed at spawn from the visual's bounds
    pub collider_radius: f32,
    pub bob_phase: f32,
    pub state: ShipState,
    pub visible: bool,
}

impl Ship {
    /// A visible ship heading for shore
    pub fn new(id: u32, visual: VisualId, position: Vec3, speed: f32, collider_radius: f32) -> Self {
        Self {
            id,
            visual,
            position,
            base_y: position.y,
            heading: SHORE_HEADING,
            speed,
            turn_rate: 0.0,
            collider_radius,
            bob_phase: 0.0,
            state: ShipState::Spawned,
            visible: true,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Rotation that points the hull's +Z along the heading
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.heading.x.atan2(self.heading.z))
    }

    /// Turn toward `target` by at most `turn_rate * dt` radians
    ///
    /// Returns the signed angle actually turned. The heading comes out level
    /// and unit length.
    pub fn steer_toward(&mut self, target: Vec3, dt: f32) -> f32 {
        let Some(desired) = flatten_xz(target - self.position).try_normalize() else {
            return 0.0;
        };
        let current = flatten_xz(self.heading).normalize_or(SHORE_HEADING);

        let max_turn = (self.turn_rate * dt).max(0.0);
        let turn = signed_angle_xz(current, desired).clamp(-max_turn, max_turn);

        self.heading = flatten_xz(rotate_y(current, turn)).normalize_or(current);
        self.state = ShipState::Steering;
        turn
    }

    /// Mark crashed and hide
    pub fn crash(&mut self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        self.state = ShipState::Crashed;
        self.hide(scene)
    }

    fn arrive(&mut self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        self.state = ShipState::Arrived;
        self.hide(scene)
    }

    fn hide(&mut self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        self.visible = false;
        scene.set_visible(self.visual, false)
    }
}

/// Fleet parameters, resolved from settings and the cycle period
#[derive(Debug, Clone)]
pub struct FleetConfig {
    pub ship_count: u32,
    pub spawn_z: f32,
    pub arrive_z: f32,
    pub spawn_line: SpawnLine,
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Speed drawn per ship from `[min, max]`
    pub speed_range: [f32; 2],
    pub steer_range: f32,
    pub turn_rate: f32,
    pub base_y: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
}

impl FleetConfig {
    /// Ship speed is pinned to the cycle so a ship spawned as a cycle begins
    /// reaches shore exactly as the next one starts.
    pub fn from_settings(ships: &ShipSettings, cycle_period: f32) -> Self {
        let speed = ships.cycle_speed(cycle_period);
        Self {
            ship_count: ships.count,
            spawn_z: ships.spawn_z,
            arrive_z: ships.arrive_z,
            spawn_line: ships.spawn_line.clone(),
            spawn_interval: ships.effective_spawn_interval(cycle_period),
            speed_range: [speed, speed],
            steer_range: ships.steer_range,
            turn_rate: ships.turn_rate,
            base_y: ships.base_y,
            bob_amplitude: ships.bob_amplitude,
            bob_frequency: ships.bob_frequency,
        }
    }

    /// Configurations that cannot produce a sailing ship
    pub fn is_degenerate(&self) -> bool {
        let [lo, hi] = self.speed_range;
        self.ship_count == 0
            || !(lo > 0.0 && hi > 0.0 && lo.is_finite() && hi.is_finite())
            || !(self.spawn_z > self.arrive_z)
            || matches!(&self.spawn_line, SpawnLine::Lanes(lanes) if lanes.is_empty())
    }
}

/// All ships of the current cycle, in spawn order
#[derive(Debug, Clone)]
pub struct Fleet {
    config: FleetConfig,
    ships: Vec<Ship>,
    spawned_count: u32,
    spawn_timer: f32,
    next_lane: usize,
    next_id: u32,
}

impl Fleet {
    pub fn new(config: FleetConfig) -> Self {
        if config.is_degenerate() {
            log::warn!("Fleet configuration is degenerate; no ships will sail");
        }
        Self {
            spawn_timer: config.spawn_interval,
            config,
            ships: Vec::new(),
            spawned_count: 0,
            next_lane: 0,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ships_mut(&mut self) -> &mut [Ship] {
        &mut self.ships
    }

    pub fn spawned_count(&self) -> u32 {
        self.spawned_count
    }

    pub fn count_in(&self, state: ShipState) -> usize {
        self.ships.iter().filter(|s| s.state == state).count()
    }

    pub fn active_count(&self) -> usize {
        self.ships.iter().filter(|s| s.is_active()).count()
    }

    /// Launch one ship from the spawn line
    ///
    /// Returns the new ship's index, or `None` when the quota is used up or
    /// the configuration cannot produce a ship.
    pub fn spawn(&mut self, ctx: &mut SimulationContext) -> Result<Option<usize>, SceneError> {
        if self.spawned_count >= self.config.ship_count || self.config.is_degenerate() {
            return Ok(None);
        }

        let x = match &self.config.spawn_line {
            SpawnLine::Range { min, max } => sample_between(ctx.rng, *min, *max),
            SpawnLine::Lanes(lanes) => {
                let x = lanes[self.next_lane % lanes.len()];
                self.next_lane = (self.next_lane + 1) % lanes.len();
                x
            }
        };
        let [speed_min, speed_max] = self.config.speed_range;
        let speed = sample_between(ctx.rng, speed_min, speed_max);
        let bob_phase = ctx.rng.random_range(0.0..TAU);

        let position = Vec3::new(x, self.config.base_y, self.config.spawn_z);
        let visual = ctx.scene.add(VisualKind::Ship);

        let mut ship = Ship::new(self.next_id, visual, position, speed, 0.0);
        let bounds = ctx
            .scene
            .set_transform(visual, position, ship.orientation())
            .and_then(|()| ctx.scene.bounds(visual));
        let bounds = match bounds {
            Ok(bounds) => bounds,
            Err(e) => {
                // Not tracked yet, so no reset would ever remove it
                if let Err(cleanup) = ctx.scene.remove(visual) {
                    log::warn!("Could not remove half-spawned ship {visual}: {cleanup}");
                }
                return Err(e);
            }
        };
        ship.collider_radius = bounds.bounding_radius();
        ship.turn_rate = self.config.turn_rate;
        ship.bob_phase = bob_phase;

        log::debug!(
            "Ship {} spawned at x={:.1} speed={:.3} collider={:.2}",
            ship.id,
            x,
            speed,
            ship.collider_radius
        );

        self.next_id += 1;
        self.spawned_count += 1;
        self.ships.push(ship);
        Ok(Some(self.ships.len() - 1))
    }

    /// Advance the fleet by `dt`
    ///
    /// `elapsed` is play time (drives bobbing), `spot` is where the beam meets
    /// the water, if anywhere.
    pub fn update(
        &mut self,
        ctx: &mut SimulationContext,
        dt: f32,
        elapsed: f32,
        spot: Option<Vec3>,
    ) -> Result<(), SceneError> {
        self.spawn_timer += dt;
        if self.spawn_timer >= self.config.spawn_interval && self.spawned_count < self.config.ship_count {
            self.spawn(ctx)?;
            self.spawn_timer = 0.0;
        }

        let config = &self.config;
        for ship in self.ships.iter_mut().filter(|s| s.is_active()) {
            if let Some(spot) = spot {
                if circles_intersect_xz(ship.position, ship.collider_radius, spot, config.steer_range) {
                    ship.steer_toward(spot, dt);
                }
            }

            ship.position += ship.heading * ship.speed * dt;
            ship.position.y = ship.base_y
                + config.bob_amplitude * (elapsed * config.bob_frequency + ship.bob_phase).sin();

            ctx.scene.set_transform(ship.visual, ship.position, ship.orientation())?;

            if ship.position.z <= config.arrive_z {
                log::debug!("Ship {} reached shore at x={:.1}", ship.id, ship.position.x);
                ship.arrive(ctx.scene)?;
            }
        }

        Ok(())
    }

    /// Remove every ship and rewind the spawn schedule
    pub fn reset(&mut self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        let result = crate::scene::detach_all(scene, self.ships.drain(..).map(|s| s.visual));
        self.spawned_count = 0;
        self.spawn_timer = self.config.spawn_interval;
        self.next_lane = 0;
        result
    }
}
