//! Static rocks and ship-vs-rock collisions
//!
//! Rocks are placed once per play session by rejection sampling and never
//! move. Each frame, after the fleet has moved, every live ship is tested
//! against the rocks in placement order.

use glam::{Quat, Vec3};

use super::fleet::Ship;
use super::geometry::{distance_squared_xz, spheres_intersect};
use super::state::{SimulationContext, sample_between};
use crate::consts::{ROCK_COLLIDER_SCALE, ROCK_LIFT};
use crate::scene::{Scene, SceneError, VisualId, VisualKind, detach_all};
use crate::settings::RockSettings;

/// A placed rock
#[derive(Debug, Clone)]
pub struct Rock {
    pub visual: VisualId,
    /// Collider center
    pub center: Vec3,
    /// Collider radius, a little smaller than the visual
    pub radius: f32,
    pub visual_radius: f32,
}

/// A ship that struck a rock this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub ship_index: usize,
    pub rock_index: usize,
}

/// The session's rocks
#[derive(Debug, Clone)]
pub struct RockField {
    settings: RockSettings,
    rocks: Vec<Rock>,
    /// Reused every frame by `check_collisions`
    hits: Vec<Collision>,
}

impl RockField {
    pub fn new(settings: RockSettings) -> Self {
        Self {
            settings,
            rocks: Vec::new(),
            hits: Vec::new(),
        }
    }

    pub fn rocks(&self) -> &[Rock] {
        &self.rocks
    }

    pub fn settings(&self) -> &RockSettings {
        &self.settings
    }

    /// Scatter up to `count` rocks over the placement region
    ///
    /// A candidate is kept only if it clears every rock already placed by
    /// `min_spacing` plus that rock's radius. The candidate's own radius is not
    /// part of the test, so earlier rocks get more room than later ones. The
    /// search gives up after `count * attempts_per_rock` tries; fewer rocks is
    /// an expected outcome, not an error.
    ///
    /// Returns how many rocks were placed by this call.
    pub fn place(&mut self, ctx: &mut SimulationContext) -> Result<usize, SceneError> {
        let target = self.settings.count as usize;
        let budget = self.settings.count.saturating_mul(self.settings.attempts_per_rock);
        let [x_a, x_b] = self.settings.x_range;
        let [z_a, z_b] = self.settings.z_range;
        let [r_a, r_b] = self.settings.radius_range;

        let already = self.rocks.len();
        let mut attempts = 0u32;
        while self.rocks.len() - already < target && attempts < budget {
            attempts += 1;
            let x = sample_between(ctx.rng, x_a, x_b);
            let z = sample_between(ctx.rng, z_a, z_b);
            let radius = sample_between(ctx.rng, r_a, r_b);

            if self.has_clearance(x, z) {
                self.place_rock(ctx.scene, x, z, radius)?;
            }
        }

        let placed = self.rocks.len() - already;
        if placed < target {
            log::warn!("Placed {placed} of {target} rocks; gave up after {attempts} attempts");
        } else {
            log::info!("Placed {placed} rocks in {attempts} attempts");
        }
        Ok(placed)
    }

    /// Place one rock at `(x, z)` with the given visual radius, skipping the
    /// spacing test. Returns the rock's index.
    pub fn place_rock(
        &mut self,
        scene: &mut dyn Scene,
        x: f32,
        z: f32,
        visual_radius: f32,
    ) -> Result<usize, SceneError> {
        let center = Vec3::new(x, self.settings.ocean_height + visual_radius * ROCK_LIFT, z);
        let visual = scene.add(VisualKind::Rock {
            radius: visual_radius,
        });
        if let Err(e) = scene.set_transform(visual, center, Quat::IDENTITY) {
            if let Err(cleanup) = scene.remove(visual) {
                log::warn!("Could not remove unplaced rock {visual}: {cleanup}");
            }
            return Err(e);
        }

        self.rocks.push(Rock {
            visual,
            center,
            radius: visual_radius * ROCK_COLLIDER_SCALE,
            visual_radius,
        });
        Ok(self.rocks.len() - 1)
    }

    /// True if `(x, z)` is farther than `min_spacing + rock.radius` from every
    /// placed rock
    fn has_clearance(&self, x: f32, z: f32) -> bool {
        let candidate = Vec3::new(x, 0.0, z);
        self.rocks.iter().all(|rock| {
            let needed = self.settings.min_spacing + rock.radius;
            needed < 0.0 || distance_squared_xz(candidate, rock.center) > needed * needed
        })
    }

    /// Crash every live ship that touches a rock
    ///
    /// Ships that are inactive or hidden are skipped. A ship reports at most
    /// one hit per call: the first rock in placement order. The returned slice
    /// is valid until the next call.
    pub fn check_collisions(
        &mut self,
        ships: &mut [Ship],
        scene: &mut dyn Scene,
    ) -> Result<&[Collision], SceneError> {
        self.hits.clear();

        for (ship_index, ship) in ships.iter_mut().enumerate() {
            if !ship.is_active() || !ship.visible {
                continue;
            }

            let hit = self.rocks.iter().position(|rock| {
                spheres_intersect(ship.position, ship.collider_radius, rock.center, rock.radius)
            });

            if let Some(rock_index) = hit {
                log::debug!("Ship {} struck rock {}", ship.id, rock_index);
                ship.crash(scene)?;
                self.hits.push(Collision {
                    ship_index,
                    rock_index,
                });
            }
        }

        Ok(self.hits.as_slice())
    }

    /// Remove every rock
    pub fn reset(&mut self, scene: &mut dyn Scene) -> Result<(), SceneError> {
        self.hits.clear();
        detach_all(scene, self.rocks.drain(..).map(|r| r.visual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::HeadlessScene;
    use crate::sim::fleet::ShipState;
    use crate::sim::state::seeded_rng;
    use proptest::prelude::*;

    fn flat_field() -> RockField {
        RockField::new(RockSettings {
            ocean_height: -2.5,
            ..RockSettings::default()
        })
    }

    fn ship_at(scene: &mut HeadlessScene, id: u32, position: Vec3, radius: f32) -> Ship {
        let visual = scene.add(VisualKind::Ship);
        Ship::new(id, visual, position, 1.0, radius)
    }

    #[test]
    fn test_rock_geometry_from_sampled_radius() {
        let mut scene = HeadlessScene::default();
        let mut field = RockField::new(RockSettings {
            ocean_height: 1.0,
            ..RockSettings::default()
        });
        field.place_rock(&mut scene, 4.0, 7.0, 10.0).unwrap();

        let rock = &field.rocks()[0];
        assert!((rock.radius - 9.0).abs() < 1e-6);
        assert_eq!(rock.center, Vec3::new(4.0, 3.5, 7.0));
        assert_eq!(scene.transform(rock.visual).unwrap().0, rock.center);
    }

    #[test]
    fn test_ship_touching_rock_crashes() {
        let mut scene = HeadlessScene::default();
        let mut field = flat_field();
        // Center lands at y = 0 with ocean -2.5 and radius 10
        field.place_rock(&mut scene, 0.0, 0.0, 10.0).unwrap();
        assert_eq!(field.rocks()[0].center, Vec3::ZERO);

        let mut ships = vec![ship_at(&mut scene, 1, Vec3::new(5.0, 0.0, 0.0), 3.0)];
        let hits = field.check_collisions(&mut ships, &mut scene).unwrap().to_vec();
        assert_eq!(
            hits,
            vec![Collision {
                ship_index: 0,
                rock_index: 0
            }]
        );
        assert_eq!(ships[0].state, ShipState::Crashed);
        assert!(!ships[0].visible);
        assert!(!scene.is_visible(ships[0].visual).unwrap());

        // Already crashed: no new event
        let again = field.check_collisions(&mut ships, &mut scene).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_only_first_rock_reported() {
        let mut scene = HeadlessScene::default();
        let mut field = flat_field();
        field.place_rock(&mut scene, -4.0, 0.0, 10.0).unwrap();
        field.place_rock(&mut scene, 4.0, 0.0, 10.0).unwrap();

        let mut ships = vec![ship_at(&mut scene, 1, Vec3::ZERO, 2.0)];
        let hits = field.check_collisions(&mut ships, &mut scene).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].rock_index, 0);
    }

    #[test]
    fn test_skips_inactive_and_hidden_ships() {
        let mut scene = HeadlessScene::default();
        let mut field = flat_field();
        field.place_rock(&mut scene, 0.0, 0.0, 10.0).unwrap();

        let mut arrived = ship_at(&mut scene, 1, Vec3::ZERO, 2.0);
        arrived.state = ShipState::Arrived;
        let mut hidden = ship_at(&mut scene, 2, Vec3::ZERO, 2.0);
        hidden.visible = false;
        let clear = ship_at(&mut scene, 3, Vec3::new(100.0, 0.0, 0.0), 2.0);
        let hit = ship_at(&mut scene, 4, Vec3::new(0.0, 0.0, 8.0), 2.0);

        let mut ships = vec![arrived, hidden, clear, hit];
        let hits = field.check_collisions(&mut ships, &mut scene).unwrap().to_vec();
        assert_eq!(
            hits,
            vec![Collision {
                ship_index: 3,
                rock_index: 0
            }]
        );
        assert_eq!(ships[0].state, ShipState::Arrived);
        assert_eq!(ships[1].state, ShipState::Spawned);
        assert_eq!(ships[2].state, ShipState::Spawned);
    }

    #[test]
    fn test_placement_respects_count_and_region() {
        let mut scene = HeadlessScene::default();
        let mut rng = seeded_rng(21);
        let mut ctx = SimulationContext::new(&mut scene, &mut rng);
        let mut field = RockField::new(RockSettings {
            count: 5,
            x_range: [-500.0, 500.0],
            z_range: [0.0, 1000.0],
            radius_range: [2.0, 4.0],
            min_spacing: 5.0,
            ..RockSettings::default()
        });

        assert_eq!(field.place(&mut ctx).unwrap(), 5);
        for rock in field.rocks() {
            assert!((-500.0..=500.0).contains(&rock.center.x));
            assert!((0.0..=1000.0).contains(&rock.center.z));
            assert!((1.79..=3.61).contains(&rock.radius));
        }
        assert_eq!(scene.count_rocks(), 5);
    }

    #[test]
    fn test_exhausted_budget_places_fewer() {
        let mut scene = HeadlessScene::default();
        let mut rng = seeded_rng(22);
        let mut ctx = SimulationContext::new(&mut scene, &mut rng);
        // Region far smaller than the spacing: only the first rock fits
        let mut field = RockField::new(RockSettings {
            count: 4,
            x_range: [0.0, 1.0],
            z_range: [0.0, 1.0],
            radius_range: [5.0, 5.0],
            min_spacing: 50.0,
            ..RockSettings::default()
        });

        assert_eq!(field.place(&mut ctx).unwrap(), 1);
        assert_eq!(field.rocks().len(), 1);
    }

    #[test]
    fn test_zero_count_and_inverted_ranges() {
        let mut scene = HeadlessScene::default();
        let mut rng = seeded_rng(23);
        let mut ctx = SimulationContext::new(&mut scene, &mut rng);

        let mut none = RockField::new(RockSettings {
            count: 0,
            ..RockSettings::default()
        });
        assert_eq!(none.place(&mut ctx).unwrap(), 0);

        let mut inverted = RockField::new(RockSettings {
            count: 3,
            x_range: [300.0, -300.0],
            radius_range: [6.0, 2.0],
            ..RockSettings::default()
        });
        assert_eq!(inverted.place(&mut ctx).unwrap(), 3);
        for rock in inverted.rocks() {
            assert!((-300.0..=300.0).contains(&rock.center.x));
            assert!(rock.visual_radius >= 2.0 && rock.visual_radius <= 6.0);
        }
    }

    #[test]
    fn test_reset_detaches_rocks() {
        let mut scene = HeadlessScene::default();
        let mut rng = seeded_rng(24);
        let mut ctx = SimulationContext::new(&mut scene, &mut rng);
        let mut field = RockField::new(RockSettings::default());
        field.place(&mut ctx).unwrap();

        field.reset(&mut scene).unwrap();
        assert!(field.rocks().is_empty());
        assert_eq!(scene.count_rocks(), 0);
    }

    proptest! {
        #[test]
        fn placed_rocks_keep_spacing_from_earlier_rocks(
            seed in any::<u64>(),
            count in 1u32..25,
            min_spacing in 0.0f32..40.0,
        ) {
            let mut scene = HeadlessScene::default();
            let mut rng = seeded_rng(seed);
            let mut ctx = SimulationContext::new(&mut scene, &mut rng);
            let mut field = RockField::new(RockSettings {
                count,
                x_range: [-150.0, 150.0],
                z_range: [50.0, 400.0],
                radius_range: [3.0, 12.0],
                min_spacing,
                ..RockSettings::default()
            });
            let placed = field.place(&mut ctx).unwrap();
            prop_assert!(placed <= count as usize);

            let rocks = field.rocks();
            for i in 0..rocks.len() {
                for j in 0..i {
                    let d = distance_squared_xz(rocks[i].center, rocks[j].center).sqrt();
                    prop_assert!(d >= min_spacing + rocks[j].radius - 1e-3);
                }
            }
        }
    }
}
