#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectiles in flight: straight-line travel, hits on the nearest creep and
//! expiry after a fixed number of ticks.

use field_defence_core::{
    Event, ProjectileId, ProjectileSnapshot, ProjectileView, SimulationConfig, Vec2,
};
use field_defence_system_creeps::{CreepSimulation, DamageOutcome};
use tracing::debug;

/// Constants shared by every projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileTuning {
    /// Distance at which a projectile connects with a creep.
    pub hit_radius: f64,
    /// Damage applied by a single hit.
    pub damage: u32,
}

impl ProjectileTuning {
    /// Extracts the projectile constants from the simulation configuration.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            hit_radius: config.hit_radius,
            damage: config.projectile_damage,
        }
    }
}

/// A projectile travelling at constant velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    position: Vec2,
    velocity: Vec2,
    lifetime: u32,
}

impl Projectile {
    /// Identifier of the projectile.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Continuous position in cells.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity in cells per tick.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Ticks left before the projectile expires.
    #[must_use]
    pub const fn lifetime(&self) -> u32 {
        self.lifetime
    }

    /// Immutable copy of the projectile for render queries.
    #[must_use]
    pub const fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            lifetime: self.lifetime,
        }
    }
}

/// Owner of every projectile in flight, kept in firing order.
#[derive(Debug)]
pub struct ProjectileSimulation {
    tuning: ProjectileTuning,
    projectiles: Vec<Projectile>,
    next_id: u32,
}

impl ProjectileSimulation {
    /// Creates an empty simulation.
    #[must_use]
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            tuning,
            projectiles: Vec::new(),
            next_id: 0,
        }
    }

    /// Launches a projectile that expires after `lifetime` ticks without a hit.
    ///
    /// A lifetime of zero behaves like a lifetime of one.
    pub fn fire(&mut self, position: Vec2, velocity: Vec2, lifetime: u32) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            position,
            velocity,
            lifetime,
        });
        id
    }

    /// Advances every projectile by one tick.
    ///
    /// A projectile within the hit radius of a creep damages the nearest one
    /// and disappears, even on the tick it would otherwise expire. The others
    /// lose a tick of lifetime and either expire or move on.
    pub fn step(&mut self, creeps: &mut CreepSimulation, out: &mut Vec<Event>) {
        for index in (0..self.projectiles.len()).rev() {
            let projectile = self.projectiles[index];
            let target = creeps
                .nearest_within(projectile.position, self.tuning.hit_radius)
                .map(|creep| creep.id());

            if let Some(creep) = target {
                let _ = self.projectiles.remove(index);
                out.push(Event::ProjectileHit {
                    projectile: projectile.id,
                    creep,
                });
                if let Some(DamageOutcome::Destroyed) =
                    creeps.inflict_damage(creep, self.tuning.damage)
                {
                    debug!(
                        projectile = projectile.id.get(),
                        creep = creep.get(),
                        "projectile destroyed creep"
                    );
                    out.push(Event::CreepDestroyed { creep });
                }
                continue;
            }

            let lifetime = projectile.lifetime.saturating_sub(1);
            if lifetime == 0 {
                let _ = self.projectiles.remove(index);
                out.push(Event::ProjectileExpired {
                    projectile: projectile.id,
                });
                continue;
            }

            let live = &mut self.projectiles[index];
            live.lifetime = lifetime;
            live.position += live.velocity;
        }
    }

    /// Projectiles in flight, in firing order.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Reports whether nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn view(&self) -> ProjectileView {
        ProjectileView::from_snapshots(self.projectiles.iter().map(Projectile::snapshot).collect())
    }
}
