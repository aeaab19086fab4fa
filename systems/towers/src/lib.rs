#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Towers: cooldown bookkeeping, nearest-creep targeting and lead-predicted
//! firing.

use field_defence_core::{CellCoord, Event, SimulationConfig, TowerId, TowerSnapshot, Vec2};
use field_defence_system_creeps::CreepSimulation;
use field_defence_system_projectiles::ProjectileSimulation;
use tracing::debug;

/// Constants shared by every tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTuning {
    /// Engagement range in cells.
    pub range: f64,
    /// Speed of fired projectiles in cells per tick.
    pub projectile_speed: f64,
    /// Lifetime given to fired projectiles.
    pub lifetime: u32,
    /// Ticks a tower waits after firing.
    pub fire_delay: u32,
}

impl TowerTuning {
    /// Extracts the tower constants from the simulation configuration.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            range: config.tower_range,
            projectile_speed: config.projectile_speed,
            lifetime: config.projectile_lifetime(),
            fire_delay: config.fire_delay_ticks(),
        }
    }
}

/// A tower standing on a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tower {
    id: TowerId,
    cell: CellCoord,
    cooldown: u32,
}

impl Tower {
    /// Creates a tower that is ready to fire.
    #[must_use]
    pub const fn new(id: TowerId, cell: CellCoord) -> Self {
        Self {
            id,
            cell,
            cooldown: 0,
        }
    }

    /// Identifier of the tower.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Cell the tower stands on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Ticks until the tower may fire again.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Immutable copy of the tower for render queries.
    #[must_use]
    pub const fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            cooldown: self.cooldown,
        }
    }

    /// Advances the tower by one tick.
    ///
    /// A cooling tower only counts down. A ready tower fires at the nearest
    /// creep in range and restarts its cooldown. With nothing in range it
    /// stays ready and looks again next tick.
    pub fn step(
        &mut self,
        tuning: &TowerTuning,
        creeps: &CreepSimulation,
        projectiles: &mut ProjectileSimulation,
        out: &mut Vec<Event>,
    ) {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return;
        }

        let origin = self.cell.center();
        let Some(target) = creeps.nearest_within(origin, tuning.range) else {
            return;
        };
        let Some(velocity) = lead_aim(
            origin,
            target.position(),
            target.velocity(),
            tuning.projectile_speed,
        ) else {
            return;
        };

        let projectile = projectiles.fire(origin, velocity, tuning.lifetime);
        self.cooldown = tuning.fire_delay;
        debug!(
            tower = self.id.get(),
            creep = target.id().get(),
            projectile = projectile.get(),
            "tower fired"
        );
        out.push(Event::ProjectileFired {
            tower: self.id,
            projectile,
        });
    }
}

/// Velocity of a projectile launched from `origin` at `speed` that leads a
/// target moving with constant `target_velocity`.
///
/// The lead is a single linear estimate: the target's velocity scaled by the
/// straight-line flight time is added to the displacement, and the sum is
/// rescaled to `speed`. Returns `None` when `speed` is not positive or the
/// aim collapses to the zero vector.
#[must_use]
pub fn lead_aim(origin: Vec2, target: Vec2, target_velocity: Vec2, speed: f64) -> Option<Vec2> {
    if speed.is_nan() || speed <= 0.0 {
        return None;
    }

    let displacement = target - origin;
    let flight_time = displacement.norm() / speed;
    (displacement + target_velocity.scale(flight_time)).with_length(speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_defence_core::ProjectileId;
    use field_defence_system_creeps::CreepTuning;
    use field_defence_system_projectiles::ProjectileTuning;

    fn setup() -> (TowerTuning, CreepSimulation, ProjectileSimulation) {
        let config = SimulationConfig::default();
        (
            TowerTuning::from_config(&config),
            CreepSimulation::new(CreepTuning::from_config(&config), 0),
            ProjectileSimulation::new(ProjectileTuning::from_config(&config)),
        )
    }

    #[test]
    fn stationary_target_is_aimed_at_directly() {
        let velocity = lead_aim(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0), Vec2::ZERO, 0.5)
            .expect("aim");
        assert!((velocity.x - 0.3).abs() < 1e-12);
        assert!((velocity.y - 0.4).abs() < 1e-12);
    }

    #[test]
    fn moving_target_is_led() {
        let velocity = lead_aim(
            Vec2::ZERO,
            Vec2::new(2.0, 0.0),
            Vec2::new(0.0, 0.1),
            0.5,
        )
        .expect("aim");

        let expected = Vec2::new(2.0, 0.4).with_length(0.5).expect("direction");
        assert!((velocity - expected).norm() < 1e-12);
        assert!((velocity.norm() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_aims_are_refused() {
        assert_eq!(lead_aim(Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::ZERO, 0.0), None);
        assert_eq!(lead_aim(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, 1.0), None);
    }

    #[test]
    fn idle_tower_stays_ready_without_a_target() {
        let (tuning, creeps, mut projectiles) = setup();
        let mut tower = Tower::new(TowerId::new(0), CellCoord::new(5, 2));
        let mut events = Vec::new();

        for _ in 0..10 {
            tower.step(&tuning, &creeps, &mut projectiles, &mut events);
        }

        assert_eq!(tower.cooldown(), 0);
        assert!(events.is_empty());
        assert!(projectiles.is_empty());
    }

    #[test]
    fn firing_starts_the_cooldown() {
        let (tuning, mut creeps, mut projectiles) = setup();
        let _ = creeps.spawn_at(Vec2::new(5.0, 4.0), Vec2::ZERO);
        let tower_id = TowerId::new(3);
        let mut tower = Tower::new(tower_id, CellCoord::new(5, 2));
        let mut events = Vec::new();

        tower.step(&tuning, &creeps, &mut projectiles, &mut events);

        assert_eq!(
            events,
            vec![Event::ProjectileFired {
                tower: tower_id,
                projectile: ProjectileId::new(0),
            }]
        );
        assert_eq!(tower.cooldown(), tuning.fire_delay);
        let shot = projectiles.projectiles()[0];
        assert_eq!(shot.position(), Vec2::new(5.0, 2.0));
        assert_eq!(shot.lifetime(), tuning.lifetime);
        assert!((shot.velocity() - Vec2::new(0.0, tuning.projectile_speed)).norm() < 1e-15);

        events.clear();
        for _ in 0..tuning.fire_delay {
            tower.step(&tuning, &creeps, &mut projectiles, &mut events);
        }
        assert!(events.is_empty());
        assert_eq!(tower.cooldown(), 0);

        tower.step(&tuning, &creeps, &mut projectiles, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(projectiles.len(), 2);
    }

    #[test]
    fn creeps_beyond_range_are_ignored() {
        let (tuning, mut creeps, mut projectiles) = setup();
        let _ = creeps.spawn_at(Vec2::new(9.0, 4.0), Vec2::ZERO);
        let mut tower = Tower::new(TowerId::new(0), CellCoord::new(5, 2));
        let mut events = Vec::new();

        tower.step(&tuning, &creeps, &mut projectiles, &mut events);

        assert!(events.is_empty());
        assert_eq!(tower.cooldown(), 0);
    }
}
