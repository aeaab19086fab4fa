#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Creep population: spawning, steering along the direction field, wall
//! bounces, pairwise collisions and removal of creeps that escaped or died.

mod collision;
mod creep;
mod spawn;

use field_defence_core::{CellCoord, CreepId, CreepView, Event, Health, SimulationConfig, Vec2};
use field_defence_system_navigation::NavigationGrid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

pub use collision::resolve_collisions;
pub use creep::Creep;

use spawn::SpawnSchedule;

/// Kinematic constants shared by every creep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreepTuning {
    /// Collision and wall look-ahead radius in cells.
    pub radius: f64,
    /// Steering acceleration per tick.
    pub acceleration: f64,
    /// Friction per tick.
    pub deceleration: f64,
    /// Speed cap above which steering pauses.
    pub max_speed: f64,
    /// Hit points of a fresh creep.
    pub health: u32,
    /// Forward speed at spawn.
    pub spawn_speed: f64,
    /// Largest lateral speed added at spawn.
    pub lateral_jitter: f64,
}

impl CreepTuning {
    /// Extracts the creep constants from the simulation configuration.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            radius: config.creep_radius,
            acceleration: config.creep_acceleration,
            deceleration: config.creep_deceleration,
            max_speed: config.creep_max_speed,
            health: config.creep_health,
            spawn_speed: config.spawn_speed,
            lateral_jitter: config.spawn_lateral_jitter,
        }
    }
}

/// Result of damaging a creep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The creep survived with the given health.
    Wounded(Health),
    /// The creep died and has been removed from the population.
    Destroyed,
}

/// Owner of every live creep, kept in insertion order.
#[derive(Debug)]
pub struct CreepSimulation {
    tuning: CreepTuning,
    creeps: Vec<Creep>,
    schedule: SpawnSchedule,
    rng: ChaCha8Rng,
    next_id: u32,
}

impl CreepSimulation {
    /// Creates an empty population whose spawn jitter is drawn from `seed`.
    #[must_use]
    pub fn new(tuning: CreepTuning, seed: u64) -> Self {
        Self {
            tuning,
            creeps: Vec::new(),
            schedule: SpawnSchedule::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Schedules `count` creeps, one every `interval` ticks after the first.
    ///
    /// Creeps still pending from an earlier batch are discarded.
    pub fn spawn_batch(&mut self, count: u32, interval: u32) {
        self.schedule.start(count, interval);
    }

    /// Reports whether a batch is still releasing creeps.
    #[must_use]
    pub const fn is_summoning(&self) -> bool {
        self.schedule.remaining() > 0
    }

    /// Creeps of the current batch that have not spawned yet.
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.schedule.remaining()
    }

    /// Inserts a creep with full health at an arbitrary position.
    pub fn spawn_at(&mut self, position: Vec2, velocity: Vec2) -> CreepId {
        let id = CreepId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.creeps
            .push(Creep::new(id, position, velocity, Health::new(self.tuning.health)));
        id
    }

    /// Advances the population by one tick.
    ///
    /// The tick releases a scheduled creep, applies friction to every creep,
    /// steers them along the grid's direction field, resolves collisions,
    /// moves them, and finally removes creeps that reached the goal or ran
    /// out of health.
    pub fn step(&mut self, grid: &NavigationGrid, out: &mut Vec<Event>) {
        if self.schedule.poll() {
            let (creep, position) = self.spawn_from_origin(grid);
            debug!(creep = creep.get(), "creep spawned");
            out.push(Event::CreepSpawned { creep, position });
        }

        for creep in &mut self.creeps {
            creep.decelerate(self.tuning.deceleration);
        }

        for creep in &mut self.creeps {
            creep.steer(grid, &self.tuning);
        }

        resolve_collisions(&mut self.creeps, self.tuning.radius);

        for creep in &mut self.creeps {
            creep.advance(grid, self.tuning.radius);
        }

        self.cull(grid.goal(), out);
    }

    /// Nearest creep within `radius` of `point`.
    ///
    /// Equally near candidates resolve to the one inserted first.
    #[must_use]
    pub fn nearest_within(&self, point: Vec2, radius: f64) -> Option<&Creep> {
        let limit = radius * radius;
        let mut best: Option<(f64, &Creep)> = None;

        for creep in &self.creeps {
            let distance2 = creep.position().distance2(point);
            if distance2 > limit {
                continue;
            }
            match best {
                Some((best_distance2, _)) if best_distance2 <= distance2 => {}
                _ => best = Some((distance2, creep)),
            }
        }

        best.map(|(_, creep)| creep)
    }

    /// Applies `damage` to the creep, removing it at once if it dies.
    ///
    /// Returns `None` when no live creep carries `id`.
    pub fn inflict_damage(&mut self, id: CreepId, damage: u32) -> Option<DamageOutcome> {
        let index = self.creeps.iter().position(|creep| creep.id() == id)?;
        let health = self.creeps[index].absorb(damage);
        if !health.is_depleted() {
            return Some(DamageOutcome::Wounded(health));
        }

        let _ = self.creeps.remove(index);
        debug!(creep = id.get(), "creep destroyed");
        Some(DamageOutcome::Destroyed)
    }

    /// Live creeps in insertion order.
    #[must_use]
    pub fn creeps(&self) -> &[Creep] {
        &self.creeps
    }

    /// Number of live creeps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.creeps.len()
    }

    /// Reports whether no creeps are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creeps.is_empty()
    }

    /// Captures a read-only view of every live creep.
    #[must_use]
    pub fn view(&self) -> CreepView {
        CreepView::from_snapshots(self.creeps.iter().map(Creep::snapshot).collect())
    }

    fn spawn_from_origin(&mut self, grid: &NavigationGrid) -> (CreepId, Vec2) {
        let origin = grid.origin();
        let forward = grid
            .next_step(origin)
            .and_then(|next| (next.center() - origin.center()).with_length(1.0))
            .unwrap_or(Vec2::new(1.0, 0.0));
        let lateral = Vec2::new(-forward.y, forward.x);

        let spread = 1.0 - 2.0 * self.rng.gen::<f64>();
        let velocity = forward.scale(self.tuning.spawn_speed)
            + lateral.scale(self.tuning.lateral_jitter * spread);

        let position = origin.center();
        (self.spawn_at(position, velocity), position)
    }

    /// Removes creeps that reached the goal, walking backward so removals
    /// never disturb the indices still to be visited.
    ///
    /// Deaths are handled by [`Self::inflict_damage`], so only damage can
    /// destroy a creep.
    fn cull(&mut self, goal: CellCoord, out: &mut Vec<Event>) {
        for index in (0..self.creeps.len()).rev() {
            let id = self.creeps[index].id();
            if self.creeps[index].cell() == goal {
                let _ = self.creeps.remove(index);
                debug!(creep = id.get(), "creep reached the goal");
                out.push(Event::CreepArrived { creep: id });
            }
        }
    }
}
