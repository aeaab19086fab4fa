#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session for Field Defence.
//!
//! The world owns the navigation grid, the creep and projectile populations,
//! every tower and the economy counters. Adapters mutate it exclusively
//! through [`apply`] and observe it through the [`query`] module.

use field_defence_core::{
    CellCoord, Command, EconomyState, Event, PlacementError, SimulationConfig, TowerId,
    WELCOME_BANNER,
};
use field_defence_system_creeps::{CreepSimulation, CreepTuning};
use field_defence_system_navigation::NavigationGrid;
use field_defence_system_projectiles::{ProjectileSimulation, ProjectileTuning};
use field_defence_system_towers::{Tower, TowerTuning};
use tracing::{debug, info};

/// Represents the authoritative Field Defence session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SimulationConfig,
    grid: NavigationGrid,
    creeps: CreepSimulation,
    projectiles: ProjectileSimulation,
    tower_tuning: TowerTuning,
    towers: Vec<Tower>,
    economy: EconomyState,
    next_tower: u32,
    tick_index: u64,
    layout_revision: u64,
}

impl World {
    /// Creates a session on the default field described by `config`.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let grid = NavigationGrid::new(config.field_columns, config.field_rows);
        Self {
            banner: WELCOME_BANNER,
            creeps: CreepSimulation::new(CreepTuning::from_config(&config), config.rng_seed),
            projectiles: ProjectileSimulation::new(ProjectileTuning::from_config(&config)),
            tower_tuning: TowerTuning::from_config(&config),
            towers: Vec::new(),
            economy: EconomyState::from_config(&config),
            next_tower: 0,
            tick_index: 0,
            layout_revision: 0,
            grid,
            config,
        }
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        let first = out_events.len();
        self.creeps.step(&self.grid, out_events);
        self.projectiles.step(&mut self.creeps, out_events);
        for tower in &mut self.towers {
            tower.step(
                &self.tower_tuning,
                &self.creeps,
                &mut self.projectiles,
                out_events,
            );
        }

        self.settle_economy(first, out_events);
    }

    /// Credits kills and charges escapes reported since `first`.
    fn settle_economy(&mut self, first: usize, out_events: &mut Vec<Event>) {
        let mut kills = 0u32;
        let mut arrivals = 0i32;
        for event in &out_events[first..] {
            match event {
                Event::CreepDestroyed { .. } => kills += 1,
                Event::CreepArrived { .. } => arrivals += 1,
                _ => {}
            }
        }
        if kills == 0 && arrivals == 0 {
            return;
        }

        let reward = self.config.kill_reward.saturating_mul(kills);
        self.economy.money = self.economy.money.saturating_add(reward);
        self.economy.lives = self.economy.lives.saturating_sub(arrivals);
        debug!(
            kills,
            arrivals,
            money = self.economy.money,
            lives = self.economy.lives,
            "economy settled"
        );
        out_events.push(self.economy_changed());
    }

    fn summon(&mut self, out_events: &mut Vec<Event>) {
        let count = self.config.batch_size;
        self.creeps
            .spawn_batch(count, self.config.spawn_interval_ticks());
        info!(count, tick = self.tick_index, "summon started");
        out_events.push(Event::SummonStarted { count });
    }

    fn place_tower(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let cost = self.config.tower_cost;
        let placed = if self.economy.can_afford(cost) {
            self.grid.try_place_obstacle(cell)
        } else {
            Err(PlacementError::InsufficientFunds)
        };

        if let Err(reason) = placed {
            debug!(
                column = cell.column(),
                row = cell.row(),
                %reason,
                "tower placement rejected"
            );
            out_events.push(Event::TowerPlacementRejected { cell, reason });
            return;
        }

        let tower = TowerId::new(self.next_tower);
        self.next_tower = self.next_tower.wrapping_add(1);
        self.towers.push(Tower::new(tower, cell));
        self.economy.money -= cost;
        self.layout_revision = self.layout_revision.wrapping_add(1);
        info!(
            tower = tower.get(),
            column = cell.column(),
            row = cell.row(),
            money = self.economy.money,
            "tower placed"
        );
        out_events.push(Event::TowerPlaced { tower, cell });
        out_events.push(self.economy_changed());
    }

    fn economy_changed(&self) -> Event {
        Event::EconomyChanged {
            money: self.economy.money,
            lives: self.economy.lives,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.advance(out_events),
        Command::Summon => world.summon(out_events),
        Command::PlaceTower { cell } => world.place_tower(cell, out_events),
        Command::PlaceTowerAtPixel { x, y } => {
            let cell = CellCoord::from_pixel(x, y, world.config.cell_size_px);
            world.place_tower(cell, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use field_defence_core::{
        CellCoord, CellMatrix, CreepView, EconomyState, ProjectileView, SimulationConfig,
        TowerView,
    };
    use field_defence_system_towers::Tower;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the session was built from.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Captures every live creep in insertion order.
    #[must_use]
    pub fn creeps(world: &World) -> CreepView {
        world.creeps.view()
    }

    /// Captures every projectile in flight in firing order.
    #[must_use]
    pub fn projectiles(world: &World) -> ProjectileView {
        world.projectiles.view()
    }

    /// Captures every tower in placement order.
    #[must_use]
    pub fn towers(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(Tower::snapshot).collect())
    }

    /// Exposes the dense cell matrix renderers draw the background from.
    #[must_use]
    pub fn cells(world: &World) -> CellMatrix<'_> {
        world.grid.cells()
    }

    /// Current money and lives.
    #[must_use]
    pub fn economy(world: &World) -> EconomyState {
        world.economy
    }

    /// Counter bumped on every committed tower placement.
    ///
    /// Renderers regenerate the background only when it changes.
    #[must_use]
    pub fn layout_revision(world: &World) -> u64 {
        world.layout_revision
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Creeps of the current batch still waiting to spawn.
    #[must_use]
    pub fn pending_spawns(world: &World) -> u32 {
        world.creeps.pending()
    }

    /// Cell creeps spawn from.
    #[must_use]
    pub fn origin(world: &World) -> CellCoord {
        world.grid.origin()
    }

    /// Cell creeps try to reach.
    #[must_use]
    pub fn goal(world: &World) -> CellCoord {
        world.grid.goal()
    }
}
