//! Scripted session driver behind the command-line interface.

use field_defence_core::{CellCoord, Command, Event, SimulationConfig};
use field_defence_world::{self as world, query, World};
use serde::Serialize;
use tracing::info;

/// What the session should do.
#[derive(Clone, Debug)]
pub(crate) struct Plan {
    pub(crate) ticks: u64,
    pub(crate) towers: Vec<CellCoord>,
    pub(crate) summon_every: Option<u64>,
}

/// Outcome of one requested tower.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct PlacementReport {
    pub(crate) column: i32,
    pub(crate) row: i32,
    pub(crate) rejected: Option<String>,
}

/// Final state of a finished session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct Summary {
    #[serde(skip)]
    pub(crate) banner: &'static str,
    pub(crate) placements: Vec<PlacementReport>,
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) ticks: u64,
    pub(crate) money: u32,
    pub(crate) lives: i32,
    pub(crate) creeps_alive: usize,
    pub(crate) kills: u32,
    pub(crate) arrivals: u32,
    pub(crate) shots_fired: u32,
}

/// Runs `plan` against a fresh world built from `config`.
pub(crate) fn run(config: SimulationConfig, plan: &Plan) -> Summary {
    let mut world = World::new(config);
    let mut events = Vec::new();

    let mut placements = Vec::with_capacity(plan.towers.len());
    for &cell in &plan.towers {
        events.clear();
        world::apply(&mut world, Command::PlaceTower { cell }, &mut events);
        let rejected = events.iter().find_map(|event| match event {
            Event::TowerPlacementRejected { reason, .. } => Some(reason.to_string()),
            _ => None,
        });
        placements.push(PlacementReport {
            column: cell.column(),
            row: cell.row(),
            rejected,
        });
    }

    let mut kills = 0;
    let mut arrivals = 0;
    let mut shots_fired = 0;
    for tick in 0..plan.ticks {
        events.clear();
        if summon_due(tick, plan.summon_every) {
            world::apply(&mut world, Command::Summon, &mut events);
        }
        world::apply(&mut world, Command::Tick, &mut events);

        for event in &events {
            match event {
                Event::CreepDestroyed { .. } => kills += 1,
                Event::CreepArrived { .. } => arrivals += 1,
                Event::ProjectileFired { .. } => shots_fired += 1,
                _ => {}
            }
        }
    }

    let economy = query::economy(&world);
    let (columns, rows) = query::cells(&world).dimensions();
    info!(
        ticks = query::tick(&world),
        kills,
        arrivals,
        money = economy.money,
        lives = economy.lives,
        "session finished"
    );

    Summary {
        banner: query::welcome_banner(&world),
        placements,
        columns,
        rows,
        ticks: query::tick(&world),
        money: economy.money,
        lives: economy.lives,
        creeps_alive: query::creeps(&world).len(),
        kills,
        arrivals,
        shots_fired,
    }
}

fn summon_due(tick: u64, every: Option<u64>) -> bool {
    match every {
        Some(period) if period > 0 => tick % period == 0,
        _ => tick == 0,
    }
}
