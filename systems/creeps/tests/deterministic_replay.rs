use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use field_defence_core::{CellCoord, Event, SimulationConfig};
use field_defence_system_creeps::{CreepSimulation, CreepTuning};
use field_defence_system_navigation::NavigationGrid;

const TICKS: u32 = 3_000;

#[test]
fn same_seed_replays_identically() {
    let first = replay(0x5eed);
    let second = replay(0x5eed);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first.spawned > 0);
}

#[test]
fn different_seeds_diverge() {
    assert_ne!(replay(1).fingerprint, replay(2).fingerprint);
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    fingerprint: u64,
    spawned: usize,
}

fn replay(seed: u64) -> ReplayOutcome {
    let config = SimulationConfig::default();
    let mut grid = NavigationGrid::new(config.field_columns, config.field_rows);
    let _ = grid.try_place_obstacle(CellCoord::new(4, 4));
    let _ = grid.try_place_obstacle(CellCoord::new(7, 3));

    let mut creeps = CreepSimulation::new(CreepTuning::from_config(&config), seed);
    creeps.spawn_batch(config.batch_size, config.spawn_interval_ticks());

    let mut hasher = DefaultHasher::new();
    let mut spawned = 0;
    for _ in 0..TICKS {
        let mut events = Vec::new();
        creeps.step(&grid, &mut events);
        spawned += events
            .iter()
            .filter(|event| matches!(event, Event::CreepSpawned { .. }))
            .count();
        format!("{events:?}").hash(&mut hasher);
        for creep in creeps.creeps() {
            creep.id().hash(&mut hasher);
            creep.position().x.to_bits().hash(&mut hasher);
            creep.position().y.to_bits().hash(&mut hasher);
            creep.velocity().x.to_bits().hash(&mut hasher);
            creep.velocity().y.to_bits().hash(&mut hasher);
        }
    }

    ReplayOutcome {
        fingerprint: hasher.finish(),
        spawned,
    }
}
