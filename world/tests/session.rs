use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use field_defence_core::{CellCoord, Command, Event, SimulationConfig};
use field_defence_world::{self as world, query, World};
use proptest::prelude::*;

const DEFENCES: [(i32, i32); 4] = [(4, 3), (4, 5), (7, 3), (7, 5)];

fn scripted_commands() -> Vec<Command> {
    let mut commands: Vec<Command> = DEFENCES
        .iter()
        .map(|&(column, row)| Command::PlaceTower {
            cell: CellCoord::new(column, row),
        })
        .collect();
    commands.push(Command::Summon);
    for tick in 0..6_000 {
        if tick == 2_500 {
            commands.push(Command::Summon);
        }
        commands.push(Command::Tick);
    }
    commands
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    placed: u32,
    kills: u32,
    arrivals: u32,
    fired: u32,
}

fn run(config: SimulationConfig, commands: Vec<Command>) -> (World, Tally, u64) {
    let mut world = World::new(config);
    let mut tally = Tally::default();
    let mut hasher = DefaultHasher::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        for event in &events {
            match event {
                Event::TowerPlaced { .. } => tally.placed += 1,
                Event::CreepDestroyed { .. } => tally.kills += 1,
                Event::CreepArrived { .. } => tally.arrivals += 1,
                Event::ProjectileFired { .. } => tally.fired += 1,
                _ => {}
            }
        }
        format!("{events:?}").hash(&mut hasher);
    }

    for creep in query::creeps(&world).iter() {
        creep.id.hash(&mut hasher);
        creep.position.x.to_bits().hash(&mut hasher);
        creep.position.y.to_bits().hash(&mut hasher);
    }

    (world, tally, hasher.finish())
}

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let (_, first_tally, first) = run(SimulationConfig::default(), scripted_commands());
    let (_, second_tally, second) = run(SimulationConfig::default(), scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first_tally, second_tally);
}

#[test]
fn seed_changes_the_session() {
    let reseeded = SimulationConfig {
        rng_seed: 17,
        ..SimulationConfig::default()
    };

    let (_, _, baseline) = run(SimulationConfig::default(), scripted_commands());
    let (_, _, other) = run(reseeded, scripted_commands());

    assert_ne!(baseline, other);
}

#[test]
fn defended_session_balances_the_books() {
    let config = SimulationConfig::default();
    let (world, tally, _) = run(config.clone(), scripted_commands());

    assert_eq!(tally.placed, 4);
    assert!(tally.fired > 0);
    assert!(tally.kills > 0, "towers never destroyed a creep");

    let economy = query::economy(&world);
    assert_eq!(
        economy.money,
        config.starting_money - tally.placed * config.tower_cost + tally.kills * config.kill_reward
    );
    assert_eq!(economy.lives, config.starting_lives - tally.arrivals as i32);
    assert_eq!(query::tick(&world), 6_000);
    assert_eq!(query::towers(&world).len(), 4);
    assert_eq!(query::layout_revision(&world), 4);
}

#[test]
fn undefended_creeps_all_escape() {
    let config = SimulationConfig::default();
    let mut commands = vec![Command::Summon];
    commands.extend(std::iter::repeat(Command::Tick).take(12_000));

    let (world, tally, _) = run(config.clone(), commands);

    assert_eq!(tally.kills, 0);
    assert_eq!(tally.arrivals, config.batch_size);
    assert!(query::creeps(&world).is_empty());
    assert_eq!(
        query::economy(&world).lives,
        config.starting_lives - config.batch_size as i32
    );
}

proptest! {
    #[test]
    fn pixel_placements_keep_money_and_layout_consistent(
        clicks in proptest::collection::vec((-100.0f64..800.0, -100.0f64..600.0), 0..20)
    ) {
        let config = SimulationConfig::default();
        let mut world = World::new(config.clone());

        for (x, y) in clicks {
            let mut events = Vec::new();
            world::apply(&mut world, Command::PlaceTowerAtPixel { x, y }, &mut events);
            world::apply(&mut world, Command::Tick, &mut events);

            let towers = query::towers(&world).len() as u32;
            prop_assert_eq!(
                query::economy(&world).money + towers * config.tower_cost,
                config.starting_money
            );
            prop_assert_eq!(query::layout_revision(&world), u64::from(towers));
        }
    }
}
