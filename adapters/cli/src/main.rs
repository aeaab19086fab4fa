#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line tick source for Field Defence.
//!
//! Builds a session, places the requested towers, summons creeps and steps
//! the simulation for a fixed number of ticks before printing a summary.

mod session;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use field_defence_core::{CellCoord, SimulationConfig};
use tracing_subscriber::EnvFilter;

use session::{Plan, Summary};

#[derive(Debug, Parser)]
#[command(name = "field-defence", about = "Runs a headless Field Defence session", version)]
struct Cli {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 5_400)]
    ticks: u64,

    /// JSON file overriding the default simulation constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the spawn jitter generator
    #[arg(long)]
    seed: Option<u64>,

    /// Tower cell as COLUMN,ROW; may be repeated
    #[arg(long = "tower", value_name = "COLUMN,ROW", value_parser = parse_cell)]
    towers: Vec<CellCoord>,

    /// Summon a fresh batch every N ticks instead of once
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    summon_every: Option<u64>,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

/// Entry point for the Field Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }
    config.validate().context("unusable simulation config")?;

    let plan = Plan {
        ticks: cli.ticks,
        towers: cli.towers,
        summon_every: cli.summon_every,
    };
    let summary = session::run(config, &plan);

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{rendered}");
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW, got `{value}`"))?;
    let column = column
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    Ok(CellCoord::new(column, row))
}

fn print_summary(summary: &Summary) {
    println!("{}", summary.banner);
    for placement in &summary.placements {
        match &placement.rejected {
            None => println!("tower at ({}, {}) placed", placement.column, placement.row),
            Some(reason) => println!(
                "tower at ({}, {}) rejected: {reason}",
                placement.column, placement.row
            ),
        }
    }
    println!("field:       {}x{}", summary.columns, summary.rows);
    println!("ticks:       {}", summary.ticks);
    println!("money:       {}", summary.money);
    println!("lives:       {}", summary.lives);
    println!("creeps:      {}", summary.creeps_alive);
    println!("kills:       {}", summary.kills);
    println!("arrivals:    {}", summary.arrivals);
    println!("shots fired: {}", summary.shots_fired);
}
