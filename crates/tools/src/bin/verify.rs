use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_core::solver::DEFAULT_NODE_BUDGET;
use dungeon_core::{Tile, Verdict, Verifier, load_level_from_file};
use env_logger::{Builder, Env};
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Check that a level can be completed", long_about = None)]
struct Args {
    /// Level JSON file to check
    level: PathBuf,
    /// Number of treasures that must be collected; defaults to all of them
    #[arg(short, long)]
    treasures: Option<usize>,
    /// Give up after exploring this many search states
    #[arg(long, default_value_t = DEFAULT_NODE_BUDGET)]
    node_budget: usize,
}

fn main() -> Result<ExitCode> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let args = Args::parse();

    let (name, grid) = load_level_from_file(&args.level)
        .with_context(|| format!("Failed to load level: {}", args.level.display()))?;
    let start = grid.start().context("Level has no start tile")?;
    let treasures = args.treasures.unwrap_or_else(|| grid.count(Tile::Treasure));
    info!("checking '{name}' ({0}x{0}) for {treasures} treasures from {start:?}", grid.size());

    let verdict = Verifier::new().with_node_budget(args.node_budget).verify(&grid, start, treasures);
    println!("{name}: {verdict:?}");

    Ok(match verdict {
        Verdict::Solvable => ExitCode::SUCCESS,
        Verdict::Unsolvable => ExitCode::FAILURE,
        Verdict::Unknown { .. } => ExitCode::from(2),
    })
}
