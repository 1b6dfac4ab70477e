use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use dungeon_core::mapgen::{GeneratorSettings, MapGenerator, generate_runtime_seed};
use dungeon_core::{LevelData, save_level_to_file};
use env_logger::{Builder, Env};
use log::{info, warn};

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon grid", long_about = None)]
struct Args {
    /// Side length of the square grid
    #[arg(short = 'n', long, default_value_t = 15)]
    size: usize,
    /// Seed for the generator; a fresh one is drawn and logged when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// TOML file with generator settings
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Write the grid as a level JSON file
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Level name stored in the written file
    #[arg(long, default_value = "Generated")]
    name: String,
    /// Print the generation report as JSON instead of the ASCII grid
    #[arg(long)]
    report: bool,
    /// Exit with an error when no attempt verified
    #[arg(long)]
    strict: bool,
}

fn load_settings(path: &Path) -> Result<GeneratorSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid settings in {}", path.display()))
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => GeneratorSettings::default(),
    };
    let seed = args.seed.unwrap_or_else(|| {
        let seed = generate_runtime_seed();
        info!("using runtime seed {seed}");
        seed
    });

    let dungeon = MapGenerator::new(settings).generate_seeded(args.size, seed)?;
    if !dungeon.is_verified() {
        warn!("seed {seed}: returning a grid the verifier did not accept");
        if args.strict {
            bail!("no verified grid for size {} and seed {seed}", args.size);
        }
    }

    if let Some(path) = &args.out {
        save_level_to_file(path, &LevelData::from_grid(args.name.as_str(), &dungeon.grid))
            .with_context(|| format!("Failed to write level file: {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    if args.report {
        let report = serde_json::json!({
            "seed": seed,
            "size": dungeon.size(),
            "fingerprint": format!("{:016x}", dungeon.grid.fingerprint()),
            "config": dungeon.config,
            "status": dungeon.status,
            "report": dungeon.report,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", dungeon.grid);
    }

    Ok(())
}
