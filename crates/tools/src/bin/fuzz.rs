use anyhow::{Result, ensure};
use clap::Parser;
use dungeon_core::mapgen::{GeneratorSettings, MapGenerator};
use dungeon_core::{START_POS, Tile, Verifier};
use env_logger::{Builder, Env};
use log::{info, warn};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut unverified = 0_u32;
    let mut total_attempts = 0_u64;

    for run in 0..args.runs {
        let size = choose(&mut rng, &[5_usize, 8, 10, 12, 15, 19, 20, 25, 31]);
        let settings = GeneratorSettings {
            braid_chance: choose(&mut rng, &[0.0, 0.25, 0.5, 1.0]),
            secret_wall_chance: choose(&mut rng, &[0.0, 0.05, 0.2]),
            map_spawn_chance: choose(&mut rng, &[0.0, 0.5, 1.0]),
            ..GeneratorSettings::default()
        };
        let map_seed = rng.next_u64();
        let dungeon = MapGenerator::new(settings).generate_seeded(size, map_seed)?;
        let grid = &dungeon.grid;
        total_attempts += u64::from(dungeon.report.attempts);

        // Assert invariants
        ensure!(grid.outer_ring_is_wall(), "Invariant failed: outer ring open (seed {map_seed})");
        ensure!(
            grid.positions_of(Tile::Start) == vec![START_POS],
            "Invariant failed: start misplaced (seed {map_seed})"
        );
        ensure!(
            dungeon.report.counts.treasures <= dungeon.config.treasures,
            "Invariant failed: too many treasures (seed {map_seed})"
        );
        if dungeon.is_verified() {
            let verdict =
                Verifier::new().verify(grid, START_POS, dungeon.report.counts.treasures);
            ensure!(
                verdict.is_solvable(),
                "Invariant failed: accepted grid is {verdict:?} (seed {map_seed}, size {size})"
            );
        } else {
            unverified += 1;
            warn!("run {run}: size {size} seed {map_seed} produced no verified grid");
        }
        info!("run {run}: size {size} seed {map_seed} in {} attempts", dungeon.report.attempts);
    }

    println!(
        "Fuzzing completed: {} runs, {} unverified, {:.2} attempts per run.",
        args.runs,
        unverified,
        total_attempts as f64 / f64::from(args.runs.max(1))
    );
    Ok(())
}
