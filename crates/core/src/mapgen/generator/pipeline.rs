//! One candidate grid: carve, lock, loot, secrets.

use log::debug;
use rand_chacha::rand_core::Rng;

use crate::grid::Grid;
use crate::types::{Pos, START_POS, Tile};

use super::super::carve::{braid, carve_maze};
use super::super::config::{GenerationConfig, GeneratorSettings};
use super::super::locks::{LockPlan, place_locks};
use super::super::loot::{LootPlacement, place_loot};
use super::super::secrets::inject_secret_walls;

pub(super) struct Candidate {
    pub(super) grid: Grid,
    pub(super) locks: LockPlan,
    pub(super) loot: LootPlacement,
    pub(super) secret_walls: Vec<Pos>,
    pub(super) braided_loops: usize,
}

pub(super) fn build_candidate<R: Rng + ?Sized>(
    size: usize,
    config: &GenerationConfig,
    settings: &GeneratorSettings,
    rng: &mut R,
) -> Candidate {
    let mut grid = carve_maze(size, rng, settings.corridor_bias);
    let braided_loops = braid(&mut grid, rng, settings.braid_chance);
    // Claimed before any placement so no stage can pick the start cell.
    grid.set(START_POS, Tile::Start);

    let locks = place_locks(&mut grid, config.doors, rng);
    let loot = place_loot(&mut grid, config.treasures, settings.map_spawn_chance, rng);
    let secret_walls = inject_secret_walls(&mut grid, settings.secret_wall_chance, rng);

    debug!(
        "candidate: {} loops, {} locks, {} treasures, {} maps, {} secret walls",
        braided_loops,
        locks.placed.len(),
        loot.treasures.len(),
        loot.maps.len(),
        secret_walls.len()
    );
    Candidate { grid, locks, loot, secret_walls, braided_loops }
}
