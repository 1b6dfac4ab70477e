//! Treasure spread, hammer placement and tiered collectible maps.

use log::warn;
use rand_chacha::rand_core::Rng;
use serde::Serialize;

use crate::grid::Grid;
use crate::types::{MapTier, Pos, START_POS, Tile};

use super::reachability::{DistanceField, WalkPolicy, analyze};
use super::seed::{random_between, random_index, roll};

const MAX_MAPS: usize = 2;
const DISTANCE_BANDS: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LootPlacement {
    pub treasures: Vec<Pos>,
    pub hammer: Option<Pos>,
    pub maps: Vec<(MapTier, Pos)>,
}

pub(crate) fn place_loot<R: Rng + ?Sized>(
    grid: &mut Grid,
    treasure_count: usize,
    map_spawn_chance: f64,
    rng: &mut R,
) -> LootPlacement {
    // Every lock is eventually passable, so spread loot over the whole maze.
    let logical_field = analyze(grid, START_POS, &WalkPolicy::doors_open());

    let treasures = place_treasures(grid, &logical_field, treasure_count);
    if treasures.len() < treasure_count {
        warn!("only {} of {treasure_count} treasures fit", treasures.len());
    }

    let hammer = place_hammer(grid, rng);
    if hammer.is_none() {
        warn!("no free cell reachable from the start for the hammer");
    }

    let maps = place_maps(grid, &logical_field, map_spawn_chance, rng);
    LootPlacement { treasures, hammer, maps }
}

// Greedy farthest-point sampling: seed at the deepest open cell, then repeatedly take
// the open cell whose nearest placed treasure is farthest away (Manhattan).
fn place_treasures(grid: &mut Grid, field: &DistanceField, count: usize) -> Vec<Pos> {
    let mut open: Vec<(Pos, u32)> =
        field.reached().filter(|&(pos, _)| grid.tile_at(pos) == Tile::Empty).collect();
    let mut placed: Vec<Pos> = Vec::with_capacity(count);

    while placed.len() < count && !open.is_empty() {
        let mut best_index = 0;
        let mut best_score = 0_u32;
        for (index, &(pos, distance)) in open.iter().enumerate() {
            let score = if placed.is_empty() {
                distance
            } else {
                placed.iter().map(|&treasure| treasure.manhattan(pos)).min().unwrap_or(0)
            };
            if index == 0 || score > best_score {
                best_index = index;
                best_score = score;
            }
        }
        let (pos, _) = open.swap_remove(best_index);
        grid.set(pos, Tile::Treasure);
        placed.push(pos);
        // Keep row-major order so ties keep resolving to the earliest cell.
        open.sort_by_key(|&(pos, _)| (pos.y, pos.x));
    }
    placed
}

fn place_hammer<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<Pos> {
    let lobby = analyze(grid, START_POS, &WalkPolicy::doors_closed());
    let cells: Vec<Pos> =
        lobby.reached().map(|(pos, _)| pos).filter(|&pos| grid.tile_at(pos) == Tile::Empty).collect();
    if cells.is_empty() {
        return None;
    }
    let pos = cells[random_index(rng, cells.len())];
    grid.set(pos, Tile::Hammer);
    Some(pos)
}

// Better maps hide deeper: the open pool is split into near, mid and far thirds.
fn place_maps<R: Rng + ?Sized>(
    grid: &mut Grid,
    field: &DistanceField,
    spawn_chance: f64,
    rng: &mut R,
) -> Vec<(MapTier, Pos)> {
    if !roll(rng, spawn_chance) {
        return Vec::new();
    }
    let map_count = random_between(rng, 1, MAX_MAPS);

    let mut pool: Vec<(Pos, u32)> = field
        .reached()
        .filter(|&(pos, distance)| distance > 0 && grid.tile_at(pos) == Tile::Empty)
        .collect();
    pool.sort_by_key(|&(_, distance)| distance);

    let mut maps = Vec::with_capacity(map_count);
    for tier in MapTier::ALL.into_iter().take(map_count) {
        if pool.is_empty() {
            warn!("no free cell left for a {tier:?} map");
            break;
        }
        let band_len = pool.len() / DISTANCE_BANDS;
        let index =
            (band_len * tier.band() + random_index(rng, band_len.max(1))).min(pool.len() - 1);
        let (pos, _) = pool.remove(index);
        grid.set(pos, tier.tile());
        maps.push((tier, pos));
    }
    maps
}
