//! Nested door/key placement.
//!
//! Tiers are placed deepest first. Each door goes on a chokepoint of the route to the
//! current farthest cell, and its key is confined to whatever is still reachable with
//! that door shut. Later (shallower) doors can only shrink that region, so a key never
//! ends up behind a door whose own key is placed afterwards.

use log::warn;
use rand_chacha::rand_core::Rng;
use serde::Serialize;

use crate::grid::Grid;
use crate::types::{LockTier, Pos, START_POS, Tile};

use super::reachability::{WalkPolicy, analyze};
use super::seed::random_index;

// Below this many steps there is no room for another lock.
const MIN_LOCK_DEPTH: u32 = 5;
const MIN_LOCK_PATH_LEN: usize = 5;
const DOOR_PATH_FRACTION: f64 = 0.7;
// Doors never sit on the start cell or next to it.
const MIN_DOOR_PATH_INDEX: usize = 2;
pub const KEY_FALLBACK_POS: Pos = Pos { y: 1, x: 2 };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PlacedLock {
    pub tier: LockTier,
    pub door: Pos,
    pub far_side: Pos,
    pub key: Pos,
    pub key_fallback: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    ShallowMaze,
    ShortPath,
    NoChokepoint,
    NoKeyCell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedTier {
    pub tier: LockTier,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LockPlan {
    // Placement order, deepest tier first.
    pub placed: Vec<PlacedLock>,
    pub skipped: Vec<SkippedTier>,
}

impl LockPlan {
    pub fn key_fallbacks(&self) -> impl Iterator<Item = LockTier> + '_ {
        self.placed.iter().filter(|lock| lock.key_fallback).map(|lock| lock.tier)
    }

    pub fn found_every_chokepoint(&self) -> bool {
        self.skipped.iter().all(|skipped| skipped.reason != SkipReason::NoChokepoint)
    }
}

pub(crate) fn place_locks<R: Rng + ?Sized>(
    grid: &mut Grid,
    door_count: usize,
    rng: &mut R,
) -> LockPlan {
    let mut plan = LockPlan::default();
    let tiers: Vec<LockTier> = (0..door_count).rev().filter_map(LockTier::from_index).collect();

    for (position, &tier) in tiers.iter().enumerate() {
        let open_field = analyze(grid, START_POS, &WalkPolicy::doors_closed());
        if open_field.max_distance() < MIN_LOCK_DEPTH {
            warn!(
                "maze too shallow for more locks (depth {}); skipping tiers {:?}",
                open_field.max_distance(),
                &tiers[position..]
            );
            plan.skipped.extend(
                tiers[position..]
                    .iter()
                    .map(|&tier| SkippedTier { tier, reason: SkipReason::ShallowMaze }),
            );
            break;
        }

        let path = open_field.path_to(open_field.farthest());
        if path.len() < MIN_LOCK_PATH_LEN {
            warn!("route of {} cells too short for {tier:?} door", path.len());
            plan.skipped.push(SkippedTier { tier, reason: SkipReason::ShortPath });
            continue;
        }

        let Some(door_index) = choose_door_index(grid, &path) else {
            warn!("no chokepoint on the {}-cell route for the {tier:?} door", path.len());
            plan.skipped.push(SkippedTier { tier, reason: SkipReason::NoChokepoint });
            continue;
        };
        let (door, far_side) = (path[door_index], path[door_index + 1]);
        grid.set(door, tier.door());

        let (key, key_fallback) = match choose_key_cell(grid, rng) {
            Some(key) => (key, false),
            None if fallback_is_free(grid) => {
                warn!("no free cell in front of {tier:?} door; key falls back to {KEY_FALLBACK_POS:?}");
                (KEY_FALLBACK_POS, true)
            }
            None => {
                warn!("no cell left for the {tier:?} key; removing its door");
                grid.set(door, Tile::Empty);
                plan.skipped.push(SkippedTier { tier, reason: SkipReason::NoKeyCell });
                continue;
            }
        };
        grid.set(key, tier.key());
        plan.placed.push(PlacedLock { tier, door, far_side, key, key_fallback });
    }
    plan
}

// First chokepoint at or past 70% of the route, else the last one before it.
// Only `Empty` cells qualify, so a door never covers the start or another tier's key.
// The final route cell is never chosen: a door there would have no far side.
fn choose_door_index(grid: &Grid, path: &[Pos]) -> Option<usize> {
    let last = path.len().checked_sub(2)?;
    if last < MIN_DOOR_PATH_INDEX {
        return None;
    }
    let preferred =
        ((path.len() as f64 * DOOR_PATH_FRACTION) as usize).clamp(MIN_DOOR_PATH_INDEX, last);
    (preferred..=last)
        .chain((MIN_DOOR_PATH_INDEX..preferred).rev())
        .find(|&index| grid.tile_at(path[index]) == Tile::Empty && cuts_route(grid, path, index))
}

// With every other door open, sealing `path[index]` must strand the next cell.
fn cuts_route(grid: &Grid, path: &[Pos], index: usize) -> bool {
    let mut sealed = grid.clone();
    sealed.set(path[index], Tile::Wall);
    !analyze(&sealed, START_POS, &WalkPolicy::doors_open()).is_reached(path[index + 1])
}

fn fallback_is_free(grid: &Grid) -> bool {
    let tile = grid.tile_at(KEY_FALLBACK_POS);
    tile.key_tier().is_none() && !tile.is_door() && tile != Tile::Start
}

fn choose_key_cell<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Option<Pos> {
    let field = analyze(grid, START_POS, &WalkPolicy::doors_closed());
    let mut candidates: Vec<(Pos, u32)> =
        field.reached().filter(|&(pos, _)| grid.tile_at(pos) == Tile::Empty).collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    let farther_half = candidates.len().div_ceil(2);
    Some(candidates[random_index(rng, farther_half)].0)
}
