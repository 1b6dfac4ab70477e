//! Public result types for generated dungeons and what went into them.

use std::error::Error;
use std::fmt;

use serde::Serialize;

use crate::grid::Grid;
use crate::solver::Verdict;
use crate::types::{Pos, Tile};

use super::config::GenerationConfig;
use super::locks::{LockPlan, SkippedTier};
use super::loot::LootPlacement;

// Tiles actually present on the returned grid. These can fall short of the
// configured targets when a stage runs out of candidate cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlacementCounts {
    pub doors: usize,
    pub keys: usize,
    pub treasures: usize,
    pub hammers: usize,
    pub maps: usize,
    pub secret_walls: usize,
}

impl PlacementCounts {
    pub fn tally(grid: &Grid) -> Self {
        let mut counts = Self::default();
        for pos in grid.positions() {
            let tile = grid.tile_at(pos);
            match tile {
                Tile::Treasure => counts.treasures += 1,
                Tile::Hammer => counts.hammers += 1,
                Tile::SecretWall => counts.secret_walls += 1,
                _ if tile.door_tier().is_some() => counts.doors += 1,
                _ if tile.key_tier().is_some() => counts.keys += 1,
                _ if tile.map_tier().is_some() => counts.maps += 1,
                _ => {}
            }
        }
        counts
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub attempts: u32,
    pub counts: PlacementCounts,
    pub locks: LockPlan,
    pub loot: LootPlacement,
    pub secret_walls: Vec<Pos>,
    pub braided_loops: usize,
}

impl GenerationReport {
    pub fn skipped_tiers(&self) -> &[SkippedTier] {
        &self.locks.skipped
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verification {
    Verified { attempt: u32 },
    Unverified { attempts: u32, last_verdict: Verdict },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedDungeon {
    pub grid: Grid,
    pub config: GenerationConfig,
    pub report: GenerationReport,
    pub status: Verification,
}

impl GeneratedDungeon {
    pub fn is_verified(&self) -> bool {
        matches!(self.status, Verification::Verified { .. })
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationError {
    SizeTooSmall { size: usize, min: usize },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeTooSmall { size, min } => {
                write!(f, "grid size {size} is too small; the minimum is {min}")
            }
        }
    }
}

impl Error for GenerationError {}
