//! Completability check over the expanded (position, items, treasures) state graph.
//!
//! Picking things up only ever adds bits, so a search that never revisits an identical
//! state is bounded by `cells * 2^4 * 2^treasures`. Large editor grids can still blow
//! that up, so the search carries a state budget and reports `Unknown` when it runs out.

use std::collections::{BTreeSet, HashSet, VecDeque};

use log::warn;
use serde::Serialize;

use crate::grid::Grid;
use crate::types::{LockTier, Pos, Tile};

/// Tools and keys a search state carries: bit 0 is the hammer, bit `n` is key tier `n`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ItemMask(u8);

impl ItemMask {
    pub const EMPTY: ItemMask = ItemMask(0);
    pub const HAMMER: ItemMask = ItemMask(1);

    pub fn key(tier: LockTier) -> ItemMask {
        ItemMask(1 << (tier.index() + 1))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: ItemMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: ItemMask) -> ItemMask {
        ItemMask(self.0 | other.0)
    }

    pub fn without(self, other: ItemMask) -> ItemMask {
        ItemMask(self.0 & !other.0)
    }

    /// What stepping onto `tile` grants.
    fn granted_by(tile: Tile) -> ItemMask {
        match tile {
            Tile::Hammer => ItemMask::HAMMER,
            _ => tile.key_tier().map_or(ItemMask::EMPTY, ItemMask::key),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SolverState {
    pub pos: Pos,
    pub items: ItemMask,
    pub gems: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Solvable,
    Unsolvable,
    /// The search gave up before it could decide.
    Unknown { explored: usize },
}

impl Verdict {
    pub fn is_solvable(self) -> bool {
        self == Verdict::Solvable
    }
}

pub const DEFAULT_NODE_BUDGET: usize = 4_000_000;
const MAX_TRACKED_TREASURES: usize = u64::BITS as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verifier {
    node_budget: usize,
    withheld: ItemMask,
}

impl Default for Verifier {
    fn default() -> Self {
        Self { node_budget: DEFAULT_NODE_BUDGET, withheld: ItemMask::EMPTY }
    }
}

struct SearchOutcome {
    verdict: Verdict,
    positions: BTreeSet<Pos>,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_budget(mut self, node_budget: usize) -> Self {
        self.node_budget = node_budget;
        self
    }

    /// Items that pickups never grant, e.g. to confirm a key really gates its door.
    pub fn withholding(mut self, items: ItemMask) -> Self {
        self.withheld = self.withheld.union(items);
        self
    }

    /// Can every one of the first `treasure_count` treasures (row-major) be collected?
    pub fn verify(&self, grid: &Grid, start: Pos, treasure_count: usize) -> Verdict {
        self.search(grid, start, Some(treasure_count)).verdict
    }

    /// Every cell some reachable state stands on.
    pub fn reachable_positions(&self, grid: &Grid, start: Pos) -> BTreeSet<Pos> {
        self.search(grid, start, None).positions
    }

    fn search(&self, grid: &Grid, start: Pos, treasure_count: Option<usize>) -> SearchOutcome {
        let treasures = grid.positions_of(Tile::Treasure);
        let mut positions = BTreeSet::new();

        let target = match treasure_count {
            Some(0) => {
                return SearchOutcome { verdict: Verdict::Solvable, positions };
            }
            Some(count) if count > treasures.len() => {
                return SearchOutcome { verdict: Verdict::Unsolvable, positions };
            }
            Some(count) if count > MAX_TRACKED_TREASURES => {
                warn!("{count} treasures exceed the {MAX_TRACKED_TREASURES}-bit gem mask");
                return SearchOutcome { verdict: Verdict::Unknown { explored: 0 }, positions };
            }
            Some(count) => Some(low_bits(count)),
            None => None,
        };
        if !grid.in_bounds(start) {
            return SearchOutcome { verdict: Verdict::Unsolvable, positions };
        }

        let gem_bit = |pos: Pos| -> u64 {
            treasures
                .iter()
                .position(|&treasure| treasure == pos)
                .filter(|&index| index < MAX_TRACKED_TREASURES)
                .map_or(0, |index| 1 << index)
        };

        let initial = SolverState { pos: start, items: ItemMask::EMPTY, gems: 0 };
        let mut visited = HashSet::from([initial]);
        let mut queue = VecDeque::from([initial]);
        positions.insert(start);

        while let Some(state) = queue.pop_front() {
            if target.is_some_and(|target| state.gems & target == target) {
                return SearchOutcome { verdict: Verdict::Solvable, positions };
            }
            for next in state.pos.neighbors() {
                let tile = grid.tile_at(next);
                if !can_enter(tile, state.items) {
                    continue;
                }
                let granted = ItemMask::granted_by(tile).without(self.withheld);
                let next_state = SolverState {
                    pos: next,
                    items: state.items.union(granted),
                    gems: state.gems | if tile == Tile::Treasure { gem_bit(next) } else { 0 },
                };
                if !visited.insert(next_state) {
                    continue;
                }
                if visited.len() > self.node_budget {
                    warn!("verifier gave up after {} states", visited.len());
                    return SearchOutcome {
                        verdict: Verdict::Unknown { explored: visited.len() },
                        positions,
                    };
                }
                positions.insert(next);
                queue.push_back(next_state);
            }
        }

        let verdict = if target.is_some() { Verdict::Unsolvable } else { Verdict::Solvable };
        SearchOutcome { verdict, positions }
    }
}

fn can_enter(tile: Tile, items: ItemMask) -> bool {
    match tile {
        Tile::Wall => false,
        Tile::SecretWall => items.contains(ItemMask::HAMMER),
        _ => tile.door_tier().is_none_or(|tier| items.contains(ItemMask::key(tier))),
    }
}

fn low_bits(count: usize) -> u64 {
    if count >= MAX_TRACKED_TREASURES { u64::MAX } else { (1_u64 << count) - 1 }
}

/// Default-budget check that every treasure on `grid` can be collected from `start`.
pub fn is_solvable(grid: &Grid, start: Pos, treasure_count: usize) -> bool {
    Verifier::default().verify(grid, start, treasure_count).is_solvable()
}
