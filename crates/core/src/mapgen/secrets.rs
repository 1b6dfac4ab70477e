//! Breakable bonus walls between two open cells.
//!
//! Both sides of a secret wall must already belong to the same doors-closed
//! region, so breaking one with the hammer never opens a way around a door.

use std::collections::BTreeMap;

use rand_chacha::rand_core::Rng;

use crate::grid::Grid;
use crate::types::{Pos, Tile};

use super::reachability::{WalkPolicy, analyze};
use super::seed::roll;

// Cells this close to the edge never become secret walls.
const EDGE_MARGIN: usize = 2;

pub(crate) fn inject_secret_walls<R: Rng + ?Sized>(
    grid: &mut Grid,
    chance: f64,
    rng: &mut R,
) -> Vec<Pos> {
    let mut placed = Vec::new();
    let size = grid.size();
    if size <= EDGE_MARGIN * 2 {
        return placed;
    }
    let lo = EDGE_MARGIN as i32;
    let hi = (size - EDGE_MARGIN) as i32;
    let regions = label_regions(grid);
    for y in lo..hi {
        for x in lo..hi {
            let pos = Pos { y, x };
            if grid.tile_at(pos) != Tile::Wall || !joins_one_region(&regions, pos) {
                continue;
            }
            if roll(rng, chance) {
                grid.set(pos, Tile::SecretWall);
                placed.push(pos);
            }
        }
    }
    placed
}

fn joins_one_region(regions: &BTreeMap<Pos, usize>, pos: Pos) -> bool {
    let same = |a: Pos, b: Pos| match (regions.get(&a), regions.get(&b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    };
    same(pos.offset(0, -1), pos.offset(0, 1)) || same(pos.offset(-1, 0), pos.offset(1, 0))
}

// Doors and walls stay unlabelled.
fn label_regions(grid: &Grid) -> BTreeMap<Pos, usize> {
    let policy = WalkPolicy::doors_closed();
    let mut regions = BTreeMap::new();
    let mut next_label = 0;
    for pos in grid.interior_positions() {
        if regions.contains_key(&pos) || !policy.permits(grid.tile_at(pos)) {
            continue;
        }
        for (reached, _) in analyze(grid, pos, &policy).reached() {
            regions.insert(reached, next_label);
        }
        next_label += 1;
    }
    regions
}

#[cfg(test)]
mod tests {
    use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

    use super::*;
    use crate::types::START_POS;

    fn fixture() -> Grid {
        "
        #######
        #P....#
        #.#.#.#
        #.....#
        ###.###
        #.....#
        #######
        "
        .parse()
        .expect("fixture should parse")
    }

    #[test]
    fn only_walls_between_open_cells_qualify() {
        let mut grid = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let placed = inject_secret_walls(&mut grid, 1.0, &mut rng);
        assert_eq!(placed, vec![Pos::new(2, 2), Pos::new(2, 4), Pos::new(4, 2), Pos::new(4, 4)]);
        for pos in placed {
            assert_eq!(grid.tile_at(pos), Tile::SecretWall);
        }
        assert!(grid.outer_ring_is_wall());
    }

    #[test]
    fn walls_beside_a_door_never_bridge_its_two_sides() {
        // The door at (3,4) is the only way from the left room to the right one;
        // the walls in column 4 touch both rooms and must stay solid.
        let mut grid: Grid = "
        #########
        #P..#...#
        #...#...#
        #...A...#
        #...#...#
        #...#...#
        #...#...#
        #...#...#
        #########
        "
        .parse()
        .expect("fixture should parse");
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let placed = inject_secret_walls(&mut grid, 1.0, &mut rng);
        assert!(placed.is_empty(), "bridged at {placed:?}");
        let without_key = analyze(&grid, START_POS, &WalkPolicy::doors_closed().allowing(&[Tile::SecretWall]));
        assert!(!without_key.is_reached(Pos::new(3, 5)));
    }

    #[test]
    fn zero_chance_changes_nothing() {
        let mut grid = fixture();
        let before = grid.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(inject_secret_walls(&mut grid, 0.0, &mut rng).is_empty());
        assert_eq!(grid, before);
    }
}
