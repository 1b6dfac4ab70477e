//! Growing-tree maze carving on a step-2 lattice plus a braiding pass that adds loops.

use rand_chacha::rand_core::Rng;

use crate::grid::Grid;
use crate::types::{Pos, START_POS, Tile};

use super::seed::{random_index, roll};

const LATTICE_STEPS: [(i32, i32); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

// Carves a perfect maze from `START_POS`. Every interior odd-odd cell reachable on the
// lattice ends up `Empty`, joined through single removable wall cells.
pub(crate) fn carve_maze<R: Rng + ?Sized>(size: usize, rng: &mut R, corridor_bias: f64) -> Grid {
    let mut grid = Grid::filled(size);
    if !grid.is_interior(START_POS) {
        return grid;
    }
    grid.set(START_POS, Tile::Empty);

    let mut frontier = vec![START_POS];
    while !frontier.is_empty() {
        let chosen_index =
            if roll(rng, corridor_bias) { frontier.len() - 1 } else { random_index(rng, frontier.len()) };
        let current = frontier[chosen_index];

        let candidates: Vec<(i32, i32)> = LATTICE_STEPS
            .into_iter()
            .filter(|&(dy, dx)| {
                let target = current.offset(dy, dx);
                grid.is_interior(target) && grid.tile_at(target) == Tile::Wall
            })
            .collect();

        if candidates.is_empty() {
            frontier.swap_remove(chosen_index);
            continue;
        }

        let (dy, dx) = candidates[random_index(rng, candidates.len())];
        let target = current.offset(dy, dx);
        grid.set(current.offset(dy / 2, dx / 2), Tile::Empty);
        grid.set(target, Tile::Empty);
        frontier.push(target);
    }
    grid
}

pub(crate) fn braid<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, chance: f64) -> usize {
    let mut loops = 0;
    for pos in grid.interior_positions() {
        if grid.tile_at(pos) != Tile::Empty || !is_dead_end(grid, pos) {
            continue;
        }
        if !roll(rng, chance) {
            continue;
        }

        let directions = pos.neighbors();
        let first = random_index(rng, directions.len());
        for turn in 0..directions.len() {
            let wall = directions[(first + turn) % directions.len()];
            let beyond = wall.offset(wall.y - pos.y, wall.x - pos.x);
            if grid.tile_at(wall) == Tile::Wall
                && grid.is_interior(beyond)
                && grid.tile_at(beyond) == Tile::Empty
            {
                grid.set(wall, Tile::Empty);
                loops += 1;
                break;
            }
        }
    }
    loops
}

fn is_dead_end(grid: &Grid, pos: Pos) -> bool {
    pos.neighbors().into_iter().filter(|&next| grid.tile_at(next) == Tile::Wall).count() == 3
}
