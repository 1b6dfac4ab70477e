//! Breadth-first distance fields over the grid interior.
//! Placement stages ask the same question under different walkability rules:
//! "reachable right now" (doors closed) versus "reachable once every lock is open".

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::types::{Pos, Tile};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkPolicy {
    pub ignore_doors: bool,
    pub also_walkable: Vec<Tile>,
}

impl WalkPolicy {
    pub fn doors_closed() -> Self {
        Self::default()
    }

    pub fn doors_open() -> Self {
        Self { ignore_doors: true, also_walkable: Vec::new() }
    }

    pub fn allowing(mut self, tiles: &[Tile]) -> Self {
        self.also_walkable.extend_from_slice(tiles);
        self
    }

    pub fn permits(&self, tile: Tile) -> bool {
        tile.is_base_walkable()
            || (self.ignore_doors && tile.is_door())
            || self.also_walkable.contains(&tile)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    size: usize,
    source: Pos,
    distances: Vec<Option<u32>>,
    parents: Vec<Option<Pos>>,
    farthest: Pos,
    max_distance: u32,
}

impl DistanceField {
    pub fn source(&self) -> Pos {
        self.source
    }

    // First cell (in visitation order) to reach the maximum distance.
    pub fn farthest(&self) -> Pos {
        self.farthest
    }

    pub fn max_distance(&self) -> u32 {
        self.max_distance
    }

    pub fn distance(&self, pos: Pos) -> Option<u32> {
        self.slot(pos).and_then(|idx| self.distances[idx])
    }

    pub fn is_reached(&self, pos: Pos) -> bool {
        self.distance(pos).is_some()
    }

    pub fn path_to(&self, target: Pos) -> Vec<Pos> {
        if !self.is_reached(target) {
            return Vec::new();
        }
        let mut path = vec![target];
        let mut current = target;
        while let Some(parent) = self.slot(current).and_then(|idx| self.parents[idx]) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    pub fn reached(&self) -> impl Iterator<Item = (Pos, u32)> + '_ {
        let size = self.size;
        self.distances.iter().enumerate().filter_map(move |(idx, distance)| {
            distance.map(|d| (Pos { y: (idx / size) as i32, x: (idx % size) as i32 }, d))
        })
    }

    fn slot(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.size || pos.y as usize >= self.size {
            return None;
        }
        Some((pos.y as usize) * self.size + (pos.x as usize))
    }
}

pub fn analyze(grid: &Grid, start: Pos, policy: &WalkPolicy) -> DistanceField {
    let size = grid.size();
    let mut field = DistanceField {
        size,
        source: start,
        distances: vec![None; size * size],
        parents: vec![None; size * size],
        farthest: start,
        max_distance: 0,
    };
    let Some(start_idx) = field.slot(start) else {
        return field;
    };
    field.distances[start_idx] = Some(0);

    let mut queue = VecDeque::from([(start, 0_u32)]);
    while let Some((current, distance)) = queue.pop_front() {
        if distance > field.max_distance {
            field.max_distance = distance;
            field.farthest = current;
        }
        for next in current.neighbors() {
            if !grid.is_interior(next) || !policy.permits(grid.tile_at(next)) {
                continue;
            }
            let Some(idx) = field.slot(next) else {
                continue;
            };
            if field.distances[idx].is_some() {
                continue;
            }
            field.distances[idx] = Some(distance + 1);
            field.parents[idx] = Some(current);
            queue.push_back((next, distance + 1));
        }
    }
    field
}
