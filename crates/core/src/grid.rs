//! Square tile container shared by the generator, the verifier and level files.

use std::error::Error;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Pos, Tile};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// A `size x size` grid of solid wall.
    pub fn filled(size: usize) -> Self {
        Self { size, tiles: vec![Tile::Wall; size * size] }
    }

    /// Builds a grid from row-major rows. Returns `None` unless the rows form a square.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self { size, tiles: rows.into_iter().flatten().collect() })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    /// True for cells off the outer ring.
    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.x > 0
            && pos.y > 0
            && (pos.x as usize) < self.size.saturating_sub(1)
            && (pos.y as usize) < self.size.saturating_sub(1)
    }

    /// Out-of-bounds reads are walls.
    pub fn tile_at(&self, pos: Pos) -> Tile {
        if !self.in_bounds(pos) {
            return Tile::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn row(&self, y: usize) -> Option<&[Tile]> {
        if y >= self.size {
            return None;
        }
        self.tiles.get(y * self.size..(y + 1) * self.size)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.size.max(1))
    }

    /// Every cell position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| Pos { y, x }))
    }

    /// Interior cell positions in row-major order.
    pub fn interior_positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let last = self.size.saturating_sub(1) as i32;
        (1..last).flat_map(move |y| (1..last).map(move |x| Pos { y, x }))
    }

    pub fn positions_of(&self, tile: Tile) -> Vec<Pos> {
        self.positions().filter(|&pos| self.tile_at(pos) == tile).collect()
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// First Start tile in row-major order.
    pub fn start(&self) -> Option<Pos> {
        self.positions().find(|&pos| self.tile_at(pos) == Tile::Start)
    }

    pub fn outer_ring_is_wall(&self) -> bool {
        let last = self.size.saturating_sub(1) as i32;
        self.positions()
            .filter(|pos| pos.x == 0 || pos.y == 0 || pos.x == last || pos.y == last)
            .all(|pos| self.tile_at(pos) == Tile::Wall)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + self.tiles.len());
        bytes.extend((self.size as u32).to_le_bytes());
        bytes.extend(self.tiles.iter().map(|tile| tile.code()));
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.size + (pos.x as usize)
    }
}

impl Index<Pos> for Grid {
    type Output = Tile;

    fn index(&self, pos: Pos) -> &Tile {
        &self.tiles[self.index(pos)]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|tile| tile.glyph()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridParseError {
    Empty,
    UnknownGlyph { line: usize, column: usize, glyph: char },
    NotSquare { line: usize, expected: usize, found: usize },
}

impl fmt::Display for GridParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid text contains no rows"),
            Self::UnknownGlyph { line, column, glyph } => {
                write!(f, "unknown tile glyph '{glyph}' at line {line}, column {column}")
            }
            Self::NotSquare { line, expected, found } => {
                write!(f, "line {line} has {found} cells, expected {expected}")
            }
        }
    }
}

impl Error for GridParseError {}

impl FromStr for Grid {
    type Err = GridParseError;

    /// Parses one glyph row per non-blank line; surrounding whitespace is ignored.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> =
            text.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
        if lines.is_empty() {
            return Err(GridParseError::Empty);
        }
        let size = lines.len();
        let mut rows = Vec::with_capacity(size);
        for (line_index, line) in lines.iter().enumerate() {
            let row = line
                .chars()
                .enumerate()
                .map(|(column, glyph)| {
                    Tile::from_glyph(glyph).ok_or(GridParseError::UnknownGlyph {
                        line: line_index + 1,
                        column: column + 1,
                        glyph,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if row.len() != size {
                return Err(GridParseError::NotSquare {
                    line: line_index + 1,
                    expected: size,
                    found: row.len(),
                });
            }
            rows.push(row);
        }
        Ok(Self { size, tiles: rows.into_iter().flatten().collect() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
        #####
        #P.$#
        #.#.#
        #A.a#
        #####
    ";

    #[test]
    fn parses_glyph_rows_and_prints_them_back() {
        let grid: Grid = SAMPLE.parse().expect("sample grid should parse");
        assert_eq!(grid.size(), 5);
        assert_eq!(grid.tile_at(Pos::new(1, 1)), Tile::Start);
        assert_eq!(grid[Pos::new(3, 1)], Tile::Door1);
        assert_eq!(
            grid.row(1),
            Some(&[Tile::Wall, Tile::Start, Tile::Empty, Tile::Treasure, Tile::Wall][..])
        );
        assert_eq!(grid.row(grid.size()), None);
        assert_eq!(grid.row(usize::MAX), None);
        assert_eq!(grid.to_string(), "#####\n#P.$#\n#.#.#\n#A.a#\n#####\n");
    }

    #[test]
    fn rejects_ragged_and_unknown_input() {
        assert_eq!("".parse::<Grid>(), Err(GridParseError::Empty));
        assert_eq!(
            "###\n#?#\n###".parse::<Grid>(),
            Err(GridParseError::UnknownGlyph { line: 2, column: 2, glyph: '?' })
        );
        assert_eq!(
            "###\n##\n###".parse::<Grid>(),
            Err(GridParseError::NotSquare { line: 2, expected: 3, found: 2 })
        );
    }

    #[test]
    fn out_of_bounds_reads_are_walls_and_writes_are_ignored() {
        let mut grid = Grid::filled(4);
        grid.set(Pos::new(-1, 2), Tile::Empty);
        grid.set(Pos::new(1, 9), Tile::Empty);
        assert_eq!(grid.tile_at(Pos::new(9, 9)), Tile::Wall);
        assert_eq!(grid.count(Tile::Wall), 16);
    }

    #[test]
    fn outer_ring_check_and_start_lookup() {
        let mut grid: Grid = SAMPLE.parse().expect("sample grid should parse");
        assert!(grid.outer_ring_is_wall());
        assert_eq!(grid.start(), Some(Pos::new(1, 1)));
        grid.set(Pos::new(0, 2), Tile::Empty);
        assert!(!grid.outer_ring_is_wall());
        assert_eq!(grid.interior_positions().count(), 9);
    }

    #[test]
    fn fingerprint_tracks_tile_changes() {
        let mut grid: Grid = SAMPLE.parse().expect("sample grid should parse");
        let before = grid.fingerprint();
        assert_eq!(before, grid.clone().fingerprint());
        grid.set(Pos::new(2, 2), Tile::SecretWall);
        assert_ne!(before, grid.fingerprint());
    }
}
