//! JSON level files as written by the editor: `{ "name", "size", "map" }`.
//!
//! `map` is a list of rows, each a list of numeric tile codes. Loading checks the
//! shape and every code; it does not require the outer ring to be wall, since
//! hand-made levels are free to leave it open.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::mapgen::MIN_GRID_SIZE;
use crate::types::{Pos, Tile};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LevelData {
    pub name: String,
    pub size: usize,
    pub map: Vec<Vec<u8>>,
}

impl LevelData {
    pub fn from_grid(name: impl Into<String>, grid: &Grid) -> Self {
        Self {
            name: name.into(),
            size: grid.size(),
            map: grid.rows().map(|row| row.iter().map(|tile| tile.code()).collect()).collect(),
        }
    }

    pub fn into_grid(self) -> Result<Grid, LevelLoadError> {
        if self.size < MIN_GRID_SIZE {
            return Err(LevelLoadError::TooSmall { size: self.size, min: MIN_GRID_SIZE });
        }
        if self.map.len() != self.size {
            return Err(LevelLoadError::SizeMismatch {
                row: None,
                expected: self.size,
                found: self.map.len(),
            });
        }

        let mut rows = Vec::with_capacity(self.size);
        for (y, codes) in self.map.into_iter().enumerate() {
            if codes.len() != self.size {
                return Err(LevelLoadError::SizeMismatch {
                    row: Some(y),
                    expected: self.size,
                    found: codes.len(),
                });
            }
            let row = codes
                .into_iter()
                .enumerate()
                .map(|(x, code)| {
                    Tile::from_code(code).ok_or(LevelLoadError::UnknownTile {
                        pos: Pos::new(y as i32, x as i32),
                        code,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        Grid::from_rows(rows).ok_or(LevelLoadError::SizeMismatch {
            row: None,
            expected: self.size,
            found: 0,
        })
    }
}

/// Describes why a level file could not be loaded.
#[derive(Debug)]
pub enum LevelLoadError {
    Io(io::Error),
    /// The file is not a JSON object of the expected shape.
    Json(String),
    /// `row: None` means the number of rows is wrong.
    SizeMismatch { row: Option<usize>, expected: usize, found: usize },
    UnknownTile { pos: Pos, code: u8 },
    TooSmall { size: usize, min: usize },
}

impl fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "level I/O error: {e}"),
            Self::Json(message) => write!(f, "invalid level JSON: {message}"),
            Self::SizeMismatch { row: None, expected, found } => {
                write!(f, "level declares {expected} rows but has {found}")
            }
            Self::SizeMismatch { row: Some(row), expected, found } => {
                write!(f, "level row {row} has {found} cells, expected {expected}")
            }
            Self::UnknownTile { pos, code } => {
                write!(f, "unknown tile code {code} at row {}, column {}", pos.y, pos.x)
            }
            Self::TooSmall { size, min } => {
                write!(f, "level size {size} is below the minimum of {min}")
            }
        }
    }
}

impl Error for LevelLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub fn parse_level(json: &str) -> Result<(String, Grid), LevelLoadError> {
    let data: LevelData =
        serde_json::from_str(json).map_err(|e| LevelLoadError::Json(e.to_string()))?;
    let name = data.name.clone();
    Ok((name, data.into_grid()?))
}

/// Load a level file and validate it into a grid, keeping the level name.
pub fn load_level_from_file(path: &Path) -> Result<(String, Grid), LevelLoadError> {
    let content = fs::read_to_string(path).map_err(LevelLoadError::Io)?;
    parse_level(&content)
}

/// Write `level` as pretty JSON, creating parent directories as needed.
pub fn save_level_to_file(path: &Path, level: &LevelData) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(level).map_err(io::Error::other)?;
    fs::write(path, json)
}
