pub mod grid;
pub mod level_file;
pub mod mapgen;
pub mod solver;
pub mod types;

pub use grid::{Grid, GridParseError};
pub use level_file::{LevelData, LevelLoadError, load_level_from_file, parse_level, save_level_to_file};
pub use mapgen::{GeneratedDungeon, GenerationError, GeneratorSettings, MapGenerator, generate_dungeon};
pub use solver::{Verdict, Verifier, is_solvable};
pub use types::*;
