//! Size-derived difficulty targets and the tunable generator settings.

use serde::{Deserialize, Serialize};

pub const MIN_GRID_SIZE: usize = 5;

pub const MAX_DOORS: usize = 3;

const LARGE_MAP_SIZE: usize = 20;
const MEDIUM_MAP_SIZE: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub treasures: usize,
    pub doors: usize,
}

impl GenerationConfig {
    pub fn for_size(size: usize) -> Self {
        if size >= LARGE_MAP_SIZE {
            Self { treasures: 3, doors: 3 }
        } else if size >= MEDIUM_MAP_SIZE {
            Self { treasures: 2, doors: 2 }
        } else {
            Self { treasures: 1, doors: 1 }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    pub max_attempts: u32,
    // Solver states explored before a verdict becomes "unknown".
    pub verifier_node_budget: usize,
    pub corridor_bias: f64,
    pub braid_chance: f64,
    pub secret_wall_chance: f64,
    pub map_spawn_chance: f64,
    pub treasures: Option<usize>,
    pub doors: Option<usize>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            verifier_node_budget: 4_000_000,
            corridor_bias: 0.5,
            braid_chance: 0.5,
            secret_wall_chance: 0.05,
            map_spawn_chance: 0.5,
            treasures: None,
            doors: None,
        }
    }
}

impl GeneratorSettings {
    pub fn config_for_size(&self, size: usize) -> GenerationConfig {
        let derived = GenerationConfig::for_size(size);
        GenerationConfig {
            treasures: self.treasures.unwrap_or(derived.treasures),
            doors: self.doors.unwrap_or(derived.doors).min(MAX_DOORS),
        }
    }
}
