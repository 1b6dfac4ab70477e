//! Procedural dungeon generation split into one submodule per pipeline stage.

pub mod config;
pub mod model;
pub mod reachability;

mod carve;
mod generator;
mod locks;
mod loot;
mod secrets;
mod seed;

pub use config::{GenerationConfig, GeneratorSettings, MAX_DOORS, MIN_GRID_SIZE};
pub use generator::MapGenerator;
pub use locks::{KEY_FALLBACK_POS, LockPlan, PlacedLock, SkipReason, SkippedTier};
pub use loot::LootPlacement;
pub use model::{GeneratedDungeon, GenerationError, GenerationReport, PlacementCounts, Verification};
pub use reachability::{DistanceField, WalkPolicy, analyze};
pub use seed::generate_runtime_seed;

pub fn generate_dungeon(size: usize, seed: u64) -> Result<GeneratedDungeon, GenerationError> {
    MapGenerator::default().generate_seeded(size, seed)
}

#[cfg(test)]
mod tests {
    use super::{GeneratorSettings, MapGenerator};

    #[test]
    fn generate_dungeon_matches_map_generator_output() {
        let from_helper = super::generate_dungeon(14, 123).expect("size is valid");
        let from_generator =
            MapGenerator::new(GeneratorSettings::default()).generate_seeded(14, 123).expect("size is valid");
        assert_eq!(from_helper, from_generator);
    }
}
