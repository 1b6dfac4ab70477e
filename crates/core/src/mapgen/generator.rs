//! Bounded retry loop that keeps building candidates until one verifies.

mod pipeline;

use log::{debug, info, warn};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::solver::Verifier;
use crate::types::START_POS;

use super::config::{GenerationConfig, GeneratorSettings, MIN_GRID_SIZE};
use super::model::{GeneratedDungeon, GenerationError, GenerationReport, PlacementCounts, Verification};
use pipeline::{Candidate, build_candidate};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapGenerator {
    settings: GeneratorSettings,
}

impl MapGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn generate_seeded(&self, size: usize, seed: u64) -> Result<GeneratedDungeon, GenerationError> {
        self.generate(size, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    // Prefers a solvable candidate whose every door sits on a chokepoint; the first
    // solvable one stands in when no attempt manages that.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> Result<GeneratedDungeon, GenerationError> {
        if size < MIN_GRID_SIZE {
            return Err(GenerationError::SizeTooSmall { size, min: MIN_GRID_SIZE });
        }
        let config = self.settings.config_for_size(size);
        let verifier = Verifier::new().with_node_budget(self.settings.verifier_node_budget);
        let max_attempts = self.settings.max_attempts.max(1);

        let mut fallback: Option<(u32, Candidate)> = None;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let candidate = build_candidate(size, &config, &self.settings, rng);
            let counts = PlacementCounts::tally(&candidate.grid);
            let verdict = verifier.verify(&candidate.grid, START_POS, counts.treasures);

            let solvable = verdict.is_solvable();
            if solvable && candidate.locks.found_every_chokepoint() {
                info!("size {size}: attempt {attempt} verified solvable");
                let status = Verification::Verified { attempt };
                return Ok(assemble(candidate, config, attempt, status));
            }

            let exhausted = attempt >= max_attempts;
            if !solvable {
                if !exhausted {
                    debug!("size {size}: attempt {attempt} rejected ({verdict:?})");
                    continue;
                }
                if let Some((first, kept)) = fallback {
                    info!("size {size}: keeping solvable attempt {first} with fewer doors");
                    let status = Verification::Verified { attempt: first };
                    return Ok(assemble(kept, config, attempt, status));
                }
                warn!(
                    "size {size}: no solvable grid in {max_attempts} attempts; returning an unverified one ({verdict:?})"
                );
                let status = Verification::Unverified { attempts: attempt, last_verdict: verdict };
                return Ok(assemble(candidate, config, attempt, status));
            }

            debug!("size {size}: attempt {attempt} solvable but missing a chokepoint door");
            let (first, kept) = fallback.take().unwrap_or((attempt, candidate));
            if exhausted {
                info!("size {size}: keeping solvable attempt {first} with fewer doors");
                let status = Verification::Verified { attempt: first };
                return Ok(assemble(kept, config, attempt, status));
            }
            fallback = Some((first, kept));
        }
    }
}

fn assemble(
    candidate: Candidate,
    config: GenerationConfig,
    attempts: u32,
    status: Verification,
) -> GeneratedDungeon {
    GeneratedDungeon {
        report: GenerationReport {
            attempts,
            counts: PlacementCounts::tally(&candidate.grid),
            locks: candidate.locks,
            loot: candidate.loot,
            secret_walls: candidate.secret_walls,
            braided_loops: candidate.braided_loops,
        },
        grid: candidate.grid,
        config,
        status,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use proptest::prelude::*;

    use super::*;
    use crate::grid::Grid;
    use crate::solver::{ItemMask, Verdict};
    use crate::types::{Pos, Tile};

    #[test]
    fn same_seed_produces_byte_identical_grids() {
        let generator = MapGenerator::default();
        let a = generator.generate_seeded(20, 123_456).expect("size is valid");
        let b = generator.generate_seeded(20, 123_456).expect("size is valid");
        assert_eq!(a.grid.canonical_bytes(), b.grid.canonical_bytes());
        assert_eq!(a.report, b.report);
        assert_eq!(a.status, b.status);
    }

    #[test]
    fn different_seeds_produce_different_grids() {
        let generator = MapGenerator::default();
        let a = generator.generate_seeded(15, 1).expect("size is valid");
        let b = generator.generate_seeded(15, 2).expect("size is valid");
        assert_ne!(a.grid.fingerprint(), b.grid.fingerprint());
    }

    #[test]
    fn rejects_grids_without_an_interior() {
        let generator = MapGenerator::default();
        assert_eq!(
            generator.generate_seeded(4, 0).err(),
            Some(GenerationError::SizeTooSmall { size: 4, min: MIN_GRID_SIZE })
        );
        assert!(generator.generate_seeded(MIN_GRID_SIZE, 0).is_ok());
    }

    #[test]
    fn small_grid_matches_its_configuration() {
        for seed in [3_u64, 17, 99, 2_024] {
            let dungeon = MapGenerator::default().generate_seeded(10, seed).expect("size is valid");
            assert_eq!(dungeon.config, GenerationConfig { treasures: 1, doors: 1 });
            assert!(dungeon.is_verified(), "seed={seed}: {:?}", dungeon.status);
            assert_eq!(dungeon.grid.count(Tile::Treasure), 1, "seed={seed}");
            assert_eq!(dungeon.grid.count(Tile::Door1), 1, "seed={seed}");
            assert_eq!(dungeon.grid.count(Tile::Key1), 1, "seed={seed}");
            assert_eq!(dungeon.grid.count(Tile::Hammer), 1, "seed={seed}");
            assert!(dungeon.grid.outer_ring_is_wall());
        }
    }

    #[test]
    fn verified_result_is_reported_with_its_attempt() {
        let dungeon = MapGenerator::default().generate_seeded(12, 5).expect("size is valid");
        match dungeon.status {
            Verification::Verified { attempt } => assert!(attempt <= dungeon.report.attempts),
            Verification::Unverified { .. } => panic!("expected a verified grid"),
        }
    }

    #[test]
    fn exhausted_attempts_are_flagged_unverified() {
        // A zero budget makes every verdict unknown, so nothing can verify.
        let settings = GeneratorSettings {
            max_attempts: 3,
            verifier_node_budget: 0,
            ..GeneratorSettings::default()
        };
        let dungeon = MapGenerator::new(settings).generate_seeded(12, 8).expect("size is valid");
        assert!(!dungeon.is_verified());
        assert!(matches!(
            dungeon.status,
            Verification::Unverified { attempts: 3, last_verdict: Verdict::Unknown { .. } }
        ));
        assert_eq!(dungeon.report.attempts, 3);
    }

    #[test]
    fn large_grid_gates_each_door_behind_its_own_key() {
        let dungeon = MapGenerator::default().generate_seeded(21, 77).expect("size is valid");
        assert_eq!(dungeon.config, GenerationConfig { treasures: 3, doors: 3 });
        assert!(dungeon.is_verified());
        let everything = Verifier::new().reachable_positions(&dungeon.grid, START_POS);
        for lock in &dungeon.report.locks.placed {
            let tier = lock.tier;
            assert_eq!(dungeon.grid.tile_at(lock.key), tier.key());
            let gated = Verifier::new()
                .withholding(ItemMask::key(tier))
                .reachable_positions(&dungeon.grid, START_POS);
            assert!(gated.contains(&lock.key), "{tier:?} key at {:?} sits behind its door", lock.key);
            assert!(everything.contains(&lock.far_side));
            assert!(
                !gated.contains(&lock.far_side),
                "{tier:?} door at {:?} is bypassed to reach {:?}",
                lock.door,
                lock.far_side
            );
        }
    }

    #[test]
    fn prefers_candidates_with_every_door_on_a_chokepoint() {
        for seed in 0..12_u64 {
            let dungeon = MapGenerator::default().generate_seeded(21, seed).expect("size is valid");
            assert!(dungeon.is_verified(), "seed={seed}");
            assert!(dungeon.report.locks.found_every_chokepoint(), "seed={seed}");
            for lock in &dungeon.report.locks.placed {
                assert_eq!(dungeon.grid.tile_at(lock.door), lock.tier.door(), "seed={seed}");
            }
        }
    }

    #[test]
    fn start_is_unique_and_fixed() {
        for seed in 0..10_u64 {
            let dungeon = MapGenerator::default().generate_seeded(16, seed).expect("size is valid");
            assert_eq!(dungeon.grid.positions_of(Tile::Start), vec![Pos::new(1, 1)]);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]
        #[test]
        fn generated_grids_keep_structural_invariants(seed in any::<u64>(), size in 10_usize..=22) {
            let dungeon = MapGenerator::default().generate_seeded(size, seed).expect("size is valid");
            let grid = &dungeon.grid;
            prop_assert_eq!(grid.size(), size);
            prop_assert!(grid.outer_ring_is_wall());
            prop_assert_eq!(grid.start(), Some(START_POS));
            prop_assert_eq!(grid.count(Tile::Start), 1);
            prop_assert!(dungeon.report.counts.treasures <= dungeon.config.treasures);
            prop_assert_eq!(dungeon.report.counts, PlacementCounts::tally(grid));
            if dungeon.is_verified() {
                prop_assert!(crate::solver::is_solvable(grid, START_POS, dungeon.report.counts.treasures));
            }
            prop_assert!(all_open_cells_connected_with_every_lock_open(grid));
        }
    }

    fn all_open_cells_connected_with_every_lock_open(grid: &Grid) -> bool {
        let passable = |tile: Tile| tile != Tile::Wall;
        let open: Vec<Pos> =
            grid.interior_positions().filter(|&pos| passable(grid.tile_at(pos))).collect();
        let mut seen = BTreeSet::from([START_POS]);
        let mut queue = VecDeque::from([START_POS]);
        while let Some(pos) = queue.pop_front() {
            for next in pos.neighbors() {
                if grid.is_interior(next) && passable(grid.tile_at(next)) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        open.iter().all(|pos| seen.contains(pos))
    }
}
