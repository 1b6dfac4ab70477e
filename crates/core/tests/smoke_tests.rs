use std::collections::BTreeSet;

use dungeon_core::mapgen::{GenerationConfig, Verification};
use dungeon_core::solver::ItemMask;
use dungeon_core::{Grid, LockTier, Pos, START_POS, Tile, Verdict, Verifier, generate_dungeon, is_solvable};

fn parse(text: &str) -> Grid {
    text.parse().expect("fixture should parse")
}

#[test]
fn test_smoke_small_grid_single_lock() {
    let dungeon = generate_dungeon(10, 12345).expect("size is valid");
    let grid = &dungeon.grid;

    assert_eq!(dungeon.config, GenerationConfig { treasures: 1, doors: 1 });
    assert_eq!(grid.count(Tile::Treasure), 1);
    assert_eq!(grid.count(Tile::Door1), 1);
    assert_eq!(grid.count(Tile::Key1), 1);
    assert_eq!(grid.count(Tile::Door2) + grid.count(Tile::Door3), 0);
    assert_eq!(grid.count(Tile::Hammer), 1);
    assert!(grid.outer_ring_is_wall());
    assert!(is_solvable(grid, START_POS, 1));
    assert!(matches!(dungeon.status, Verification::Verified { .. }));
}

#[test]
fn test_smoke_large_grid_three_independent_locks() {
    let dungeon = generate_dungeon(20, 12345).expect("size is valid");
    let grid = &dungeon.grid;

    assert_eq!(dungeon.config, GenerationConfig { treasures: 3, doors: 3 });
    assert!(is_solvable(grid, START_POS, grid.count(Tile::Treasure)));

    let locks = &dungeon.report.locks;
    assert_eq!(locks.placed.len(), 3);
    assert!(locks.skipped.is_empty(), "skipped tiers: {:?}", locks.skipped);
    let tiers: BTreeSet<LockTier> = locks.placed.iter().map(|lock| lock.tier).collect();
    assert_eq!(tiers, LockTier::ALL.into_iter().collect());
    for tier in LockTier::ALL {
        assert_eq!(grid.count(tier.key()), 1, "{tier:?} key");
        assert_eq!(grid.count(tier.door()), 1, "{tier:?} door");
    }

    let everything = Verifier::new().reachable_positions(grid, START_POS);
    for lock in &locks.placed {
        assert_eq!(grid.tile_at(lock.door), lock.tier.door());
        assert_eq!(grid.tile_at(lock.key), lock.tier.key());
        let gated = Verifier::new()
            .withholding(ItemMask::key(lock.tier))
            .reachable_positions(grid, START_POS);
        assert!(gated.is_subset(&everything));
        assert!(everything.contains(&lock.far_side));
        assert!(
            !gated.contains(&lock.far_side),
            "{:?} door at {:?} is bypassed to reach {:?}",
            lock.tier,
            lock.door,
            lock.far_side
        );
    }
}

#[test]
fn test_smoke_wall_severing_only_path_is_unsolvable() {
    let solvable = parse(
        "
        #########
        #P.a....#
        #######.#
        #$..A...#
        #########
        #########
        #########
        #########
        #########
        ",
    );
    assert!(is_solvable(&solvable, START_POS, 1));

    let mut severed = solvable.clone();
    severed.set(Pos::new(3, 4), Tile::Wall);
    assert_eq!(Verifier::new().verify(&severed, START_POS, 1), Verdict::Unsolvable);
}

#[test]
fn test_smoke_key_behind_its_own_door_is_unsolvable() {
    let grid = parse(
        "
        #######
        #P..B.#
        #####b#
        #$....#
        #######
        #######
        #######
        ",
    );
    assert!(!is_solvable(&grid, START_POS, 1));
}

#[test]
fn test_smoke_hammer_opens_secret_shortcut() {
    let grid = parse(
        "
        #######
        #PT#..#
        #.#.S$#
        #...#.#
        #######
        #######
        #######
        ",
    );
    assert!(is_solvable(&grid, START_POS, 1));
    let no_hammer = Verifier::new().withholding(ItemMask::HAMMER);
    assert_eq!(no_hammer.verify(&grid, START_POS, 1), Verdict::Unsolvable);
}
