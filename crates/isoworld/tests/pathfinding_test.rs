//! # Pathfinding Tests
//!
//! Path validity on generated worlds, where solid scenery forms the obstacles.

use isoworld::gameplay::line_of_sight;
use isoworld::procedural::{ChunkStore, StoreSettings, TilePos};
use isoworld::{Pathfinder, PathfinderConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn forest_store() -> ChunkStore {
    ChunkStore::new(StoreSettings {
        seed: 90210,
        ..StoreSettings::default()
    })
}

/// Test: every raw path is a chain of walkable, 4-adjacent tiles of minimal length
/// for its own tiles, and every smoothed hop is adjacent or visible.
#[test]
fn test_paths_are_valid_on_generated_world() {
    let store = forest_store();
    let walk = |tile: TilePos| store.is_walkable(tile);
    let pathfinder = Pathfinder::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut found = 0;

    for _ in 0..30 {
        let start = TilePos::new(rng.gen_range(-40..40), rng.gen_range(-40..40));
        let goal = TilePos::new(rng.gen_range(-40..40), rng.gen_range(-40..40));
        let raw = pathfinder.find_raw_path(&walk, start, goal);
        if raw.is_empty() {
            continue;
        }
        found += 1;

        assert_eq!(raw.first(), Some(&start));
        assert_eq!(raw.last(), Some(&goal));
        assert!(raw.len() - 1 >= start.manhattan(goal) as usize);
        for pair in raw.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1, "raw hop {:?} -> {:?}", pair[0], pair[1]);
            assert!(store.is_walkable(pair[1]), "raw path crosses solid tile {:?}", pair[1]);
        }

        let smoothed: Vec<_> = pathfinder.find_path(&walk, start, goal).iter().copied().collect();
        assert_eq!(smoothed.first(), Some(&start));
        assert_eq!(smoothed.last(), Some(&goal));
        assert!(smoothed.len() <= raw.len());
        for pair in smoothed.windows(2) {
            assert!(store.is_walkable(pair[1]));
            assert!(
                pair[0].manhattan(pair[1]) == 1 || line_of_sight(&walk, pair[0], pair[1]),
                "smoothed hop {:?} -> {:?} is blocked",
                pair[0],
                pair[1]
            );
        }
    }
    assert!(found > 0, "no query found a path");
}

/// Test: with nothing in the way the raw path is exactly the Manhattan distance.
#[test]
fn test_raw_path_length_in_open_field() {
    let pathfinder = Pathfinder::default();
    let open = |_: TilePos| true;
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    for _ in 0..20 {
        let start = TilePos::new(rng.gen_range(-30..30), rng.gen_range(-30..30));
        let goal = TilePos::new(rng.gen_range(-30..30), rng.gen_range(-30..30));
        let raw = pathfinder.find_raw_path(&open, start, goal);
        if start == goal {
            assert!(raw.is_empty());
        } else {
            assert_eq!(raw.len() - 1, start.manhattan(goal) as usize);
        }
    }
}

/// Test: a tight budget gives up instead of searching forever.
#[test]
fn test_budget_caps_exploration() {
    let pathfinder = Pathfinder::new(&PathfinderConfig { max_explored_nodes: 100 });
    let open = |_: TilePos| true;
    let walled_goal = TilePos::new(500, 500);
    let blocked = move |t: TilePos| t != walled_goal && open(t);

    let outcome = pathfinder.search(&blocked, TilePos::new(0, 0), walled_goal);
    assert!(outcome.path.is_empty());
    assert_eq!(outcome.explored, 100);
}

/// Test: a goal walled in on all four sides is never reached, whatever the
/// budget, and the search stays within it.
#[test]
fn test_walled_in_goal_gives_empty_path() {
    let goal = TilePos::new(-6, 14);
    let walk = move |t: TilePos| t.manhattan(goal) != 1;

    for budget in [50, 1000, 4096] {
        let pathfinder = Pathfinder::new(&PathfinderConfig { max_explored_nodes: budget });
        let outcome = pathfinder.search(&walk, TilePos::new(2, 2), goal);
        assert!(outcome.path.is_empty(), "reached an enclosed goal with budget {budget}");
        assert!(outcome.explored <= budget, "explored {} of {budget}", outcome.explored);
        assert!(pathfinder.find_path(&walk, TilePos::new(2, 2), goal).is_empty());
    }
}
