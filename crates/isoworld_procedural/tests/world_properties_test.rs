//! # World Property Tests
//!
//! Checks generation-wide guarantees across many chunks: determinism,
//! coordinate round trips, LOD consistency and non-overlapping population.

use isoworld_procedural::{
    coordinates_to_local, resolve_biome, Biome, ChunkCoord, ChunkStore, Climate, ClimateConfig,
    LodLevel, NoiseField, StoreSettings, TilePos, WorldSeed, CHUNK_SIZE, CHUNK_SIZE_I32, LOD1_SIZE,
};

fn store(seed: u64) -> ChunkStore {
    ChunkStore::new(StoreSettings {
        seed,
        ..StoreSettings::default()
    })
}

/// Test: two stores with one seed agree on biomes, tiles and objects.
#[test]
fn test_same_seed_same_world() {
    let a = store(2024);
    let b = store(2024);

    for cy in -4..4 {
        for cx in -4..4 {
            let coord = ChunkCoord::new(cx, cy);
            assert_eq!(a.biome_at(coord), b.biome_at(coord));

            let ca = a.get_or_create(coord);
            let cb = b.get_or_create(coord);
            assert_eq!(
                ca.tile_bytes(LodLevel::Full),
                cb.tile_bytes(LodLevel::Full),
                "tiles differ at {coord:?}"
            );

            let describe = |store: &ChunkStore| -> Vec<_> {
                store
                    .objects_in(coord)
                    .into_iter()
                    .map(|(_, o)| (o.location.tile(), o.health, o.solid))
                    .collect()
            };
            assert_eq!(describe(&a), describe(&b), "objects differ at {coord:?}");
        }
    }
}

/// Test: seed 42 keeps producing the same world across builds and runs.
///
/// Pins the permutation shuffle, the chunk stream seeding, the probe ring
/// and the tile draws to known values.
#[test]
fn test_seed_42_world_is_pinned() {
    let field = NoiseField::new(WorldSeed::new(42));
    for (x, y, expected) in [
        (0.5, 0.25, -0.043_124_590_278_372_246),
        (10.5, -3.25, -0.609_615_315_850_781_4),
        (-7.3, 12.9, 0.570_231_158_716_225),
        (123.456, -78.9, -0.073_298_560_672_901_39),
    ] {
        let value = field.sample(x, y);
        assert!((value - expected).abs() < 1e-12, "noise at ({x}, {y}) is {value}");
    }

    let store = store(42);
    for (cx, cy, expected) in [
        (0, 0, Biome::Plains),
        (0, -1, Biome::Forest),
        (-3, 5, Biome::Taiga),
        (17, -9, Biome::Mountain),
        (14, 7, Biome::SnowyPeak),
        (-40, -6, Biome::Beach),
        (-40, -3, Biome::Water),
        (-27, -33, Biome::Desert),
    ] {
        assert_eq!(store.biome_at(ChunkCoord::new(cx, cy)), expected, "biome of ({cx}, {cy})");
    }

    // North of (0, 0) is forest, so its top two rows blend in forest tiles.
    let chunk = store.get_or_create(ChunkCoord::new(0, 0));
    for (x, y, expected) in [
        (0, 0, 12),
        (1, 0, 10),
        (3, 0, 27),
        (7, 0, 13),
        (1, 1, 27),
        (0, 12, 12),
        (5, 12, 3),
        (20, 23, 13),
        (23, 23, 10),
    ] {
        assert_eq!(chunk.tile_at(0, x, y), expected, "tile ({x}, {y}) of chunk (0, 0)");
    }
}

/// Test: chunks at the far ends of the coordinate range classify and generate.
#[test]
fn test_extreme_coordinates_do_not_overflow() {
    let store = store(42);
    for coord in [
        ChunkCoord::new(i32::MAX, i32::MAX),
        ChunkCoord::new(i32::MIN, i32::MIN),
        ChunkCoord::new(i32::MAX, i32::MIN),
    ] {
        let biome = store.biome_at(coord);
        assert_eq!(store.get_or_create(coord).biome(), biome);
    }
}

/// Test: generation order does not change content.
#[test]
fn test_access_order_does_not_matter() {
    let forward = store(5);
    let backward = store(5);
    let coords: Vec<_> = (0..10).map(|i| ChunkCoord::new(i, -i)).collect();

    for coord in &coords {
        forward.get_or_create(*coord);
    }
    for coord in coords.iter().rev() {
        backward.get_or_create(*coord);
    }
    for coord in &coords {
        assert_eq!(
            forward.get_or_create(*coord).tile_bytes(LodLevel::Full),
            backward.get_or_create(*coord).tile_bytes(LodLevel::Full)
        );
    }
}

/// Test: absolute to (local, chunk) and back reproduces the tile.
#[test]
fn test_coordinate_round_trip() {
    for a in (-5000..5000).step_by(7) {
        let (lx, ly, cx, cy) = coordinates_to_local(a, -a);
        assert!(usize::from(lx) < CHUNK_SIZE && usize::from(ly) < CHUNK_SIZE);
        assert_eq!(cx * CHUNK_SIZE_I32 + i32::from(lx), a, "x round trip failed for {a}");
        assert_eq!(cy * CHUNK_SIZE_I32 + i32::from(ly), -a, "y round trip failed for {a}");
    }
    let (local, chunk) = TilePos::new(-1, -24).to_local();
    assert_eq!((local.x, local.y, chunk.x, chunk.y), (23, 0, -1, -1));
}

/// Test: each LOD1 cell holds a most frequent value of its 2x2 block.
#[test]
fn test_lod1_is_block_majority() {
    let store = store(77);
    for cx in -3..3 {
        let chunk = store.get_or_create(ChunkCoord::new(cx, cx * 2));
        for by in 0..LOD1_SIZE {
            for bx in 0..LOD1_SIZE {
                let block = [
                    chunk.tile_at(0, bx * 2, by * 2),
                    chunk.tile_at(0, bx * 2 + 1, by * 2),
                    chunk.tile_at(0, bx * 2, by * 2 + 1),
                    chunk.tile_at(0, bx * 2 + 1, by * 2 + 1),
                ];
                let count = |v: u8| block.iter().filter(|&&t| t == v).count();
                let reduced = chunk.tile_at(1, bx, by);
                let best = block.iter().map(|&t| count(t)).max().unwrap_or(0);
                assert_eq!(count(reduced), best, "block {block:?} reduced to {reduced}");
            }
        }
    }
}

/// Test: no two populated footprints intersect, anywhere.
#[test]
fn test_population_never_overlaps() {
    let store = store(31337);
    let mut checked = 0;
    for cy in -6..6 {
        for cx in -6..6 {
            let objects = store.objects_in(ChunkCoord::new(cx, cy));
            for (i, (_, a)) in objects.iter().enumerate() {
                for (_, b) in &objects[i + 1..] {
                    assert!(
                        !a.footprint().intersects(&b.footprint()),
                        "overlap in chunk ({cx}, {cy}): {:?} / {:?}",
                        a.footprint(),
                        b.footprint()
                    );
                }
            }
            checked += objects.len();
        }
    }
    println!("checked {checked} objects");
}

/// Scenario: elevation 0.35 next to water is a beach, not the base biome.
#[test]
fn test_beach_band_scenario() {
    let config = ClimateConfig::default();
    let climate = Climate {
        elevation: 0.35,
        moisture: 0.45,
        temperature: 0.7,
    };
    let base = resolve_biome(&config, climate, false);
    assert_eq!(base, Biome::Plains);
    assert_eq!(resolve_biome(&config, climate, true), Biome::Beach);
}

/// Test: a water chunk's probe ring finds water in a real world.
#[test]
fn test_water_exists_and_is_flagged() {
    let store = store(8);
    let classifier = store.classifier();
    let mut water = 0;
    for cy in (-2000..2000).step_by(40) {
        for cx in (-2000..2000).step_by(40) {
            let coord = ChunkCoord::new(cx, cy);
            if store.biome_at(coord) == Biome::Water {
                water += 1;
                assert!(classifier.elevation(coord) < classifier.config().water_threshold);
            }
        }
    }
    assert!(water > 0, "no water in a 4000x4000 chunk window");
}
