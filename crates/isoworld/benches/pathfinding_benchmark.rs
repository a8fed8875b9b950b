//! Benchmark for A* search, smoothing and world ticks.
//!
//! Run with: cargo bench --package isoworld --bench pathfinding_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use isoworld::procedural::{ChunkStore, StoreSettings, TilePos};
use isoworld::{FrameWalkability, Observer, Pathfinder, World, WorldConfig};

fn benchmark_open_field(c: &mut Criterion) {
    let pathfinder = Pathfinder::default();
    let open = |_: TilePos| true;

    c.bench_function("open_field_40_tiles", |b| {
        b.iter(|| black_box(pathfinder.find_path(&open, TilePos::new(0, 0), TilePos::new(25, 15))));
    });
}

fn benchmark_wall_detour(c: &mut Criterion) {
    let pathfinder = Pathfinder::default();
    let wall = |t: TilePos| !(t.x == 10 && (-20..=20).contains(&t.y));

    c.bench_function("wall_detour", |b| {
        b.iter(|| black_box(pathfinder.find_path(&wall, TilePos::new(0, 0), TilePos::new(20, 0))));
    });
}

fn benchmark_world_paths(c: &mut Criterion) {
    let store = ChunkStore::new(StoreSettings {
        seed: 42,
        ..StoreSettings::default()
    });
    let pathfinder = Pathfinder::default();

    c.bench_function("world_path_frame_snapshot", |b| {
        b.iter(|| {
            let walk = FrameWalkability::new(&store);
            black_box(pathfinder.find_path(&walk, TilePos::new(3, 3), TilePos::new(40, 30)))
        });
    });
}

fn benchmark_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");
    group.sample_size(20);

    group.bench_function("night_tick_radius_2", |b| {
        let mut world = World::new(WorldConfig::with_seed(42)).unwrap();
        let observer = Observer::new(12.0, 12.0, false);
        b.iter(|| black_box(world.tick(50, &observer)));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_open_field,
    benchmark_wall_detour,
    benchmark_world_paths,
    benchmark_tick
);
criterion_main!(benches);
