//! # Isoworld Headless Simulation
//!
//! Runs a world with no renderer: an observer walks east through the world
//! while day and night alternate, and every tick's activity is logged.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults, 600 ticks
//! ./world_sim
//!
//! # Custom config and tick count
//! ./world_sim world.toml 3000
//!
//! # More detail
//! RUST_LOG=isoworld=debug,isoworld_procedural=debug ./world_sim
//! ```

use isoworld::{Observer, World, WorldConfig};

// ============================================================================
// SIMULATION CONSTANTS
// ============================================================================

/// Fixed tick length in simulated milliseconds.
const TICK_MS: u32 = 50;

/// Ticks run when no count is given.
const DEFAULT_TICKS: u64 = 600;

/// Observer walking speed, tiles per second.
const OBSERVER_SPEED: f32 = 4.0;

/// Length of a full day-night cycle in simulated milliseconds.
const DAY_LENGTH_MS: u64 = 20_000;

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{e}");
                std::process::exit(1);
            }
        },
        None => WorldConfig::default(),
    };
    let ticks = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let mut world = match World::new(config) {
        Ok(world) => world,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let start = std::time::Instant::now();
    let mut observer = Observer::new(12.0, 12.0, true);
    let mut crossings = 0;
    let mut spawned = 0;
    let mut removed = 0;

    #[allow(clippy::cast_precision_loss)]
    for _ in 0..ticks {
        observer.x += OBSERVER_SPEED * TICK_MS as f32 / 1000.0;
        observer.is_day = world.now_ms() % DAY_LENGTH_MS < DAY_LENGTH_MS / 2;

        let stats = world.tick(TICK_MS, &observer);
        crossings += stats.chunk_crossings;
        spawned += stats.spawned;
        removed += stats.removed;

        for coord in world.dirty_chunks() {
            world.clear_dirty(coord);
        }
    }

    tracing::info!(
        "simulated {} ticks ({} ms) in {:?}: chunks={} objects={} crossings={} spawned={} \
         removed={}",
        ticks,
        world.now_ms(),
        start.elapsed(),
        world.store().generated_count(),
        world.store().object_count(),
        crossings,
        spawned,
        removed
    );
}
