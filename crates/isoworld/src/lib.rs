//! # ISOWORLD
//!
//! Infinite isometric 2D world: chunks generated on demand from seeded
//! noise, populated with scenery and mobs, simulated around one observer.
//!
//! ## Layout
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        isoworld                            │
//! │  World ─ tick(think, move, upkeep) ─ Observer              │
//! │    │                                                       │
//! │    ├── gameplay: Pathfinder, mob think/advance, facing     │
//! │    └── config: WorldConfig (TOML)                          │
//! ├────────────────────────────────────────────────────────────┤
//! │  isoworld_procedural: noise, biomes, chunks, ChunkStore    │
//! ├────────────────────────────────────────────────────────────┤
//! │  isoworld_core: Handle, SlotPool, SimClock, Cooldown, Rect │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use isoworld::{Observer, World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig::with_seed(7)).unwrap();
//! let stats = world.tick(16, &Observer::new(12.0, 12.0, true));
//! assert_eq!(stats.chunks_simulated, 25);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod gameplay;
pub mod world;

pub use isoworld_core as core;
pub use isoworld_procedural as procedural;

pub use config::{AiConfig, PathfinderConfig, SimulationConfig, WorldConfig, MAX_SIMULATION_RADIUS};
pub use error::{WorldError, WorldResult};
pub use gameplay::{FrameWalkability, Pathfinder, SearchOutcome, Walkability};
pub use world::{Observer, TickStats, World};
