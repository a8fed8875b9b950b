//! # isoworld Procedural Generation
//!
//! Deterministic, chunked generation of an infinite isometric world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: the same seed and coordinate always give the same chunk
//! 2. **Lazy**: chunks exist once something asks for them, never before
//! 3. **Local**: a chunk's biome depends only on noise, so neighbors never cascade
//!
//! ## Core Components
//!
//! - [`NoiseField`]: seeded 2D simplex noise, one per climate channel
//! - [`BiomeClassifier`]: climate sample plus water probe to [`Biome`]
//! - [`ChunkGenerator`]: tiles with edge blending, LOD grids by majority vote
//! - [`ObjectPopulator`]: density-table scatter and night spawns
//! - [`ChunkStore`]: concurrent get-or-create map and the object arena
//!
//! ## Example
//!
//! ```rust
//! use isoworld_procedural::{ChunkCoord, ChunkStore, StoreSettings};
//!
//! let store = ChunkStore::new(StoreSettings { seed: 12345, ..Default::default() });
//! let chunk = store.get_or_create(ChunkCoord::new(0, 0));
//! assert_eq!(chunk.biome(), store.biome_at(ChunkCoord::new(0, 0)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod chunk;
pub mod config;
pub mod coords;
pub mod error;
pub mod noise;
pub mod objects;
pub mod populate;
pub mod store;

pub use biome::{resolve_biome, Biome, BiomeClassifier, Climate};
pub use chunk::{Chunk, ChunkGenerator, LodLevel, NeighborBiomes, LOD1_SIZE, LOD2_SIZE};
pub use config::{ClimateConfig, DensityRule, PopulationConfig, SpawnConfig, SpawnRule};
pub use coords::{
    coordinates_to_local, ChunkCoord, LocalTile, Location, Path, TilePos, CHUNK_SIZE,
    CHUNK_SIZE_I32,
};
pub use error::{ProceduralError, ProceduralResult};
pub use noise::{NoiseField, WorldSeed};
pub use objects::{
    Facing, GameObject, ItemDrop, ItemKind, ItemStack, Mob, MobProfile, MobSpecies, MobState,
    ObjectKind, RenderHint, Scenery, SceneryKind, TreeSize, NO_HEALTH,
};
pub use populate::{ObjectPopulator, Populant};
pub use store::{ChunkRef, ChunkStore, ObjectId, StoreSettings};
