//! # Chunk System
//!
//! The world is cut into [`CHUNK_SIZE`]-square chunks, each holding:
//! - A full-resolution tile grid, fixed at creation
//! - Two LOD grids (half and eighth resolution) derived by majority vote
//! - Handles of the objects currently inside it
//! - A dirty flag for the persistence collaborator
//! - The chunk's own random stream, continued by population and spawns
//!
//! ## Edge blending
//!
//! Tiles within two tiles of an edge whose neighbor has another biome flip a
//! fair coin between the two biomes' palettes. The first matching edge wins,
//! checked north, south, west, east.

use std::sync::atomic::{AtomicBool, Ordering};

use isoworld_core::Handle;
use parking_lot::{Mutex, MutexGuard};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::biome::Biome;
use crate::coords::{ChunkCoord, CHUNK_SIZE};
use crate::noise::WorldSeed;

/// Edge length of the LOD1 grid.
pub const LOD1_SIZE: usize = CHUNK_SIZE / 2;
/// Edge length of the LOD2 grid.
pub const LOD2_SIZE: usize = CHUNK_SIZE / 8;
/// Width of the blended border, in tiles.
pub const BLEND_WIDTH: usize = 2;

/// Full-resolution tile grid, indexed `[y][x]`.
pub type TileGrid = [[u8; CHUNK_SIZE]; CHUNK_SIZE];
/// Half-resolution grid.
pub type Lod1Grid = [[u8; LOD1_SIZE]; LOD1_SIZE];
/// Eighth-resolution grid.
pub type Lod2Grid = [[u8; LOD2_SIZE]; LOD2_SIZE];

/// Level of detail of a tile query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LodLevel {
    /// Full resolution.
    Full,
    /// 2x2 blocks.
    Half,
    /// 8x8 blocks.
    Eighth,
}

impl LodLevel {
    /// Converts `0`, `1`, `2` into a level; `None` for any other value.
    #[must_use]
    pub const fn from_index(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Full),
            1 => Some(Self::Half),
            2 => Some(Self::Eighth),
            _ => None,
        }
    }

    /// Grid edge length at this level.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Full => CHUNK_SIZE,
            Self::Half => LOD1_SIZE,
            Self::Eighth => LOD2_SIZE,
        }
    }

    /// Block edge length covered by one cell, in full-resolution tiles.
    #[must_use]
    pub const fn block(self) -> usize {
        CHUNK_SIZE / self.size()
    }
}

/// Biomes of the four chunks sharing an edge with a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborBiomes {
    /// Chunk at `y - 1`.
    pub north: Biome,
    /// Chunk at `y + 1`.
    pub south: Biome,
    /// Chunk at `x - 1`.
    pub west: Biome,
    /// Chunk at `x + 1`.
    pub east: Biome,
}

impl NeighborBiomes {
    /// All four sides set to the same biome.
    #[must_use]
    pub const fn uniform(biome: Biome) -> Self {
        Self {
            north: biome,
            south: biome,
            west: biome,
            east: biome,
        }
    }
}

/// A generated chunk.
pub struct Chunk {
    coord: ChunkCoord,
    biome: Biome,
    tiles: Box<TileGrid>,
    lod1: Lod1Grid,
    lod2: Lod2Grid,
    objects: Mutex<Vec<Handle>>,
    dirty: AtomicBool,
    rng: Mutex<ChaCha8Rng>,
}

impl Chunk {
    /// Chunk coordinate.
    #[inline]
    #[must_use]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Cached biome.
    #[inline]
    #[must_use]
    pub fn biome(&self) -> Biome {
        self.biome
    }

    /// Tile at `(x, y)` of the given level.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside that level's grid.
    #[inline]
    #[must_use]
    pub fn tile(&self, level: LodLevel, x: usize, y: usize) -> u8 {
        match level {
            LodLevel::Full => self.tiles[y][x],
            LodLevel::Half => self.lod1[y][x],
            LodLevel::Eighth => self.lod2[y][x],
        }
    }

    /// Tile at `(x, y)` with the level given as `0`, `1` or `2`.
    ///
    /// Use [`Chunk::try_tile_at`] when the level or position comes from
    /// untrusted input.
    ///
    /// # Panics
    ///
    /// Panics on an unknown level or out-of-grid coordinates.
    #[must_use]
    pub fn tile_at(&self, lod_level: u8, x: usize, y: usize) -> u8 {
        match self.try_tile_at(lod_level, x, y) {
            Some(tile) => tile,
            None => panic!("invalid tile query: LOD level {lod_level} at ({x}, {y})"),
        }
    }

    /// Tile at `(x, y)`, or `None` for an unknown level or a position outside
    /// that level's grid.
    #[must_use]
    pub fn try_tile_at(&self, lod_level: u8, x: usize, y: usize) -> Option<u8> {
        let level = LodLevel::from_index(lod_level)?;
        (x < level.size() && y < level.size()).then(|| self.tile(level, x, y))
    }

    /// Grid of one level as contiguous row-major bytes, for upload or export.
    #[must_use]
    pub fn tile_bytes(&self, level: LodLevel) -> &[u8] {
        match level {
            LodLevel::Full => bytemuck::cast_slice(&self.tiles[..]),
            LodLevel::Half => bytemuck::cast_slice(&self.lod1[..]),
            LodLevel::Eighth => bytemuck::cast_slice(&self.lod2[..]),
        }
    }

    /// Snapshot of the object handles, in insertion order.
    #[must_use]
    pub fn object_ids(&self) -> Vec<Handle> {
        self.objects.lock().clone()
    }

    /// Number of objects in the chunk.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.lock().len()
    }

    /// Returns true if `id` is listed in this chunk.
    #[must_use]
    pub fn contains(&self, id: Handle) -> bool {
        self.objects.lock().contains(&id)
    }

    /// Exclusive access to the handle list.
    ///
    /// Callers mutating the list must also call [`Chunk::mark_dirty`].
    pub fn objects_mut(&self) -> MutexGuard<'_, Vec<Handle>> {
        self.objects.lock()
    }

    /// Returns true if objects changed since the flag was last cleared.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Flags the chunk for re-saving.
    #[inline]
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Clears the dirty flag.
    #[inline]
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::Release);
    }

    /// Exclusive access to the chunk's random stream.
    pub fn rng(&self) -> MutexGuard<'_, ChaCha8Rng> {
        self.rng.lock()
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("biome", &self.biome)
            .field("objects", &self.object_count())
            .field("dirty", &self.is_dirty())
            .finish_non_exhaustive()
    }
}

/// Synthesizes tile grids for chunks.
pub struct ChunkGenerator {
    seed: WorldSeed,
}

impl ChunkGenerator {
    /// Creates a generator bound to a world seed.
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self { seed }
    }

    /// Random stream of a chunk, a pure function of seed and coordinate.
    #[must_use]
    pub fn chunk_rng(&self, coord: ChunkCoord) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed.for_chunk(coord))
    }

    /// Generates the chunk at `coord`.
    ///
    /// The returned chunk has no objects; its random stream is positioned just
    /// after tile generation so population continues the same sequence.
    #[must_use]
    pub fn generate(&self, biome: Biome, coord: ChunkCoord, neighbors: NeighborBiomes) -> Chunk {
        let mut rng = self.chunk_rng(coord);
        let tiles = generate_tiles(biome, neighbors, &mut rng);
        let lod1 = reduce_lod1(&tiles);
        let lod2 = reduce_lod2(&tiles);

        Chunk {
            coord,
            biome,
            tiles,
            lod1,
            lod2,
            objects: Mutex::new(Vec::new()),
            dirty: AtomicBool::new(false),
            rng: Mutex::new(rng),
        }
    }
}

/// Biome whose palette a tile draws from, before the coin flip.
fn blend_source(biome: Biome, neighbors: NeighborBiomes, x: usize, y: usize) -> Option<Biome> {
    let far = CHUNK_SIZE - BLEND_WIDTH;
    let edges = [
        (y < BLEND_WIDTH, neighbors.north),
        (y >= far, neighbors.south),
        (x < BLEND_WIDTH, neighbors.west),
        (x >= far, neighbors.east),
    ];
    edges
        .into_iter()
        .find(|&(on_edge, other)| on_edge && other != biome)
        .map(|(_, other)| other)
}

fn generate_tiles<R: Rng + ?Sized>(
    biome: Biome,
    neighbors: NeighborBiomes,
    rng: &mut R,
) -> Box<TileGrid> {
    let mut tiles = Box::new([[0u8; CHUNK_SIZE]; CHUNK_SIZE]);
    for (y, row) in tiles.iter_mut().enumerate() {
        for (x, tile) in row.iter_mut().enumerate() {
            let source = match blend_source(biome, neighbors, x, y) {
                Some(other) if rng.gen_bool(0.5) => other,
                _ => biome,
            };
            *tile = source.draw_tile(rng);
        }
    }
    tiles
}

/// Most frequent value of a block; ties go to the value seen first in
/// row-major order.
fn majority(tiles: &TileGrid, bx: usize, by: usize, block: usize) -> u8 {
    let mut counts = [0u16; 256];
    let cells = || {
        (by * block..(by + 1) * block)
            .flat_map(move |y| (bx * block..(bx + 1) * block).map(move |x| tiles[y][x]))
    };
    for value in cells() {
        counts[usize::from(value)] += 1;
    }
    let best = counts.iter().copied().max().unwrap_or(0);
    cells()
        .find(|&value| counts[usize::from(value)] == best)
        .unwrap_or(0)
}

fn reduce_lod1(tiles: &TileGrid) -> Lod1Grid {
    let mut grid = [[0u8; LOD1_SIZE]; LOD1_SIZE];
    for (by, row) in grid.iter_mut().enumerate() {
        for (bx, cell) in row.iter_mut().enumerate() {
            *cell = majority(tiles, bx, by, LodLevel::Half.block());
        }
    }
    grid
}

fn reduce_lod2(tiles: &TileGrid) -> Lod2Grid {
    let mut grid = [[0u8; LOD2_SIZE]; LOD2_SIZE];
    for (by, row) in grid.iter_mut().enumerate() {
        for (bx, cell) in row.iter_mut().enumerate() {
            *cell = majority(tiles, bx, by, LodLevel::Eighth.block());
        }
    }
    grid
}
