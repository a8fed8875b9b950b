//! # Chunk Store
//!
//! Lazily materialized, concurrently readable map from [`ChunkCoord`] to
//! [`Chunk`], plus the object arena the chunks' handle lists point into.
//!
//! ## Concurrency
//!
//! The map holds one slot per coordinate. A lookup takes the read lock and,
//! on a hit, returns immediately. On a miss the write lock is held only long
//! enough to insert an empty slot; generation then runs inside the slot's
//! one-time initializer, outside any map lock. Racing first accesses to the
//! same coordinate all wait on that single initializer, so each chunk is
//! generated exactly once and unrelated chunks never wait on each other.
//!
//! ## Lock order
//!
//! chunk map, then chunk handle lists (ascending coordinate), then object
//! arena. Generation takes the arena lock only after the map lock is gone.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use isoworld_core::{Handle, SlotPool};
use parking_lot::RwLock;

use crate::biome::{Biome, BiomeClassifier};
use crate::chunk::{Chunk, ChunkGenerator, NeighborBiomes};
use crate::config::{ClimateConfig, PopulationConfig, SpawnConfig};
use crate::coords::{ChunkCoord, TilePos, CHUNK_SIZE};
use crate::noise::WorldSeed;
use crate::objects::GameObject;
use crate::populate::ObjectPopulator;

/// Shared reference to a stored chunk.
pub type ChunkRef = Arc<Chunk>;

/// Identity of an object in the store's arena.
pub type ObjectId = Handle;

type ChunkSlot = Arc<OnceLock<ChunkRef>>;

/// Everything a store needs to generate chunks.
#[derive(Clone, Debug, Default)]
pub struct StoreSettings {
    /// World seed.
    pub seed: u64,
    /// Climate channels and biome table.
    pub climate: ClimateConfig,
    /// Scatter tables.
    pub population: PopulationConfig,
    /// Night spawn tables.
    pub spawning: SpawnConfig,
}

/// Owner of all chunks and objects of one world.
pub struct ChunkStore {
    classifier: BiomeClassifier,
    generator: ChunkGenerator,
    populator: ObjectPopulator,
    chunks: RwLock<HashMap<ChunkCoord, ChunkSlot>>,
    objects: RwLock<SlotPool<GameObject>>,
    generated: AtomicUsize,
}

impl ChunkStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(settings: StoreSettings) -> Self {
        let seed = WorldSeed::new(settings.seed);
        Self {
            classifier: BiomeClassifier::new(seed, settings.climate),
            generator: ChunkGenerator::new(seed),
            populator: ObjectPopulator::new(settings.population, settings.spawning),
            chunks: RwLock::new(HashMap::new()),
            objects: RwLock::new(SlotPool::with_capacity(4096)),
            generated: AtomicUsize::new(0),
        }
    }

    /// Biome of a chunk, computed from noise without materializing anything.
    #[must_use]
    pub fn biome_at(&self, coord: ChunkCoord) -> Biome {
        self.classifier.classify(coord)
    }

    /// The classifier in use.
    #[must_use]
    pub fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// The populator in use; also rolls night spawns.
    #[must_use]
    pub fn populator(&self) -> &ObjectPopulator {
        &self.populator
    }

    /// Returns the chunk if it was already generated.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<ChunkRef> {
        self.chunks
            .read()
            .get(&coord)
            .and_then(|slot| slot.get().cloned())
    }

    /// Returns the chunk at `coord`, generating and populating it on first access.
    ///
    /// Safe to call from many threads; each coordinate is generated once.
    pub fn get_or_create(&self, coord: ChunkCoord) -> ChunkRef {
        let existing = self.chunks.read().get(&coord).cloned();
        let slot = match existing {
            Some(slot) => slot,
            None => Arc::clone(self.chunks.write().entry(coord).or_default()),
        };
        Arc::clone(slot.get_or_init(|| self.build(coord)))
    }

    fn build(&self, coord: ChunkCoord) -> ChunkRef {
        let biome = self.classifier.classify(coord);
        let neighbors = NeighborBiomes {
            north: self.classifier.classify(coord.north()),
            south: self.classifier.classify(coord.south()),
            west: self.classifier.classify(coord.west()),
            east: self.classifier.classify(coord.east()),
        };
        let chunk = self.generator.generate(biome, coord, neighbors);

        let mut populated = {
            let mut rng = chunk.rng();
            self.populator.populate(biome, &mut *rng, coord, CHUNK_SIZE)
        };
        populated.sort_by_key(|object| object.render_hint().sheet);

        let ids: Vec<ObjectId> = {
            let mut arena = self.objects.write();
            populated.into_iter().map(|object| arena.insert(object)).collect()
        };
        let count = ids.len();
        *chunk.objects_mut() = ids;

        self.generated.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            "generated chunk ({}, {}) biome={:?} objects={}",
            coord.x,
            coord.y,
            biome,
            count
        );
        Arc::new(chunk)
    }

    /// Number of chunks generated so far.
    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.generated.load(Ordering::Relaxed)
    }

    /// Coordinates of every generated chunk, sorted.
    #[must_use]
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self
            .chunks
            .read()
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(coord, _)| *coord)
            .collect();
        coords.sort_unstable();
        coords
    }

    /// Snapshot of chunks whose dirty flag is set. Flags are left untouched.
    #[must_use]
    pub fn dirty_chunks(&self) -> Vec<ChunkRef> {
        let mut dirty: Vec<ChunkRef> = self
            .chunks
            .read()
            .values()
            .filter_map(|slot| slot.get())
            .filter(|chunk| chunk.is_dirty())
            .cloned()
            .collect();
        dirty.sort_unstable_by_key(|chunk| chunk.coord());
        dirty
    }

    /// Dirty flag of a generated chunk; `false` if it does not exist yet.
    #[must_use]
    pub fn chunk_is_dirty(&self, coord: ChunkCoord) -> bool {
        self.get(coord).is_some_and(|chunk| chunk.is_dirty())
    }

    /// Clears the dirty flag of a generated chunk.
    pub fn clear_dirty(&self, coord: ChunkCoord) {
        if let Some(chunk) = self.get(coord) {
            chunk.clear_dirty();
        }
    }

    /// Copy of an object.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<GameObject> {
        self.objects.read().get(id).cloned()
    }

    /// Runs `f` on an object in place.
    ///
    /// # Returns
    ///
    /// `None` if the object no longer exists.
    pub fn with_object_mut<T>(
        &self,
        id: ObjectId,
        f: impl FnOnce(&mut GameObject) -> T,
    ) -> Option<T> {
        self.objects.write().get_mut(id).map(f)
    }

    /// Number of live objects across all chunks.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }

    /// Objects of a chunk, stable-sorted by sprite sheet.
    #[must_use]
    pub fn objects_in(&self, coord: ChunkCoord) -> Vec<(ObjectId, GameObject)> {
        let ids = self.get_or_create(coord).object_ids();
        let arena = self.objects.read();
        let mut objects: Vec<(ObjectId, GameObject)> = ids
            .into_iter()
            .filter_map(|id| arena.get(id).map(|object| (id, object.clone())))
            .collect();
        objects.sort_by_key(|(_, object)| object.render_hint().sheet);
        objects
    }

    /// Adds an object to the chunk named by its location.
    pub fn add_object(&self, object: GameObject) -> ObjectId {
        let chunk = self.get_or_create(object.location.chunk);
        let mut list = chunk.objects_mut();
        let id = self.objects.write().insert(object);
        list.push(id);
        chunk.mark_dirty();
        id
    }

    /// Removes an object from its chunk and the arena.
    pub fn remove_object(&self, id: ObjectId) -> Option<GameObject> {
        let coord = self.objects.read().get(id)?.location.chunk;
        let chunk = self.get_or_create(coord);
        let mut list = chunk.objects_mut();
        let Some(position) = list.iter().position(|&listed| listed == id) else {
            tracing::warn!(
                "object {:?} claims chunk ({}, {}) but is not listed there",
                id,
                coord.x,
                coord.y
            );
            return None;
        };
        list.remove(position);
        chunk.mark_dirty();
        self.objects.write().remove(id)
    }

    /// Moves an object's handle from one chunk list to another.
    ///
    /// Both lists are locked for the duration, in coordinate order, so no
    /// observer sees the object in both or in neither. Both chunks are marked
    /// dirty and the object's recorded chunk is set to `to`.
    ///
    /// # Returns
    ///
    /// `false` (after logging) if the object is not listed in `from`.
    pub fn move_object(&self, id: ObjectId, from: ChunkCoord, to: ChunkCoord) -> bool {
        if from == to {
            return self.get_or_create(from).contains(id);
        }
        let source = self.get_or_create(from);
        let target = self.get_or_create(to);

        let (mut source_list, mut target_list) = if from < to {
            let s = source.objects_mut();
            let t = target.objects_mut();
            (s, t)
        } else {
            let t = target.objects_mut();
            let s = source.objects_mut();
            (s, t)
        };

        let Some(position) = source_list.iter().position(|&listed| listed == id) else {
            tracing::warn!(
                "move of {:?} from ({}, {}) to ({}, {}) skipped: not in source chunk",
                id, from.x, from.y, to.x, to.y
            );
            return false;
        };
        source_list.remove(position);
        target_list.push(id);
        if let Some(object) = self.objects.write().get_mut(id) {
            object.location.chunk = to;
        }
        source.mark_dirty();
        target.mark_dirty();
        true
    }

    /// Returns true if no solid object sits on `tile`.
    ///
    /// Generates the owning chunk if needed.
    #[must_use]
    pub fn is_walkable(&self, tile: TilePos) -> bool {
        let (_, coord) = tile.to_local();
        let ids = self.get_or_create(coord).object_ids();
        let arena = self.objects.read();
        !ids.iter().any(|&id| {
            arena
                .get(id)
                .is_some_and(|object| object.solid && object.location.tile() == tile)
        })
    }

    /// Absolute tiles occupied by solid objects of one chunk.
    ///
    /// Generates the chunk if needed.
    #[must_use]
    pub fn solid_tiles(&self, coord: ChunkCoord) -> HashSet<TilePos> {
        let ids = self.get_or_create(coord).object_ids();
        let arena = self.objects.read();
        ids.iter()
            .filter_map(|&id| arena.get(id))
            .filter(|object| object.solid)
            .map(|object| object.location.tile())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Location;
    use crate::objects::{ItemKind, ItemStack};

    fn store() -> ChunkStore {
        ChunkStore::new(StoreSettings {
            seed: 1234,
            ..StoreSettings::default()
        })
    }

    fn wood(coord: ChunkCoord, x: u8, y: u8) -> GameObject {
        GameObject::item(
            Location::at_tile(coord, x, y),
            ItemStack { item: ItemKind::Wood, quantity: 1 },
            0,
        )
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let store = store();
        let a = store.get_or_create(ChunkCoord::new(2, -1));
        let b = store.get_or_create(ChunkCoord::new(2, -1));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.generated_count(), 1);
        assert_eq!(a.biome(), store.biome_at(ChunkCoord::new(2, -1)));
    }

    #[test]
    fn test_neighbor_biomes_do_not_materialize() {
        let store = store();
        store.get_or_create(ChunkCoord::new(0, 0));
        assert_eq!(store.loaded_coords(), vec![ChunkCoord::new(0, 0)]);
    }

    #[test]
    fn test_concurrent_first_access_generates_once() {
        let store = store();
        let coord = ChunkCoord::new(9, 9);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| store.get_or_create(coord));
            }
        });
        assert_eq!(store.generated_count(), 1, "chunk generated more than once");
    }

    #[test]
    fn test_add_and_remove_mark_dirty() {
        let store = store();
        let coord = ChunkCoord::new(0, 0);
        let id = store.add_object(wood(coord, 3, 3));
        assert!(store.chunk_is_dirty(coord));
        assert!(store.get_or_create(coord).contains(id));

        store.clear_dirty(coord);
        assert!(!store.chunk_is_dirty(coord));

        assert!(store.remove_object(id).is_some());
        assert!(store.chunk_is_dirty(coord));
        assert!(store.object(id).is_none());
        assert!(store.remove_object(id).is_none());
    }

    #[test]
    fn test_move_object_between_chunks() {
        let store = store();
        let from = ChunkCoord::new(0, 0);
        let to = ChunkCoord::new(1, 0);
        let id = store.add_object(wood(from, 23, 12));
        store.clear_dirty(from);

        assert!(store.move_object(id, from, to));
        assert!(!store.get_or_create(from).contains(id));
        assert!(store.get_or_create(to).contains(id));
        assert_eq!(store.object(id).map(|o| o.location.chunk), Some(to));

        let dirty: Vec<_> = store.dirty_chunks().iter().map(|c| c.coord()).collect();
        assert!(dirty.contains(&from) && dirty.contains(&to), "dirty set was {dirty:?}");
    }

    #[test]
    fn test_move_missing_object_is_skipped() {
        let store = store();
        let id = store.add_object(wood(ChunkCoord::new(0, 0), 1, 1));
        assert!(!store.move_object(id, ChunkCoord::new(5, 5), ChunkCoord::new(0, 0)));
        assert!(store.get_or_create(ChunkCoord::new(0, 0)).contains(id));
    }

    #[test]
    fn test_solid_objects_block_walking() {
        let store = store();
        let coord = ChunkCoord::new(-1, -1);
        let chunk = store.get_or_create(coord);
        let solid: Vec<TilePos> = store
            .objects_in(coord)
            .iter()
            .filter(|(_, o)| o.solid)
            .map(|(_, o)| o.location.tile())
            .collect();
        for tile in &solid {
            assert!(!store.is_walkable(*tile), "solid object tile {tile:?} reported walkable");
        }
        let expected: HashSet<TilePos> = solid.iter().copied().collect();
        assert_eq!(store.solid_tiles(coord), expected);

        let mut rng = chunk.rng().clone();
        let zombie =
            GameObject::mob(Location::at_tile(coord, 0, 0), crate::MobSpecies::Zombie, &mut rng);
        let tile = zombie.location.tile();
        store.add_object(zombie);
        assert!(!store.is_walkable(tile));
        assert_eq!(tile, TilePos::new(-24, -24));
    }

    #[test]
    fn test_objects_in_sorted_by_sheet() {
        let store = store();
        for cx in 0..6 {
            let objects = store.objects_in(ChunkCoord::new(cx, 0));
            let sheets: Vec<_> = objects.iter().map(|(_, o)| o.render_hint().sheet).collect();
            let mut sorted = sheets.clone();
            sorted.sort_unstable();
            assert_eq!(sheets, sorted);
        }
    }
}
