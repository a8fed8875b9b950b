//! # World
//!
//! Façade that owns a [`ChunkStore`] and a [`SimClock`] and advances the
//! simulation around one observer.
//!
//! ## Tick phases
//!
//! 1. **Think**: every mob in range decides against the frame-start world.
//! 2. **Move**: species effects apply, then every mob walks its path. A mob
//!    that crosses a chunk border is moved between chunk lists atomically.
//! 3. **Upkeep**: night spawns, dead objects leave their drops behind and
//!    old items despawn.
//!
//! Mobs are visited in ascending chunk order, then in list order within a
//! chunk, so a seeded world replays identically.

use isoworld_core::SimClock;
use isoworld_procedural::{
    Biome, ChunkCoord, ChunkRef, ChunkStore, GameObject, Location, MobSpecies, ObjectId, ObjectKind,
    Path, TilePos,
};
use rand::Rng;

use crate::config::WorldConfig;
use crate::error::WorldResult;
use crate::gameplay::{advance, think, FrameWalkability, Pathfinder, ThinkContext};

// ============================================================================
// OBSERVER
// ============================================================================

/// The point the simulation is centered on, usually the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    /// Absolute x in tiles.
    pub x: f32,
    /// Absolute y in tiles.
    pub y: f32,
    /// Daylight flag, owned by the caller's day cycle.
    pub is_day: bool,
}

impl Observer {
    /// Observer at an absolute position.
    #[must_use]
    pub const fn new(x: f32, y: f32, is_day: bool) -> Self {
        Self { x, y, is_day }
    }

    /// Chunk the observer stands in.
    #[must_use]
    pub fn chunk(&self) -> ChunkCoord {
        Location::from_absolute(self.x, self.y).chunk
    }
}

/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Simulated time after the tick.
    pub now_ms: u64,
    /// Chunks inside the simulation radius.
    pub chunks_simulated: usize,
    /// Mobs whose think cooldown fired.
    pub mobs_thought: usize,
    /// Mobs that changed chunk.
    pub chunk_crossings: usize,
    /// Objects added by night spawns and death drops.
    pub spawned: usize,
    /// Objects removed by death or despawn.
    pub removed: usize,
}

// ============================================================================
// WORLD
// ============================================================================

/// One simulated world.
pub struct World {
    config: WorldConfig,
    store: ChunkStore,
    pathfinder: Pathfinder,
    clock: SimClock,
}

impl World {
    /// Creates a world from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the first setting [`WorldConfig::validate`] rejects.
    pub fn new(config: WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        tracing::info!(
            "world created: seed={} simulation_radius={}",
            config.seed,
            config.simulation.simulation_radius
        );
        Ok(Self {
            store: ChunkStore::new(config.store_settings()),
            pathfinder: Pathfinder::new(&config.pathfinding),
            clock: SimClock::new(),
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Underlying chunk store.
    #[must_use]
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Current simulated time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Biome of a chunk. Does not generate it.
    #[must_use]
    pub fn biome_at(&self, coord: ChunkCoord) -> Biome {
        self.store.biome_at(coord)
    }

    /// Chunk at `coord`, generated on first access.
    pub fn chunk(&self, coord: ChunkCoord) -> ChunkRef {
        self.store.get_or_create(coord)
    }

    /// Tile index at a LOD level of a chunk.
    ///
    /// # Panics
    ///
    /// If `level` is not 0, 1 or 2, or the index is outside that level's grid.
    pub fn tile_at(&self, coord: ChunkCoord, level: u8, x: usize, y: usize) -> u8 {
        self.store.get_or_create(coord).tile_at(level, x, y)
    }

    /// Objects of a chunk in draw order.
    #[must_use]
    pub fn objects_in(&self, coord: ChunkCoord) -> Vec<(ObjectId, GameObject)> {
        self.store.objects_in(coord)
    }

    /// Copy of one object.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<GameObject> {
        self.store.object(id)
    }

    /// Returns true if the chunk changed since its flag was last cleared.
    #[must_use]
    pub fn chunk_is_dirty(&self, coord: ChunkCoord) -> bool {
        self.store.chunk_is_dirty(coord)
    }

    /// Acknowledges a chunk's changes.
    pub fn clear_dirty(&self, coord: ChunkCoord) {
        self.store.clear_dirty(coord);
    }

    /// Coordinates of all dirty chunks, ascending.
    #[must_use]
    pub fn dirty_chunks(&self) -> Vec<ChunkCoord> {
        self.store.dirty_chunks().iter().map(|chunk| chunk.coord()).collect()
    }

    /// Smoothed path between two tiles against the current world.
    #[must_use]
    pub fn request_path(&self, start: TilePos, goal: TilePos) -> Path {
        let walk = |tile: TilePos| self.store.is_walkable(tile);
        self.pathfinder.find_path(&walk, start, goal)
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Adds an object to the chunk its location names.
    pub fn spawn_object(&self, object: GameObject) -> ObjectId {
        self.store.add_object(object)
    }

    /// Removes an object.
    pub fn remove_object(&self, id: ObjectId) -> Option<GameObject> {
        self.store.remove_object(id)
    }

    /// Applies a hit at the current simulated time.
    ///
    /// # Returns
    ///
    /// `true` if the damage landed. Death is resolved by the next tick.
    pub fn hit_object(&self, id: ObjectId, damage: i32) -> bool {
        let now = self.clock.now_ms();
        let landed = self
            .store
            .with_object_mut(id, |object| object.on_hit(damage, now))
            .unwrap_or(false);
        if landed {
            if let Some(object) = self.store.object(id) {
                self.store.get_or_create(object.location.chunk).mark_dirty();
            }
        }
        landed
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Chunks within the simulation radius of `center`, ascending.
    fn simulated_chunks(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let radius = i32::try_from(self.config.simulation.simulation_radius).unwrap_or(i32::MAX);
        let mut coords = Vec::new();
        for y in center.y - radius..=center.y + radius {
            for x in center.x - radius..=center.x + radius {
                coords.push(ChunkCoord::new(x, y));
            }
        }
        coords.sort_unstable();
        coords
    }

    fn mobs_in(&self, coords: &[ChunkCoord]) -> Vec<ObjectId> {
        coords
            .iter()
            .flat_map(|&coord| self.store.get_or_create(coord).object_ids())
            .filter(|&id| self.store.object(id).is_some_and(|o| o.as_mob().is_some()))
            .collect()
    }

    /// Advances the world by `dt_ms` simulated milliseconds.
    pub fn tick(&mut self, dt_ms: u32, observer: &Observer) -> TickStats {
        let now = self.clock.advance(dt_ms);
        let center = observer.chunk();
        let coords = self.simulated_chunks(center);
        let mobs = self.mobs_in(&coords);

        let mut stats = TickStats {
            now_ms: now,
            chunks_simulated: coords.len(),
            ..TickStats::default()
        };

        stats.mobs_thought = self.think_phase(&mobs, observer, now);
        stats.chunk_crossings = self.move_phase(&mobs, observer, dt_ms, now);
        let (spawned, removed) = self.upkeep_phase(&coords, center, observer, now);
        stats.spawned = spawned;
        stats.removed = removed;

        if stats.spawned + stats.removed + stats.chunk_crossings > 0 {
            tracing::debug!(
                "tick at {}ms: thought={} crossings={} spawned={} removed={}",
                now,
                stats.mobs_thought,
                stats.chunk_crossings,
                stats.spawned,
                stats.removed
            );
        }
        stats
    }

    fn think_phase(&self, mobs: &[ObjectId], observer: &Observer, now: u64) -> usize {
        let walk = FrameWalkability::new(&self.store);
        let ctx = ThinkContext {
            walk: &walk,
            pathfinder: &self.pathfinder,
            config: &self.config.ai,
            now_ms: now,
            target: Some((observer.x, observer.y)),
        };

        let mut thought = 0;
        for &id in mobs {
            let Some(mut object) = self.store.object(id) else {
                continue;
            };
            let position = object.location.absolute();
            let Some(mob) = object.as_mob_mut() else {
                continue;
            };
            if think(mob, position, &ctx) {
                thought += 1;
                let kind = object.kind;
                self.store.with_object_mut(id, |stored| stored.kind = kind);
            }
        }
        thought
    }

    fn move_phase(&self, mobs: &[ObjectId], observer: &Observer, dt_ms: u32, now: u64) -> usize {
        let mut crossings = 0;
        for &id in mobs {
            let Some(mut object) = self.store.object(id) else {
                continue;
            };
            self.apply_species_effects(&mut object, observer.is_day, now);

            let from = object.location.chunk;
            let position = object.location.absolute();
            let Some(mob) = object.as_mob_mut() else {
                continue;
            };
            let moved = advance(mob, position, dt_ms, &self.config.ai);
            let walked = moved != position;
            if walked {
                let next = Location::from_absolute(moved.0, moved.1);
                if next.chunk == from || self.store.move_object(id, from, next.chunk) {
                    if next.chunk != from {
                        crossings += 1;
                    }
                    object.location = next;
                }
            }

            // Only list changes dirty a chunk; `move_object` already flagged both ends.
            self.store.with_object_mut(id, |stored| *stored = object);
        }
        crossings
    }

    /// Daylight and terrain effects on a mob.
    fn apply_species_effects(&self, object: &mut GameObject, is_day: bool, now: u64) {
        let sim = &self.config.simulation;
        let chunk_biome = self
            .store
            .get(object.location.chunk)
            .map_or_else(|| self.store.biome_at(object.location.chunk), |chunk| chunk.biome());

        let ObjectKind::Mob(mob) = &mut object.kind else {
            return;
        };
        let damage = match mob.species {
            MobSpecies::Zombie => {
                if is_day {
                    mob.speed = sim.zombie_daylight_speed;
                    Some(mob.rng.gen_range(0..=sim.zombie_sunlight_damage.max(0)))
                } else {
                    mob.speed = mob.species.profile().speed;
                    None
                }
            }
            MobSpecies::Spider => {
                mob.peaceful = is_day;
                None
            }
            MobSpecies::Fish => (!chunk_biome.is_water()).then_some(sim.fish_dry_damage),
        };
        if let Some(amount) = damage {
            object.on_hit(amount, now);
        }
    }

    fn upkeep_phase(
        &self,
        coords: &[ChunkCoord],
        center: ChunkCoord,
        observer: &Observer,
        now: u64,
    ) -> (usize, usize) {
        let lifetime = self.config.simulation.item_lifetime_ms;
        let mut spawned = 0;
        let mut removed = 0;

        for &coord in coords {
            let chunk = self.store.get_or_create(coord);

            if !observer.is_day && coord != center {
                let enemy = {
                    let mut rng = chunk.rng();
                    self.store
                        .populator()
                        .spawn_roaming_enemy(&mut *rng, chunk.biome(), coord)
                };
                if let Some(enemy) = enemy {
                    let tile = enemy.location.tile();
                    self.store.add_object(enemy);
                    spawned += 1;
                    tracing::info!(
                        "night spawn in chunk ({}, {}) at ({}, {})",
                        coord.x,
                        coord.y,
                        tile.x,
                        tile.y
                    );
                }
            }

            for id in chunk.object_ids() {
                let Some(object) = self.store.object(id) else {
                    continue;
                };
                let expired = match &object.kind {
                    ObjectKind::Item(item) => item.is_expired(now, lifetime),
                    _ => false,
                };
                if object.is_dead() {
                    self.store.remove_object(id);
                    removed += 1;
                    if let Some(stack) = object.drop_stack() {
                        self.store.add_object(GameObject::item(object.location, stack, now));
                        spawned += 1;
                    }
                } else if expired {
                    self.store.remove_object(id);
                    removed += 1;
                }
            }
        }
        (spawned, removed)
    }
}
