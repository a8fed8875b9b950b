//! # Object Population
//!
//! Scatters scenery and wildlife over a freshly generated chunk, and rolls
//! the rare night-time enemy spawns.
//!
//! ## Placement
//!
//! Every tile except the last row and column rolls once per density rule of
//! the chunk's biome. A successful roll instantiates the object, which is kept
//! only if its footprint overlaps nothing accepted before it (first fit, no
//! backtracking). The last row and column are skipped so two-tile footprints
//! stay inside the chunk.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::config::{DensityRule, PopulationConfig, SpawnConfig};
use crate::coords::{ChunkCoord, Location, CHUNK_SIZE};
use crate::objects::{GameObject, MobSpecies, TreeSize};

/// Object types a density rule can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Populant {
    /// Desert cactus.
    Cactus,
    /// Fish mob.
    Fish,
    /// Tree that is big with the configured probability, else small.
    PlainsTree,
    /// Grass tuft.
    Grass,
    /// Berry bush.
    BerryBush,
    /// Always-big broadleaf tree.
    ForestTree,
    /// Taiga conifer.
    TaigaTree,
}

/// Applies density and spawn tables.
pub struct ObjectPopulator {
    population: PopulationConfig,
    spawning: SpawnConfig,
}

impl ObjectPopulator {
    /// Creates a populator over the given tables.
    #[must_use]
    pub fn new(population: PopulationConfig, spawning: SpawnConfig) -> Self {
        Self {
            population,
            spawning,
        }
    }

    fn instantiate<R: Rng + ?Sized>(
        &self,
        object: Populant,
        location: Location,
        rng: &mut R,
    ) -> GameObject {
        match object {
            Populant::Cactus => GameObject::cactus(location, rng),
            Populant::Fish => GameObject::mob(location, MobSpecies::Fish, rng),
            Populant::PlainsTree => {
                let size = if rng.gen::<f32>() < self.population.big_tree_probability {
                    TreeSize::Big
                } else {
                    TreeSize::Small
                };
                GameObject::tree(location, size, rng)
            }
            Populant::Grass => GameObject::grass(location, rng),
            Populant::BerryBush => GameObject::berry_bush(location, rng),
            Populant::ForestTree => GameObject::tree(location, TreeSize::Big, rng),
            Populant::TaigaTree => GameObject::tree(location, TreeSize::Special, rng),
        }
    }

    /// Scatters objects across one chunk.
    ///
    /// # Arguments
    ///
    /// * `biome` - Biome of the chunk; selects the density rules
    /// * `rng` - The chunk's random stream
    /// * `coord` - Chunk the objects belong to
    /// * `chunk_size` - Edge length in tiles
    ///
    /// # Returns
    ///
    /// Accepted objects in placement order. No two footprints intersect.
    pub fn populate<R: Rng + ?Sized>(
        &self,
        biome: Biome,
        rng: &mut R,
        coord: ChunkCoord,
        chunk_size: usize,
    ) -> Vec<GameObject> {
        let rules: Vec<&DensityRule> = self.population.rules_for(biome).collect();
        let mut accepted: Vec<GameObject> = Vec::new();
        if rules.is_empty() {
            return accepted;
        }

        let last = u8::try_from(chunk_size.saturating_sub(1)).unwrap_or(u8::MAX);
        for y in 0..last {
            for x in 0..last {
                for rule in &rules {
                    if rng.gen::<f32>() >= rule.density {
                        continue;
                    }
                    let candidate =
                        self.instantiate(rule.object, Location::at_tile(coord, x, y), rng);
                    let footprint = candidate.footprint();
                    if accepted
                        .iter()
                        .all(|placed| !placed.footprint().intersects(&footprint))
                    {
                        accepted.push(candidate);
                    }
                }
            }
        }
        accepted
    }

    /// Rolls a roaming enemy for one chunk and one tick.
    ///
    /// Only biomes with a spawn rule can produce a mob, and the roll is drawn
    /// only for those biomes.
    ///
    /// # Returns
    ///
    /// A hostile mob at a uniformly random local tile, or `None`.
    pub fn spawn_roaming_enemy<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        biome: Biome,
        coord: ChunkCoord,
    ) -> Option<GameObject> {
        let rule = self.spawning.rule_for(biome)?;
        if rng.gen::<f32>() >= rule.chance {
            return None;
        }
        let size = u8::try_from(CHUNK_SIZE).unwrap_or(u8::MAX);
        let location = Location::at_tile(coord, rng.gen_range(0..size), rng.gen_range(0..size));
        Some(GameObject::mob(location, rule.species, rng))
    }
}
