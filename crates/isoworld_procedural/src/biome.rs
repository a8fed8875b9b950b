//! # Biome Classification
//!
//! Determines a chunk's biome from three climate channels sampled at chunk
//! scale:
//! - Elevation (also decides water and beaches)
//! - Moisture
//! - Temperature
//!
//! Classification reads only the noise fields, never the chunk store, so
//! looking up a neighbor's biome can not trigger generation of that neighbor.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ClimateConfig;
use crate::coords::ChunkCoord;
use crate::noise::{NoiseField, WorldSeed};

/// Biome types in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Biome {
    /// Open water, elevation below the water threshold.
    Water = 0,
    /// Thin land band next to water.
    Beach = 1,
    /// Hot and dry.
    Desert = 2,
    /// Default grassland.
    Plains = 3,
    /// Temperate and wet.
    Forest = 4,
    /// Hot and wet.
    Rainforest = 5,
    /// Cold lowland forest.
    Taiga = 6,
    /// Temperate and waterlogged.
    Swamp = 7,
    /// High elevation rock.
    Mountain = 8,
    /// Highest and coldest elevation.
    SnowyPeak = 9,
}

impl Biome {
    /// Every biome, in discriminant order.
    pub const ALL: [Biome; 10] = [
        Self::Water,
        Self::Beach,
        Self::Desert,
        Self::Plains,
        Self::Forest,
        Self::Rainforest,
        Self::Taiga,
        Self::Swamp,
        Self::Mountain,
        Self::SnowyPeak,
    ];

    /// Tile-type indices this biome draws from.
    ///
    /// The values index the terrain tile sheet; the engine only relies on
    /// each biome mapping into its own fixed set.
    #[must_use]
    pub const fn tile_palette(self) -> &'static [u8] {
        match self {
            Self::Desert | Self::Beach => &[4, 5],
            Self::Plains => &[0, 1, 2, 3, 10, 11, 12, 13],
            Self::Water => &[23, 24],
            Self::Mountain => &[50, 51, 52, 53, 54],
            Self::Swamp => &[6, 7],
            Self::Forest | Self::Rainforest => &[27],
            Self::SnowyPeak => &[15, 16],
            Self::Taiga => &[20, 21],
        }
    }

    /// Draws one tile-type index from this biome's palette.
    ///
    /// # Panics
    ///
    /// Panics if the palette is empty, which is a static table bug.
    #[inline]
    pub fn draw_tile<R: Rng + ?Sized>(self, rng: &mut R) -> u8 {
        let palette = self.tile_palette();
        assert!(!palette.is_empty(), "biome {self:?} has an empty tile palette");
        palette[rng.gen_range(0..palette.len())]
    }

    /// Returns true if the biome is underwater.
    #[inline]
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::Water)
    }
}

/// Normalized climate sample for one chunk, every channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    /// Normalized elevation.
    pub elevation: f64,
    /// Normalized moisture.
    pub moisture: f64,
    /// Normalized temperature.
    pub temperature: f64,
}

/// Probe ring around a chunk used to detect nearby water: cardinal at
/// distance 2, diagonal at distance 1, and the four adjacent chunks.
pub const WATER_PROBE_OFFSETS: [(i32, i32); 12] = [
    (-2, 0),
    (2, 0),
    (0, -2),
    (0, 2),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

/// Biome classifier backed by three independently seeded noise fields.
pub struct BiomeClassifier {
    elevation: NoiseField,
    moisture: NoiseField,
    temperature: NoiseField,
    config: ClimateConfig,
}

impl BiomeClassifier {
    /// Creates a classifier.
    ///
    /// Channels are seeded with `seed`, `seed + moisture_seed_offset` and
    /// `seed + temperature_seed_offset`.
    #[must_use]
    pub fn new(seed: WorldSeed, config: ClimateConfig) -> Self {
        Self {
            elevation: NoiseField::new(seed),
            moisture: NoiseField::new(seed.offset(config.moisture_seed_offset)),
            temperature: NoiseField::new(seed.offset(config.temperature_seed_offset)),
            config,
        }
    }

    /// Climate settings in use.
    #[must_use]
    pub fn config(&self) -> &ClimateConfig {
        &self.config
    }

    /// Normalized elevation of a chunk.
    #[inline]
    #[must_use]
    pub fn elevation(&self, coord: ChunkCoord) -> f64 {
        let f = self.config.elevation_frequency;
        self.elevation
            .sample_normalized(f64::from(coord.x) * f, f64::from(coord.y) * f)
    }

    /// Samples all three channels for a chunk.
    #[must_use]
    pub fn climate(&self, coord: ChunkCoord) -> Climate {
        let (x, y) = (f64::from(coord.x), f64::from(coord.y));
        let moisture_f = self.config.moisture_frequency;
        let temperature_f = self.config.temperature_frequency;
        Climate {
            elevation: self.elevation(coord),
            moisture: self.moisture.sample_normalized(x * moisture_f, y * moisture_f),
            temperature: self
                .temperature
                .sample_normalized(x * temperature_f, y * temperature_f),
        }
    }

    /// Returns true if any chunk on the probe ring is underwater.
    #[must_use]
    pub fn near_water(&self, coord: ChunkCoord) -> bool {
        WATER_PROBE_OFFSETS.iter().any(|&(dx, dy)| {
            self.elevation(ChunkCoord::new(coord.x.wrapping_add(dx), coord.y.wrapping_add(dy)))
                < self.config.water_threshold
        })
    }

    /// Classifies a chunk. Pure: same seed and coordinate, same biome.
    #[must_use]
    pub fn classify(&self, coord: ChunkCoord) -> Biome {
        let climate = self.climate(coord);
        if climate.elevation < self.config.water_threshold {
            return Biome::Water;
        }
        // Only chunks inside the beach band pay for the probe ring.
        let near_water =
            climate.elevation < self.config.beach_ceiling && self.near_water(coord);
        resolve_biome(&self.config, climate, near_water)
    }
}

/// Maps a climate sample to a biome.
///
/// Thresholds come from `config`. Elevation is checked first (water, beach,
/// peaks, mountains), then the lowland table over temperature and moisture.
/// Every point of the unit cube lands in exactly one biome.
#[must_use]
pub fn resolve_biome(config: &ClimateConfig, climate: Climate, near_water: bool) -> Biome {
    let Climate {
        elevation: e,
        moisture: m,
        temperature: t,
    } = climate;

    if e < config.water_threshold {
        return Biome::Water;
    }
    if near_water && e < config.beach_ceiling {
        return Biome::Beach;
    }
    if e >= config.peak_elevation {
        return if t < config.cold_temperature {
            Biome::SnowyPeak
        } else {
            Biome::Mountain
        };
    }
    if e >= config.mountain_elevation {
        return Biome::Mountain;
    }
    if t < config.cold_temperature {
        return Biome::Taiga;
    }
    if t >= config.hot_temperature {
        return if m < config.dry_moisture {
            Biome::Desert
        } else if m >= config.wet_moisture {
            Biome::Rainforest
        } else {
            Biome::Plains
        };
    }
    if m >= config.swamp_moisture {
        Biome::Swamp
    } else if m >= config.wet_moisture {
        Biome::Forest
    } else {
        Biome::Plains
    }
}
