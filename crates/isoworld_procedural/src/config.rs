//! # Generation Settings
//!
//! Every tunable of terrain and population lives here, with the tuned values
//! as defaults. All structs deserialize from TOML with missing fields falling
//! back to those defaults, so a config file only lists what it overrides.
//!
//! ```toml
//! [climate]
//! water_threshold = 0.25
//!
//! [[population.rules]]
//! biome = "plains"
//! object = "plains_tree"
//! density = 0.08
//! ```

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::error::{invalid, ProceduralResult};
use crate::objects::MobSpecies;
use crate::populate::Populant;

/// Noise frequencies, seed offsets and biome table thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    /// Elevation cycles per chunk.
    pub elevation_frequency: f64,
    /// Moisture cycles per chunk.
    pub moisture_frequency: f64,
    /// Temperature cycles per chunk.
    pub temperature_frequency: f64,
    /// Added to the world seed for the moisture channel.
    pub moisture_seed_offset: u64,
    /// Added to the world seed for the temperature channel.
    pub temperature_seed_offset: u64,
    /// Normalized elevation below which a chunk is water.
    pub water_threshold: f64,
    /// Upper edge of the beach band above `water_threshold`.
    pub beach_ceiling: f64,
    /// Elevation from which land is mountain.
    pub mountain_elevation: f64,
    /// Elevation from which cold mountains become snowy peaks.
    pub peak_elevation: f64,
    /// Temperature below which lowland is taiga.
    pub cold_temperature: f64,
    /// Temperature from which lowland is desert, plains or rainforest.
    pub hot_temperature: f64,
    /// Moisture below which hot land is desert.
    pub dry_moisture: f64,
    /// Moisture from which land is forested.
    pub wet_moisture: f64,
    /// Moisture from which temperate land is swamp.
    pub swamp_moisture: f64,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            elevation_frequency: 0.010,
            moisture_frequency: 0.028,
            temperature_frequency: 0.020,
            moisture_seed_offset: 1123,
            temperature_seed_offset: 56424,
            water_threshold: 0.3,
            beach_ceiling: 0.4,
            mountain_elevation: 0.65,
            peak_elevation: 0.75,
            cold_temperature: 0.35,
            hot_temperature: 0.65,
            dry_moisture: 0.4,
            wet_moisture: 0.55,
            swamp_moisture: 0.72,
        }
    }
}

fn check_unit(field: &'static str, value: f64) -> ProceduralResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is outside [0, 1]")))
    }
}

fn check_order(field: &'static str, low: f64, high: f64) -> ProceduralResult<()> {
    if low <= high {
        Ok(())
    } else {
        Err(invalid(field, format!("{high} must not be below {low}")))
    }
}

impl ClimateConfig {
    /// Checks ranges and threshold ordering.
    ///
    /// # Errors
    ///
    /// Returns [`ProceduralError::InvalidConfig`](crate::ProceduralError) naming
    /// the first offending setting.
    pub fn validate(&self) -> ProceduralResult<()> {
        for (field, frequency) in [
            ("climate.elevation_frequency", self.elevation_frequency),
            ("climate.moisture_frequency", self.moisture_frequency),
            ("climate.temperature_frequency", self.temperature_frequency),
        ] {
            if !(frequency.is_finite() && frequency > 0.0) {
                return Err(invalid(field, format!("{frequency} must be positive")));
            }
        }
        check_unit("climate.water_threshold", self.water_threshold)?;
        check_unit("climate.beach_ceiling", self.beach_ceiling)?;
        check_unit("climate.mountain_elevation", self.mountain_elevation)?;
        check_unit("climate.peak_elevation", self.peak_elevation)?;
        check_unit("climate.cold_temperature", self.cold_temperature)?;
        check_unit("climate.hot_temperature", self.hot_temperature)?;
        check_unit("climate.dry_moisture", self.dry_moisture)?;
        check_unit("climate.wet_moisture", self.wet_moisture)?;
        check_unit("climate.swamp_moisture", self.swamp_moisture)?;

        if self.beach_ceiling <= self.water_threshold {
            return Err(invalid(
                "climate.beach_ceiling",
                "beach band must lie above the water threshold",
            ));
        }
        check_order("climate.mountain_elevation", self.beach_ceiling, self.mountain_elevation)?;
        check_order("climate.peak_elevation", self.mountain_elevation, self.peak_elevation)?;
        check_order("climate.hot_temperature", self.cold_temperature, self.hot_temperature)?;
        check_order("climate.wet_moisture", self.dry_moisture, self.wet_moisture)?;
        check_order("climate.swamp_moisture", self.wet_moisture, self.swamp_moisture)
    }
}

/// One scatter rule: in `biome`, each tile rolls once for `object`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityRule {
    /// Biome the rule applies to.
    pub biome: Biome,
    /// Object placed on success.
    pub object: Populant,
    /// Per-tile success chance in `[0, 1]`.
    pub density: f32,
}

/// Scatter tables used once per chunk at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Chance a plains tree is big rather than small.
    pub big_tree_probability: f32,
    /// Rules, evaluated in order for every tile.
    pub rules: Vec<DensityRule>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        let rule = |biome, object, density| DensityRule {
            biome,
            object,
            density,
        };
        Self {
            big_tree_probability: 0.75,
            rules: vec![
                rule(Biome::Desert, Populant::Cactus, 0.004),
                rule(Biome::Water, Populant::Fish, 0.001),
                rule(Biome::Plains, Populant::PlainsTree, 0.05),
                rule(Biome::Plains, Populant::Grass, 0.09),
                rule(Biome::Plains, Populant::BerryBush, 0.02),
                rule(Biome::Forest, Populant::ForestTree, 0.05),
                rule(Biome::Rainforest, Populant::ForestTree, 0.08),
                rule(Biome::Taiga, Populant::TaigaTree, 0.06),
            ],
        }
    }
}

impl PopulationConfig {
    /// Rules for one biome, in evaluation order.
    pub fn rules_for(&self, biome: Biome) -> impl Iterator<Item = &DensityRule> {
        self.rules.iter().filter(move |rule| rule.biome == biome)
    }

    /// Checks probabilities.
    ///
    /// # Errors
    ///
    /// Returns an error if any density or the big-tree probability leaves `[0, 1]`.
    pub fn validate(&self) -> ProceduralResult<()> {
        check_unit(
            "population.big_tree_probability",
            f64::from(self.big_tree_probability),
        )?;
        for rule in &self.rules {
            check_unit("population.rules.density", f64::from(rule.density))?;
        }
        Ok(())
    }
}

/// Chance per simulated tick that an unobserved chunk spawns `species` at night.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    /// Biome the chunk must have.
    pub biome: Biome,
    /// Species spawned.
    pub species: MobSpecies,
    /// Per-tick chance.
    pub chance: f32,
}

/// Night-time roaming enemy spawns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// At most one rule per biome is consulted: the first matching one.
    pub rules: Vec<SpawnRule>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                SpawnRule {
                    biome: Biome::Plains,
                    species: MobSpecies::Zombie,
                    chance: 4e-5,
                },
                SpawnRule {
                    biome: Biome::Desert,
                    species: MobSpecies::Spider,
                    chance: 2e-5,
                },
            ],
        }
    }
}

impl SpawnConfig {
    /// The rule governing `biome`, if any.
    #[must_use]
    pub fn rule_for(&self, biome: Biome) -> Option<&SpawnRule> {
        self.rules.iter().find(|rule| rule.biome == biome)
    }

    /// Checks probabilities.
    ///
    /// # Errors
    ///
    /// Returns an error if any chance leaves `[0, 1]`.
    pub fn validate(&self) -> ProceduralResult<()> {
        for rule in &self.rules {
            check_unit("spawning.rules.chance", f64::from(rule.chance))?;
        }
        Ok(())
    }
}
