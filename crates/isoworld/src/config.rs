//! # World Configuration
//!
//! One TOML document configures a whole world. Every table is optional and
//! every missing key keeps its tuned default:
//!
//! ```toml
//! seed = 1337
//!
//! [ai]
//! think_interval_ms = 400
//!
//! [simulation]
//! simulation_radius = 3
//! ```

use std::path::Path as FsPath;

use isoworld_procedural::{ClimateConfig, PopulationConfig, SpawnConfig, StoreSettings};
use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};

/// Largest accepted simulation radius, in chunks.
pub const MAX_SIMULATION_RADIUS: u32 = 32;

/// Mob decision and movement tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Simulated ms between think-ticks of one mob.
    pub think_interval_ms: u64,
    /// Minimum simulated ms between chase/attack repaths.
    pub replan_interval_ms: u64,
    /// Random goals tried before a wandering mob gives up for this think-tick.
    pub wander_attempts: u32,
    /// Distance at which a waypoint counts as reached, in tiles.
    pub waypoint_epsilon: f32,
    /// Speed factor while chasing.
    pub chase_speed_multiplier: f32,
    /// Speed factor while attacking.
    pub attack_speed_multiplier: f32,
    /// Distance at or below which a hostile mob attacks, in tiles.
    pub attack_range: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            think_interval_ms: 500,
            replan_interval_ms: 600,
            wander_attempts: 20,
            waypoint_epsilon: 0.15,
            chase_speed_multiplier: 1.5,
            attack_speed_multiplier: 1.2,
            attack_range: 2.0,
        }
    }
}

/// Search bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Nodes finalized before a search gives up.
    pub max_explored_nodes: usize,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            max_explored_nodes: 4096,
        }
    }
}

/// Per-tick world upkeep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated ms a dropped item stays on the ground.
    pub item_lifetime_ms: u64,
    /// Chunks simulated around the observer, as a Chebyshev radius.
    pub simulation_radius: u32,
    /// Zombie speed in daylight, tiles per second.
    pub zombie_daylight_speed: f32,
    /// Largest sunlight damage a zombie takes per accepted hit.
    pub zombie_sunlight_damage: i32,
    /// Damage a fish takes per accepted hit outside water.
    pub fish_dry_damage: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            item_lifetime_ms: 300_000,
            simulation_radius: 2,
            zombie_daylight_speed: 4.0,
            zombie_sunlight_damage: 2,
            fish_dry_damage: 1,
        }
    }
}

/// Complete world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixes every noise field and per-chunk random stream.
    pub seed: u64,
    /// Climate channels and biome table.
    pub climate: ClimateConfig,
    /// Scatter tables.
    pub population: PopulationConfig,
    /// Night spawn tables.
    pub spawning: SpawnConfig,
    /// Mob tuning.
    pub ai: AiConfig,
    /// Search bounds.
    pub pathfinding: PathfinderConfig,
    /// World upkeep.
    pub simulation: SimulationConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0x1503_2A7E,
            climate: ClimateConfig::default(),
            population: PopulationConfig::default(),
            spawning: SpawnConfig::default(),
            ai: AiConfig::default(),
            pathfinding: PathfinderConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> WorldError {
    WorldError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

impl WorldConfig {
    /// Default configuration with another seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`WorldError::ConfigParse`] for malformed TOML, or a validation error.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| WorldError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`WorldError::ConfigIo`] if the file can not be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn load(path: impl AsRef<FsPath>) -> WorldResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| WorldError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every table.
    ///
    /// # Errors
    ///
    /// The first rejected setting.
    pub fn validate(&self) -> WorldResult<()> {
        self.climate.validate()?;
        self.population.validate()?;
        self.spawning.validate()?;

        if self.ai.think_interval_ms == 0 {
            return Err(invalid("ai.think_interval_ms", "must be positive"));
        }
        if !(self.ai.waypoint_epsilon > 0.0 && self.ai.waypoint_epsilon < 1.0) {
            let epsilon = self.ai.waypoint_epsilon;
            return Err(invalid("ai.waypoint_epsilon", format!("{epsilon} is outside (0, 1)")));
        }
        for (field, factor) in [
            ("ai.chase_speed_multiplier", self.ai.chase_speed_multiplier),
            ("ai.attack_speed_multiplier", self.ai.attack_speed_multiplier),
        ] {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(invalid(field, format!("{factor} must be positive")));
            }
        }
        if !(self.ai.attack_range >= 0.0) {
            return Err(invalid("ai.attack_range", "must not be negative"));
        }
        if self.pathfinding.max_explored_nodes == 0 {
            return Err(invalid("pathfinding.max_explored_nodes", "must be positive"));
        }
        let radius = self.simulation.simulation_radius;
        if !(1..=MAX_SIMULATION_RADIUS).contains(&radius) {
            return Err(invalid(
                "simulation.simulation_radius",
                format!("{radius} is outside 1..={MAX_SIMULATION_RADIUS}"),
            ));
        }
        Ok(())
    }

    /// Generation settings for the chunk store.
    #[must_use]
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            seed: self.seed,
            climate: self.climate.clone(),
            population: self.population.clone(),
            spawning: self.spawning.clone(),
        }
    }
}
