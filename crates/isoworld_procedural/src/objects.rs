//! # World Objects
//!
//! Every thing placed in a chunk is a [`GameObject`]: a common record
//! (location, solidity, health, damage cooldown) plus an [`ObjectKind`]
//! carrying the variant data.
//!
//! Kinds:
//! - [`Scenery`]: trees, grass, berry bushes, cacti; fixed to a tile
//! - [`ItemDrop`]: a stack lying on the ground, despawns after a lifetime
//! - [`Mob`]: a moving creature with an AI state and a path
//!
//! Behavior that differs per kind (`on_hit`, `render_hint`, drops) is
//! dispatched by matching on the kind. The AI itself lives in the gameplay
//! crate; this module only holds the data it works on.

use isoworld_core::{Cooldown, Rect};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::coords::{Location, Path};

/// Health value of objects that can not be damaged.
pub const NO_HEALTH: i32 = -1;

// =============================================================================
// DAMAGE COOLDOWNS (ms of simulated time between accepted hits)
// =============================================================================

/// Trees shrug off hits for two seconds.
pub const TREE_HIT_COOLDOWN_MS: u64 = 2000;
/// Berry bushes.
pub const BUSH_HIT_COOLDOWN_MS: u64 = 500;
/// Cacti.
pub const CACTUS_HIT_COOLDOWN_MS: u64 = 1000;
/// Every mob species.
pub const MOB_HIT_COOLDOWN_MS: u64 = 1000;

/// What an object looks like, for the rendering collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderHint {
    /// Sprite sheet name; also the batching sort key.
    pub sheet: &'static str,
    /// Sprite index inside the sheet.
    pub sprite: u16,
}

/// Stackable item types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Dropped by trees.
    Wood,
    /// Dropped by berry bushes.
    Berries,
    /// Dropped by spiders.
    String,
    /// Dropped by fish.
    Fish,
    /// Dropped by cacti.
    Cactus,
}

impl ItemKind {
    const fn sprite(self) -> u16 {
        match self {
            Self::Wood => 0,
            Self::Berries => 1,
            Self::String => 2,
            Self::Fish => 3,
            Self::Cactus => 4,
        }
    }
}

/// A quantity of one item kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemStack {
    /// Item type.
    pub item: ItemKind,
    /// Stack size, at least one.
    pub quantity: u32,
}

/// Tree size class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeSize {
    /// One-tile sapling.
    Small,
    /// Two-by-two broadleaf.
    Big,
    /// Two-by-two conifer found in taiga.
    Special,
}

/// Scenery variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneryKind {
    /// Tree of the given size.
    Tree(TreeSize),
    /// Decorative grass tuft, walk-through.
    Grass,
    /// Walk-through bush that yields berries.
    BerryBush,
    /// Solid desert plant.
    Cactus,
}

/// Fixed decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scenery {
    /// Variant.
    pub kind: SceneryKind,
    /// Sprite variant picked at creation.
    pub variant: u8,
    /// What is left behind when health reaches zero.
    pub drop: Option<ItemStack>,
}

/// Item lying on the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemDrop {
    /// The stack.
    pub stack: ItemStack,
    /// Simulated time the item appeared.
    pub spawned_at_ms: u64,
}

impl ItemDrop {
    /// Returns true once the item has lived for `lifetime_ms`.
    #[inline]
    #[must_use]
    pub fn is_expired(&self, now_ms: u64, lifetime_ms: u64) -> bool {
        now_ms.saturating_sub(self.spawned_at_ms) >= lifetime_ms
    }
}

/// Mob species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobSpecies {
    /// Hostile at all times; burns in daylight.
    Zombie,
    /// Hostile at night, peaceful by day.
    Spider,
    /// Peaceful swimmer; suffocates outside water.
    Fish,
}

/// Static per-species stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MobProfile {
    /// Sprite sheet.
    pub sheet: &'static str,
    /// Chance in `[0, 1]` that a think-tick re-evaluates the state.
    pub intelligence: f32,
    /// Tiles per second in the idle state.
    pub speed: f32,
    /// Target detection radius, in tiles.
    pub vision: f32,
    /// Starting and maximum health.
    pub max_health: i32,
    /// Whether the species starts out peaceful.
    pub peaceful: bool,
}

impl MobSpecies {
    /// Stats for the species.
    #[must_use]
    pub const fn profile(self) -> MobProfile {
        match self {
            Self::Zombie => MobProfile {
                sheet: "zombies",
                intelligence: 0.75,
                speed: 3.0,
                vision: 20.0,
                max_health: 20,
                peaceful: false,
            },
            Self::Spider => MobProfile {
                sheet: "spiders",
                intelligence: 0.8,
                speed: 3.5,
                vision: 20.0,
                max_health: 20,
                peaceful: false,
            },
            Self::Fish => MobProfile {
                sheet: "fishes",
                intelligence: 1.0,
                speed: 1.0,
                vision: 20.0,
                max_health: 10,
                peaceful: true,
            },
        }
    }
}

/// AI state of a mob.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MobState {
    /// Wandering or standing.
    #[default]
    Idle,
    /// Closing in on the target.
    Chase,
    /// Within striking range of the target.
    Attack,
}

/// Cardinal facing in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    /// Toward the top of the screen.
    Up,
    /// Toward the bottom of the screen.
    #[default]
    Down,
    /// Toward the left of the screen.
    Left,
    /// Toward the right of the screen.
    Right,
}

impl Facing {
    const fn row(self) -> u16 {
        match self {
            Self::Down => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Up => 3,
        }
    }
}

/// Moving creature.
#[derive(Clone, Debug)]
pub struct Mob {
    /// Species.
    pub species: MobSpecies,
    /// Current AI state.
    pub state: MobState,
    /// Last movement facing.
    pub facing: Facing,
    /// Remaining walk.
    pub path: Path,
    /// Peaceful mobs never chase.
    pub peaceful: bool,
    /// Perception gate in `[0, 1]`.
    pub intelligence: f32,
    /// Detection radius in tiles.
    pub vision: f32,
    /// Idle speed in tiles per second.
    pub speed: f32,
    /// Think cadence gate.
    pub think: Cooldown,
    /// Repath throttle while chasing or attacking.
    pub replan: Cooldown,
    /// Private random stream; seeded from the spawning chunk's stream.
    pub rng: ChaCha8Rng,
    /// Stack left behind on death.
    pub drop: Option<ItemStack>,
}

impl Mob {
    /// Creates a mob with its species profile and a seeded random stream.
    #[must_use]
    pub fn new(species: MobSpecies, rng_seed: u64) -> Self {
        let profile = species.profile();
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        let drop = match species {
            MobSpecies::Spider => Some(ItemStack {
                item: ItemKind::String,
                quantity: rng.gen_range(1..=3),
            }),
            MobSpecies::Fish => Some(ItemStack {
                item: ItemKind::Fish,
                quantity: 1,
            }),
            MobSpecies::Zombie => None,
        };
        Self {
            species,
            state: MobState::Idle,
            facing: Facing::Down,
            path: Path::empty(),
            peaceful: profile.peaceful,
            intelligence: profile.intelligence,
            vision: profile.vision,
            speed: profile.speed,
            think: Cooldown::new(),
            replan: Cooldown::new(),
            rng,
            drop,
        }
    }
}

/// Variant data of a [`GameObject`].
#[derive(Clone, Debug)]
pub enum ObjectKind {
    /// Fixed decoration.
    Scenery(Scenery),
    /// Ground item.
    Item(ItemDrop),
    /// Creature.
    Mob(Mob),
}

/// An object living in a chunk.
#[derive(Clone, Debug)]
pub struct GameObject {
    /// Owning chunk and local position.
    pub location: Location,
    /// Solid objects block walking.
    pub solid: bool,
    /// Current health, or [`NO_HEALTH`].
    pub health: i32,
    /// Health cap, or [`NO_HEALTH`].
    pub max_health: i32,
    /// Gate between accepted hits.
    pub hit_cooldown: Cooldown,
    /// Variant data.
    pub kind: ObjectKind,
}

impl GameObject {
    fn new(location: Location, solid: bool, health: i32, kind: ObjectKind) -> Self {
        Self {
            location,
            solid,
            health,
            max_health: health,
            hit_cooldown: Cooldown::new(),
            kind,
        }
    }

    /// A tree. Wood yield and health scale with size.
    pub fn tree<R: Rng + ?Sized>(location: Location, size: TreeSize, rng: &mut R) -> Self {
        let (health, wood, variants) = match size {
            TreeSize::Small => (20, rng.gen_range(2..=4), 4),
            TreeSize::Big => (40, rng.gen_range(6..=10), 4),
            TreeSize::Special => (50, rng.gen_range(8..=12), 2),
        };
        let scenery = Scenery {
            kind: SceneryKind::Tree(size),
            variant: rng.gen_range(0..variants),
            drop: Some(ItemStack {
                item: ItemKind::Wood,
                quantity: wood,
            }),
        };
        Self::new(location, true, health, ObjectKind::Scenery(scenery))
    }

    /// A grass tuft.
    pub fn grass<R: Rng + ?Sized>(location: Location, rng: &mut R) -> Self {
        let scenery = Scenery {
            kind: SceneryKind::Grass,
            variant: rng.gen_range(0..3),
            drop: None,
        };
        Self::new(location, false, NO_HEALTH, ObjectKind::Scenery(scenery))
    }

    /// A berry bush.
    pub fn berry_bush<R: Rng + ?Sized>(location: Location, rng: &mut R) -> Self {
        let scenery = Scenery {
            kind: SceneryKind::BerryBush,
            variant: 0,
            drop: Some(ItemStack {
                item: ItemKind::Berries,
                quantity: rng.gen_range(1..=3),
            }),
        };
        Self::new(location, false, 20, ObjectKind::Scenery(scenery))
    }

    /// A cactus.
    pub fn cactus<R: Rng + ?Sized>(location: Location, rng: &mut R) -> Self {
        let scenery = Scenery {
            kind: SceneryKind::Cactus,
            variant: rng.gen_range(0..2),
            drop: Some(ItemStack {
                item: ItemKind::Cactus,
                quantity: rng.gen_range(1..=2),
            }),
        };
        Self::new(location, true, 10, ObjectKind::Scenery(scenery))
    }

    /// An item stack on the ground.
    #[must_use]
    pub fn item(location: Location, stack: ItemStack, spawned_at_ms: u64) -> Self {
        Self::new(
            location,
            false,
            NO_HEALTH,
            ObjectKind::Item(ItemDrop {
                stack,
                spawned_at_ms,
            }),
        )
    }

    /// A mob of `species`, seeded from `rng`.
    pub fn mob<R: Rng + ?Sized>(location: Location, species: MobSpecies, rng: &mut R) -> Self {
        let mob = Mob::new(species, rng.gen());
        Self::new(
            location,
            true,
            species.profile().max_health,
            ObjectKind::Mob(mob),
        )
    }

    /// Returns true if the object takes damage at all.
    #[inline]
    #[must_use]
    pub fn has_health(&self) -> bool {
        self.health != NO_HEALTH
    }

    /// Returns true if health ran out.
    #[inline]
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Subtracts health, clamped at zero. No-op without health.
    pub fn damage(&mut self, amount: i32) {
        if self.has_health() {
            self.health = (self.health - amount.max(0)).max(0);
        }
    }

    /// Adds health, clamped at the maximum. No-op without health.
    pub fn heal(&mut self, amount: i32) {
        if self.has_health() {
            self.health = (self.health + amount.max(0)).min(self.max_health);
        }
    }

    /// Minimum simulated time between accepted hits.
    #[must_use]
    pub fn hit_cooldown_ms(&self) -> u64 {
        match &self.kind {
            ObjectKind::Scenery(s) => match s.kind {
                SceneryKind::Tree(_) => TREE_HIT_COOLDOWN_MS,
                SceneryKind::BerryBush => BUSH_HIT_COOLDOWN_MS,
                SceneryKind::Cactus => CACTUS_HIT_COOLDOWN_MS,
                SceneryKind::Grass => 0,
            },
            ObjectKind::Mob(_) => MOB_HIT_COOLDOWN_MS,
            ObjectKind::Item(_) => 0,
        }
    }

    /// Applies a hit if the object has health and its cooldown allows it.
    ///
    /// # Returns
    ///
    /// `true` if the damage landed.
    pub fn on_hit(&mut self, amount: i32, now_ms: u64) -> bool {
        if !self.has_health() || self.is_dead() {
            return false;
        }
        let cooldown = self.hit_cooldown_ms();
        if !self.hit_cooldown.try_fire(now_ms, cooldown) {
            return false;
        }
        self.damage(amount);
        true
    }

    /// Stack left behind when the object dies.
    #[must_use]
    pub fn drop_stack(&self) -> Option<ItemStack> {
        match &self.kind {
            ObjectKind::Scenery(s) => s.drop,
            ObjectKind::Mob(m) => m.drop,
            ObjectKind::Item(_) => None,
        }
    }

    /// Occupied area in chunk-local tile units.
    #[must_use]
    pub fn footprint(&self) -> Rect {
        let extent = match &self.kind {
            ObjectKind::Scenery(Scenery {
                kind: SceneryKind::Tree(TreeSize::Big | TreeSize::Special),
                ..
            }) => 2.0,
            _ => 1.0,
        };
        Rect::new(self.location.local_x, self.location.local_y, extent, extent)
    }

    /// Sheet and sprite for the renderer.
    #[must_use]
    pub fn render_hint(&self) -> RenderHint {
        match &self.kind {
            ObjectKind::Scenery(s) => {
                let variant = u16::from(s.variant);
                match s.kind {
                    SceneryKind::Tree(TreeSize::Small) => RenderHint {
                        sheet: "smalltrees",
                        sprite: variant,
                    },
                    SceneryKind::Tree(TreeSize::Big) => RenderHint {
                        sheet: "bigtrees",
                        sprite: variant,
                    },
                    SceneryKind::Tree(TreeSize::Special) => RenderHint {
                        sheet: "specialtrees",
                        sprite: variant,
                    },
                    SceneryKind::Grass => RenderHint {
                        sheet: "main",
                        sprite: 10 + variant,
                    },
                    SceneryKind::BerryBush => RenderHint {
                        sheet: "main",
                        sprite: 20,
                    },
                    SceneryKind::Cactus => RenderHint {
                        sheet: "main",
                        sprite: 30 + variant,
                    },
                }
            }
            ObjectKind::Item(i) => RenderHint {
                sheet: "items",
                sprite: i.stack.item.sprite(),
            },
            ObjectKind::Mob(m) => RenderHint {
                sheet: m.species.profile().sheet,
                sprite: m.facing.row(),
            },
        }
    }

    /// Mob data, if this is a mob.
    #[must_use]
    pub fn as_mob(&self) -> Option<&Mob> {
        match &self.kind {
            ObjectKind::Mob(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable mob data, if this is a mob.
    pub fn as_mob_mut(&mut self) -> Option<&mut Mob> {
        match &mut self.kind {
            ObjectKind::Mob(m) => Some(m),
            _ => None,
        }
    }
}
