//! # Gameplay
//!
//! Movement intelligence: pathfinding over the chunked world, the mob state
//! machine and screen-space facing.

pub mod facing;
pub mod mob;
pub mod pathfinder;

pub use facing::facing_from_delta;
pub use mob::{advance, hostile_state, speed_multiplier, think, ThinkContext};
pub use pathfinder::{
    line_of_sight, smooth, FrameWalkability, Pathfinder, SearchOutcome, Walkability,
};
