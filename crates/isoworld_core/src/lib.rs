//! # isoworld Core
//!
//! Small building blocks shared by the procedural and gameplay crates:
//! - Generational [`Handle`]s and the [`SlotPool`] that issues them
//! - A simulated clock ([`SimClock`]) and [`Cooldown`] gates driven by tick deltas
//! - 2D footprints ([`Rect`]) for overlap tests
//!
//! Nothing in here reads the system clock or touches global state.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod clock;
pub mod geometry;
pub mod handle;
pub mod pool;

pub use clock::{Cooldown, SimClock};
pub use geometry::Rect;
pub use handle::Handle;
pub use pool::SlotPool;
