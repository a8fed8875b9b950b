//! # Simulated Time
//!
//! The simulation never reads a wall clock. A [`SimClock`] is advanced by the
//! fixed tick delta, and every "at most once per N ms" rule is a [`Cooldown`]
//! evaluated against that clock. Replaying the same deltas therefore replays
//! the same decisions.

/// Monotonic simulated time in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimClock {
    now_ms: u64,
}

impl SimClock {
    /// Clock starting at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { now_ms: 0 }
    }

    /// Current simulated time.
    #[inline]
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Advances the clock by one tick delta and returns the new time.
    #[inline]
    pub fn advance(&mut self, dt_ms: u32) -> u64 {
        self.now_ms = self.now_ms.saturating_add(u64::from(dt_ms));
        self.now_ms
    }
}

/// Gate that opens at most once per interval of simulated time.
///
/// A fresh cooldown is open immediately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cooldown {
    last_fired_ms: Option<u64>,
}

impl Cooldown {
    /// A cooldown that has never fired.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_fired_ms: None }
    }

    /// Returns true if `interval_ms` has elapsed since the last firing.
    #[inline]
    #[must_use]
    pub fn is_ready(&self, now_ms: u64, interval_ms: u64) -> bool {
        match self.last_fired_ms {
            Some(last) => now_ms.saturating_sub(last) >= interval_ms,
            None => true,
        }
    }

    /// Records a firing at `now_ms`.
    #[inline]
    pub fn fire(&mut self, now_ms: u64) {
        self.last_fired_ms = Some(now_ms);
    }

    /// Fires if ready.
    ///
    /// # Returns
    ///
    /// `true` if the gate was open (and is now closed for another interval).
    #[inline]
    pub fn try_fire(&mut self, now_ms: u64, interval_ms: u64) -> bool {
        if self.is_ready(now_ms, interval_ms) {
            self.fire(now_ms);
            true
        } else {
            false
        }
    }
}
