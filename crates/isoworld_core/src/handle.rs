//! # Handles
//!
//! A handle is a lightweight identifier consisting of:
//! - An index into a [`SlotPool`](crate::SlotPool) slot array
//! - A generation counter so a freed-and-reused slot never aliases an old handle

use std::fmt;

/// Stable identity of a pooled value.
///
/// The ID is split into two parts:
/// - Lower 32 bits: slot index
/// - Upper 32 bits: generation of that slot when the value was inserted
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Handle(u64);

impl Handle {
    /// Creates a handle from index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - Slot index (0 to 2^32-1)
    /// * `generation` - Slot generation (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Slot index portion.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Generation portion.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Raw packed value, e.g. for an external save format.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Rebuilds a handle from [`Handle::to_bits`].
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index(), self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_packing() {
        let handle = Handle::new(7, 3);
        assert_eq!(handle.index(), 7);
        assert_eq!(handle.generation(), 3);
        assert_eq!(Handle::from_bits(handle.to_bits()), handle);
    }

    #[test]
    fn test_generation_distinguishes_handles() {
        assert_ne!(Handle::new(1, 0), Handle::new(1, 1));
        assert_eq!(format!("{:?}", Handle::new(4, 2)), "Handle(4v2)");
    }
}
