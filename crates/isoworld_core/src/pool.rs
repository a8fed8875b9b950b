//! # Slot Pool
//!
//! Growable block of slots for values that are frequently inserted and removed
//! while other code holds references to them by [`Handle`].
//!
//! Removal bumps the slot generation, so handles to removed values resolve to
//! `None` instead of silently pointing at whatever reused the slot.

use crate::handle::Handle;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational pool addressed by [`Handle`].
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Wrap it in a lock when shared.
///
/// # Example
///
/// ```rust
/// use isoworld_core::SlotPool;
///
/// let mut pool = SlotPool::new();
/// let handle = pool.insert("tree");
/// assert_eq!(pool.get(handle), Some(&"tree"));
///
/// pool.remove(handle);
/// assert!(pool.get(handle).is_none());
/// ```
pub struct SlotPool<T> {
    slots: Vec<Slot<T>>,
    /// Free list - indices of vacant slots.
    free_list: Vec<u32>,
    len: usize,
}

impl<T> Default for SlotPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotPool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty pool with room for `capacity` values before growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Inserts a value and returns its handle.
    ///
    /// Vacant slots are reused before the pool grows.
    ///
    /// # Panics
    ///
    /// Panics if the pool would exceed `u32::MAX` slots.
    pub fn insert(&mut self, value: T) -> Handle {
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Handle::new(index, slot.generation);
        }

        let index = u32::try_from(self.slots.len()).unwrap_or_else(|_| {
            panic!("slot pool exhausted at {} slots", self.slots.len())
        });
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Handle::new(index, 0)
    }

    /// Removes the value behind `handle`.
    ///
    /// # Returns
    ///
    /// The value, or `None` if the handle is stale or was never issued here.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let index = handle.index();
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(index);
        self.len -= 1;
        Some(value)
    }

    /// Gets a reference to a live value.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    /// Gets a mutable reference to a live value.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Returns true if `handle` refers to a live value.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no values are live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over live values with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let value = slot.value.as_ref()?;
            // Slot count never exceeds u32::MAX, enforced by `insert`.
            let index = u32::try_from(index).ok()?;
            Some((Handle::new(index, slot.generation), value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_insert_remove() {
        let mut pool = SlotPool::new();

        let a = pool.insert(10);
        let b = pool.insert(20);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(a), Some(&10));
        assert_eq!(pool.get(b), Some(&20));

        assert_eq!(pool.remove(a), Some(10));
        assert_eq!(pool.len(), 1);
        assert!(pool.get(a).is_none());
        assert_eq!(pool.remove(a), None, "double remove must be a no-op");
    }

    #[test]
    fn test_pool_reuse_bumps_generation() {
        let mut pool = SlotPool::new();

        let first = pool.insert("old");
        pool.remove(first);
        let second = pool.insert("new");

        assert_eq!(first.index(), second.index(), "slot should be reused");
        assert_ne!(first.generation(), second.generation());
        assert!(pool.get(first).is_none(), "stale handle resolved: {first:?}");
        assert_eq!(pool.get(second), Some(&"new"));
    }

    #[test]
    fn test_pool_get_mut_and_iter() {
        let mut pool = SlotPool::with_capacity(4);
        let a = pool.insert(1);
        let b = pool.insert(2);
        let c = pool.insert(3);
        pool.remove(b);

        if let Some(value) = pool.get_mut(c) {
            *value = 30;
        }

        let live: Vec<_> = pool.iter().map(|(h, v)| (h, *v)).collect();
        assert_eq!(live, vec![(a, 1), (c, 30)]);
        assert!(!pool.contains(b));
        assert!(!pool.is_empty());
    }
}
