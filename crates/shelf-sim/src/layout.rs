//! Shelf layout: ring size, shared capacity and item count.

use rand::RngExt;
use shelf_core::ConfigError;

/// Static shape of an inventory: how many shelves, how much each holds,
/// and how many items circulate among them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShelfLayout {
    /// Number of shelves on the ring. Must be at least 3.
    pub shelf_count: u32,
    /// Maximum items on any single shelf. Must be at least 1.
    pub capacity: u32,
    /// Items in the system. Must not exceed `shelf_count * capacity`.
    pub total_items: u64,
}

impl Default for ShelfLayout {
    fn default() -> Self {
        Self {
            shelf_count: 20,
            capacity: 50,
            total_items: 300,
        }
    }
}

impl ShelfLayout {
    /// Create a layout. Call [`validate()`](Self::validate) before use.
    pub fn new(shelf_count: u32, capacity: u32, total_items: u64) -> Self {
        Self {
            shelf_count,
            capacity,
            total_items,
        }
    }

    /// `shelf_count * capacity`.
    pub fn system_capacity(&self) -> u64 {
        u64::from(self.shelf_count) * u64::from(self.capacity)
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shelf_count < 3 {
            return Err(ConfigError::RingTooSmall {
                shelf_count: self.shelf_count,
            });
        }
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.total_items > self.system_capacity() {
            return Err(ConfigError::TotalExceedsCapacity {
                total_items: self.total_items,
                system_capacity: self.system_capacity(),
            });
        }
        Ok(())
    }

    /// Scatter `total_items` over the shelves one item at a time, each item
    /// landing on a uniformly chosen shelf that still has room.
    ///
    /// Only non-full shelves are candidates, so placement never fails for a
    /// validated layout.
    pub(crate) fn pack<R: RngExt + ?Sized>(&self, rng: &mut R) -> Vec<u32> {
        let mut quantities = vec![0u32; self.shelf_count as usize];
        let mut open: Vec<usize> = (0..quantities.len()).collect();
        let mut remaining = self.total_items;
        while remaining > 0 && !open.is_empty() {
            let slot = rng.random_range(0..open.len());
            let shelf = open[slot];
            quantities[shelf] += 1;
            if quantities[shelf] == self.capacity {
                open.swap_remove(slot);
            }
            remaining -= 1;
        }
        quantities
    }
}
