//! Reusable layouts and pre-initialized simulators.
//!
//! - [`reference_layout`] — 20 shelves, capacity 100, 50 items.
//! - [`full_layout`] — every shelf at capacity; every move blocks.
//! - [`empty_layout`] — no items; stepping fails.

use shelf_sim::{ShelfLayout, Simulator};

/// 20 shelves, capacity 100, 50 items.
pub fn reference_layout() -> ShelfLayout {
    ShelfLayout::new(20, 100, 50)
}

/// `shelf_count` shelves, each filled to `capacity`.
pub fn full_layout(shelf_count: u32, capacity: u32) -> ShelfLayout {
    ShelfLayout::new(
        shelf_count,
        capacity,
        u64::from(shelf_count) * u64::from(capacity),
    )
}

/// `shelf_count` empty shelves of capacity 10.
pub fn empty_layout(shelf_count: u32) -> ShelfLayout {
    ShelfLayout::new(shelf_count, 10, 0)
}

/// A simulator initialized with `layout`. Panics on invalid layouts.
pub fn simulator(layout: ShelfLayout, seed: u64) -> Simulator {
    let mut sim = Simulator::new(seed);
    sim.initialize(layout)
        .expect("fixture layout should be valid");
    sim
}

/// A simulator with an explicit starting distribution.
pub fn simulator_from(capacity: u32, quantities: Vec<u32>, seed: u64) -> Simulator {
    let mut sim = Simulator::new(seed);
    sim.initialize_from(capacity, quantities)
        .expect("fixture distribution should be valid");
    sim
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_valid() {
        assert!(reference_layout().validate().is_ok());
        assert!(full_layout(5, 3).validate().is_ok());
        assert_eq!(full_layout(5, 3).total_items, 15);
        assert!(empty_layout(4).validate().is_ok());
        assert!(simulator(reference_layout(), 0).is_initialized());
        assert_eq!(simulator_from(4, vec![1, 2, 3], 0).steps_taken(), 0);
    }
}
