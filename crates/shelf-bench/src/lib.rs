//! Benchmark profiles for the shelf ring inventory simulator.
//!
//! Provides pre-built [`RunConfig`] profiles for benchmarking and examples:
//!
//! - [`reference_profile`]: 20 shelves, capacity 50, 300 items
//! - [`stress_profile`]: 10K shelves, capacity 50, 200K items
//! - [`trap_profile`]: reference layout with shelf 0 trapping from step 150

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use shelf_core::ShelfId;
use shelf_engine::RunConfig;
use shelf_sim::{ShelfLayout, TrapPolicy};

/// Build the reference profile: 20 shelves, capacity 50, 300 items.
pub fn reference_profile(seed: u64) -> RunConfig {
    RunConfig::default().seeded(seed)
}

/// Build a stress profile: 10K shelves at 40% fill.
///
/// Same observer settings as [`reference_profile`]; the schedule period
/// grows to 9,999 steps.
pub fn stress_profile(seed: u64) -> RunConfig {
    RunConfig::with_layout(ShelfLayout::new(10_000, 50, 200_000)).seeded(seed)
}

/// Build a leak-then-trap profile: the reference layout, with shelf 0
/// (also the unobservable shelf) releasing no items from step 150 on.
pub fn trap_profile(seed: u64) -> RunConfig {
    RunConfig {
        trap: Some(TrapPolicy {
            shelf: ShelfId(0),
            from_step: 150,
        }),
        ..reference_profile(seed)
    }
}
