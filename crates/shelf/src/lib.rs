//! Shelf: a ring-shelf inventory simulator with a partial-information
//! observer.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all shelf sub-crates. For most users, adding `shelf` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use shelf::prelude::*;
//!
//! // 20 shelves of capacity 100 holding 50 items; shelf 0 is never read.
//! let config = RunConfig::with_layout(ShelfLayout::new(20, 100, 50)).seeded(42);
//! let mut run = LockstepRun::new(config).unwrap();
//!
//! let step = run.step_sync().unwrap();
//! assert_eq!(step.observation.shelf, ShelfId(1));
//!
//! let results = run.run(1_000, 100).unwrap();
//! assert_eq!(results.final_truth.total(), 50);
//! let report = results.last_report().unwrap();
//! assert_eq!(report.step, StepId(1_000));
//! assert_eq!(run.current_step(), StepId(1_001));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `shelf-core` | IDs, error types, the `QuantitySource` trait |
//! | [`space`] | `shelf-space` | Ring topology |
//! | [`sim`] | `shelf-sim` | Ground-truth simulator |
//! | [`obs`] | `shelf-obs` | Round-robin observer and Kalman estimator |
//! | [`engine`] | `shelf-engine` | Lockstep driver, metrics, batches, digests |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`shelf-core`).
///
/// Contains [`types::ShelfId`], [`types::StepId`], the error taxonomy and
/// the [`types::QuantitySource`] query trait.
pub use shelf_core as types;

/// Ring topology (`shelf-space`).
pub use shelf_space as space;

/// Ground-truth simulator (`shelf-sim`).
///
/// [`sim::Simulator`] owns the exact per-shelf quantities and moves one
/// item per step.
pub use shelf_sim as sim;

/// Partial-information observer (`shelf-obs`).
///
/// [`obs::Observer`] reads one shelf per step on a fixed round-robin
/// schedule and infers the unobservable shelf.
pub use shelf_obs as obs;

/// Lockstep driver, metrics, batched runs and digests (`shelf-engine`).
pub use shelf_engine as engine;

/// Common imports for typical shelf usage.
///
/// ```rust
/// use shelf::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use shelf_core::{QuantitySource, ShelfId, StepId};

    // Errors
    pub use shelf_core::{ConfigError, MetricsError, QueryError, StepError};

    // Topology
    pub use shelf_space::{Direction, Ring};

    // Simulator
    pub use shelf_sim::{GroundTruthSnapshot, MoveOutcome, ShelfLayout, Simulator, TrapPolicy};

    // Observer
    pub use shelf_obs::{EstimateRecord, EstimateSnapshot, Observer, Uncertainty};

    // Engine
    pub use shelf_engine::metrics::{mean_absolute_error, unobservable_shelf_error};
    pub use shelf_engine::{AnalyticsReport, LockstepRun, RunConfig, RunError, RunResults};
}
