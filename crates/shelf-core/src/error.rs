//! Error types for the shelf ring inventory simulator.
//!
//! Organized by subsystem: configuration (fatal, surfaced at
//! initialization), queries (caller errors on single-shelf lookups),
//! stepping (simulator and observer advancement) and metrics (snapshot
//! comparison). Blocked moves and out-of-range inferred estimates are
//! ordinary model dynamics and have no error variant.

use std::error::Error;
use std::fmt;

use crate::id::ShelfId;

// ── ConfigError ────────────────────────────────────────────────────

/// Invalid initialization parameters.
///
/// Always fatal: returned by `initialize()`/`validate()` before any state
/// is built and never recovered internally.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A ring needs at least three shelves so that every shelf has two
    /// distinct neighbours.
    RingTooSmall {
        /// The configured shelf count.
        shelf_count: u32,
    },
    /// Per-shelf capacity must be at least 1.
    ZeroCapacity,
    /// More items than the shelves can hold.
    TotalExceedsCapacity {
        /// The configured item count.
        total_items: u64,
        /// `shelf_count * capacity`.
        system_capacity: u64,
    },
    /// An explicit initial distribution puts more items on a shelf than
    /// its capacity allows.
    ShelfOverCapacity {
        /// The overfilled shelf.
        shelf: ShelfId,
        /// Items assigned to it.
        quantity: u32,
        /// Per-shelf capacity.
        capacity: u32,
    },
    /// The unobservable shelf index is not on the ring.
    UnobservableOutOfRange {
        /// The configured unobservable shelf.
        shelf: ShelfId,
        /// Number of shelves on the ring.
        shelf_count: u32,
    },
    /// Fewer than two shelves remain once the unobservable shelf is
    /// removed from the schedule.
    DegenerateSchedule {
        /// Number of observable shelves that would remain.
        observable: u32,
    },
    /// The trap shelf index is not on the ring.
    TrapShelfOutOfRange {
        /// The configured trap shelf.
        shelf: ShelfId,
        /// Number of shelves on the ring.
        shelf_count: u32,
    },
    /// Kalman process noise is NaN, infinite or negative.
    InvalidProcessNoise {
        /// The invalid value.
        value: f64,
    },
    /// Analytics must be collected at a positive step interval.
    ZeroReportInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RingTooSmall { shelf_count } => {
                write!(f, "ring needs at least 3 shelves, got {shelf_count}")
            }
            Self::ZeroCapacity => write!(f, "shelf capacity must be at least 1"),
            Self::TotalExceedsCapacity {
                total_items,
                system_capacity,
            } => write!(
                f,
                "total_items {total_items} exceeds system capacity {system_capacity}"
            ),
            Self::ShelfOverCapacity {
                shelf,
                quantity,
                capacity,
            } => write!(
                f,
                "shelf {shelf} holds {quantity} items, above capacity {capacity}"
            ),
            Self::UnobservableOutOfRange { shelf, shelf_count } => write!(
                f,
                "unobservable shelf {shelf} out of range (shelf_count={shelf_count})"
            ),
            Self::DegenerateSchedule { observable } => write!(
                f,
                "observation schedule needs at least 2 shelves, got {observable}"
            ),
            Self::TrapShelfOutOfRange { shelf, shelf_count } => write!(
                f,
                "trap shelf {shelf} out of range (shelf_count={shelf_count})"
            ),
            Self::InvalidProcessNoise { value } => {
                write!(f, "process noise must be finite and >= 0, got {value}")
            }
            Self::ZeroReportInterval => write!(f, "report_interval must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

// ── QueryError ─────────────────────────────────────────────────────

/// Errors from single-shelf read queries (`quantity_of`, `estimate_of`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// The shelf index is not on the ring.
    InvalidShelf {
        /// The requested shelf.
        shelf: ShelfId,
        /// Number of shelves on the ring.
        shelf_count: u32,
    },
    /// The component was queried before `initialize()` ran.
    NotInitialized,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShelf { shelf, shelf_count } => write!(
                f,
                "shelf {shelf} out of range (shelf_count={shelf_count})"
            ),
            Self::NotInitialized => write!(f, "component not initialized"),
        }
    }
}

impl Error for QueryError {}

// ── StepError ──────────────────────────────────────────────────────

/// Errors from advancing the simulator or the observer by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepError {
    /// `step()` was called before `initialize()`.
    NotInitialized,
    /// The ring holds zero items, so there is nothing to move.
    NoMovableItems,
    /// The observer and its quantity source disagree on the shelf count.
    ShapeMismatch {
        /// Shelf count the observer was initialized with.
        expected: u32,
        /// Shelf count reported by the source (`None` if uninitialized).
        actual: Option<u32>,
    },
    /// The ground-truth query for the scheduled shelf failed.
    Query(QueryError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "component not initialized"),
            Self::NoMovableItems => write!(f, "no movable items: total_items is 0"),
            Self::ShapeMismatch { expected, actual } => match actual {
                Some(actual) => write!(
                    f,
                    "shelf count mismatch: expected {expected}, source has {actual}"
                ),
                None => write!(
                    f,
                    "shelf count mismatch: expected {expected}, source not initialized"
                ),
            },
            Self::Query(e) => write!(f, "ground-truth query failed: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Query(e) => Some(e),
            _ => None,
        }
    }
}

impl From<QueryError> for StepError {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

// ── MetricsError ───────────────────────────────────────────────────

/// Errors from comparing a ground-truth snapshot with an estimate snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricsError {
    /// The two snapshots cover different numbers of shelves.
    ShapeMismatch {
        /// Shelves in the ground-truth snapshot.
        truth: usize,
        /// Shelves in the estimate snapshot.
        estimates: usize,
    },
    /// The requested shelf is not present in the snapshots.
    InvalidShelf {
        /// The requested shelf.
        shelf: ShelfId,
        /// Number of shelves in the snapshots.
        shelf_count: usize,
    },
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { truth, estimates } => write!(
                f,
                "snapshot shape mismatch: {truth} ground-truth shelves vs {estimates} estimates"
            ),
            Self::InvalidShelf { shelf, shelf_count } => write!(
                f,
                "shelf {shelf} out of range (shelf_count={shelf_count})"
            ),
        }
    }
}

impl Error for MetricsError {}
