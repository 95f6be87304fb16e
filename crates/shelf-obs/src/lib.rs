//! Partial-information observer for the shelf ring inventory.
//!
//! The [`Observer`] never sees the whole ring at once. Each step it reads
//! the exact quantity of one shelf, chosen by a fixed [`RoundRobinSchedule`]
//! that skips one permanently unobservable shelf. Every estimate carries a
//! staleness counter ([`Uncertainty`]); the unobservable shelf's estimate
//! is inferred from the known item total.
//!
//! A scalar Kalman filter ([`TotalEstimator`]) tracks the number of items
//! on observable shelves, weighting stale measurements less.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod event;
pub mod kalman;
pub mod observer;
pub mod record;
pub mod schedule;
pub mod snapshot;

pub use event::ObservationEvent;
pub use kalman::TotalEstimator;
pub use observer::Observer;
pub use record::{EstimateRecord, Uncertainty};
pub use schedule::RoundRobinSchedule;
pub use snapshot::EstimateSnapshot;
