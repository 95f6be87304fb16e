//! Driver, metrics and batch execution for the shelf ring inventory.
//!
//! - [`config`]: run configuration and validation.
//! - [`metrics`]: snapshot comparison and periodic analytics reports.
//! - [`lockstep`]: one Simulator + Observer pair advanced in lockstep.
//! - [`batch`]: many independent runs on scoped worker threads.
//! - [`digest`]: FNV-1a digests for reproducibility checks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod digest;
pub mod lockstep;
pub mod metrics;

pub use batch::{run_batch, run_batch_with_workers, BatchError};
pub use config::RunConfig;
pub use lockstep::{Event, LockstepRun, RunError, RunResults, StepResult};
pub use metrics::AnalyticsReport;
