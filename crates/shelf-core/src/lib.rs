//! Core types and traits for the shelf ring inventory simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, error taxonomy and the read-only query seam shared by
//! the simulator, the observer and the metrics layer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;

pub use error::{ConfigError, MetricsError, QueryError, StepError};
pub use id::{ShelfId, StepId};
pub use traits::QuantitySource;
