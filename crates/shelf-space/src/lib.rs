//! Ring topology for the shelf inventory simulator.
//!
//! Shelves sit on a ring: shelf `i` touches `i - 1` and `i + 1`, wrapping
//! at both ends. [`Ring`] validates the shelf count once and then answers
//! neighbour queries without failure; [`neighbours`] is the free-standing
//! checked form for callers that only hold a shelf count.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ring;

pub use error::TopologyError;
pub use ring::{neighbours, Direction, Ring};
