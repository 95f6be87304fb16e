//! Error types for ring construction and neighbour queries.

use shelf_core::ShelfId;
use std::fmt;

/// Errors arising from ring construction or neighbour queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// A ring needs at least three shelves for two distinct neighbours.
    RingTooSmall {
        /// The requested ring length.
        len: u32,
    },
    /// A shelf index is outside `[0, len)`.
    ShelfOutOfRange {
        /// The offending shelf.
        shelf: ShelfId,
        /// The ring length.
        len: u32,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RingTooSmall { len } => {
                write!(f, "ring needs at least 3 shelves, got {len}")
            }
            Self::ShelfOutOfRange { shelf, len } => {
                write!(f, "shelf {shelf} out of range for ring of {len}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

