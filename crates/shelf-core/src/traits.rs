//! The read-only query seam between ground truth and its consumers.

use crate::error::QueryError;
use crate::id::ShelfId;

/// Read-only access to exact per-shelf quantities.
///
/// Implemented by the simulator's ground truth. The observer queries
/// through `&dyn QuantitySource` (or a generic bound) rather than holding
/// the simulator type directly, so it can never mutate ground truth and
/// tests can substitute a scripted source.
pub trait QuantitySource {
    /// Number of shelves on the ring.
    ///
    /// Returns `None` if the source has not been initialized yet.
    fn shelf_count(&self) -> Option<u32>;

    /// Exact quantity currently on `shelf`.
    ///
    /// Fails with [`QueryError::InvalidShelf`] for an out-of-range index
    /// and [`QueryError::NotInitialized`] before initialization.
    fn quantity_of(&self, shelf: ShelfId) -> Result<u32, QueryError>;
}
