//! Owned, read-only copy of the ground truth at one step.

use shelf_core::{QueryError, QuantitySource, ShelfId, StepId};

/// Exact per-shelf quantities captured after a simulator step.
///
/// Snapshots are taken between steps, so they always satisfy the
/// conservation invariant: no snapshot can show an item mid-move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroundTruthSnapshot {
    step: StepId,
    capacity: u32,
    quantities: Vec<u32>,
}

impl GroundTruthSnapshot {
    /// Build a snapshot from raw parts.
    pub fn new(step: StepId, capacity: u32, quantities: Vec<u32>) -> Self {
        Self {
            step,
            capacity,
            quantities,
        }
    }

    /// Simulator steps taken when the snapshot was captured.
    pub fn step(&self) -> StepId {
        self.step
    }

    /// Per-shelf capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of shelves.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Whether the snapshot covers zero shelves.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Quantities indexed by shelf.
    pub fn quantities(&self) -> &[u32] {
        &self.quantities
    }

    /// Quantity on one shelf, or `None` if out of range.
    pub fn quantity(&self, shelf: ShelfId) -> Option<u32> {
        self.quantities.get(shelf.index()).copied()
    }

    /// Sum over every shelf.
    pub fn total(&self) -> u64 {
        self.quantities.iter().map(|&q| u64::from(q)).sum()
    }

    /// `(shelf, quantity)` pairs in ascending shelf order.
    pub fn iter(&self) -> impl Iterator<Item = (ShelfId, u32)> + '_ {
        self.quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| (ShelfId(i as u32), q))
    }
}

impl QuantitySource for GroundTruthSnapshot {
    fn shelf_count(&self) -> Option<u32> {
        Some(self.quantities.len() as u32)
    }

    fn quantity_of(&self, shelf: ShelfId) -> Result<u32, QueryError> {
        self.quantity(shelf).ok_or(QueryError::InvalidShelf {
            shelf,
            shelf_count: self.quantities.len() as u32,
        })
    }
}
