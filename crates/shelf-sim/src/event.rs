//! Movement events emitted by [`Simulator::step`](crate::Simulator::step).

use shelf_core::{ShelfId, StepId};
use shelf_space::Direction;

/// What happened during one simulator step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// One item moved from `source` to `destination`.
    Moved {
        /// Shelf that lost the item.
        source: ShelfId,
        /// Shelf that gained the item.
        destination: ShelfId,
        /// Direction of travel along the ring.
        direction: Direction,
    },
    /// The destination was full; nothing changed.
    Blocked {
        /// Shelf the item would have left.
        source: ShelfId,
        /// The full shelf.
        destination: ShelfId,
        /// Direction of the rejected move.
        direction: Direction,
    },
    /// No shelf was eligible as a source: every item sits on an active
    /// trap shelf. Nothing changed.
    Idle,
}

/// Record of one simulator step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementEvent {
    /// Simulator step number (1 for the first call to `step()`).
    pub step: StepId,
    /// Result of the move attempt.
    pub outcome: MoveOutcome,
}

impl MovementEvent {
    /// Whether an item actually changed shelves.
    pub fn moved(&self) -> bool {
        matches!(self.outcome, MoveOutcome::Moved { .. })
    }

    /// Source shelf of the attempted move, if one was selected.
    pub fn source(&self) -> Option<ShelfId> {
        match self.outcome {
            MoveOutcome::Moved { source, .. } | MoveOutcome::Blocked { source, .. } => {
                Some(source)
            }
            MoveOutcome::Idle => None,
        }
    }

    /// Destination shelf of the attempted move, if one was selected.
    pub fn destination(&self) -> Option<ShelfId> {
        match self.outcome {
            MoveOutcome::Moved { destination, .. } | MoveOutcome::Blocked { destination, .. } => {
                Some(destination)
            }
            MoveOutcome::Idle => None,
        }
    }
}
