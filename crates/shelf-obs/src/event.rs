//! Observation events emitted by [`Observer::step`](crate::Observer::step).

use shelf_core::{ShelfId, StepId};

/// Record of one observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObservationEvent {
    /// Step at which the observation was taken.
    pub step: StepId,
    /// The observed shelf.
    pub shelf: ShelfId,
    /// Exact quantity read from ground truth.
    pub true_quantity: u32,
    /// The shelf's estimate before this observation (`None` if it had never
    /// been observed).
    pub previous_estimate: Option<i64>,
}

impl ObservationEvent {
    /// How far the previous estimate was from the truth, if there was one.
    pub fn correction(&self) -> Option<i64> {
        self.previous_estimate
            .map(|prev| i64::from(self.true_quantity) - prev)
    }
}
