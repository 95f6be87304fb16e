//! Owned copy of the observer's estimates at one step.

use shelf_core::{ShelfId, StepId};

use crate::record::{EstimateRecord, Uncertainty};

/// Every estimate record plus the filter state, captured between steps.
#[derive(Clone, Debug, PartialEq)]
pub struct EstimateSnapshot {
    step: StepId,
    unobservable: ShelfId,
    total_items: u64,
    records: Vec<EstimateRecord>,
    kalman_estimate: f64,
    kalman_variance: f64,
}

impl EstimateSnapshot {
    pub(crate) fn new(
        step: StepId,
        unobservable: ShelfId,
        total_items: u64,
        records: Vec<EstimateRecord>,
        kalman: (f64, f64),
    ) -> Self {
        Self {
            step,
            unobservable,
            total_items,
            records,
            kalman_estimate: kalman.0,
            kalman_variance: kalman.1,
        }
    }

    /// Build a snapshot directly from records, with the filter at its prior.
    ///
    /// Intended for tests and external tooling that compare estimates
    /// without running an [`Observer`](crate::Observer).
    pub fn from_records(
        step: StepId,
        unobservable: ShelfId,
        total_items: u64,
        records: Vec<EstimateRecord>,
    ) -> Self {
        Self::new(
            step,
            unobservable,
            total_items,
            records,
            (
                crate::TotalEstimator::INITIAL_ESTIMATE,
                crate::TotalEstimator::INITIAL_VARIANCE,
            ),
        )
    }

    /// Step of the most recent observation (`StepId(0)` before any).
    pub fn step(&self) -> StepId {
        self.step
    }

    /// The shelf whose estimate is inferred.
    pub fn unobservable(&self) -> ShelfId {
        self.unobservable
    }

    /// Known item total used for the inference.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of shelves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot covers zero shelves.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records indexed by shelf.
    pub fn records(&self) -> &[EstimateRecord] {
        &self.records
    }

    /// Record for one shelf, or `None` if out of range.
    pub fn record(&self, shelf: ShelfId) -> Option<&EstimateRecord> {
        self.records.get(shelf.index())
    }

    /// Estimate for one shelf, treating never-observed as zero.
    pub fn estimate_or_zero(&self, shelf: ShelfId) -> Option<i64> {
        self.record(shelf).map(EstimateRecord::quantity_or_zero)
    }

    /// Inferred quantity on the unobservable shelf, if computed yet.
    pub fn inferred_unobservable(&self) -> Option<i64> {
        self.record(self.unobservable)
            .and_then(|r| r.estimated_quantity)
    }

    /// Sum of estimates over observable shelves (never-observed as zero).
    pub fn observable_estimate_sum(&self) -> i64 {
        self.observable().map(|(_, r)| r.quantity_or_zero()).sum()
    }

    /// Largest staleness among observable shelves.
    pub fn max_observable_staleness(&self) -> Uncertainty {
        self.observable()
            .map(|(_, r)| r.uncertainty)
            .max()
            .unwrap_or(Uncertainty::ZERO)
    }

    /// Kalman estimate of the observable item total.
    pub fn kalman_estimate(&self) -> f64 {
        self.kalman_estimate
    }

    /// Kalman posterior variance.
    pub fn kalman_variance(&self) -> f64 {
        self.kalman_variance
    }

    /// `(shelf, record)` pairs for observable shelves.
    pub fn observable(&self) -> impl Iterator<Item = (ShelfId, &EstimateRecord)> + '_ {
        let skip = self.unobservable;
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (ShelfId(i as u32), r))
            .filter(move |&(s, _)| s != skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(q: Option<i64>, u: u64) -> EstimateRecord {
        EstimateRecord {
            estimated_quantity: q,
            last_observed_step: q.map(|_| StepId(1)),
            uncertainty: Uncertainty(u),
        }
    }

    #[test]
    fn aggregates_skip_the_unobservable_shelf() {
        let snap = EstimateSnapshot::from_records(
            StepId(2),
            ShelfId(0),
            10,
            vec![
                EstimateRecord {
                    estimated_quantity: Some(4),
                    ..EstimateRecord::UNINFERRED
                },
                rec(Some(3), 1),
                rec(None, 5),
                rec(Some(3), 0),
            ],
        );
        assert_eq!(snap.len(), 4);
        assert_eq!(snap.inferred_unobservable(), Some(4));
        assert_eq!(snap.observable_estimate_sum(), 6);
        assert_eq!(snap.max_observable_staleness(), Uncertainty(5));
        assert_eq!(snap.estimate_or_zero(ShelfId(2)), Some(0));
        assert_eq!(snap.estimate_or_zero(ShelfId(9)), None);
        assert_eq!(snap.observable().count(), 3);
    }
}
