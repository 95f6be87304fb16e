//! Estimation-quality metrics.
//!
//! Pure functions over a [`GroundTruthSnapshot`] and an
//! [`EstimateSnapshot`]. Never-observed shelves count as an estimate of
//! zero; the unobservable shelf uses its inferred value.

use shelf_core::{MetricsError, ShelfId, StepId};
use shelf_obs::{EstimateSnapshot, Uncertainty};
use shelf_sim::GroundTruthSnapshot;

fn check_shape(
    truth: &GroundTruthSnapshot,
    estimates: &EstimateSnapshot,
) -> Result<(), MetricsError> {
    if truth.len() != estimates.len() {
        return Err(MetricsError::ShapeMismatch {
            truth: truth.len(),
            estimates: estimates.len(),
        });
    }
    Ok(())
}

fn abs_error(truth: u32, estimate: i64) -> u64 {
    estimate.abs_diff(i64::from(truth))
}

/// Mean of `|estimate - truth|` over every shelf.
///
/// # Errors
///
/// [`MetricsError::ShapeMismatch`] if the snapshots differ in shelf count.
pub fn mean_absolute_error(
    truth: &GroundTruthSnapshot,
    estimates: &EstimateSnapshot,
) -> Result<f64, MetricsError> {
    check_shape(truth, estimates)?;
    if truth.is_empty() {
        return Ok(0.0);
    }
    let sum: u64 = truth
        .quantities()
        .iter()
        .zip(estimates.records())
        .map(|(&q, r)| abs_error(q, r.quantity_or_zero()))
        .sum();
    Ok(sum as f64 / truth.len() as f64)
}

/// Mean absolute error over shelves that have been observed at least once.
///
/// The unobservable shelf is never observed, so it never contributes.
/// Returns `0.0` when no shelf has been observed.
pub fn observed_mean_absolute_error(
    truth: &GroundTruthSnapshot,
    estimates: &EstimateSnapshot,
) -> Result<f64, MetricsError> {
    check_shape(truth, estimates)?;
    let (sum, n) = truth
        .quantities()
        .iter()
        .zip(estimates.records())
        .filter(|(_, r)| r.is_observed())
        .fold((0u64, 0u64), |(sum, n), (&q, r)| {
            (sum + abs_error(q, r.quantity_or_zero()), n + 1)
        });
    if n == 0 {
        return Ok(0.0);
    }
    Ok(sum as f64 / n as f64)
}

/// `|estimate - truth|` at one shelf.
///
/// # Errors
///
/// [`MetricsError::ShapeMismatch`] on differing shelf counts,
/// [`MetricsError::InvalidShelf`] if `shelf` is out of range.
pub fn unobservable_shelf_error(
    truth: &GroundTruthSnapshot,
    estimates: &EstimateSnapshot,
    shelf: ShelfId,
) -> Result<u64, MetricsError> {
    check_shape(truth, estimates)?;
    match (truth.quantity(shelf), estimates.estimate_or_zero(shelf)) {
        (Some(q), Some(e)) => Ok(abs_error(q, e)),
        _ => Err(MetricsError::InvalidShelf {
            shelf,
            shelf_count: truth.len(),
        }),
    }
}

/// `|estimated_total - true_total|`.
pub fn total_error(true_total: u64, estimated_total: f64) -> f64 {
    (estimated_total - true_total as f64).abs()
}

/// Total error as a percentage of the true total.
///
/// A true total of zero gives `0.0` for an exact estimate and `100.0`
/// otherwise.
pub fn total_error_pct(true_total: u64, estimated_total: f64) -> f64 {
    if true_total == 0 {
        return if estimated_total == 0.0 { 0.0 } else { 100.0 };
    }
    total_error(true_total, estimated_total) * 100.0 / true_total as f64
}

// ── AnalyticsReport ────────────────────────────────────────────────

/// Estimation quality at one step.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsReport {
    /// Step the report describes.
    pub step: StepId,
    /// Items on every shelf.
    pub true_total_system: u64,
    /// Items on observable shelves.
    pub true_total_observable: u64,
    /// Items actually on the unobservable shelf.
    pub unobservable_items: u32,
    /// Observer's inferred value for the unobservable shelf.
    pub inferred_unobservable: Option<i64>,
    /// Items on the trap shelf, if one is configured.
    pub trap_items: Option<u32>,
    /// Kalman estimate of the observable total.
    pub kalman_estimate: f64,
    /// Kalman posterior variance.
    pub kalman_variance: f64,
    /// `|kalman_estimate - true_total_observable|`.
    pub total_error: f64,
    /// `total_error` as a percentage.
    pub total_error_pct: f64,
    /// MAE over every shelf.
    pub mean_absolute_error: f64,
    /// MAE over shelves observed at least once.
    pub observed_mean_absolute_error: f64,
    /// Error of the inferred unobservable estimate.
    pub unobservable_error: u64,
    /// Largest staleness among observable shelves.
    pub max_observable_staleness: Uncertainty,
}

impl AnalyticsReport {
    /// Compute every metric from a pair of snapshots.
    pub fn collect(
        truth: &GroundTruthSnapshot,
        estimates: &EstimateSnapshot,
        trap: Option<ShelfId>,
    ) -> Result<Self, MetricsError> {
        check_shape(truth, estimates)?;
        let unobservable = estimates.unobservable();
        let unobservable_items = truth
            .quantity(unobservable)
            .ok_or(MetricsError::InvalidShelf {
                shelf: unobservable,
                shelf_count: truth.len(),
            })?;
        let true_total_system = truth.total();
        let true_total_observable = true_total_system - u64::from(unobservable_items);
        let kalman_estimate = estimates.kalman_estimate();
        Ok(Self {
            step: truth.step(),
            true_total_system,
            true_total_observable,
            unobservable_items,
            inferred_unobservable: estimates.inferred_unobservable(),
            trap_items: trap.and_then(|s| truth.quantity(s)),
            kalman_estimate,
            kalman_variance: estimates.kalman_variance(),
            total_error: total_error(true_total_observable, kalman_estimate),
            total_error_pct: total_error_pct(true_total_observable, kalman_estimate),
            mean_absolute_error: mean_absolute_error(truth, estimates)?,
            observed_mean_absolute_error: observed_mean_absolute_error(truth, estimates)?,
            unobservable_error: unobservable_shelf_error(truth, estimates, unobservable)?,
            max_observable_staleness: estimates.max_observable_staleness(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_obs::EstimateRecord;

    fn seen(q: i64, at: u64, u: u64) -> EstimateRecord {
        EstimateRecord {
            estimated_quantity: Some(q),
            last_observed_step: Some(StepId(at)),
            uncertainty: Uncertainty(u),
        }
    }

    fn inferred(q: i64) -> EstimateRecord {
        EstimateRecord {
            estimated_quantity: Some(q),
            ..EstimateRecord::UNINFERRED
        }
    }

    fn pair() -> (GroundTruthSnapshot, EstimateSnapshot) {
        let truth = GroundTruthSnapshot::new(StepId(3), 10, vec![4, 2, 5, 1]);
        let est = EstimateSnapshot::from_records(
            StepId(3),
            ShelfId(0),
            12,
            vec![inferred(6), seen(3, 1, 2), seen(5, 2, 1), EstimateRecord::UNOBSERVED],
        );
        (truth, est)
    }

    // ── MAE ─────────────────────────────────────────────────────

    #[test]
    fn mae_over_all_shelves() {
        let (truth, est) = pair();
        // |6-4| + |3-2| + |5-5| + |0-1| = 4
        assert_eq!(mean_absolute_error(&truth, &est).unwrap(), 1.0);
    }

    #[test]
    fn observed_mae_skips_unobserved() {
        let (truth, est) = pair();
        // shelves 1 and 2 only: (1 + 0) / 2
        assert_eq!(observed_mean_absolute_error(&truth, &est).unwrap(), 0.5);
    }

    #[test]
    fn observed_mae_is_zero_before_any_observation() {
        let truth = GroundTruthSnapshot::new(StepId(0), 5, vec![1, 1, 1]);
        let est = EstimateSnapshot::from_records(
            StepId(0),
            ShelfId(0),
            3,
            vec![EstimateRecord::UNINFERRED, EstimateRecord::UNOBSERVED, EstimateRecord::UNOBSERVED],
        );
        assert_eq!(observed_mean_absolute_error(&truth, &est).unwrap(), 0.0);
    }

    #[test]
    fn shape_mismatch() {
        let (_, est) = pair();
        let truth = GroundTruthSnapshot::new(StepId(3), 10, vec![1, 2, 3]);
        assert_eq!(
            mean_absolute_error(&truth, &est),
            Err(MetricsError::ShapeMismatch {
                truth: 3,
                estimates: 4,
            })
        );
    }

    // ── Shelf error ─────────────────────────────────────────────

    #[test]
    fn unobservable_error_and_range() {
        let (truth, est) = pair();
        assert_eq!(unobservable_shelf_error(&truth, &est, ShelfId(0)), Ok(2));
        assert_eq!(unobservable_shelf_error(&truth, &est, ShelfId(3)), Ok(1));
        assert_eq!(
            unobservable_shelf_error(&truth, &est, ShelfId(4)),
            Err(MetricsError::InvalidShelf {
                shelf: ShelfId(4),
                shelf_count: 4,
            })
        );
    }

    #[test]
    fn negative_inference_error() {
        let truth = GroundTruthSnapshot::new(StepId(2), 10, vec![0, 4, 1]);
        let est = EstimateSnapshot::from_records(
            StepId(2),
            ShelfId(0),
            5,
            vec![inferred(-1), seen(5, 1, 1), seen(1, 2, 0)],
        );
        assert_eq!(unobservable_shelf_error(&truth, &est, ShelfId(0)), Ok(1));
    }

    // ── Totals ──────────────────────────────────────────────────

    #[test]
    fn total_error_pct_edge_cases() {
        assert_eq!(total_error_pct(0, 0.0), 0.0);
        assert_eq!(total_error_pct(0, 0.5), 100.0);
        assert_eq!(total_error_pct(200, 190.0), 5.0);
        assert_eq!(total_error(10, 12.5), 2.5);
    }

    #[test]
    fn report_bundles_metrics() {
        let (truth, est) = pair();
        let r = AnalyticsReport::collect(&truth, &est, Some(ShelfId(2))).unwrap();
        assert_eq!(r.step, StepId(3));
        assert_eq!(r.true_total_system, 12);
        assert_eq!(r.true_total_observable, 8);
        assert_eq!(r.unobservable_items, 4);
        assert_eq!(r.inferred_unobservable, Some(6));
        assert_eq!(r.trap_items, Some(5));
        assert_eq!(r.unobservable_error, 2);
        assert_eq!(r.max_observable_staleness, Uncertainty(2));
        assert_eq!(r.kalman_variance, 1000.0);
        assert_eq!(r.total_error, 8.0);
        assert_eq!(r.total_error_pct, 100.0);
    }
}
