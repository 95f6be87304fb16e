//! The round-robin observer.

use shelf_core::{ConfigError, QueryError, QuantitySource, ShelfId, StepError, StepId};
use tracing::{debug, trace};

use crate::event::ObservationEvent;
use crate::kalman::TotalEstimator;
use crate::record::{EstimateRecord, Uncertainty};
use crate::schedule::RoundRobinSchedule;
use crate::snapshot::EstimateSnapshot;

#[derive(Debug)]
struct Estimates {
    unobservable: ShelfId,
    total_items: u64,
    schedule: RoundRobinSchedule,
    records: Vec<EstimateRecord>,
    last_step: StepId,
    observations: u64,
}

impl Estimates {
    fn shelf_count(&self) -> u32 {
        self.records.len() as u32
    }

    fn check(&self, shelf: ShelfId) -> Result<usize, QueryError> {
        let i = shelf.index();
        if i < self.records.len() {
            Ok(i)
        } else {
            Err(QueryError::InvalidShelf {
                shelf,
                shelf_count: self.shelf_count(),
            })
        }
    }

    fn observable(&self) -> impl Iterator<Item = &EstimateRecord> + '_ {
        let skip = self.unobservable.index();
        self.records
            .iter()
            .enumerate()
            .filter(move |&(i, _)| i != skip)
            .map(|(_, r)| r)
    }

    fn observable_sum(&self) -> i64 {
        self.observable().map(EstimateRecord::quantity_or_zero).sum()
    }

    fn observable_staleness(&self) -> u64 {
        self.observable()
            .fold(0u64, |acc, r| acc.saturating_add(r.uncertainty.0))
    }

    fn inferred(&self) -> i64 {
        i64::try_from(self.total_items)
            .unwrap_or(i64::MAX)
            .saturating_sub(self.observable_sum())
    }
}

/// Partial-information estimator of per-shelf quantities.
///
/// Reads exactly one shelf per [`step()`](Observer::step) through a
/// [`QuantitySource`] borrowed immutably for the duration of the call,
/// so it can never modify ground truth.
///
/// # Example
///
/// ```
/// use shelf_core::{ShelfId, StepId};
/// use shelf_obs::Observer;
/// use shelf_sim::{ShelfLayout, Simulator};
///
/// let mut sim = Simulator::new(7);
/// sim.initialize(ShelfLayout::new(20, 100, 50)).unwrap();
/// let mut obs = Observer::new();
/// obs.initialize(20, ShelfId(0), 50).unwrap();
///
/// sim.step().unwrap();
/// let ev = obs.step(&sim, StepId(1)).unwrap();
/// assert_eq!(ev.shelf, ShelfId(1));
/// assert_eq!(
///     obs.estimate_of(ShelfId(1)).unwrap().estimated_quantity,
///     Some(i64::from(sim.quantity_of(ShelfId(1)).unwrap())),
/// );
/// ```
#[derive(Debug)]
pub struct Observer {
    kalman: TotalEstimator,
    state: Option<Estimates>,
}

impl Observer {
    /// Create an uninitialized observer with the default Kalman process
    /// noise.
    pub fn new() -> Self {
        Self {
            kalman: TotalEstimator::default(),
            state: None,
        }
    }

    /// Create an uninitialized observer with process noise `q`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidProcessNoise`] if `q` is NaN, infinite or
    /// negative.
    pub fn with_process_noise(q: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            kalman: TotalEstimator::new(q)?,
            state: None,
        })
    }

    /// Set up estimates for `shelf_count` shelves, one of which
    /// (`unobservable`) is never read directly.
    ///
    /// All records start never-observed; the Kalman filter returns to its
    /// prior. Re-initializing discards previous estimates.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnobservableOutOfRange`] or
    /// [`ConfigError::DegenerateSchedule`]. The observer is left unchanged.
    pub fn initialize(
        &mut self,
        shelf_count: u32,
        unobservable: ShelfId,
        total_items: u64,
    ) -> Result<(), ConfigError> {
        let schedule = RoundRobinSchedule::new(shelf_count, unobservable)?;
        let mut records = vec![EstimateRecord::UNOBSERVED; shelf_count as usize];
        records[unobservable.index()] = EstimateRecord::UNINFERRED;
        self.kalman.reset();
        self.state = Some(Estimates {
            unobservable,
            total_items,
            schedule,
            records,
            last_step: StepId(0),
            observations: 0,
        });
        debug!(shelf_count, %unobservable, total_items, "observer initialized");
        Ok(())
    }

    /// Observe the next scheduled shelf.
    ///
    /// 1. Advance the schedule (wrapping).
    /// 2. Read the exact quantity of the target from `source`.
    /// 3. Set the target's estimate to it, stamp `current_step` and reset
    ///    its uncertainty to zero.
    /// 4. Add one to every other observable shelf's uncertainty.
    /// 5. Recompute the unobservable shelf's estimate as
    ///    `total_items - Σ observable estimates`.
    ///
    /// The Kalman filter then folds in the new observable sum.
    ///
    /// # Errors
    ///
    /// [`StepError::NotInitialized`] before `initialize()`,
    /// [`StepError::ShapeMismatch`] if `source` has a different shelf
    /// count, or [`StepError::Query`] if reading the target fails. On any
    /// error no estimate changes and the schedule does not advance.
    pub fn step<S: QuantitySource + ?Sized>(
        &mut self,
        source: &S,
        current_step: StepId,
    ) -> Result<ObservationEvent, StepError> {
        let state = self.state.as_mut().ok_or(StepError::NotInitialized)?;
        let expected = state.shelf_count();
        match source.shelf_count() {
            Some(actual) if actual == expected => {}
            actual => return Err(StepError::ShapeMismatch { expected, actual }),
        }

        let target = state.schedule.peek_next();
        let true_quantity = source.quantity_of(target)?;
        state.schedule.advance();

        let unobservable = state.unobservable.index();
        let previous_estimate = state.records[target.index()].estimated_quantity;
        for (i, record) in state.records.iter_mut().enumerate() {
            if i == target.index() {
                *record = EstimateRecord {
                    estimated_quantity: Some(i64::from(true_quantity)),
                    last_observed_step: Some(current_step),
                    uncertainty: Uncertainty::ZERO,
                };
            } else if i != unobservable {
                record.uncertainty = record.uncertainty.incremented();
            }
        }
        let inferred = state.inferred();
        state.records[unobservable] = EstimateRecord {
            estimated_quantity: Some(inferred),
            ..EstimateRecord::UNINFERRED
        };
        state.last_step = current_step;
        state.observations += 1;

        let z = state.observable_sum() as f64;
        let r = TotalEstimator::measurement_noise(state.observable_staleness());
        self.kalman.update(z, r);

        trace!(
            step = %current_step,
            shelf = %target,
            true_quantity,
            ?previous_estimate,
            inferred,
            "shelf observed"
        );
        Ok(ObservationEvent {
            step: current_step,
            shelf: target,
            true_quantity,
            previous_estimate,
        })
    }

    /// Current record for `shelf`.
    pub fn estimate_of(&self, shelf: ShelfId) -> Result<EstimateRecord, QueryError> {
        let state = self.state.as_ref().ok_or(QueryError::NotInitialized)?;
        let i = state.check(shelf)?;
        Ok(state.records[i])
    }

    /// `total_items - Σ observable estimates`, computed from the current
    /// records (never-observed shelves count as zero).
    ///
    /// `None` before initialization or before the first step.
    pub fn inferred_unobservable(&self) -> Option<i64> {
        self.state
            .as_ref()
            .filter(|s| s.observations > 0)
            .map(Estimates::inferred)
    }

    /// Copy of every record plus the filter state.
    pub fn snapshot(&self) -> Result<EstimateSnapshot, QueryError> {
        let state = self.state.as_ref().ok_or(QueryError::NotInitialized)?;
        Ok(EstimateSnapshot::new(
            state.last_step,
            state.unobservable,
            state.total_items,
            state.records.clone(),
            (self.kalman.estimate(), self.kalman.variance()),
        ))
    }

    /// The shelf the next `step()` will observe.
    pub fn next_target(&self) -> Option<ShelfId> {
        self.state.as_ref().map(|s| s.schedule.peek_next())
    }

    /// The observation order, if initialized.
    pub fn schedule(&self) -> Option<&RoundRobinSchedule> {
        self.state.as_ref().map(|s| &s.schedule)
    }

    /// The unobservable shelf, if initialized.
    pub fn unobservable(&self) -> Option<ShelfId> {
        self.state.as_ref().map(|s| s.unobservable)
    }

    /// Number of shelves, if initialized.
    pub fn shelf_count(&self) -> Option<u32> {
        self.state.as_ref().map(Estimates::shelf_count)
    }

    /// Number of successful `step()` calls since initialization.
    pub fn observations(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.observations)
    }

    /// Whether `initialize()` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// The Kalman total estimator.
    pub fn kalman(&self) -> &TotalEstimator {
        &self.kalman
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}
