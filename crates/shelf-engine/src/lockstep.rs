//! Lockstep (synchronous) Simulator + Observer driver.
//!
//! [`LockstepRun`] owns one [`Simulator`] and one [`Observer`]. Each call
//! to [`step_sync()`](LockstepRun::step_sync) moves at most one item and
//! then observes exactly one shelf, both tagged with the same 1-based step
//! index.
//!
//! # Ownership model
//!
//! All mutating methods take `&mut self`. The observer borrows the
//! simulator immutably (as a [`QuantitySource`](shelf_core::QuantitySource))
//! only inside `step_sync()`, after the simulator's move has completed, so
//! it never sees a half-applied move.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use shelf_core::{ConfigError, MetricsError, QueryError, StepError, StepId};
use shelf_obs::{EstimateSnapshot, ObservationEvent, Observer};
use shelf_sim::{GroundTruthSnapshot, MovementEvent, Simulator};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::metrics::AnalyticsReport;

// Compile-time assertion: LockstepRun is Send, so batch workers can own one.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<LockstepRun>();
        assert_send::<RunResults>();
    }
};

// ── RunError ────────────────────────────────────────────────────

/// Anything that can stop a run.
#[derive(Clone, Debug, PartialEq)]
pub enum RunError {
    /// Invalid configuration or run arguments.
    Config(ConfigError),
    /// The simulator or observer failed to step.
    Step(StepError),
    /// A snapshot could not be taken.
    Query(QueryError),
    /// Analytics could not be computed.
    Metrics(MetricsError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Step(e) => write!(f, "step failed: {e}"),
            Self::Query(e) => write!(f, "snapshot failed: {e}"),
            Self::Metrics(e) => write!(f, "metrics failed: {e}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
            Self::Query(e) => Some(e),
            Self::Metrics(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for RunError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

impl From<QueryError> for RunError {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

impl From<MetricsError> for RunError {
    fn from(e: MetricsError) -> Self {
        Self::Metrics(e)
    }
}

// ── Results ─────────────────────────────────────────────────────

/// Result of one [`LockstepRun::step_sync()`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepResult {
    /// What the simulator did.
    pub movement: MovementEvent,
    /// What the observer saw.
    pub observation: ObservationEvent,
}

/// One entry in a run's event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A simulator step.
    Movement(MovementEvent),
    /// An observer step.
    Observation(ObservationEvent),
}

impl Event {
    /// Step the event belongs to.
    pub fn step(&self) -> StepId {
        match self {
            Self::Movement(e) => e.step,
            Self::Observation(e) => e.step,
        }
    }
}

/// Everything produced by [`LockstepRun::run()`].
#[derive(Clone, Debug)]
pub struct RunResults {
    /// The configuration the run was built from.
    pub config: RunConfig,
    /// Ground truth after the last step.
    pub final_truth: GroundTruthSnapshot,
    /// Estimates after the last step.
    pub final_estimates: EstimateSnapshot,
    /// Analytics keyed by step, in collection order.
    pub reports: IndexMap<StepId, AnalyticsReport>,
    /// Movement and observation events, interleaved in execution order.
    pub events: Vec<Event>,
}

impl RunResults {
    /// The most recent analytics report.
    pub fn last_report(&self) -> Option<&AnalyticsReport> {
        self.reports.last().map(|(_, r)| r)
    }

    /// Number of steps whose move actually relocated an item.
    pub fn moves(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Movement(m) if m.moved()))
            .count()
    }
}

// ── LockstepRun ─────────────────────────────────────────────────

/// A Simulator + Observer pair advanced one step at a time.
///
/// # Example
///
/// ```
/// use shelf_core::{ShelfId, StepId};
/// use shelf_engine::{LockstepRun, RunConfig};
/// use shelf_sim::ShelfLayout;
///
/// let mut run = LockstepRun::new(RunConfig::with_layout(ShelfLayout::new(20, 100, 50))).unwrap();
/// let r = run.step_sync().unwrap();
/// assert_eq!(r.observation.step, StepId(1));
/// assert_eq!(r.observation.shelf, ShelfId(1));
///
/// let results = run.run(99, 10).unwrap();
/// assert_eq!(results.final_truth.total(), 50);
/// assert_eq!(results.reports.len(), 11);
/// ```
pub struct LockstepRun {
    config: RunConfig,
    simulator: Simulator,
    observer: Observer,
    step: StepId,
}

impl LockstepRun {
    /// Validate `config` and build both components.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError`] found by [`RunConfig::validate()`].
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let simulator = Simulator::new(config.seed).with_trap(config.trap);
        let observer = Observer::with_process_noise(config.process_noise)?;
        let mut run = Self {
            config,
            simulator,
            observer,
            step: StepId(0),
        };
        run.initialize()?;
        Ok(run)
    }

    fn initialize(&mut self) -> Result<(), ConfigError> {
        let layout = self.config.layout;
        self.simulator.initialize(layout)?;
        self.observer.initialize(
            layout.shelf_count,
            self.config.unobservable,
            layout.total_items,
        )?;
        self.step = StepId(0);
        Ok(())
    }

    /// Return to step 0 with the same configuration.
    ///
    /// The simulator re-seeds, so the run replays exactly.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.initialize()
    }

    /// Advance one step: simulator move, then observation.
    ///
    /// # Errors
    ///
    /// [`StepError::NoMovableItems`] when the layout has zero items; the
    /// simulator has not moved and the step counter does not advance.
    ///
    /// If the observation fails after the simulator has moved, the
    /// simulator's own step count is already ahead of
    /// [`current_step()`](Self::current_step). A validated config never
    /// reaches that branch since the observer and simulator share one
    /// layout.
    pub fn step_sync(&mut self) -> Result<StepResult, StepError> {
        let movement = self.simulator.step()?;
        let step = self.step.next();
        let observation = self.observer.step(&self.simulator, step)?;
        self.step = step;
        Ok(StepResult {
            movement,
            observation,
        })
    }

    /// Run `num_steps` steps, collecting an [`AnalyticsReport`] before the
    /// first step and every `report_interval` steps.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroReportInterval`] if `report_interval` is 0, or
    /// the first step or metrics failure.
    pub fn run(&mut self, num_steps: u64, report_interval: u64) -> Result<RunResults, RunError> {
        if report_interval == 0 {
            return Err(ConfigError::ZeroReportInterval.into());
        }
        let mut reports = IndexMap::new();
        let mut events = Vec::new();
        reports.insert(self.step, self.analytics()?);

        for _ in 0..num_steps {
            let r = self.step_sync()?;
            events.push(Event::Movement(r.movement));
            events.push(Event::Observation(r.observation));
            if self.step.0 % report_interval == 0 {
                let report = self.analytics()?;
                debug!(
                    step = %self.step,
                    mae = report.mean_absolute_error,
                    unobservable_error = report.unobservable_error,
                    "analytics collected"
                );
                reports.insert(self.step, report);
            }
        }

        let results = RunResults {
            config: self.config.clone(),
            final_truth: self.truth()?,
            final_estimates: self.estimates()?,
            reports,
            events,
        };
        info!(
            seed = self.config.seed,
            steps = num_steps,
            final_step = %self.step,
            moves = results.moves(),
            "run complete"
        );
        Ok(results)
    }

    /// Analytics for the current step.
    pub fn analytics(&self) -> Result<AnalyticsReport, RunError> {
        let truth = self.truth()?;
        let estimates = self.estimates()?;
        let trap = self.config.trap.map(|t| t.shelf);
        Ok(AnalyticsReport::collect(&truth, &estimates, trap)?)
    }

    /// Ground-truth snapshot.
    pub fn truth(&self) -> Result<GroundTruthSnapshot, QueryError> {
        self.simulator.snapshot()
    }

    /// Estimate snapshot.
    pub fn estimates(&self) -> Result<EstimateSnapshot, QueryError> {
        self.observer.snapshot()
    }

    /// Steps completed (0 after construction or reset).
    pub fn current_step(&self) -> StepId {
        self.step
    }

    /// The configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The simulator.
    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// The observer.
    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}

impl fmt::Debug for LockstepRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockstepRun")
            .field("current_step", &self.step)
            .field("seed", &self.config.seed)
            .field("shelf_count", &self.config.layout.shelf_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::ShelfId;
    use shelf_sim::ShelfLayout;
    use shelf_test_utils::fixtures::{empty_layout, reference_layout};

    fn run_with(layout: ShelfLayout, seed: u64) -> LockstepRun {
        LockstepRun::new(RunConfig::with_layout(layout).seeded(seed)).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = RunConfig::with_layout(ShelfLayout::new(5, 2, 11));
        assert!(matches!(
            LockstepRun::new(cfg),
            Err(ConfigError::TotalExceedsCapacity { .. })
        ));
    }

    #[test]
    fn step_indices_are_one_based_and_shared() {
        let mut run = run_with(reference_layout(), 3);
        for k in 1..=5 {
            let r = run.step_sync().unwrap();
            assert_eq!(r.movement.step, StepId(k));
            assert_eq!(r.observation.step, StepId(k));
            assert_eq!(r.observation.shelf, ShelfId(k as u32));
        }
        assert_eq!(run.current_step(), StepId(5));
    }

    #[test]
    fn observation_sees_post_move_truth() {
        let mut run = run_with(reference_layout(), 8);
        for _ in 0..40 {
            let r = run.step_sync().unwrap();
            let truth = run.simulator().quantity_of(r.observation.shelf).unwrap();
            assert_eq!(r.observation.true_quantity, truth);
        }
    }

    #[test]
    fn empty_ring_fails_without_advancing() {
        let mut run = run_with(empty_layout(5), 0);
        assert_eq!(run.step_sync(), Err(StepError::NoMovableItems));
        assert_eq!(run.current_step(), StepId(0));
        assert_eq!(
            run.run(10, 5).unwrap_err(),
            RunError::Step(StepError::NoMovableItems)
        );
    }

    #[test]
    fn huge_step_count_on_empty_ring_is_an_error() {
        let mut run = run_with(empty_layout(5), 0);
        assert_eq!(
            run.run(u64::MAX / 2 + 1, 1).unwrap_err(),
            RunError::Step(StepError::NoMovableItems)
        );
    }

    #[test]
    fn zero_report_interval_rejected() {
        let mut run = run_with(reference_layout(), 0);
        assert_eq!(
            run.run(10, 0).unwrap_err(),
            RunError::Config(ConfigError::ZeroReportInterval)
        );
    }

    #[test]
    fn run_collects_reports_at_interval() {
        let mut run = run_with(reference_layout(), 1);
        let results = run.run(100, 25).unwrap();
        let keys: Vec<u64> = results.reports.keys().map(|s| s.0).collect();
        assert_eq!(keys, vec![0, 25, 50, 75, 100]);
        assert_eq!(results.events.len(), 200);
        assert_eq!(results.events[0].step(), StepId(1));
        assert!(matches!(results.events[1], Event::Observation(_)));
        assert_eq!(results.final_truth.total(), 50);
        assert_eq!(results.last_report().unwrap().step, StepId(100));
    }

    #[test]
    fn reset_replays_identically() {
        let mut run = run_with(reference_layout(), 12);
        let first: Vec<_> = (0..30).map(|_| run.step_sync().unwrap()).collect();
        run.reset().unwrap();
        assert_eq!(run.current_step(), StepId(0));
        let second: Vec<_> = (0..30).map(|_| run.step_sync().unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn run_error_sources() {
        let e = RunError::from(StepError::NoMovableItems);
        assert!(e.source().is_some());
        assert!(e.to_string().contains("no movable items"));
    }
}
