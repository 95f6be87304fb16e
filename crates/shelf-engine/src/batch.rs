//! Batched execution of independent runs.
//!
//! [`run_batch`] builds one [`LockstepRun`] per [`RunConfig`] and drives
//! them on scoped worker threads. Runs share nothing: each owns its own
//! Simulator, Observer and RNG, so a batch gives the same per-run results
//! as running every config sequentially.
//!
//! Work is handed out over a `crossbeam-channel` job queue and results
//! come back over a second channel tagged with their input index, so the
//! output order always matches the input order regardless of which worker
//! finished first.

use std::fmt;
use std::num::NonZeroUsize;
use std::thread;

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::lockstep::{LockstepRun, RunError, RunResults};

// ── Error type ──────────────────────────────────────────────────

/// Error from one run of a batch, annotated with its input index.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchError {
    /// The run failed to build or to complete.
    Run {
        /// Index of the config that failed (0-based).
        run_index: usize,
        /// The underlying error.
        error: RunError,
    },
    /// The worker executing this run panicked.
    WorkerLost {
        /// Index of the config whose result was lost.
        run_index: usize,
    },
}

impl BatchError {
    /// Index of the run the error belongs to.
    pub fn run_index(&self) -> usize {
        match self {
            Self::Run { run_index, .. } | Self::WorkerLost { run_index } => *run_index,
        }
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run { run_index, error } => write!(f, "run {run_index}: {error}"),
            Self::WorkerLost { run_index } => {
                write!(f, "run {run_index}: worker thread panicked")
            }
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Run { error, .. } => Some(error),
            Self::WorkerLost { .. } => None,
        }
    }
}

// ── Execution ───────────────────────────────────────────────────

fn execute(
    config: RunConfig,
    num_steps: u64,
    report_interval: u64,
) -> Result<RunResults, RunError> {
    let mut run = LockstepRun::new(config)?;
    run.run(num_steps, report_interval)
}

fn default_workers(jobs: usize) -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(jobs)
}

/// Run every config for `num_steps` steps on up to
/// `available_parallelism()` worker threads.
///
/// Returns one entry per config, in input order.
pub fn run_batch(
    configs: Vec<RunConfig>,
    num_steps: u64,
    report_interval: u64,
) -> Vec<Result<RunResults, BatchError>> {
    let workers = default_workers(configs.len());
    run_batch_with_workers(configs, num_steps, report_interval, workers)
}

/// [`run_batch`] with an explicit worker count (clamped to `[1, configs.len()]`).
pub fn run_batch_with_workers(
    configs: Vec<RunConfig>,
    num_steps: u64,
    report_interval: u64,
    workers: usize,
) -> Vec<Result<RunResults, BatchError>> {
    let n = configs.len();
    if n == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, n);

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, RunConfig)>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    for job in configs.into_iter().enumerate() {
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move || {
                    for (index, config) in job_rx.iter() {
                        let seed = config.seed;
                        let result = execute(config, num_steps, report_interval);
                        debug!(worker, run = index, seed, ok = result.is_ok(), "batch run finished");
                        if result_tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();
        drop(result_tx);
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                warn!(worker, "batch worker panicked");
            }
        }
    });

    let mut slots: Vec<Option<Result<RunResults, RunError>>> = (0..n).map(|_| None).collect();
    for (index, result) in result_rx.iter() {
        slots[index] = Some(result);
    }

    let results: Vec<_> = slots
        .into_iter()
        .enumerate()
        .map(|(run_index, slot)| match slot {
            Some(Ok(r)) => Ok(r),
            Some(Err(error)) => Err(BatchError::Run { run_index, error }),
            None => Err(BatchError::WorkerLost { run_index }),
        })
        .collect();
    info!(
        runs = n,
        workers,
        failed = results.iter().filter(|r| r.is_err()).count(),
        "batch complete"
    );
    results
}
