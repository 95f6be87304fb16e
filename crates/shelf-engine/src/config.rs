//! Run configuration and validation.
//!
//! [`RunConfig`] bundles everything needed to build a Simulator + Observer
//! pair. [`validate()`](RunConfig::validate) checks every input up front so
//! that [`LockstepRun::new`](crate::LockstepRun::new) either builds both
//! components or neither.

use shelf_core::{ConfigError, ShelfId};
use shelf_obs::TotalEstimator;
use shelf_sim::{ShelfLayout, TrapPolicy};

/// Complete configuration for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Ring size, capacity and item count.
    pub layout: ShelfLayout,
    /// The shelf the observer never reads. Conventionally shelf 0.
    pub unobservable: ShelfId,
    /// Seed for the simulator's RNG.
    pub seed: u64,
    /// Kalman process noise. Default: 0.1.
    pub process_noise: f64,
    /// Optional trap shelf. Default: none.
    pub trap: Option<TrapPolicy>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            layout: ShelfLayout::default(),
            unobservable: ShelfId(0),
            seed: 0,
            process_noise: TotalEstimator::DEFAULT_PROCESS_NOISE,
            trap: None,
        }
    }
}

impl RunConfig {
    /// A default config with the given layout.
    pub fn with_layout(layout: ShelfLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Replace the seed.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every structural invariant.
    ///
    /// Checked in order: layout, unobservable shelf, process noise, trap
    /// shelf. Returns the first failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Layout: ring size, capacity, item total.
        self.layout.validate()?;
        let shelf_count = self.layout.shelf_count;
        // 2. Unobservable shelf on the ring.
        if self.unobservable.0 >= shelf_count {
            return Err(ConfigError::UnobservableOutOfRange {
                shelf: self.unobservable,
                shelf_count,
            });
        }
        // 3. Process noise finite and non-negative.
        TotalEstimator::new(self.process_noise)?;
        // 4. Trap shelf on the ring.
        if let Some(trap) = self.trap {
            if trap.shelf.0 >= shelf_count {
                return Err(ConfigError::TrapShelfOutOfRange {
                    shelf: trap.shelf,
                    shelf_count,
                });
            }
        }
        Ok(())
    }
}
