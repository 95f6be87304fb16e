//! Scalar Kalman filter over the observable item total.
//!
//! The hidden state is the number of items on observable shelves, modelled
//! as a random walk (items drift on and off the unobservable shelf). Each
//! step's measurement is the sum of the current per-shelf estimates, whose
//! noise grows with their combined staleness.

use shelf_core::ConfigError;

/// Kalman estimator for the number of items on observable shelves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TotalEstimator {
    estimate: f64,
    variance: f64,
    process_noise: f64,
}

impl TotalEstimator {
    /// Prior mean.
    pub const INITIAL_ESTIMATE: f64 = 0.0;
    /// Prior variance: effectively uninformed.
    pub const INITIAL_VARIANCE: f64 = 1000.0;
    /// Default random-walk variance per step.
    pub const DEFAULT_PROCESS_NOISE: f64 = 0.1;
    /// Measurement variance when every estimate is fresh.
    pub const BASE_MEASUREMENT_NOISE: f64 = 10.0;
    /// Extra measurement variance per unit of summed staleness.
    pub const STALENESS_NOISE: f64 = 0.5;

    /// Create a filter with the given process noise `q`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidProcessNoise`] if `q` is NaN, infinite or
    /// negative.
    pub fn new(process_noise: f64) -> Result<Self, ConfigError> {
        if !process_noise.is_finite() || process_noise < 0.0 {
            return Err(ConfigError::InvalidProcessNoise {
                value: process_noise,
            });
        }
        Ok(Self {
            estimate: Self::INITIAL_ESTIMATE,
            variance: Self::INITIAL_VARIANCE,
            process_noise,
        })
    }

    /// Current state estimate.
    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    /// Current posterior variance.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Configured process noise.
    pub fn process_noise(&self) -> f64 {
        self.process_noise
    }

    /// Measurement variance for a given summed staleness.
    pub fn measurement_noise(total_staleness: u64) -> f64 {
        Self::BASE_MEASUREMENT_NOISE + Self::STALENESS_NOISE * total_staleness as f64
    }

    /// Predict then correct with measurement `z` of variance `r`.
    ///
    /// Returns the gain used.
    pub fn update(&mut self, z: f64, r: f64) -> f64 {
        let predicted = self.variance + self.process_noise;
        let gain = predicted / (predicted + r);
        self.estimate += gain * (z - self.estimate);
        self.variance = (1.0 - gain) * predicted;
        gain
    }

    /// Return to the prior, keeping the process noise.
    pub fn reset(&mut self) {
        self.estimate = Self::INITIAL_ESTIMATE;
        self.variance = Self::INITIAL_VARIANCE;
    }
}

impl Default for TotalEstimator {
    fn default() -> Self {
        Self {
            estimate: Self::INITIAL_ESTIMATE,
            variance: Self::INITIAL_VARIANCE,
            process_noise: Self::DEFAULT_PROCESS_NOISE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_bad_process_noise() {
        assert!(TotalEstimator::new(-0.1).is_err());
        assert!(TotalEstimator::new(f64::NAN).is_err());
        assert!(TotalEstimator::new(f64::INFINITY).is_err());
        assert!(TotalEstimator::new(0.0).is_ok());
    }

    #[test]
    fn first_update_worked() {
        let mut k = TotalEstimator::default();
        let gain = k.update(50.0, 10.0);
        let p = 1000.1;
        assert!((gain - p / (p + 10.0)).abs() < 1e-12);
        assert!((k.estimate() - gain * 50.0).abs() < 1e-9);
        assert!((k.variance() - (1.0 - gain) * p).abs() < 1e-9);
    }

    #[test]
    fn converges_to_constant_measurement() {
        let mut k = TotalEstimator::default();
        for _ in 0..500 {
            k.update(42.0, TotalEstimator::measurement_noise(0));
        }
        assert!((k.estimate() - 42.0).abs() < 0.1);
        assert!(k.variance() < TotalEstimator::INITIAL_VARIANCE);
    }

    #[test]
    fn staleness_inflates_measurement_noise() {
        assert_eq!(TotalEstimator::measurement_noise(0), 10.0);
        assert_eq!(TotalEstimator::measurement_noise(20), 20.0);
    }

    #[test]
    fn reset_restores_prior() {
        let mut k = TotalEstimator::new(0.5).unwrap();
        k.update(10.0, 1.0);
        k.reset();
        assert_eq!(k.estimate(), 0.0);
        assert_eq!(k.variance(), 1000.0);
        assert_eq!(k.process_noise(), 0.5);
    }

    proptest! {
        #[test]
        fn variance_stays_positive_and_bounded(
            zs in prop::collection::vec(0.0f64..1000.0, 1..100),
            stale in 0u64..500,
        ) {
            let mut k = TotalEstimator::default();
            for z in zs {
                let before = k.variance() + k.process_noise();
                let gain = k.update(z, TotalEstimator::measurement_noise(stale));
                prop_assert!(gain > 0.0 && gain < 1.0);
                prop_assert!(k.variance() > 0.0);
                prop_assert!(k.variance() < before);
            }
        }
    }
}
