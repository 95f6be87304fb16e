//! Per-shelf estimate records.

use std::fmt;

use shelf_core::StepId;

/// Staleness counter: steps since a shelf was last observed.
///
/// Observing a shelf resets it to [`ZERO`](Self::ZERO); every other step
/// adds one. [`INFERRED`](Self::INFERRED) is reserved for the unobservable
/// shelf, whose value is never measured, and ordinary increments saturate
/// one below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uncertainty(pub u64);

impl Uncertainty {
    /// Just observed.
    pub const ZERO: Self = Self(0);

    /// Marker for an estimate derived by inference rather than observation.
    pub const INFERRED: Self = Self(u64::MAX);

    /// One more step without an observation.
    pub fn incremented(self) -> Self {
        if self == Self::INFERRED {
            return self;
        }
        Self(self.0.saturating_add(1).min(u64::MAX - 1))
    }

    /// Whether this is the inference marker.
    pub fn is_inferred(self) -> bool {
        self == Self::INFERRED
    }
}

impl fmt::Display for Uncertainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inferred() {
            write!(f, "inferred")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The observer's belief about one shelf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EstimateRecord {
    /// Best guess at the quantity. `None` until the shelf is first
    /// observed (or, for the unobservable shelf, first inferred). The
    /// inferred value may fall outside `[0, capacity]`.
    pub estimated_quantity: Option<i64>,
    /// Step at which the shelf was last observed; `None` if never.
    pub last_observed_step: Option<StepId>,
    /// Steps since the last observation.
    pub uncertainty: Uncertainty,
}

impl EstimateRecord {
    /// A record for a shelf that has never been observed.
    pub const UNOBSERVED: Self = Self {
        estimated_quantity: None,
        last_observed_step: None,
        uncertainty: Uncertainty::ZERO,
    };

    /// A record for the unobservable shelf before any inference.
    pub const UNINFERRED: Self = Self {
        estimated_quantity: None,
        last_observed_step: None,
        uncertainty: Uncertainty::INFERRED,
    };

    /// The estimate, with never-observed shelves counted as zero.
    pub fn quantity_or_zero(&self) -> i64 {
        self.estimated_quantity.unwrap_or(0)
    }

    /// Whether the shelf has been observed at least once.
    pub fn is_observed(&self) -> bool {
        self.last_observed_step.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_saturates_below_inferred() {
        assert_eq!(Uncertainty::ZERO.incremented(), Uncertainty(1));
        let near = Uncertainty(u64::MAX - 1);
        assert_eq!(near.incremented(), near);
        assert!(!near.incremented().is_inferred());
        assert_eq!(Uncertainty::INFERRED.incremented(), Uncertainty::INFERRED);
    }

    #[test]
    fn display() {
        assert_eq!(Uncertainty(3).to_string(), "3");
        assert_eq!(Uncertainty::INFERRED.to_string(), "inferred");
    }

    #[test]
    fn unobserved_counts_as_zero() {
        assert_eq!(EstimateRecord::UNOBSERVED.quantity_or_zero(), 0);
        assert!(!EstimateRecord::UNOBSERVED.is_observed());
        assert!(EstimateRecord::UNINFERRED.uncertainty.is_inferred());
    }
}
