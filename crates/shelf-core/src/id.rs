//! Strongly-typed identifiers for shelves and simulation steps.

use std::fmt;

/// Identifies a shelf on the ring.
///
/// Shelves are numbered `0..shelf_count` in ring order, so `ShelfId(n)`
/// has `ShelfId(n - 1)` and `ShelfId(n + 1)` (modulo the ring length) as
/// its neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShelfId(pub u32);

impl ShelfId {
    /// The shelf index as a `usize`, for indexing per-shelf tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ShelfId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ShelfId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing step counter.
///
/// The lockstep driver numbers steps from 1: `StepId(1)` is the first
/// Simulator move followed by the first observation. `StepId(0)` denotes
/// the initial state before any step has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl StepId {
    /// The step immediately after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shelf_id_index_and_display() {
        let s = ShelfId(7);
        assert_eq!(s.index(), 7);
        assert_eq!(s.to_string(), "7");
        assert_eq!(ShelfId::from(3u32), ShelfId(3));
    }

    #[test]
    fn step_id_next_is_successor() {
        assert_eq!(StepId(0).next(), StepId(1));
        assert_eq!(StepId::from(41u64).next(), StepId(42));
        assert!(StepId(1) < StepId(2));
    }
}
