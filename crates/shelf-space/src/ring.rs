//! Ring of shelves (always-wrap periodic boundary).

use crate::error::TopologyError;
use shelf_core::ShelfId;
use std::fmt;

/// Direction of a single-item move along the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards `shelf - 1` (wrapping to the last shelf from shelf 0).
    Left,
    /// Towards `shelf + 1` (wrapping to shelf 0 from the last shelf).
    Right,
}

impl Direction {
    /// Both directions, in the order used for uniform sampling.
    pub const ALL: [Direction; 2] = [Direction::Left, Direction::Right];

    /// The reverse direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// A ring of `len` shelves.
///
/// Pure topology: holds no quantities and never changes after
/// construction, so the simulator and the observer can each keep a copy.
///
/// # Examples
///
/// ```
/// use shelf_core::ShelfId;
/// use shelf_space::{Direction, Ring};
///
/// let ring = Ring::new(10).unwrap();
/// assert_eq!(ring.neighbours(ShelfId(0)).unwrap(), (ShelfId(9), ShelfId(1)));
/// assert_eq!(ring.neighbour(ShelfId(9), Direction::Right).unwrap(), ShelfId(0));
///
/// // Wrap-around distance: 0 and 9 are 1 step apart, not 9.
/// assert_eq!(ring.distance(ShelfId(0), ShelfId(9)).unwrap(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ring {
    len: u32,
}

impl Ring {
    /// Smallest ring where every shelf has two distinct neighbours.
    pub const MIN_LEN: u32 = 3;

    /// Create a ring of `len` shelves.
    ///
    /// Returns `Err(TopologyError::RingTooSmall)` if `len < 3`.
    pub fn new(len: u32) -> Result<Self, TopologyError> {
        if len < Self::MIN_LEN {
            return Err(TopologyError::RingTooSmall { len });
        }
        Ok(Self { len })
    }

    /// Number of shelves.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Always returns `false`: construction rejects rings under 3 shelves.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `shelf` lies on this ring.
    pub fn contains(&self, shelf: ShelfId) -> bool {
        shelf.0 < self.len
    }

    /// All shelves in ascending index order.
    pub fn shelves(&self) -> impl Iterator<Item = ShelfId> {
        (0..self.len).map(ShelfId)
    }

    fn check(&self, shelf: ShelfId) -> Result<u64, TopologyError> {
        if self.contains(shelf) {
            Ok(u64::from(shelf.0))
        } else {
            Err(TopologyError::ShelfOutOfRange {
                shelf,
                len: self.len,
            })
        }
    }

    /// The `(left, right)` neighbours of `shelf`.
    pub fn neighbours(&self, shelf: ShelfId) -> Result<(ShelfId, ShelfId), TopologyError> {
        let i = self.check(shelf)?;
        let n = u64::from(self.len);
        // Both results are < len, which fits in u32.
        let left = ((i + n - 1) % n) as u32;
        let right = ((i + 1) % n) as u32;
        Ok((ShelfId(left), ShelfId(right)))
    }

    /// The neighbour of `shelf` in `direction`.
    pub fn neighbour(&self, shelf: ShelfId, direction: Direction) -> Result<ShelfId, TopologyError> {
        let (left, right) = self.neighbours(shelf)?;
        Ok(match direction {
            Direction::Left => left,
            Direction::Right => right,
        })
    }

    /// Wrap-aware hop count between two shelves.
    pub fn distance(&self, a: ShelfId, b: ShelfId) -> Result<u32, TopologyError> {
        let a = self.check(a)?;
        let b = self.check(b)?;
        let diff = a.abs_diff(b);
        let wrap = u64::from(self.len) - diff;
        Ok(diff.min(wrap) as u32)
    }
}

/// Neighbours of shelf `i` on a ring of `len` shelves.
///
/// Returns `(left, right)` with `left = (i - 1) mod len` and
/// `right = (i + 1) mod len`. Fails when `len < 3` or `i >= len`.
pub fn neighbours(i: ShelfId, len: u32) -> Result<(ShelfId, ShelfId), TopologyError> {
    Ring::new(len)?.neighbours(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn s(i: u32) -> ShelfId {
        ShelfId(i)
    }

    // ── Neighbour tests ─────────────────────────────────────────

    #[test]
    fn neighbours_interior() {
        let r = Ring::new(5).unwrap();
        assert_eq!(r.neighbours(s(2)).unwrap(), (s(1), s(3)));
    }

    #[test]
    fn neighbours_wrap_left() {
        let r = Ring::new(5).unwrap();
        assert_eq!(r.neighbours(s(0)).unwrap(), (s(4), s(1)));
    }

    #[test]
    fn neighbours_wrap_right() {
        let r = Ring::new(5).unwrap();
        assert_eq!(r.neighbours(s(4)).unwrap(), (s(3), s(0)));
    }

    #[test]
    fn neighbours_len_3_are_distinct() {
        let r = Ring::new(3).unwrap();
        let (l, rr) = r.neighbours(s(0)).unwrap();
        assert_ne!(l, rr);
        assert_eq!((l, rr), (s(2), s(1)));
    }

    #[test]
    fn neighbour_by_direction() {
        let r = Ring::new(20).unwrap();
        assert_eq!(r.neighbour(s(0), Direction::Left).unwrap(), s(19));
        assert_eq!(r.neighbour(s(19), Direction::Right).unwrap(), s(0));
        assert_eq!(r.neighbour(s(7), Direction::Right).unwrap(), s(8));
    }

    #[test]
    fn free_function_matches_ring() {
        assert_eq!(neighbours(s(0), 20).unwrap(), (s(19), s(1)));
        assert!(matches!(
            neighbours(s(0), 2),
            Err(TopologyError::RingTooSmall { len: 2 })
        ));
        assert!(matches!(
            neighbours(s(20), 20),
            Err(TopologyError::ShelfOutOfRange { .. })
        ));
    }

    // ── Distance tests ──────────────────────────────────────────

    #[test]
    fn distance_worked() {
        let r = Ring::new(10).unwrap();
        assert_eq!(r.distance(s(0), s(9)).unwrap(), 1);
        assert_eq!(r.distance(s(2), s(7)).unwrap(), 5);
        assert_eq!(r.distance(s(3), s(3)).unwrap(), 0);
    }

    // ── Constructor tests ───────────────────────────────────────

    #[test]
    fn new_rejects_small_rings() {
        for len in 0..3 {
            assert_eq!(Ring::new(len), Err(TopologyError::RingTooSmall { len }));
        }
        assert!(Ring::new(3).is_ok());
    }

    #[test]
    fn shelves_are_ascending() {
        let r = Ring::new(4).unwrap();
        let all: Vec<_> = r.shelves().collect();
        assert_eq!(all, vec![s(0), s(1), s(2), s(3)]);
    }

    #[test]
    fn direction_opposite_round_trips() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    proptest! {
        #[test]
        fn neighbours_are_mutual(len in 3u32..200, i in 0u32..200) {
            let i = i % len;
            let r = Ring::new(len).unwrap();
            let (left, right) = r.neighbours(s(i)).unwrap();
            prop_assert_eq!(r.neighbour(left, Direction::Right).unwrap(), s(i));
            prop_assert_eq!(r.neighbour(right, Direction::Left).unwrap(), s(i));
            prop_assert_eq!(r.distance(s(i), left).unwrap(), 1);
            prop_assert_eq!(r.distance(s(i), right).unwrap(), 1);
        }

        #[test]
        fn distance_is_symmetric_and_bounded(len in 3u32..100, a in 0u32..100, b in 0u32..100) {
            let r = Ring::new(len).unwrap();
            let (a, b) = (s(a % len), s(b % len));
            let d = r.distance(a, b).unwrap();
            prop_assert_eq!(d, r.distance(b, a).unwrap());
            prop_assert!(d <= len / 2);
        }
    }
}
