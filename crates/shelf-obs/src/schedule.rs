//! Fixed cyclic observation order.

use shelf_core::{ConfigError, ShelfId};

/// Ascending cyclic sequence over every shelf except one.
///
/// The first [`advance()`](Self::advance) yields the lowest observable
/// shelf; after the highest it wraps back to the lowest. The period is
/// `shelf_count - 1` and each period visits every observable shelf exactly
/// once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundRobinSchedule {
    order: Vec<ShelfId>,
    cursor: Option<usize>,
}

impl RoundRobinSchedule {
    /// Build the schedule for `shelf_count` shelves, skipping `excluded`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnobservableOutOfRange`] if `excluded` is not a shelf,
    /// [`ConfigError::DegenerateSchedule`] if fewer than two shelves remain.
    pub fn new(shelf_count: u32, excluded: ShelfId) -> Result<Self, ConfigError> {
        if excluded.0 >= shelf_count {
            return Err(ConfigError::UnobservableOutOfRange {
                shelf: excluded,
                shelf_count,
            });
        }
        let observable = shelf_count - 1;
        if observable < 2 {
            return Err(ConfigError::DegenerateSchedule { observable });
        }
        let order = (0..shelf_count)
            .map(ShelfId)
            .filter(|&s| s != excluded)
            .collect();
        Ok(Self {
            order,
            cursor: None,
        })
    }

    /// Observable shelves in schedule order.
    pub fn observable(&self) -> &[ShelfId] {
        &self.order
    }

    /// Number of steps before the schedule repeats.
    pub fn period(&self) -> usize {
        self.order.len()
    }

    /// Whether `shelf` appears in the schedule.
    pub fn contains(&self, shelf: ShelfId) -> bool {
        self.order.binary_search(&shelf).is_ok()
    }

    /// The shelf the next [`advance()`](Self::advance) will return.
    pub fn peek_next(&self) -> ShelfId {
        self.order[self.next_index()]
    }

    /// Move the cursor forward one position and return the shelf under it.
    pub fn advance(&mut self) -> ShelfId {
        let next = self.next_index();
        self.cursor = Some(next);
        self.order[next]
    }

    /// The shelf most recently returned by `advance()`.
    pub fn current(&self) -> Option<ShelfId> {
        self.cursor.map(|i| self.order[i])
    }

    /// Return to the state before the first `advance()`.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    fn next_index(&self) -> usize {
        match self.cursor {
            None => 0,
            Some(i) => (i + 1) % self.order.len(),
        }
    }
}
