//! Test utilities and mock types for shelf development.
//!
//! Provides [`MockShelves`], a scripted [`QuantitySource`] that lets
//! observer tests control ground truth directly, and layout [`fixtures`]
//! shared by the engine tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::collections::HashSet;

use shelf_core::{QueryError, QuantitySource, ShelfId};

/// Mock implementation of [`QuantitySource`].
///
/// Backed by a plain `Vec<u32>`. Quantities can be changed between
/// observer steps with [`set_quantity`](MockShelves::set_quantity), and
/// individual shelves can be made to fail with
/// [`fail_on`](MockShelves::fail_on). Every successful or failed query is
/// recorded for inspection via [`queries`](MockShelves::queries).
pub struct MockShelves {
    quantities: Option<Vec<u32>>,
    failing: HashSet<ShelfId>,
    log: RefCell<Vec<ShelfId>>,
}

impl MockShelves {
    pub fn new(quantities: Vec<u32>) -> Self {
        Self {
            quantities: Some(quantities),
            failing: HashSet::new(),
            log: RefCell::new(Vec::new()),
        }
    }

    /// A source that reports itself as not yet initialized.
    pub fn uninitialized() -> Self {
        Self {
            quantities: None,
            failing: HashSet::new(),
            log: RefCell::new(Vec::new()),
        }
    }

    /// `shelf_count` shelves, all holding `quantity`.
    pub fn uniform(shelf_count: u32, quantity: u32) -> Self {
        Self::new(vec![quantity; shelf_count as usize])
    }

    /// Overwrite one shelf's quantity. Panics if out of range.
    pub fn set_quantity(&mut self, shelf: ShelfId, quantity: u32) {
        let q = self
            .quantities
            .as_mut()
            .expect("MockShelves::set_quantity on uninitialized mock");
        q[shelf.index()] = quantity;
    }

    /// Move one item from `from` to `to`, mimicking a simulator step.
    pub fn move_item(&mut self, from: ShelfId, to: ShelfId) {
        let q = self
            .quantities
            .as_mut()
            .expect("MockShelves::move_item on uninitialized mock");
        q[from.index()] -= 1;
        q[to.index()] += 1;
    }

    /// Make queries for `shelf` fail with [`QueryError::InvalidShelf`].
    pub fn fail_on(&mut self, shelf: ShelfId) {
        self.failing.insert(shelf);
    }

    /// Sum of all quantities.
    pub fn total(&self) -> u64 {
        self.quantities
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|&q| u64::from(q))
            .sum()
    }

    /// Shelves queried so far, in order.
    pub fn queries(&self) -> Vec<ShelfId> {
        self.log.borrow().clone()
    }

    /// Forget the query log.
    pub fn clear_queries(&self) {
        self.log.borrow_mut().clear();
    }
}

impl QuantitySource for MockShelves {
    fn shelf_count(&self) -> Option<u32> {
        self.quantities.as_ref().map(|q| q.len() as u32)
    }

    fn quantity_of(&self, shelf: ShelfId) -> Result<u32, QueryError> {
        self.log.borrow_mut().push(shelf);
        let q = self.quantities.as_ref().ok_or(QueryError::NotInitialized)?;
        let invalid = QueryError::InvalidShelf {
            shelf,
            shelf_count: q.len() as u32,
        };
        if self.failing.contains(&shelf) {
            return Err(invalid);
        }
        q.get(shelf.index()).copied().ok_or(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_reports_and_logs() {
        let mut m = MockShelves::new(vec![1, 2, 3]);
        assert_eq!(m.shelf_count(), Some(3));
        assert_eq!(m.quantity_of(ShelfId(2)), Ok(3));
        m.move_item(ShelfId(2), ShelfId(0));
        assert_eq!(m.quantity_of(ShelfId(0)), Ok(2));
        assert_eq!(m.total(), 6);
        m.fail_on(ShelfId(1));
        assert!(m.quantity_of(ShelfId(1)).is_err());
        assert_eq!(m.queries(), vec![ShelfId(2), ShelfId(0), ShelfId(1)]);
    }

    #[test]
    fn uninitialized_mock() {
        let m = MockShelves::uninitialized();
        assert_eq!(m.shelf_count(), None);
        assert_eq!(m.quantity_of(ShelfId(0)), Err(QueryError::NotInitialized));
    }
}
