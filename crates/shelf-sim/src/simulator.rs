//! The ground-truth simulator.
//!
//! # Ownership model
//!
//! [`Simulator`] exclusively owns the per-shelf quantities. The only
//! mutating operations are [`initialize()`](Simulator::initialize) and
//! [`step()`](Simulator::step), both of which take `&mut self`; readers
//! (the observer, metrics, snapshots) hold `&Simulator` or an owned
//! [`GroundTruthSnapshot`]. The borrow checker therefore guarantees that no
//! reader can see the decrement of a move without its matching increment.

use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shelf_core::{ConfigError, QueryError, QuantitySource, ShelfId, StepError, StepId};
use shelf_space::{Direction, Ring};
use tracing::{debug, trace};

use crate::event::{MoveOutcome, MovementEvent};
use crate::layout::ShelfLayout;
use crate::snapshot::GroundTruthSnapshot;

/// A shelf that stops releasing items from a given simulator step on.
///
/// Before `from_step` the shelf behaves normally. From then on it is never
/// chosen as a move source, so items that reach it stay there. Items can
/// still move onto it while it has room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapPolicy {
    /// The trapping shelf.
    pub shelf: ShelfId,
    /// Simulator step count at which trapping begins.
    pub from_step: u64,
}

impl TrapPolicy {
    fn active_at(&self, steps_taken: u64) -> bool {
        steps_taken >= self.from_step
    }
}

/// Ground truth after initialization.
#[derive(Debug)]
struct GroundTruth {
    ring: Ring,
    layout: ShelfLayout,
    quantities: Vec<u32>,
    steps_taken: u64,
}

impl GroundTruth {
    fn total(&self) -> u64 {
        self.quantities.iter().map(|&q| u64::from(q)).sum()
    }

    fn check(&self, shelf: ShelfId) -> Result<usize, QueryError> {
        if self.ring.contains(shelf) {
            Ok(shelf.index())
        } else {
            Err(QueryError::InvalidShelf {
                shelf,
                shelf_count: self.ring.len(),
            })
        }
    }
}

/// Exact item counts on a ring of shelves, advanced one move at a time.
///
/// Created uninitialized by [`new()`](Simulator::new); every query and
/// step fails with `NotInitialized` until [`initialize()`](Simulator::initialize)
/// (or [`initialize_from()`](Simulator::initialize_from)) succeeds.
///
/// # Example
///
/// ```
/// use shelf_core::ShelfId;
/// use shelf_sim::{ShelfLayout, Simulator};
///
/// let mut sim = Simulator::new(42);
/// sim.initialize(ShelfLayout::new(20, 100, 50)).unwrap();
/// for _ in 0..100 {
///     sim.step().unwrap();
/// }
/// let total: u64 = (0..20).map(|i| u64::from(sim.quantity_of(ShelfId(i)).unwrap())).sum();
/// assert_eq!(total, 50);
/// ```
pub struct Simulator {
    seed: u64,
    rng: ChaCha8Rng,
    trap: Option<TrapPolicy>,
    state: Option<GroundTruth>,
}

impl Simulator {
    /// Create an uninitialized simulator whose randomness derives from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            trap: None,
            state: None,
        }
    }

    /// Install (or clear) a trap shelf. Takes effect at the next
    /// `initialize()`, which validates the shelf against the ring.
    pub fn with_trap(mut self, trap: Option<TrapPolicy>) -> Self {
        self.trap = trap;
        self
    }

    /// Build ground truth for `layout`, scattering its items at random.
    ///
    /// Re-seeds the RNG from the construction seed and resets the step
    /// counter, so `initialize` followed by N steps always replays the same
    /// trajectory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the layout is invalid (fewer than 3
    /// shelves, zero capacity, more items than the ring can hold) or the
    /// trap shelf is off the ring. The simulator is left unchanged.
    pub fn initialize(&mut self, layout: ShelfLayout) -> Result<(), ConfigError> {
        let ring = self.validate(&layout)?;
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        let quantities = layout.pack(&mut self.rng);
        self.install(ring, layout, quantities);
        Ok(())
    }

    /// Build ground truth from an explicit per-shelf distribution.
    ///
    /// The shelf count and item total are taken from `quantities`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ShelfOverCapacity`] if any shelf exceeds
    /// `capacity`, plus every error [`initialize()`](Self::initialize) can
    /// return.
    pub fn initialize_from(&mut self, capacity: u32, quantities: Vec<u32>) -> Result<(), ConfigError> {
        let layout = ShelfLayout {
            shelf_count: u32::try_from(quantities.len()).unwrap_or(u32::MAX),
            capacity,
            total_items: quantities.iter().map(|&q| u64::from(q)).sum(),
        };
        let ring = self.validate(&layout)?;
        if let Some((i, &q)) = quantities.iter().enumerate().find(|&(_, &q)| q > capacity) {
            return Err(ConfigError::ShelfOverCapacity {
                shelf: ShelfId(i as u32),
                quantity: q,
                capacity,
            });
        }
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.install(ring, layout, quantities);
        Ok(())
    }

    fn validate(&self, layout: &ShelfLayout) -> Result<Ring, ConfigError> {
        layout.validate()?;
        let ring = Ring::new(layout.shelf_count).map_err(|_| ConfigError::RingTooSmall {
            shelf_count: layout.shelf_count,
        })?;
        if let Some(trap) = self.trap {
            if !ring.contains(trap.shelf) {
                return Err(ConfigError::TrapShelfOutOfRange {
                    shelf: trap.shelf,
                    shelf_count: layout.shelf_count,
                });
            }
        }
        Ok(ring)
    }

    fn install(&mut self, ring: Ring, layout: ShelfLayout, quantities: Vec<u32>) {
        debug!(
            shelf_count = layout.shelf_count,
            capacity = layout.capacity,
            total_items = layout.total_items,
            seed = self.seed,
            "simulator initialized"
        );
        self.state = Some(GroundTruth {
            ring,
            layout,
            quantities,
            steps_taken: 0,
        });
    }

    /// Attempt to move exactly one item to a neighbouring shelf.
    ///
    /// 1. Pick a non-empty shelf uniformly at random (skipping an active
    ///    trap shelf).
    /// 2. Pick left or right uniformly at random.
    /// 3. If the destination is full, nothing changes
    ///    ([`MoveOutcome::Blocked`]). The move is not retried.
    /// 4. Otherwise decrement the source and increment the destination.
    ///
    /// # Errors
    ///
    /// [`StepError::NotInitialized`] before `initialize()`, and
    /// [`StepError::NoMovableItems`] when the ring holds zero items.
    pub fn step(&mut self) -> Result<MovementEvent, StepError> {
        let state = self.state.as_mut().ok_or(StepError::NotInitialized)?;
        if state.layout.total_items == 0 {
            return Err(StepError::NoMovableItems);
        }

        let trapped = self
            .trap
            .filter(|t| t.active_at(state.steps_taken))
            .map(|t| t.shelf.index());
        let sources: Vec<usize> = state
            .quantities
            .iter()
            .enumerate()
            .filter(|&(i, &q)| q > 0 && Some(i) != trapped)
            .map(|(i, _)| i)
            .collect();

        state.steps_taken += 1;
        let step = StepId(state.steps_taken);

        if sources.is_empty() {
            trace!(%step, "no eligible source shelf");
            return Ok(MovementEvent {
                step,
                outcome: MoveOutcome::Idle,
            });
        }

        let src = sources[self.rng.random_range(0..sources.len())];
        let direction = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
        let source = ShelfId(src as u32);
        let destination = state
            .ring
            .neighbour(source, direction)
            .map_err(|_| QueryError::InvalidShelf {
                shelf: source,
                shelf_count: state.ring.len(),
            })?;
        let dst = destination.index();

        let outcome = if state.quantities[dst] >= state.layout.capacity {
            trace!(%step, %source, %destination, %direction, "move blocked: destination full");
            MoveOutcome::Blocked {
                source,
                destination,
                direction,
            }
        } else {
            state.quantities[src] -= 1;
            state.quantities[dst] += 1;
            trace!(%step, %source, %destination, %direction, "item moved");
            MoveOutcome::Moved {
                source,
                destination,
                direction,
            }
        };

        debug_assert_eq!(state.total(), state.layout.total_items);
        Ok(MovementEvent { step, outcome })
    }

    /// Exact quantity on `shelf`.
    pub fn quantity_of(&self, shelf: ShelfId) -> Result<u32, QueryError> {
        let state = self.state.as_ref().ok_or(QueryError::NotInitialized)?;
        let i = state.check(shelf)?;
        Ok(state.quantities[i])
    }

    /// Copy of the full shelf → quantity table.
    pub fn snapshot(&self) -> Result<GroundTruthSnapshot, QueryError> {
        let state = self.state.as_ref().ok_or(QueryError::NotInitialized)?;
        Ok(GroundTruthSnapshot::new(
            StepId(state.steps_taken),
            state.layout.capacity,
            state.quantities.clone(),
        ))
    }

    /// Whether `initialize()` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// The layout in use, if initialized.
    pub fn layout(&self) -> Option<ShelfLayout> {
        self.state.as_ref().map(|s| s.layout)
    }

    /// The ring topology, if initialized.
    pub fn ring(&self) -> Option<Ring> {
        self.state.as_ref().map(|s| s.ring)
    }

    /// Number of `step()` calls since the last initialization.
    pub fn steps_taken(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.steps_taken)
    }

    /// The construction seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The trap policy, if any.
    pub fn trap(&self) -> Option<TrapPolicy> {
        self.trap
    }
}

impl QuantitySource for Simulator {
    fn shelf_count(&self) -> Option<u32> {
        self.state.as_ref().map(|s| s.ring.len())
    }

    fn quantity_of(&self, shelf: ShelfId) -> Result<u32, QueryError> {
        Simulator::quantity_of(self, shelf)
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("seed", &self.seed)
            .field("initialized", &self.is_initialized())
            .field("steps_taken", &self.steps_taken())
            .field("trap", &self.trap)
            .finish()
    }
}
