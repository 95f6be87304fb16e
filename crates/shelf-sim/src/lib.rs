//! Ground-truth simulator for the shelf ring inventory.
//!
//! The [`Simulator`] owns the exact item count on every shelf and is the
//! only component allowed to change it. Each [`step()`](Simulator::step)
//! attempts to move one item from a random non-empty shelf to one of its
//! two ring neighbours; a move into a full shelf is rejected and the step
//! becomes a no-op. Items are never created or destroyed.
//!
//! Randomness comes from a seeded `ChaCha8Rng` owned by the simulator, so
//! a run is fully determined by its seed and [`ShelfLayout`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod event;
pub mod layout;
pub mod simulator;
pub mod snapshot;

pub use event::{MoveOutcome, MovementEvent};
pub use layout::ShelfLayout;
pub use simulator::{Simulator, TrapPolicy};
pub use snapshot::GroundTruthSnapshot;
