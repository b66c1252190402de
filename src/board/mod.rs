//! Board model: lanes, slots, layout and the occupancy runtime.
//!
//! ## Startup
//!
//! 1. `BoardLayout` produces the slot set (phase one)
//! 2. `Board::from_layout` validates it and builds the runtime view (phase two)
//!
//! After that, units are bound with `register_unit` and moved only by
//! knockback.

pub mod lane;
pub mod slot;
pub mod layout;
pub mod runtime;

pub use lane::{Lane, PositionResolver};
pub use slot::{Anchor, Placement, Slot, SlotKey};
pub use layout::{BoardLayout, LayoutError};
pub use runtime::{Board, Displacement, KnockbackError, RegisterError, SlotList};
