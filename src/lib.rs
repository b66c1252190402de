//! # lane-combat
//!
//! Combat-resolution core for a turn-based, lane-positioned card battler.
//!
//! ## Design Principles
//!
//! 1. **Host-Owned Units**: The core never owns unit state. Units are opaque
//!    `UnitId` handles whose health and AP are reached through the
//!    `UnitCapabilities` contract.
//!
//! 2. **One Lane Table**: `PositionResolver::to_lane` is the single source of
//!    lane semantics. Ally and Enemy use mirrored tables.
//!
//! 3. **Explicit Context**: Board, units and card data are passed in; there
//!    are no global registries.
//!
//! 4. **Closed Effect Set**: Effects are a tagged union dispatched through
//!    one exhaustive match.
//!
//! ## Flow of a play
//!
//! caller → `CardPlayResolver::play_card` → board queries (and a
//! `TargetingSession` for manual picks) → `EffectPipeline::execute` → board
//! and unit mutation → `PlayEvent::Finished`.
//!
//! ## Modules
//!
//! - `core`: Unit handles, sides, capabilities, RNG, configuration
//! - `board`: Lanes, slots, two-phase layout, occupancy and knockback
//! - `cards`: Card definitions and the card library
//! - `effects`: Effect kinds and the execution pipeline
//! - `targeting`: Manual target selection
//! - `play`: The card-play state machine

pub mod core;
pub mod board;
pub mod cards;
pub mod effects;
pub mod targeting;
pub mod play;

// Re-export commonly used types
pub use crate::core::{
    ActionPoints, ApConsumer, BoardConfig, CombatRng, CombatRngState, CombatUnit, Damageable,
    Health, LayoutStyle, ResolverConfig, Side, SideMap, UnitCapabilities, UnitId, UnitRoster,
};

pub use crate::board::{
    Anchor, Board, BoardLayout, Displacement, KnockbackError, Lane, LayoutError, Placement,
    PositionResolver, RegisterError, Slot, SlotKey,
};

pub use crate::cards::{CardDefinition, CardId, CardLibrary, LibraryError, TargetType};

pub use crate::effects::{Effect, EffectContext, EffectOutcome, EffectPipeline, SkipReason};

pub use crate::targeting::{Selection, SessionTicket, TargetingSession};

pub use crate::play::{
    CardPlayResolver, CombatContext, ErrorLabel, PlayError, PlayEvent, PlayOutcome, PlayPhase,
    PlayStatus,
};
