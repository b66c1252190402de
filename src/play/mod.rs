//! Card play: the resolver state machine and what it reports.
//!
//! ## Key Types
//!
//! - `CardPlayResolver`: validates a play, resolves targets, runs effects
//! - `CombatContext`: the board and unit capabilities a play works on
//! - `PlayEvent`: notifications for subscribers (started, hint, error, finished)
//! - `PlayStatus` / `PlayOutcome`: what a resolver call returns
//! - `ErrorLabel`: recoverable play failures
//! - `PlayError`: refused calls

mod error;
mod event;
mod resolver;

pub use error::{ErrorLabel, PlayError};
pub use event::{PlayEvent, PlayOutcome, PlayStatus};
pub use resolver::{CardPlayResolver, CombatContext, PlayListener, PlayPhase};
