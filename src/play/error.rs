//! Play failures.
//!
//! Two kinds exist:
//! - `ErrorLabel`: the closed set of recoverable reasons a play fails.
//!   They end the play normally and are reported through `PlayEvent::Error`.
//! - `PlayError`: the call itself was refused; no play took place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::CardId;

/// Recoverable reason a card play ended without resolving.
///
/// `NoTarget` covers both "nothing to hit" and "target type not handled
/// by the combat core"; callers cannot tell the two apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorLabel {
    /// Card disabled, caster cannot spend AP, or caster is not on the board.
    UnitDisabled,
    /// Not enough AP.
    ApLack,
    /// Caster's lane is outside the card's `pos_use` mask.
    PosUseMismatch,
    /// No valid target.
    NoTarget,
}

impl ErrorLabel {
    /// User-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            ErrorLabel::UnitDisabled => "This unit cannot act right now.",
            ErrorLabel::ApLack => "Not enough AP.",
            ErrorLabel::PosUseMismatch => "Cannot use this card from the current position.",
            ErrorLabel::NoTarget => "No valid target.",
        }
    }
}

impl std::fmt::Display for ErrorLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A resolver call that was refused outright.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlayError {
    /// Another play is still selecting targets or resolving.
    #[error("card play already in progress: {in_flight}")]
    Busy { in_flight: CardId },
}
