//! Observable results of a card play.

use serde::{Deserialize, Serialize};

use crate::board::Lane;
use crate::cards::CardId;
use crate::core::{Side, UnitId};
use crate::effects::EffectOutcome;
use crate::targeting::SessionTicket;

use super::error::ErrorLabel;

/// How a play ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    /// Targets were resolved and the effect list ran.
    Resolved {
        targets: Vec<UnitId>,
        effects: Vec<EffectOutcome>,
    },
    /// A validation step failed. AP already spent stays spent.
    Failed(ErrorLabel),
    /// Manual targeting was cancelled. AP already spent stays spent.
    Cancelled,
}

impl PlayOutcome {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, PlayOutcome::Resolved { .. })
    }

    /// The failure label, if the play failed.
    #[must_use]
    pub fn error(&self) -> Option<ErrorLabel> {
        match self {
            PlayOutcome::Failed(label) => Some(*label),
            _ => None,
        }
    }
}

/// What a resolver call left behind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayStatus {
    /// A manual targeting session is open; feed it through
    /// `CardPlayResolver::provide_candidate`.
    AwaitingTargets {
        ticket: SessionTicket,
        side: Side,
        mask: Lane,
    },
    /// The play is over and the resolver is Idle again.
    Finished(PlayOutcome),
}

impl PlayStatus {
    /// The outcome, if the play has finished.
    #[must_use]
    pub fn outcome(&self) -> Option<&PlayOutcome> {
        match self {
            PlayStatus::Finished(outcome) => Some(outcome),
            PlayStatus::AwaitingTargets { .. } => None,
        }
    }

    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        matches!(self, PlayStatus::AwaitingTargets { .. })
    }
}

/// Notifications delivered to resolver subscribers, in emission order.
///
/// Every accepted play emits exactly one `Started` and one `Finished`;
/// `Hint` and `Error` may appear in between.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayEvent {
    Started {
        card: CardId,
        caster: UnitId,
    },
    /// Prompt text for the player (e.g. "pick a target").
    Hint(String),
    Error {
        label: ErrorLabel,
        message: String,
    },
    Finished {
        card: CardId,
        caster: UnitId,
        outcome: PlayOutcome,
    },
}
