//! Manual target selection.
//!
//! A `TargetingSession` is a filter-and-accumulate protocol: the input layer
//! feeds it candidates one at a time and it reports what happened to each.
//! It never mutates the board.
//!
//! ## States
//!
//! - Inactive: candidates are ignored
//! - Awaiting: candidates are checked against the side filter, lane mask
//!   and previous picks; the session completes when enough picks arrive
//!
//! Completion and cancellation are returned to the caller instead of being
//! delivered through stored callbacks, so nothing can fire after the owner
//! has moved on.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::board::{Board, Lane, PositionResolver};
use crate::core::{Side, UnitId};

/// Picks collected by a session.
pub type Picks = SmallVec<[UnitId; 4]>;

/// Identifies the request that opened a session.
///
/// Owners compare tickets on completion to discard selections that belong
/// to an earlier request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionTicket(pub u64);

impl std::fmt::Display for SessionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ticket({})", self.0)
    }
}

/// Why a candidate was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The candidate has no board location.
    NotOnBoard,
    /// The candidate stands on the other side.
    WrongSide { expected: Side, actual: Side },
    /// The candidate's lane is outside the mask.
    LaneNotAllowed(Lane),
    /// The candidate was already picked.
    Duplicate,
}

/// Result of feeding one candidate to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// No session is active.
    Ignored,
    /// The candidate failed a filter; the session keeps waiting.
    Rejected(RejectReason),
    /// The candidate was added; `remaining` more picks are needed.
    Accepted { remaining: usize },
    /// The final pick arrived. The session is Inactive again.
    Completed { ticket: SessionTicket, picks: Picks },
}

/// Filters of an active request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualRequest {
    pub side: Side,
    pub mask: Lane,
    pub needed: usize,
    pub ticket: SessionTicket,
}

#[derive(Clone, Debug, Default)]
enum SessionState {
    #[default]
    Inactive,
    Awaiting { request: ManualRequest, picks: Picks },
}

/// Manual targeting state machine.
///
/// ```
/// use lane_combat::board::{Board, Lane};
/// use lane_combat::core::{BoardConfig, Side, UnitId};
/// use lane_combat::targeting::{SessionTicket, Selection, TargetingSession};
///
/// let mut board = Board::from_config(&BoardConfig::new());
/// board.register_unit(UnitId(9), Side::Enemy, 0).unwrap();
///
/// let mut session = TargetingSession::new();
/// session.begin_manual_select(Side::Enemy, Lane::FRONT, 1, SessionTicket(1));
///
/// match session.provide_candidate(&board, UnitId(9)) {
///     Selection::Completed { picks, .. } => assert_eq!(picks.as_slice(), &[UnitId(9)]),
///     other => panic!("unexpected {other:?}"),
/// }
/// assert!(!session.is_awaiting());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TargetingSession {
    state: SessionState,
}

impl TargetingSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting picks, replacing any request in progress.
    ///
    /// `needed` is clamped to at least 1.
    pub fn begin_manual_select(&mut self, side: Side, mask: Lane, needed: usize, ticket: SessionTicket) {
        if let SessionState::Awaiting { request, .. } = &self.state {
            debug!(old = %request.ticket, new = %ticket, "manual select replaced an open request");
        }

        let request = ManualRequest {
            side,
            mask,
            needed: needed.max(1),
            ticket,
        };
        debug!(%ticket, %side, mask = ?mask, needed = request.needed, "manual select started");
        self.state = SessionState::Awaiting {
            request,
            picks: Picks::new(),
        };
    }

    /// Feed one candidate from the input layer.
    pub fn provide_candidate(&mut self, board: &Board, unit: UnitId) -> Selection {
        let SessionState::Awaiting { request, picks } = &mut self.state else {
            trace!(%unit, "candidate ignored: no active session");
            return Selection::Ignored;
        };

        if let Err(reason) = Self::check(request, picks, board, unit) {
            debug!(%unit, ?reason, "candidate rejected");
            return Selection::Rejected(reason);
        }

        picks.push(unit);
        if picks.len() < request.needed {
            let remaining = request.needed - picks.len();
            debug!(%unit, remaining, "candidate accepted");
            return Selection::Accepted { remaining };
        }

        let ticket = request.ticket;
        let picks = std::mem::take(picks);
        self.state = SessionState::Inactive;
        debug!(%ticket, count = picks.len(), "manual select completed");
        Selection::Completed { ticket, picks }
    }

    fn check(request: &ManualRequest, picks: &Picks, board: &Board, unit: UnitId) -> Result<(), RejectReason> {
        let key = board.get_unit_location(unit).ok_or(RejectReason::NotOnBoard)?;
        if key.side != request.side {
            return Err(RejectReason::WrongSide {
                expected: request.side,
                actual: key.side,
            });
        }
        let lane = PositionResolver::to_lane(key.side, key.index);
        if !PositionResolver::lane_matches(lane, request.mask) {
            return Err(RejectReason::LaneNotAllowed(lane));
        }
        if picks.contains(&unit) {
            return Err(RejectReason::Duplicate);
        }
        Ok(())
    }

    /// Abandon the active request. Returns its ticket, or `None` if the
    /// session was already Inactive.
    pub fn cancel(&mut self) -> Option<SessionTicket> {
        match std::mem::take(&mut self.state) {
            SessionState::Inactive => None,
            SessionState::Awaiting { request, picks } => {
                debug!(ticket = %request.ticket, discarded = picks.len(), "manual select cancelled");
                Some(request.ticket)
            }
        }
    }

    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, SessionState::Awaiting { .. })
    }

    /// The active request, if any.
    #[must_use]
    pub fn request(&self) -> Option<&ManualRequest> {
        match &self.state {
            SessionState::Awaiting { request, .. } => Some(request),
            SessionState::Inactive => None,
        }
    }

    /// Picks accumulated so far.
    #[must_use]
    pub fn picks(&self) -> &[UnitId] {
        match &self.state {
            SessionState::Awaiting { picks, .. } => picks.as_slice(),
            SessionState::Inactive => &[],
        }
    }
}

/// Keep only the units whose current lane intersects `mask`.
///
/// Units without a board location are dropped.
pub fn filter_by_pos_hit(board: &Board, units: &[UnitId], mask: Lane) -> Picks {
    units
        .iter()
        .copied()
        .filter(|unit| {
            board
                .unit_lane(*unit)
                .is_some_and(|lane| PositionResolver::lane_matches(lane, mask))
        })
        .collect()
}
