//! The card-play state machine.
//!
//! ## States
//!
//! - **Idle**: ready for `play_card`
//! - **SelectingTargets**: a manual targeting session is open
//! - **Resolving**: the effect list is running
//!
//! `Done` is not stored: finishing a play emits `Finished` and returns to
//! Idle in the same call.
//!
//! ## Validation order
//!
//! 1. Card enabled, else `UnitDisabled`
//! 2. Spend `cost` AP, else `ApLack` (no AP capability: `UnitDisabled`)
//! 3. Caster on the board, else `UnitDisabled`
//! 4. Caster lane in `pos_use`, else `PosUseMismatch`
//! 5. Target resolution by `target_type`, else `NoTarget`
//!
//! AP spent in step 2 is not refunded when a later step fails.

use tracing::{debug, trace, warn};

use crate::board::{Board, PositionResolver};
use crate::cards::{CardDefinition, CardId, TargetType};
use crate::core::{CombatRng, CombatRngState, ResolverConfig, Side, UnitCapabilities, UnitId};
use crate::effects::{EffectContext, EffectPipeline};
use crate::targeting::{filter_by_pos_hit, Picks, Selection, SessionTicket, TargetingSession};

use super::error::{ErrorLabel, PlayError};
use super::event::{PlayEvent, PlayOutcome, PlayStatus};

/// Subscriber callback.
pub type PlayListener = Box<dyn FnMut(&PlayEvent)>;

/// Host state a play reads and mutates.
pub struct CombatContext<'a> {
    pub board: &'a mut Board,
    pub units: &'a mut dyn UnitCapabilities,
}

impl<'a> CombatContext<'a> {
    pub fn new(board: &'a mut Board, units: &'a mut dyn UnitCapabilities) -> Self {
        Self { board, units }
    }
}

/// Observable resolver phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayPhase {
    Idle,
    SelectingTargets,
    Resolving,
}

/// A play waiting on manual picks.
#[derive(Clone, Debug)]
struct PendingPlay {
    card: CardDefinition,
    caster: UnitId,
    side: Side,
    ticket: SessionTicket,
}

#[derive(Clone, Debug, Default)]
enum ResolverState {
    #[default]
    Idle,
    SelectingTargets(PendingPlay),
    Resolving { card: CardId },
}

/// Turns "caster plays card" into targets and applied effects.
///
/// Only one play is in flight at a time; `play_card` while not Idle is
/// refused with `PlayError::Busy`.
///
/// ## Example
///
/// ```
/// use lane_combat::board::Board;
/// use lane_combat::cards::CardDefinition;
/// use lane_combat::core::{BoardConfig, CombatUnit, ResolverConfig, Side, UnitId, UnitRoster};
/// use lane_combat::effects::Effect;
/// use lane_combat::play::{CardPlayResolver, CombatContext, PlayStatus};
///
/// let mut board = Board::from_config(&BoardConfig::new());
/// let mut roster = UnitRoster::new();
/// roster.insert(UnitId(1), CombatUnit::new("Hero", 20, 3));
/// roster.insert(UnitId(2), CombatUnit::new("Orc", 10, 0));
/// board.register_unit(UnitId(1), Side::Ally, 3).unwrap();
/// board.register_unit(UnitId(2), Side::Enemy, 0).unwrap();
///
/// let strike = CardDefinition::new("strike").with_effect(Effect::damage(4, 0));
/// let mut resolver = CardPlayResolver::new(ResolverConfig::new(42));
///
/// let status = resolver
///     .play_card(&mut CombatContext::new(&mut board, &mut roster), &strike, UnitId(1))
///     .unwrap();
///
/// assert!(status.outcome().unwrap().is_resolved());
/// assert_eq!(roster.get(UnitId(2)).unwrap().hp(), 6);
/// ```
pub struct CardPlayResolver {
    config: ResolverConfig,
    state: ResolverState,
    session: TargetingSession,
    rng: CombatRng,
    listeners: Vec<PlayListener>,
    next_ticket: u64,
}

impl CardPlayResolver {
    /// Create an Idle resolver seeded from `config`.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            rng: CombatRng::new(config.seed),
            config,
            state: ResolverState::Idle,
            session: TargetingSession::new(),
            listeners: Vec::new(),
            next_ticket: 0,
        }
    }

    /// Replace the effect RNG (e.g. restored from a capture).
    #[must_use]
    pub fn with_rng(mut self, rng: CombatRng) -> Self {
        self.rng = rng;
        self
    }

    /// Register a listener for every subsequent `PlayEvent`.
    pub fn subscribe(&mut self, listener: impl FnMut(&PlayEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    #[must_use]
    pub fn phase(&self) -> PlayPhase {
        match self.state {
            ResolverState::Idle => PlayPhase::Idle,
            ResolverState::SelectingTargets(_) => PlayPhase::SelectingTargets,
            ResolverState::Resolving { .. } => PlayPhase::Resolving,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, ResolverState::Idle)
    }

    /// The manual targeting session (read-only).
    #[must_use]
    pub fn session(&self) -> &TargetingSession {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Capture the effect RNG for replay.
    #[must_use]
    pub fn rng_state(&self) -> CombatRngState {
        self.rng.state()
    }

    fn in_flight(&self) -> Option<&CardId> {
        match &self.state {
            ResolverState::Idle => None,
            ResolverState::SelectingTargets(pending) => Some(&pending.card.id),
            ResolverState::Resolving { card } => Some(card),
        }
    }

    // === Entry point ===

    /// Start playing `card` from `caster`.
    ///
    /// Returns `Finished` when the play completed (resolved or failed) within
    /// this call, or `AwaitingTargets` when manual picks are needed.
    pub fn play_card(
        &mut self,
        ctx: &mut CombatContext<'_>,
        card: &CardDefinition,
        caster: UnitId,
    ) -> Result<PlayStatus, PlayError> {
        if let Some(in_flight) = self.in_flight() {
            warn!(card = %card.id, %caster, %in_flight, "play refused: resolver busy");
            return Err(PlayError::Busy {
                in_flight: in_flight.clone(),
            });
        }

        debug!(card = %card.id, %caster, "card play started");
        self.emit(PlayEvent::Started {
            card: card.id.clone(),
            caster,
        });

        if !card.enabled {
            return Ok(self.fail(&card.id, caster, ErrorLabel::UnitDisabled));
        }

        match ctx.units.action_points_mut(caster) {
            None => {
                warn!(%caster, "caster has no AP capability");
                return Ok(self.fail(&card.id, caster, ErrorLabel::UnitDisabled));
            }
            Some(ap) => {
                if !ap.try_consume_ap(card.cost) {
                    debug!(%caster, cost = card.cost, ap = ap.current_ap(), "not enough AP");
                    return Ok(self.fail(&card.id, caster, ErrorLabel::ApLack));
                }
            }
        }

        let Some(location) = ctx.board.get_unit_location(caster) else {
            warn!(%caster, "caster is not on the board");
            return Ok(self.fail(&card.id, caster, ErrorLabel::UnitDisabled));
        };

        let lane = PositionResolver::to_lane(location.side, location.index);
        if !PositionResolver::lane_matches(lane, card.pos_use) {
            debug!(%caster, ?lane, pos_use = ?card.pos_use, "caster lane not allowed");
            return Ok(self.fail(&card.id, caster, ErrorLabel::PosUseMismatch));
        }

        match card.target_type {
            TargetType::EnemyFrontMost => {
                let candidates: Picks = ctx
                    .board
                    .get_front_most_enemy_unit(&*ctx.units)
                    .into_iter()
                    .collect();
                let targets = filter_by_pos_hit(ctx.board, &candidates, card.pos_hit);
                if targets.is_empty() {
                    return Ok(self.fail(&card.id, caster, ErrorLabel::NoTarget));
                }
                Ok(self.resolve(ctx, card, caster, &targets))
            }
            TargetType::SingleManual => Ok(self.open_session(card, caster)),
            other => {
                debug!(card = %card.id, target_type = ?other, "target type not handled");
                Ok(self.fail(&card.id, caster, ErrorLabel::NoTarget))
            }
        }
    }

    fn open_session(&mut self, card: &CardDefinition, caster: UnitId) -> PlayStatus {
        let side = card.manual_side.unwrap_or(self.config.default_manual_side);
        let needed = self.config.manual_pick_count;
        self.next_ticket += 1;
        let ticket = SessionTicket(self.next_ticket);

        self.session.begin_manual_select(side, card.pos_hit, needed, ticket);
        self.state = ResolverState::SelectingTargets(PendingPlay {
            card: card.clone(),
            caster,
            side,
            ticket,
        });
        self.emit(PlayEvent::Hint(format!("Select {needed} target(s) on the {side} side.")));

        PlayStatus::AwaitingTargets {
            ticket,
            side,
            mask: card.pos_hit,
        }
    }

    // === Manual targeting ===

    /// Feed a manual pick to the open session.
    ///
    /// Returns `None` when no play is selecting targets. Rejected picks
    /// leave the play waiting.
    pub fn provide_candidate(&mut self, ctx: &mut CombatContext<'_>, unit: UnitId) -> Option<PlayStatus> {
        let ResolverState::SelectingTargets(pending) = &self.state else {
            trace!(%unit, "candidate ignored: not selecting targets");
            return None;
        };
        let awaiting = PlayStatus::AwaitingTargets {
            ticket: pending.ticket,
            side: pending.side,
            mask: pending.card.pos_hit,
        };

        match self.session.provide_candidate(ctx.board, unit) {
            Selection::Ignored | Selection::Rejected(_) | Selection::Accepted { .. } => Some(awaiting),
            Selection::Completed { picks, .. } => {
                let ResolverState::SelectingTargets(pending) = std::mem::take(&mut self.state) else {
                    return None;
                };

                // Targets may have moved since they were picked.
                let targets = filter_by_pos_hit(ctx.board, &picks, pending.card.pos_hit);
                if targets.is_empty() {
                    return Some(self.fail(&pending.card.id, pending.caster, ErrorLabel::NoTarget));
                }
                Some(self.resolve(ctx, &pending.card, pending.caster, &targets))
            }
        }
    }

    /// Cancel the open targeting session. The play finishes as `Cancelled`
    /// and spent AP stays spent.
    ///
    /// Returns `None` when no play is selecting targets.
    pub fn cancel_targeting(&mut self) -> Option<PlayStatus> {
        if !matches!(self.state, ResolverState::SelectingTargets(_)) {
            return None;
        }
        let ResolverState::SelectingTargets(pending) = std::mem::take(&mut self.state) else {
            return None;
        };

        self.session.cancel();
        debug!(card = %pending.card.id, ticket = %pending.ticket, "targeting cancelled");
        Some(self.finish(&pending.card.id, pending.caster, PlayOutcome::Cancelled))
    }

    // === Resolution ===

    fn resolve(
        &mut self,
        ctx: &mut CombatContext<'_>,
        card: &CardDefinition,
        caster: UnitId,
        targets: &[UnitId],
    ) -> PlayStatus {
        self.state = ResolverState::Resolving {
            card: card.id.clone(),
        };
        debug!(card = %card.id, %caster, ?targets, "resolving");

        let mut effect_ctx = EffectContext {
            caster,
            targets,
            board: &mut *ctx.board,
            units: &mut *ctx.units,
            rng: &mut self.rng,
        };
        let effects = EffectPipeline::execute(&card.effects, &mut effect_ctx);

        self.finish(
            &card.id,
            caster,
            PlayOutcome::Resolved {
                targets: targets.to_vec(),
                effects,
            },
        )
    }

    fn fail(&mut self, card: &CardId, caster: UnitId, label: ErrorLabel) -> PlayStatus {
        debug!(%card, %caster, %label, "card play failed");
        self.emit(PlayEvent::Error {
            label,
            message: label.message().to_string(),
        });
        self.finish(card, caster, PlayOutcome::Failed(label))
    }

    /// Done: close any session, notify, return to Idle.
    fn finish(&mut self, card: &CardId, caster: UnitId, outcome: PlayOutcome) -> PlayStatus {
        self.session.cancel();
        self.state = ResolverState::Idle;
        self.emit(PlayEvent::Finished {
            card: card.clone(),
            caster,
            outcome: outcome.clone(),
        });
        PlayStatus::Finished(outcome)
    }

    fn emit(&mut self, event: PlayEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for CardPlayResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardPlayResolver")
            .field("phase", &self.phase())
            .field("in_flight", &self.in_flight())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::board::Lane;
    use crate::core::{BoardConfig, CombatUnit, UnitRoster};
    use crate::effects::Effect;

    const HERO: UnitId = UnitId(1);
    const ORC: UnitId = UnitId(10);

    fn setup() -> (Board, UnitRoster) {
        let mut board = Board::from_config(&BoardConfig::new());
        let mut roster = UnitRoster::new();
        roster.insert(HERO, CombatUnit::new("Hero", 20, 3));
        roster.insert(ORC, CombatUnit::new("Orc", 10, 0));
        board.register_unit(HERO, Side::Ally, 3).unwrap();
        board.register_unit(ORC, Side::Enemy, 0).unwrap();
        (board, roster)
    }

    fn recorder(resolver: &mut CardPlayResolver) -> Rc<RefCell<Vec<PlayEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        resolver.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        log
    }

    #[test]
    fn test_disabled_card() {
        let (mut board, mut roster) = setup();
        let mut resolver = CardPlayResolver::new(ResolverConfig::new(1));
        let card = CardDefinition::new("off").with_enabled(false);

        let status = resolver
            .play_card(&mut CombatContext::new(&mut board, &mut roster), &card, HERO)
            .unwrap();

        assert_eq!(status, PlayStatus::Finished(PlayOutcome::Failed(ErrorLabel::UnitDisabled)));
        // Checked before AP is spent
        assert_eq!(roster.get(HERO).unwrap().current_ap(), 3);
    }

    #[test]
    fn test_caster_without_ap_capability() {
        let (mut board, mut roster) = setup();
        roster.insert(HERO, CombatUnit::new("Hero", 20, 3).without_ap());
        let mut resolver = CardPlayResolver::new(ResolverConfig::new(1));

        let status = resolver
            .play_card(
                &mut CombatContext::new(&mut board, &mut roster),
                &CardDefinition::new("strike"),
                HERO,
            )
            .unwrap();

        assert_eq!(status.outcome().unwrap().error(), Some(ErrorLabel::UnitDisabled));
    }

    #[test]
    fn test_caster_off_board_keeps_spent_ap() {
        let (mut board, mut roster) = setup();
        board.unregister_unit(HERO, Side::Ally, 3);
        let mut resolver = CardPlayResolver::new(ResolverConfig::new(1));

        let status = resolver
            .play_card(
                &mut CombatContext::new(&mut board, &mut roster),
                &CardDefinition::new("strike").with_cost(2),
                HERO,
            )
            .unwrap();

        assert_eq!(status.outcome().unwrap().error(), Some(ErrorLabel::UnitDisabled));
        assert_eq!(roster.get(HERO).unwrap().current_ap(), 1);
    }

    #[test]
    fn test_unsupported_target_type_is_no_target() {
        let (mut board, mut roster) = setup();
        let mut resolver = CardPlayResolver::new(ResolverConfig::new(1));
        let card = CardDefinition::new("heal").with_target_type(TargetType::AllyAll);

        let status = resolver
            .play_card(&mut CombatContext::new(&mut board, &mut roster), &card, HERO)
            .unwrap();

        assert_eq!(status.outcome().unwrap().error(), Some(ErrorLabel::NoTarget));
        assert!(resolver.is_idle());
    }

    #[test]
    fn test_front_most_filtered_by_pos_hit() {
        let (mut board, mut roster) = setup();
        let mut resolver = CardPlayResolver::new(ResolverConfig::new(1));
        let card = CardDefinition::new("lob")
            .with_pos_hit(Lane::BACK)
            .with_effect(Effect::damage(5, 0));

        let status = resolver
            .play_card(&mut CombatContext::new(&mut board, &mut roster), &card, HERO)
            .unwrap();

        assert_eq!(status.outcome().unwrap().error(), Some(ErrorLabel::NoTarget));
        assert_eq!(roster.get(ORC).unwrap().hp(), 10);
    }

    #[test]
    fn test_event_order_on_success() {
        let (mut board, mut roster) = setup();
        let mut resolver = CardPlayResolver::new(ResolverConfig::new(1));
        let log = recorder(&mut resolver);
        let card = CardDefinition::new("strike").with_effect(Effect::damage(3, 0));

        resolver
            .play_card(&mut CombatContext::new(&mut board, &mut roster), &card, HERO)
            .unwrap();

        let events = log.borrow();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], PlayEvent::Started { caster: HERO, .. }));
        match &events[1] {
            PlayEvent::Finished { outcome, .. } => assert!(outcome.is_resolved()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_manual_flow_and_busy() {
        let (mut board, mut roster) = setup();
        let mut resolver = CardPlayResolver::new(ResolverConfig::new(1));
        let log = recorder(&mut resolver);
        let card = CardDefinition::new("aimed")
            .with_target_type(TargetType::SingleManual)
            .with_effect(Effect::damage(2, 0));

        let status = resolver
            .play_card(&mut CombatContext::new(&mut board, &mut roster), &card, HERO)
            .unwrap();
        assert!(status.is_awaiting());
        assert_eq!(resolver.phase(), PlayPhase::SelectingTargets);

        let busy = resolver.play_card(&mut CombatContext::new(&mut board, &mut roster), &card, HERO);
        assert_eq!(
            busy,
            Err(PlayError::Busy {
                in_flight: CardId::new("aimed"),
            })
        );

        let done = resolver
            .provide_candidate(&mut CombatContext::new(&mut board, &mut roster), ORC)
            .unwrap();
        assert!(done.outcome().unwrap().is_resolved());
        assert_eq!(roster.get(ORC).unwrap().hp(), 8);
        assert!(resolver.is_idle());

        // Started, Hint, Finished; the refused call emitted nothing
        let events = log.borrow();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], PlayEvent::Hint(_)));
    }

    #[test]
    fn test_provide_candidate_when_idle() {
        let (mut board, mut roster) = setup();
        let mut resolver = CardPlayResolver::new(ResolverConfig::new(1));
        assert_eq!(
            resolver.provide_candidate(&mut CombatContext::new(&mut board, &mut roster), ORC),
            None
        );
        assert_eq!(resolver.cancel_targeting(), None);
    }

    #[test]
    fn test_each_manual_play_gets_a_fresh_session() {
        let (mut board, mut roster) = setup();
        let mut resolver = CardPlayResolver::new(ResolverConfig::new(1));
        let card = CardDefinition::new("aimed")
            .with_target_type(TargetType::SingleManual)
            .with_effect(Effect::damage(2, 0));

        let first = resolver
            .play_card(&mut CombatContext::new(&mut board, &mut roster), &card, HERO)
            .unwrap();
        let PlayStatus::AwaitingTargets { ticket: first, .. } = first else {
            panic!("expected awaiting targets");
        };
        assert_eq!(resolver.session().request().unwrap().ticket, first);

        resolver.cancel_targeting().unwrap();
        assert!(!resolver.session().is_awaiting());

        let second = resolver
            .play_card(&mut CombatContext::new(&mut board, &mut roster), &card, HERO)
            .unwrap();
        let PlayStatus::AwaitingTargets { ticket: second, .. } = second else {
            panic!("expected awaiting targets");
        };
        assert_ne!(first, second);
        assert_eq!(resolver.session().request().unwrap().ticket, second);

        let done = resolver
            .provide_candidate(&mut CombatContext::new(&mut board, &mut roster), ORC)
            .unwrap();
        assert!(done.outcome().unwrap().is_resolved());
        assert!(!resolver.session().is_awaiting());
    }

    #[test]
    fn test_manual_side_defaults_from_config() {
        let (mut board, mut roster) = setup();
        let config = ResolverConfig::new(1).with_default_manual_side(Side::Ally);
        let mut resolver = CardPlayResolver::new(config);
        let card = CardDefinition::new("bless").with_target_type(TargetType::SingleManual);

        let status = resolver
            .play_card(&mut CombatContext::new(&mut board, &mut roster), &card, HERO)
            .unwrap();

        assert!(matches!(status, PlayStatus::AwaitingTargets { side: Side::Ally, .. }));
    }
}
