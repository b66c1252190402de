//! Effect execution against a resolved target set.
//!
//! Every application is independent and best-effort: a target without a
//! health capability or a blocked knockback is skipped and logged, and the
//! remaining targets and effects still run. Nothing is rolled back.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::{Board, KnockbackError, SlotKey};
use crate::core::{CombatRng, UnitCapabilities, UnitId};

use super::Effect;

/// Everything an effect may read or mutate.
pub struct EffectContext<'a> {
    pub caster: UnitId,
    pub targets: &'a [UnitId],
    pub board: &'a mut Board,
    pub units: &'a mut dyn UnitCapabilities,
    pub rng: &'a mut CombatRng,
}

/// Why an application was skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The target has no health capability.
    NoHealth,
    /// The board refused the move.
    Knockback(KnockbackError),
}

/// Result of applying one effect to one target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectOutcome {
    Damaged {
        target: UnitId,
        amount: u32,
        /// The hit left the target not alive.
        lethal: bool,
    },
    Moved {
        target: UnitId,
        from: SlotKey,
        to: SlotKey,
    },
    Skipped {
        target: UnitId,
        reason: SkipReason,
    },
}

impl EffectOutcome {
    /// The target this outcome refers to.
    #[must_use]
    pub fn target(&self) -> UnitId {
        match self {
            EffectOutcome::Damaged { target, .. }
            | EffectOutcome::Moved { target, .. }
            | EffectOutcome::Skipped { target, .. } => *target,
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, EffectOutcome::Skipped { .. })
    }
}

/// Runs effect lists.
pub struct EffectPipeline;

impl EffectPipeline {
    /// Apply `effects` in list order, each against every target in order.
    ///
    /// Returns one outcome per (effect, target) application.
    pub fn execute(effects: &[Effect], ctx: &mut EffectContext<'_>) -> Vec<EffectOutcome> {
        let mut outcomes = Vec::with_capacity(effects.len() * ctx.targets.len());
        for effect in effects {
            Self::apply(effect, ctx, &mut outcomes);
        }
        outcomes
    }

    /// Apply a single effect to every target in the context.
    pub fn apply(effect: &Effect, ctx: &mut EffectContext<'_>, outcomes: &mut Vec<EffectOutcome>) {
        let targets = ctx.targets;
        match *effect {
            Effect::Damage {
                amount,
                random_bonus_max,
            } => {
                for &target in targets {
                    outcomes.push(Self::damage(ctx, target, amount, random_bonus_max));
                }
            }
            Effect::Knockback { cells } => {
                for &target in targets {
                    outcomes.push(Self::knockback(ctx, target, cells));
                }
            }
        }
    }

    fn damage(ctx: &mut EffectContext<'_>, target: UnitId, amount: u32, bonus_max: u32) -> EffectOutcome {
        let Some(hp) = ctx.units.health_mut(target) else {
            warn!(%target, caster = %ctx.caster, "damage skipped: target has no health");
            return EffectOutcome::Skipped {
                target,
                reason: SkipReason::NoHealth,
            };
        };

        // Rolled only for targets that can take the hit.
        let total = amount.saturating_add(ctx.rng.roll_bonus(bonus_max));
        hp.apply_damage(total);
        let lethal = !hp.is_alive();

        debug!(%target, amount = total, lethal, "damage applied");
        EffectOutcome::Damaged {
            target,
            amount: total,
            lethal,
        }
    }

    fn knockback(ctx: &mut EffectContext<'_>, target: UnitId, cells: u32) -> EffectOutcome {
        match ctx.board.knockback(target, cells) {
            Ok(moved) => {
                debug!(%target, from = %moved.from, to = %moved.to, "knockback applied");
                EffectOutcome::Moved {
                    target,
                    from: moved.from,
                    to: moved.to,
                }
            }
            Err(err) => {
                debug!(%target, cells, reason = %err, "knockback ignored");
                EffectOutcome::Skipped {
                    target,
                    reason: SkipReason::Knockback(err),
                }
            }
        }
    }
}
