//! Effect system: what a card does once its targets are known.
//!
//! - `Effect`: tagged union of effect kinds (Damage, Knockback)
//! - `EffectContext`: caster, targets, board, units and RNG for one play
//! - `EffectPipeline`: executes an effect list against a context
//!
//! Effects are data; dispatch is a single exhaustive match, so adding a
//! kind means adding a variant and its arm.

mod effect;
mod pipeline;

pub use effect::Effect;
pub use pipeline::{EffectContext, EffectOutcome, EffectPipeline, SkipReason};
