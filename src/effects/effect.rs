//! Effect definitions.
//!
//! Effects are stateless data. All behaviour lives in `EffectPipeline`,
//! which dispatches on the variant; new kinds are added by extending this
//! enum and the dispatch match.

use serde::{Deserialize, Serialize};

/// An atomic combat effect applied to every resolved target.
///
/// Serialized with an internal `type` tag so data rows read naturally:
///
/// ```
/// use lane_combat::effects::Effect;
///
/// let json = r#"{ "type": "Knockback", "cells": 2 }"#;
/// let effect: Effect = serde_json::from_str(json).unwrap();
/// assert_eq!(effect, Effect::knockback(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    /// Deal `amount + bonus` damage, bonus drawn uniformly from
    /// `0..=random_bonus_max` per target.
    Damage {
        amount: u32,
        #[serde(default)]
        random_bonus_max: u32,
    },

    /// Push each target `cells` slots toward the back of its side.
    /// Blocked or out-of-range pushes are ignored.
    Knockback { cells: u32 },
}

impl Effect {
    /// Damage with an optional random bonus.
    #[must_use]
    pub const fn damage(amount: u32, random_bonus_max: u32) -> Self {
        Effect::Damage {
            amount,
            random_bonus_max,
        }
    }

    /// Knockback by `cells` slots.
    #[must_use]
    pub const fn knockback(cells: u32) -> Self {
        Effect::Knockback { cells }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Effect::Damage { .. } => "damage",
            Effect::Knockback { .. } => "knockback",
        }
    }
}
