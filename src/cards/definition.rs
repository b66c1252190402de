//! Card definitions: static card data.
//!
//! A `CardDefinition` is supplied fully formed by the host's data pipeline
//! and treated as read-only for the lifetime of a battle. Only `cost`,
//! `target_type`, `pos_use`, `pos_hit`, `manual_side`, `effects` and
//! `enabled` drive combat; the remaining fields are carried for the host.

use serde::{Deserialize, Serialize};

use crate::board::Lane;
use crate::core::Side;
use crate::effects::Effect;

/// Identifier of a card definition (e.g. `"strike_01"`).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (an unusable data row).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// How a card's targets are chosen.
///
/// Only `EnemyFrontMost` and `SingleManual` are resolved by the combat core;
/// every other variant fails the play with `NoTarget`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    /// The caster itself.
    #[serde(rename = "Self")]
    SelfCast,
    Ally,
    AllyAll,
    Enemy,
    EnemyAll,
    AllyThenEnemy,
    /// Automatic: the front-most living enemy.
    #[default]
    EnemyFrontMost,
    /// One target picked through a manual targeting session.
    SingleManual,
}

impl TargetType {
    /// Whether the combat core can resolve targets for this type.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, TargetType::EnemyFrontMost | TargetType::SingleManual)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    #[default]
    Attack,
    Defense,
    Support,
    Move,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardClass {
    #[default]
    Common,
    Character,
    Mythic,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardRarity {
    #[default]
    Common,
    Rare,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use lane_combat::board::Lane;
/// use lane_combat::cards::{CardDefinition, TargetType};
/// use lane_combat::effects::Effect;
///
/// let strike = CardDefinition::new("strike")
///     .with_cost(1)
///     .with_target_type(TargetType::EnemyFrontMost)
///     .with_pos_hit(Lane::FRONT | Lane::MID1)
///     .with_effect(Effect::damage(5, 2));
///
/// assert_eq!(strike.cost, 1);
/// assert_eq!(strike.effects.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardDefinition {
    pub id: CardId,

    /// Disabled cards fail every play with `UnitDisabled`.
    pub enabled: bool,

    /// Localisation key of the card name.
    pub name_id: String,

    /// Localisation key of the card description.
    pub desc_id: String,

    pub kind: CardKind,
    pub class: CardClass,
    pub rarity: CardRarity,

    /// Owning character, `"Public"` for shared cards.
    pub char_id: String,

    /// AP cost.
    pub cost: u32,

    pub target_type: TargetType,

    /// Lanes the caster may stand in.
    pub pos_use: Lane,

    /// Lanes a resolved target may stand in.
    pub pos_hit: Lane,

    /// Side picked from by `SingleManual`. `None` uses the resolver default.
    pub manual_side: Option<Side>,

    pub upgradable: bool,
    pub upgrade_step: u32,
    pub upgrade_ref_id: Option<CardId>,

    /// Effects applied in order once targets are resolved.
    pub effects: Vec<Effect>,
}

impl Default for CardDefinition {
    fn default() -> Self {
        Self {
            id: CardId::default(),
            enabled: true,
            name_id: String::new(),
            desc_id: String::new(),
            kind: CardKind::default(),
            class: CardClass::default(),
            rarity: CardRarity::default(),
            char_id: "Public".to_string(),
            cost: 1,
            target_type: TargetType::default(),
            pos_use: Lane::ALL,
            pos_hit: Lane::ALL,
            manual_side: None,
            upgradable: true,
            upgrade_step: 0,
            upgrade_ref_id: None,
            effects: Vec::new(),
        }
    }
}

impl CardDefinition {
    /// Create a definition with default data: cost 1, front-most enemy
    /// targeting, every lane allowed, no effects.
    #[must_use]
    pub fn new(id: impl Into<CardId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_target_type(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }

    #[must_use]
    pub fn with_pos_use(mut self, mask: Lane) -> Self {
        self.pos_use = mask;
        self
    }

    #[must_use]
    pub fn with_pos_hit(mut self, mask: Lane) -> Self {
        self.pos_hit = mask;
        self
    }

    #[must_use]
    pub fn with_manual_side(mut self, side: Side) -> Self {
        self.manual_side = Some(side);
        self
    }

    /// Append an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: CardKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_char_id(mut self, char_id: impl Into<String>) -> Self {
        self.char_id = char_id.into();
        self
    }

    /// Set the upgrade step and the card it upgrades into.
    #[must_use]
    pub fn with_upgrade(mut self, step: u32, ref_id: impl Into<CardId>) -> Self {
        self.upgradable = true;
        self.upgrade_step = step;
        self.upgrade_ref_id = Some(ref_id.into());
        self
    }
}

impl std::fmt::Display for CardDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{:?}, cost {}]", self.id, self.target_type, self.cost)
    }
}
