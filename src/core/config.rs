//! Combat configuration types.
//!
//! Callers configure the core at setup time by providing:
//! - `BoardConfig`: slot counts per side and how slot anchors are laid out
//! - `ResolverConfig`: RNG seed and manual-targeting defaults
//!
//! Both are plain values passed into constructors; nothing is read from
//! global state.

use serde::{Deserialize, Serialize};

use super::side::{Side, SideMap};

/// How slot anchors are arranged in world space.
///
/// Anchors are opaque to the combat core; they only exist so an external
/// spawner can snap visuals to slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStyle {
    /// Allies on one row, enemies on another, each row centred.
    #[default]
    TwoRows,
    /// A single row: ally group on the left, enemy group on the right.
    OneRowTwoGroups,
}

/// Board layout configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of slots per side.
    pub slot_counts: SideMap<usize>,

    /// Anchor arrangement.
    pub style: LayoutStyle,

    /// Horizontal distance between neighbouring slots.
    pub spacing: f32,

    /// Row height of the ally line (`TwoRows`).
    pub ally_row_y: f32,

    /// Row height of the enemy line (`TwoRows`).
    pub enemy_row_y: f32,

    /// Row height of the shared line (`OneRowTwoGroups`).
    pub one_row_y: f32,

    /// Gap between the two groups (`OneRowTwoGroups`).
    pub group_gap: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            slot_counts: SideMap::new(|side| match side {
                Side::Ally => 4,
                Side::Enemy => 5,
            }),
            style: LayoutStyle::TwoRows,
            spacing: 2.0,
            ally_row_y: -2.5,
            enemy_row_y: 2.0,
            one_row_y: 0.0,
            group_gap: 3.0,
        }
    }
}

impl BoardConfig {
    /// Create a configuration with the default 4 ally / 5 enemy slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of slots for a side.
    #[must_use]
    pub fn with_slots(mut self, side: Side, count: usize) -> Self {
        assert!(count > 0, "Each side needs at least 1 slot");
        self.slot_counts[side] = count;
        self
    }

    /// Set the anchor arrangement.
    #[must_use]
    pub fn with_style(mut self, style: LayoutStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the slot spacing.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the gap between groups for `OneRowTwoGroups`.
    #[must_use]
    pub fn with_group_gap(mut self, gap: f32) -> Self {
        self.group_gap = gap;
        self
    }

    /// Number of slots configured for a side.
    #[must_use]
    pub fn slot_count(&self, side: Side) -> usize {
        self.slot_counts[side]
    }
}

/// Card-play resolver configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Seed for effect rolls.
    pub seed: u64,

    /// Picks needed to complete a manual selection.
    pub manual_pick_count: usize,

    /// Side a `SingleManual` card targets when the card does not say.
    pub default_manual_side: Side,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            manual_pick_count: 1,
            default_manual_side: Side::Enemy,
        }
    }
}

impl ResolverConfig {
    /// Create a configuration with the given RNG seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Set how many picks a manual selection needs.
    #[must_use]
    pub fn with_manual_pick_count(mut self, count: usize) -> Self {
        assert!(count > 0, "Manual selection needs at least 1 pick");
        self.manual_pick_count = count;
        self
    }

    /// Set the side `SingleManual` cards target by default.
    #[must_use]
    pub fn with_default_manual_side(mut self, side: Side) -> Self {
        self.default_manual_side = side;
        self
    }
}
