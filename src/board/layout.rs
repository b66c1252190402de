//! Slot layout: phase one of board startup.
//!
//! Startup is two explicit steps:
//! 1. Build every slot (`BoardLayout::from_config`, or push slots by hand)
//! 2. Build the board view over the finished slot set (`Board::from_layout`)
//!
//! The board never scans for slots after it is built, so there is no need
//! to wait for a spawner to finish registering them.

use thiserror::Error;
use tracing::debug;

use super::slot::{Anchor, Slot, SlotKey};
use crate::core::{BoardConfig, LayoutStyle, Side};

/// Slot set rejected when building a board.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Two slots claim the same key.
    #[error("duplicate slot {0}")]
    DuplicateSlot(SlotKey),

    /// A side's indices are not contiguous from 0.
    #[error("{side} slots must be numbered 0..{count}, missing index {missing}")]
    IndexGap {
        side: Side,
        count: usize,
        missing: usize,
    },
}

/// Unordered collection of slots produced by a layout step.
#[derive(Clone, Debug, Default)]
pub struct BoardLayout {
    slots: Vec<Slot>,
}

impl BoardLayout {
    /// An empty layout; add slots with `push_slot`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out every slot described by `config`.
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        let mut layout = Self::new();
        let allies = config.slot_count(Side::Ally);
        let enemies = config.slot_count(Side::Enemy);

        match config.style {
            LayoutStyle::TwoRows => {
                layout.push_line(Side::Ally, allies, config.spacing, config.ally_row_y);
                layout.push_line(Side::Enemy, enemies, config.spacing, config.enemy_row_y);
            }
            LayoutStyle::OneRowTwoGroups => {
                let s = config.spacing;
                let ally_width = s * (allies.max(1) - 1) as f32;
                let enemy_width = s * (enemies.max(1) - 1) as f32;
                let total = ally_width + config.group_gap + enemy_width;
                let left = -total * 0.5;
                let right = left + ally_width + config.group_gap;

                for i in 0..allies {
                    layout.push_slot(Slot::new(
                        Side::Ally,
                        i,
                        Anchor::new(left + i as f32 * s, config.one_row_y),
                    ));
                }
                for i in 0..enemies {
                    layout.push_slot(Slot::new(
                        Side::Enemy,
                        i,
                        Anchor::new(right + i as f32 * s, config.one_row_y),
                    ));
                }
            }
        }

        debug!(allies, enemies, style = ?config.style, "layout built");
        layout
    }

    /// A centred row of `count` slots at height `y`.
    fn push_line(&mut self, side: Side, count: usize, spacing: f32, y: f32) {
        let width = spacing * count.saturating_sub(1) as f32;
        let start = -width * 0.5;
        for i in 0..count {
            self.push_slot(Slot::new(side, i, Anchor::new(start + i as f32 * spacing, y)));
        }
    }

    /// Add a slot. Order does not matter; validation happens in phase two.
    pub fn push_slot(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    /// All slots in insertion order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Consume the layout.
    #[must_use]
    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }
}
