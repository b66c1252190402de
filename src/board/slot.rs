//! Slots: addressable (side, index) board positions.

use serde::{Deserialize, Serialize};

use super::lane::{Lane, PositionResolver};
use crate::core::Side;

/// Identity of a slot. Ordered by side, then index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub side: Side,
    pub index: usize,
}

impl SlotKey {
    #[must_use]
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    /// Lane of this slot.
    #[must_use]
    pub const fn lane(self) -> Lane {
        PositionResolver::to_lane(self.side, self.index)
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.side, self.index)
    }
}

/// World-space mount point of a slot. Opaque to the combat core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An immutable board slot.
///
/// Created once during layout and never reassigned to a different key.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    key: SlotKey,
    anchor: Anchor,
    lane: Lane,
}

impl Slot {
    /// Create a slot; its lane is derived from the key.
    #[must_use]
    pub const fn new(side: Side, index: usize, anchor: Anchor) -> Self {
        let key = SlotKey::new(side, index);
        Self {
            key,
            anchor,
            lane: key.lane(),
        }
    }

    #[must_use]
    pub const fn key(&self) -> SlotKey {
        self.key
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.key.side
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.key.index
    }

    #[must_use]
    pub const fn anchor(&self) -> Anchor {
        self.anchor
    }

    #[must_use]
    pub const fn lane(&self) -> Lane {
        self.lane
    }
}

/// Where a unit currently stands: the unit's cached slot reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub key: SlotKey,
    pub lane: Lane,
}

impl Placement {
    #[must_use]
    pub const fn at(key: SlotKey) -> Self {
        Self {
            key,
            lane: key.lane(),
        }
    }
}
