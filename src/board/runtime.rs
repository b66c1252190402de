//! Board runtime: slot lists plus the occupancy map.
//!
//! The `Board` is the only mutable state shared between components. The
//! resolver reads it for lane checks and targeting; the knockback effect
//! mutates it. Every mutation completes inside a single call, so no caller
//! can observe a half-applied move.

use im::OrdMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::lane::Lane;
use super::layout::{BoardLayout, LayoutError};
use super::slot::{Placement, Slot, SlotKey};
use crate::core::{BoardConfig, Side, SideMap, UnitCapabilities, UnitId};

/// Slot list for one side, ordered by index.
pub type SlotList = SmallVec<[Slot; 5]>;

/// Why a knockback could not complete.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum KnockbackError {
    /// Zero-cell knockback.
    #[error("knockback distance must be at least 1 cell")]
    NoDistance,

    /// The unit has no occupancy entry.
    #[error("{0} is not on the board")]
    NotOnBoard(UnitId),

    /// The destination is past the last slot of the side.
    #[error("{from} + {cells} is outside the board")]
    OutOfRange { from: SlotKey, cells: u32 },

    /// A slot on the way (or the destination) is occupied.
    #[error("path blocked at {at} by {by}")]
    PathBlocked { at: SlotKey, by: UnitId },
}

/// Why a unit could not be bound to a slot.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RegisterError {
    /// The board has no slot at this key.
    #[error("no slot at {0}")]
    NoSlot(SlotKey),
}

/// A completed knockback move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Displacement {
    pub unit: UnitId,
    pub from: SlotKey,
    pub to: SlotKey,
}

/// Runtime view over the slot lists and who stands where.
///
/// ## Invariants
///
/// - Slot lists never change after construction.
/// - At most one unit per `SlotKey`.
/// - Occupancy changes only through `register_unit`, `unregister_unit`
///   and knockback.
///
/// ```
/// use lane_combat::board::Board;
/// use lane_combat::core::{BoardConfig, Side, UnitId};
///
/// let mut board = Board::from_config(&BoardConfig::new());
/// board.register_unit(UnitId(1), Side::Ally, 0).unwrap();
///
/// assert_eq!(board.get_occupant(Side::Ally, 0), Some(UnitId(1)));
/// assert!(board.try_knockback(UnitId(1), 1));
/// assert_eq!(board.get_occupant(Side::Ally, 1), Some(UnitId(1)));
/// ```
#[derive(Clone, Debug)]
pub struct Board {
    slots: SideMap<SlotList>,

    /// (side, index) -> unit, iterated in side-then-index order.
    occupancy: OrdMap<SlotKey, UnitId>,

    /// Cached slot reference per unit, kept in step with `occupancy`.
    placements: FxHashMap<UnitId, Placement>,
}

impl Board {
    /// Build a board directly from configuration.
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        // Config layouts are contiguous by construction.
        let slots = Self::partition(BoardLayout::from_config(config));
        Self::with_slots(slots)
    }

    /// Phase two of startup: build the board view over a finished layout.
    ///
    /// Each side's slots are sorted by index and must be numbered
    /// `0..N` without duplicates.
    pub fn from_layout(layout: BoardLayout) -> Result<Self, LayoutError> {
        let slots = Self::partition(layout);

        for (side, list) in slots.iter() {
            if let Some(pair) = list.windows(2).find(|p| p[0].index() == p[1].index()) {
                return Err(LayoutError::DuplicateSlot(pair[0].key()));
            }
            if let Some(missing) = list.iter().enumerate().position(|(i, s)| s.index() != i) {
                return Err(LayoutError::IndexGap {
                    side,
                    count: list.len(),
                    missing,
                });
            }
        }

        Ok(Self::with_slots(slots))
    }

    fn partition(layout: BoardLayout) -> SideMap<SlotList> {
        let mut slots: SideMap<SlotList> = SideMap::default();
        for slot in layout.into_slots() {
            slots[slot.side()].push(slot);
        }
        slots[Side::Ally].sort_by_key(|s| s.index());
        slots[Side::Enemy].sort_by_key(|s| s.index());
        slots
    }

    fn with_slots(slots: SideMap<SlotList>) -> Self {
        debug!(
            allies = slots[Side::Ally].len(),
            enemies = slots[Side::Enemy].len(),
            "board built"
        );
        Self {
            slots,
            occupancy: OrdMap::new(),
            placements: FxHashMap::default(),
        }
    }

    // === Slots ===

    /// Slots of a side, ordered by index.
    #[must_use]
    pub fn slots(&self, side: Side) -> &[Slot] {
        &self.slots[side]
    }

    /// Number of slots on a side.
    #[must_use]
    pub fn slot_count(&self, side: Side) -> usize {
        self.slots[side].len()
    }

    /// Bounds-checked slot lookup.
    #[must_use]
    pub fn get_slot(&self, side: Side, index: usize) -> Option<&Slot> {
        self.slots[side].get(index)
    }

    // === Register / Query ===

    /// Bind `unit` to `(side, index)`.
    ///
    /// An occupied slot is overwritten silently; choosing a free slot is the
    /// binder's job. If `unit` already stands elsewhere, that entry is
    /// released in the same call. Returns the displaced occupant, if any.
    pub fn register_unit(
        &mut self,
        unit: UnitId,
        side: Side,
        index: usize,
    ) -> Result<Option<UnitId>, RegisterError> {
        let key = SlotKey::new(side, index);
        if self.get_slot(side, index).is_none() {
            warn!(%unit, slot = %key, "register refused: no such slot");
            return Err(RegisterError::NoSlot(key));
        }

        // One occupancy entry per unit.
        if let Some(old) = self.placements.get(&unit).map(|p| p.key).filter(|old| *old != key) {
            if self.occupancy.get(&old) == Some(&unit) {
                self.occupancy.remove(&old);
            }
            debug!(%unit, from = %old, to = %key, "unit rebound to another slot");
        }

        let displaced = self.occupancy.insert(key, unit).filter(|prev| *prev != unit);
        if let Some(prev) = displaced {
            debug!(%unit, slot = %key, displaced = %prev, "register overwrote occupant");
            if self.placements.get(&prev).is_some_and(|p| p.key == key) {
                self.placements.remove(&prev);
            }
        }
        self.placements.insert(unit, Placement::at(key));

        debug!(%unit, slot = %key, "unit registered");
        Ok(displaced)
    }

    /// Remove `unit` from `(side, index)` only if it is the current occupant.
    ///
    /// Returns `false` for stale calls (the slot was rebound in the meantime).
    pub fn unregister_unit(&mut self, unit: UnitId, side: Side, index: usize) -> bool {
        let key = SlotKey::new(side, index);
        if self.occupancy.get(&key) != Some(&unit) {
            debug!(%unit, slot = %key, "stale unregister ignored");
            return false;
        }

        self.occupancy.remove(&key);
        if self.placements.get(&unit).is_some_and(|p| p.key == key) {
            self.placements.remove(&unit);
        }
        debug!(%unit, slot = %key, "unit unregistered");
        true
    }

    /// Unit at `(side, index)`.
    #[must_use]
    pub fn get_occupant(&self, side: Side, index: usize) -> Option<UnitId> {
        self.occupancy.get(&SlotKey::new(side, index)).copied()
    }

    /// Current slot of `unit`. Linear scan; boards are tiny.
    #[must_use]
    pub fn get_unit_location(&self, unit: UnitId) -> Option<SlotKey> {
        self.occupancy
            .iter()
            .find(|(_, occupant)| **occupant == unit)
            .map(|(key, _)| *key)
    }

    /// Lane `unit` currently stands in.
    #[must_use]
    pub fn unit_lane(&self, unit: UnitId) -> Option<Lane> {
        self.get_unit_location(unit).map(SlotKey::lane)
    }

    /// Cached slot reference of `unit`.
    #[must_use]
    pub fn placement(&self, unit: UnitId) -> Option<Placement> {
        self.placements.get(&unit).copied()
    }

    /// Occupants of a side in ascending index order.
    pub fn occupants(&self, side: Side) -> impl Iterator<Item = (usize, UnitId)> + '_ {
        self.slots[side]
            .iter()
            .filter_map(move |slot| self.get_occupant(side, slot.index()).map(|u| (slot.index(), u)))
    }

    /// Number of occupied slots across both sides.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupancy.len()
    }

    /// First living enemy, scanning enemy slots in ascending index order.
    ///
    /// Enemy index 0 is the Front lane, so ascending index is front to back.
    /// Occupants without a health capability or not alive are skipped.
    #[must_use]
    pub fn get_front_most_enemy_unit(&self, units: &dyn UnitCapabilities) -> Option<UnitId> {
        let found = self.first_living(Side::Enemy, units);
        if found.is_none() {
            debug!("no living enemy in any enemy slot");
        }
        found
    }

    /// First living ally in ascending index order (Back first).
    ///
    /// Hosts use this to pick a default caster.
    #[must_use]
    pub fn first_living_ally(&self, units: &dyn UnitCapabilities) -> Option<UnitId> {
        self.first_living(Side::Ally, units)
    }

    fn first_living(&self, side: Side, units: &dyn UnitCapabilities) -> Option<UnitId> {
        self.occupants(side)
            .map(|(_, unit)| unit)
            .find(|unit| {
                let alive = units.is_alive(*unit);
                if !alive {
                    trace!(%unit, "skipping occupant: not alive or no health");
                }
                alive
            })
    }

    // === Knockback ===

    /// Push `unit` `cells` slots toward the back (higher index) of its side.
    ///
    /// Higher index is "back" for both sides. Fails without mutation if the
    /// destination is off the board or any slot in `(index, index + cells]`
    /// is occupied. On success the occupancy entry and cached placement move
    /// together before returning.
    pub fn knockback(&mut self, unit: UnitId, cells: u32) -> Result<Displacement, KnockbackError> {
        if cells == 0 {
            return Err(KnockbackError::NoDistance);
        }

        let from = self
            .get_unit_location(unit)
            .ok_or(KnockbackError::NotOnBoard(unit))?;

        let target = from
            .index
            .checked_add(cells as usize)
            .filter(|t| *t < self.slot_count(from.side))
            .ok_or(KnockbackError::OutOfRange { from, cells })?;

        for index in from.index + 1..=target {
            if let Some(by) = self.get_occupant(from.side, index) {
                return Err(KnockbackError::PathBlocked {
                    at: SlotKey::new(from.side, index),
                    by,
                });
            }
        }

        let to = SlotKey::new(from.side, target);
        self.occupancy.remove(&from);
        self.occupancy.insert(to, unit);
        self.placements.insert(unit, Placement::at(to));

        Ok(Displacement { unit, from, to })
    }

    /// Boolean form of [`Board::knockback`]. Failures are logged, not surfaced.
    pub fn try_knockback(&mut self, unit: UnitId, cells: u32) -> bool {
        match self.knockback(unit, cells) {
            Ok(moved) => {
                debug!(%unit, from = %moved.from, to = %moved.to, "knockback");
                true
            }
            Err(err) => {
                debug!(%unit, cells, reason = %err, "knockback failed (ignored)");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::slot::Anchor;
    use crate::core::{CombatUnit, UnitRoster};

    fn board() -> Board {
        Board::from_config(&BoardConfig::new())
    }

    #[test]
    fn test_from_config_slot_lists() {
        let board = board();
        assert_eq!(board.slot_count(Side::Ally), 4);
        assert_eq!(board.slot_count(Side::Enemy), 5);
        assert_eq!(board.get_slot(Side::Ally, 3).unwrap().lane(), Lane::FRONT);
        assert_eq!(board.get_slot(Side::Enemy, 0).unwrap().lane(), Lane::FRONT);
        assert!(board.get_slot(Side::Ally, 4).is_none());
    }

    #[test]
    fn test_from_layout_sorts_by_index() {
        let mut layout = BoardLayout::new();
        for i in [2usize, 0, 1] {
            layout.push_slot(Slot::new(Side::Ally, i, Anchor::default()));
        }
        layout.push_slot(Slot::new(Side::Enemy, 0, Anchor::default()));

        let board = Board::from_layout(layout).unwrap();
        let indices: Vec<_> = board.slots(Side::Ally).iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_from_layout_rejects_duplicates() {
        let mut layout = BoardLayout::new();
        layout.push_slot(Slot::new(Side::Enemy, 0, Anchor::default()));
        layout.push_slot(Slot::new(Side::Enemy, 0, Anchor::new(1.0, 0.0)));

        let err = Board::from_layout(layout).unwrap_err();
        assert_eq!(err, LayoutError::DuplicateSlot(SlotKey::new(Side::Enemy, 0)));
    }

    #[test]
    fn test_from_layout_rejects_gaps() {
        let mut layout = BoardLayout::new();
        layout.push_slot(Slot::new(Side::Ally, 0, Anchor::default()));
        layout.push_slot(Slot::new(Side::Ally, 2, Anchor::default()));

        let err = Board::from_layout(layout).unwrap_err();
        assert_eq!(
            err,
            LayoutError::IndexGap {
                side: Side::Ally,
                count: 2,
                missing: 1,
            }
        );
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut board = board();
        board.register_unit(UnitId(1), Side::Ally, 0).unwrap();
        let displaced = board.register_unit(UnitId(1), Side::Ally, 0).unwrap();

        assert_eq!(displaced, None);
        assert_eq!(board.get_occupant(Side::Ally, 0), Some(UnitId(1)));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_register_overwrites_and_reports_displaced() {
        let mut board = board();
        board.register_unit(UnitId(1), Side::Ally, 0).unwrap();
        let displaced = board.register_unit(UnitId(2), Side::Ally, 0).unwrap();

        assert_eq!(displaced, Some(UnitId(1)));
        assert_eq!(board.get_occupant(Side::Ally, 0), Some(UnitId(2)));
        assert_eq!(board.placement(UnitId(1)), None);
    }

    #[test]
    fn test_register_without_slot_is_refused() {
        let mut board = board();
        assert_eq!(
            board.register_unit(UnitId(1), Side::Ally, 9),
            Err(RegisterError::NoSlot(SlotKey::new(Side::Ally, 9)))
        );
        assert_eq!(board.get_occupant(Side::Ally, 9), None);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_register_elsewhere_releases_old_slot() {
        let mut board = board();
        board.register_unit(UnitId(1), Side::Ally, 0).unwrap();
        board.register_unit(UnitId(1), Side::Ally, 2).unwrap();

        assert_eq!(board.get_occupant(Side::Ally, 0), None);
        assert_eq!(board.get_unit_location(UnitId(1)), Some(SlotKey::new(Side::Ally, 2)));
        assert_eq!(board.placement(UnitId(1)).unwrap().key, SlotKey::new(Side::Ally, 2));
        assert_eq!(board.occupied_count(), 1);

        // Knockback moves the only entry.
        assert!(board.try_knockback(UnitId(1), 1));
        assert_eq!(board.get_occupant(Side::Ally, 2), None);
        assert_eq!(board.get_occupant(Side::Ally, 3), Some(UnitId(1)));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_unregister_guards_stale_calls() {
        let mut board = board();
        board.register_unit(UnitId(1), Side::Ally, 0).unwrap();
        board.register_unit(UnitId(2), Side::Ally, 0).unwrap();

        assert!(!board.unregister_unit(UnitId(1), Side::Ally, 0));
        assert_eq!(board.get_occupant(Side::Ally, 0), Some(UnitId(2)));

        assert!(board.unregister_unit(UnitId(2), Side::Ally, 0));
        assert_eq!(board.get_occupant(Side::Ally, 0), None);
        assert_eq!(board.placement(UnitId(2)), None);
    }

    #[test]
    fn test_unit_location_and_lane() {
        let mut board = board();
        board.register_unit(UnitId(5), Side::Enemy, 3).unwrap();

        assert_eq!(board.get_unit_location(UnitId(5)), Some(SlotKey::new(Side::Enemy, 3)));
        assert_eq!(board.unit_lane(UnitId(5)), Some(Lane::MID3));
        assert_eq!(board.get_unit_location(UnitId(6)), None);
    }

    #[test]
    fn test_front_most_skips_dead_and_incapable() {
        let mut board = board();
        let mut roster = UnitRoster::new();

        roster.insert(UnitId(10), CombatUnit::inert("Crate"));
        let mut dead = CombatUnit::new("Ghoul", 5, 0);
        dead.health.as_mut().unwrap().current = 0;
        roster.insert(UnitId(11), dead);
        roster.insert(UnitId(12), CombatUnit::new("Orc", 5, 0));

        board.register_unit(UnitId(10), Side::Enemy, 0).unwrap();
        board.register_unit(UnitId(11), Side::Enemy, 1).unwrap();
        board.register_unit(UnitId(12), Side::Enemy, 3).unwrap();

        assert_eq!(board.get_front_most_enemy_unit(&roster), Some(UnitId(12)));
    }

    #[test]
    fn test_first_living_ally() {
        let mut board = board();
        let mut roster = UnitRoster::new();
        roster.insert(UnitId(1), CombatUnit::new("Archer", 5, 3));
        roster.insert(UnitId(2), CombatUnit::new("Knight", 5, 3));

        board.register_unit(UnitId(2), Side::Ally, 3).unwrap();
        board.register_unit(UnitId(1), Side::Ally, 1).unwrap();

        assert_eq!(board.first_living_ally(&roster), Some(UnitId(1)));
    }

    #[test]
    fn test_knockback_moves_placement_with_occupancy() {
        let mut board = board();
        board.register_unit(UnitId(1), Side::Enemy, 0).unwrap();

        let moved = board.knockback(UnitId(1), 2).unwrap();

        assert_eq!(moved.from, SlotKey::new(Side::Enemy, 0));
        assert_eq!(moved.to, SlotKey::new(Side::Enemy, 2));
        assert_eq!(board.get_occupant(Side::Enemy, 0), None);
        assert_eq!(board.get_occupant(Side::Enemy, 2), Some(UnitId(1)));
        assert_eq!(board.placement(UnitId(1)).unwrap().lane, Lane::MID2);
    }

    #[test]
    fn test_knockback_errors() {
        let mut board = board();
        board.register_unit(UnitId(1), Side::Ally, 2).unwrap();
        board.register_unit(UnitId(2), Side::Ally, 3).unwrap();

        assert_eq!(board.knockback(UnitId(1), 0), Err(KnockbackError::NoDistance));
        assert_eq!(board.knockback(UnitId(9), 1), Err(KnockbackError::NotOnBoard(UnitId(9))));
        assert_eq!(
            board.knockback(UnitId(2), 1),
            Err(KnockbackError::OutOfRange {
                from: SlotKey::new(Side::Ally, 3),
                cells: 1,
            })
        );
        assert_eq!(
            board.knockback(UnitId(1), 1),
            Err(KnockbackError::PathBlocked {
                at: SlotKey::new(Side::Ally, 3),
                by: UnitId(2),
            })
        );
    }

    #[test]
    fn test_board_clone_is_independent() {
        let mut board = board();
        board.register_unit(UnitId(1), Side::Ally, 0).unwrap();
        let snapshot = board.clone();

        board.try_knockback(UnitId(1), 1);

        assert_eq!(snapshot.get_occupant(Side::Ally, 0), Some(UnitId(1)));
        assert_eq!(board.get_occupant(Side::Ally, 0), None);
    }
}
