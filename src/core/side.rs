//! Board sides and per-side storage.
//!
//! ## Side
//!
//! The two teams facing each other. A unit's side is fixed once it is placed.
//!
//! ## SideMap
//!
//! Fixed two-entry storage indexed by `Side`, used wherever the board keeps
//! one value per team (slot lists, slot counts).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two teams on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The player's team.
    Ally,
    /// The opposing team.
    Enemy,
}

impl Side {
    /// Both sides, Ally first.
    pub const ALL: [Side; 2] = [Side::Ally, Side::Enemy];

    /// The other team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }

    #[must_use]
    const fn slot(self) -> usize {
        match self {
            Side::Ally => 0,
            Side::Enemy => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Ally => write!(f, "Ally"),
            Side::Enemy => write!(f, "Enemy"),
        }
    }
}

/// Per-side data storage.
///
/// ```
/// use lane_combat::core::{Side, SideMap};
///
/// let mut counts: SideMap<usize> = SideMap::new(|side| match side {
///     Side::Ally => 4,
///     Side::Enemy => 5,
/// });
/// assert_eq!(counts[Side::Enemy], 5);
///
/// counts[Side::Ally] = 3;
/// assert_eq!(counts[Side::Ally], 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Ally), factory(Side::Enemy)],
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.slot()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.slot()]
    }

    /// Iterate over (Side, &T) pairs, Ally first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
