//! Lanes and the side/index → lane table.
//!
//! `PositionResolver::to_lane` is the only place lane semantics are defined.
//! The two sides use mirrored tables:
//!
//! | index | Ally  | Enemy |
//! |-------|-------|-------|
//! | 0     | Back  | Front |
//! | 1     | Mid2  | Mid1  |
//! | 2     | Mid1  | Mid2  |
//! | 3     | Front | Mid3  |
//! | 4     | -     | Back  |
//!
//! Any other index maps to `Lane::NONE`.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::Side;

bitflags! {
    /// Logical lane flags, also used as masks (`PosUse`, `PosHit`).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Lane: u8 {
        const FRONT = 1 << 0;
        const MID1  = 1 << 1;
        const MID2  = 1 << 2;
        /// Enemy side only.
        const MID3  = 1 << 3;
        const BACK  = 1 << 4;
    }
}

impl Lane {
    /// No lane. Never matches any mask.
    pub const NONE: Lane = Lane::empty();

    /// Every lane.
    pub const ALL: Lane = Lane::all();
}

/// Pure side/index → lane mapping.
pub struct PositionResolver;

impl PositionResolver {
    /// Lane of the slot at `index` on `side`.
    ///
    /// ```
    /// use lane_combat::board::{Lane, PositionResolver};
    /// use lane_combat::core::Side;
    ///
    /// assert_eq!(PositionResolver::to_lane(Side::Ally, 3), Lane::FRONT);
    /// assert_eq!(PositionResolver::to_lane(Side::Enemy, 0), Lane::FRONT);
    /// assert_eq!(PositionResolver::to_lane(Side::Ally, 4), Lane::NONE);
    /// ```
    #[must_use]
    pub const fn to_lane(side: Side, index: usize) -> Lane {
        match side {
            Side::Ally => match index {
                0 => Lane::BACK,
                1 => Lane::MID2,
                2 => Lane::MID1,
                3 => Lane::FRONT,
                _ => Lane::NONE,
            },
            Side::Enemy => match index {
                0 => Lane::FRONT,
                1 => Lane::MID1,
                2 => Lane::MID2,
                3 => Lane::MID3,
                4 => Lane::BACK,
                _ => Lane::NONE,
            },
        }
    }

    /// Whether `lane` intersects `mask`.
    #[must_use]
    pub const fn lane_matches(lane: Lane, mask: Lane) -> bool {
        lane.intersects(mask)
    }
}
