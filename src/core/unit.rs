//! Unit handles.
//!
//! Every combatant placed on the board is referred to by an opaque `UnitId`.
//! The combat core never spawns or destroys units; external spawning code
//! allocates ids and binds them to slots through the board.
//!
//! ```
//! use lane_combat::core::UnitId;
//!
//! let a = UnitId::new(7);
//! assert_eq!(a.raw(), 7);
//! assert_eq!(format!("{}", a), "Unit(7)");
//! ```

use serde::{Deserialize, Serialize};

/// Opaque handle for a unit on the board.
///
/// Handles are cheap to copy and compare. Two handles are the same unit
/// if and only if their raw values are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create a unit handle from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for UnitId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_basics() {
        let id = UnitId::new(3);
        assert_eq!(id.raw(), 3);
        assert_eq!(id, UnitId::from(3));
        assert_ne!(id, UnitId::new(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", UnitId(42)), "Unit(42)");
    }

    #[test]
    fn test_serialization() {
        let id = UnitId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: UnitId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
