//! Unit capabilities the combat core depends on.
//!
//! The core never owns unit state. It reaches units through two narrow
//! capability contracts looked up by handle:
//! - `Damageable`: alive check and damage application
//! - `ApConsumer`: action-point balance and consumption
//!
//! A unit lacking a capability is ineligible for whatever operation needed
//! it; callers skip it with a warning rather than failing.
//!
//! `CombatUnit` and `UnitRoster` are a reference implementation used by
//! tests, benches, and simple hosts.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::unit::UnitId;

/// Health capability.
pub trait Damageable {
    /// Whether the unit can still be targeted as a living combatant.
    fn is_alive(&self) -> bool;

    /// Apply `amount` damage.
    fn apply_damage(&mut self, amount: u32);
}

/// Action-point capability.
pub trait ApConsumer {
    /// Current AP balance.
    fn current_ap(&self) -> u32;

    /// Spend `amount` AP. Returns `false` and leaves the balance untouched
    /// when the balance is insufficient.
    fn try_consume_ap(&mut self, amount: u32) -> bool;
}

/// Handle → capability lookup supplied by the host.
pub trait UnitCapabilities {
    /// Health capability of a unit, if it has one.
    fn health(&self, unit: UnitId) -> Option<&dyn Damageable>;

    /// Mutable health capability of a unit, if it has one.
    fn health_mut(&mut self, unit: UnitId) -> Option<&mut dyn Damageable>;

    /// Mutable AP capability of a unit, if it has one.
    fn action_points_mut(&mut self, unit: UnitId) -> Option<&mut dyn ApConsumer>;

    /// Whether the unit exists and reports alive.
    ///
    /// Units without a health capability are never alive.
    fn is_alive(&self, unit: UnitId) -> bool {
        self.health(unit).is_some_and(|hp| hp.is_alive())
    }
}

/// Hit points clamped at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub max: u32,
    pub current: u32,
}

impl Health {
    /// Full health.
    #[must_use]
    pub fn new(max: u32) -> Self {
        assert!(max > 0, "Max HP must be at least 1");
        Self { max, current: max }
    }
}

impl Damageable for Health {
    fn is_alive(&self) -> bool {
        self.current > 0
    }

    fn apply_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Action-point pool clamped at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPoints {
    pub current: u32,
}

impl ActionPoints {
    /// A pool holding `current` AP.
    #[must_use]
    pub const fn new(current: u32) -> Self {
        Self { current }
    }
}

impl ApConsumer for ActionPoints {
    fn current_ap(&self) -> u32 {
        self.current
    }

    fn try_consume_ap(&mut self, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }
}

/// Reference unit: optional health and optional AP.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatUnit {
    /// Display name (debugging only).
    pub name: String,
    pub health: Option<Health>,
    pub ap: Option<ActionPoints>,
}

impl CombatUnit {
    /// A unit with both capabilities: `max_hp` health and `ap` action points.
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: u32, ap: u32) -> Self {
        Self {
            name: name.into(),
            health: Some(Health::new(max_hp)),
            ap: Some(ActionPoints::new(ap)),
        }
    }

    /// A unit with no capabilities (e.g. an obstacle).
    #[must_use]
    pub fn inert(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: None,
            ap: None,
        }
    }

    /// Drop the health capability (builder pattern).
    #[must_use]
    pub fn without_health(mut self) -> Self {
        self.health = None;
        self
    }

    /// Drop the AP capability (builder pattern).
    #[must_use]
    pub fn without_ap(mut self) -> Self {
        self.ap = None;
        self
    }

    /// Current HP, or 0 without a health capability.
    #[must_use]
    pub fn hp(&self) -> u32 {
        self.health.map_or(0, |h| h.current)
    }

    /// Current AP, or 0 without an AP capability.
    #[must_use]
    pub fn current_ap(&self) -> u32 {
        self.ap.map_or(0, |ap| ap.current)
    }

    /// Set the AP balance. No-op without an AP capability.
    pub fn set_ap(&mut self, value: u32) {
        if let Some(ap) = self.ap.as_mut() {
            ap.current = value;
        }
    }

    /// Adjust the AP balance, clamping at zero. No-op without an AP capability.
    pub fn add_ap(&mut self, delta: i64) {
        if let Some(ap) = self.ap.as_mut() {
            let next = (i64::from(ap.current) + delta).clamp(0, i64::from(u32::MAX));
            ap.current = next as u32;
        }
    }
}

/// Reference `UnitCapabilities` implementation keyed by handle.
///
/// ```
/// use lane_combat::core::{CombatUnit, UnitCapabilities, UnitId, UnitRoster};
///
/// let mut roster = UnitRoster::new();
/// roster.insert(UnitId(1), CombatUnit::new("Knight", 30, 3));
///
/// assert!(roster.is_alive(UnitId(1)));
/// assert!(!roster.is_alive(UnitId(2)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct UnitRoster {
    units: FxHashMap<UnitId, CombatUnit>,
}

impl UnitRoster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a unit.
    pub fn insert(&mut self, id: UnitId, unit: CombatUnit) -> Option<CombatUnit> {
        debug!(unit = %id, name = %unit.name, "roster insert");
        self.units.insert(id, unit)
    }

    /// Remove a unit.
    pub fn remove(&mut self, id: UnitId) -> Option<CombatUnit> {
        self.units.remove(&id)
    }

    /// Look up a unit.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&CombatUnit> {
        self.units.get(&id)
    }

    /// Look up a unit mutably.
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut CombatUnit> {
        self.units.get_mut(&id)
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl UnitCapabilities for UnitRoster {
    fn health(&self, unit: UnitId) -> Option<&dyn Damageable> {
        self.units
            .get(&unit)
            .and_then(|u| u.health.as_ref())
            .map(|h| h as &dyn Damageable)
    }

    fn health_mut(&mut self, unit: UnitId) -> Option<&mut dyn Damageable> {
        self.units
            .get_mut(&unit)
            .and_then(|u| u.health.as_mut())
            .map(|h| h as &mut dyn Damageable)
    }

    fn action_points_mut(&mut self, unit: UnitId) -> Option<&mut dyn ApConsumer> {
        self.units
            .get_mut(&unit)
            .and_then(|u| u.ap.as_mut())
            .map(|ap| ap as &mut dyn ApConsumer)
    }
}
