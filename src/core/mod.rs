//! Core combat types: unit handles, sides, capabilities, RNG, configuration.
//!
//! This module contains the building blocks every other module depends on.
//! Hosts configure the core via `BoardConfig` and `ResolverConfig` and
//! expose their units through `UnitCapabilities`.

pub mod unit;
pub mod side;
pub mod rng;
pub mod config;
pub mod capability;

pub use unit::UnitId;
pub use side::{Side, SideMap};
pub use rng::{CombatRng, CombatRngState};
pub use config::{BoardConfig, LayoutStyle, ResolverConfig};
pub use capability::{
    ActionPoints, ApConsumer, CombatUnit, Damageable, Health, UnitCapabilities, UnitRoster,
};
