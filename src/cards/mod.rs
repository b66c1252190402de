//! Card data: definitions and the library.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `TargetType`: How a card's targets are chosen
//! - `CardDefinition`: Static card data, read-only during a battle
//! - `CardLibrary`: Definition lookup

pub mod definition;
pub mod library;

pub use definition::{CardClass, CardDefinition, CardId, CardKind, CardRarity, TargetType};
pub use library::{CardLibrary, LibraryError};
