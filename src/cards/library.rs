//! Card library for definition lookup.
//!
//! The `CardLibrary` is filled once from the host's data pipeline and read
//! for the rest of the battle.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use super::definition::{CardDefinition, CardId};

/// A definition the library refused to store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// The data row had no usable id.
    #[error("card definition has an empty id")]
    EmptyId,
}

/// Id → definition registry.
///
/// ## Example
///
/// ```
/// use lane_combat::cards::{CardDefinition, CardId, CardLibrary};
///
/// let mut library = CardLibrary::new();
/// library.register(CardDefinition::new("strike").with_cost(1)).unwrap();
///
/// let found = library.get(&CardId::new("strike")).unwrap();
/// assert_eq!(found.cost, 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardLibrary {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardLibrary {
    /// Create a new empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from data rows, skipping rows with an empty id.
    pub fn from_definitions(cards: impl IntoIterator<Item = CardDefinition>) -> Self {
        let mut library = Self::new();
        for card in cards {
            if let Err(err) = library.register(card) {
                warn!(%err, "skipping card row");
            }
        }
        debug!(count = library.len(), "card library loaded");
        library
    }

    /// Register a card definition.
    ///
    /// Re-registering an id replaces the previous definition.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), LibraryError> {
        if card.id.is_empty() {
            return Err(LibraryError::EmptyId);
        }
        let id = card.id.clone();
        if self.cards.insert(id.clone(), card).is_some() {
            warn!(card = %id, "duplicate card id, replacing definition");
        }
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Cards owned by a character (`"Public"` for shared cards).
    pub fn for_character<'a>(&'a self, char_id: &'a str) -> impl Iterator<Item = &'a CardDefinition> {
        self.cards.values().filter(move |c| c.char_id == char_id)
    }
}
