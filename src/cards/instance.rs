//! Card instances - the physical copies in play.
//!
//! Every copy has a unique `CardInstanceId`. A copy is either a building
//! (pointing at its definition), a consumable goods card with no attributes,
//! or a `Hidden` placeholder produced when a view is redacted for another
//! player.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefId, CardDefinition};
use super::registry::Catalog;

/// Unique identifier of one physical card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardInstanceId(pub u32);

impl std::fmt::Display for CardInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a card is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Building(CardDefId),
    Consumable,
    /// Identity withheld from the viewer.
    Hidden,
}

/// A card in a deck, pile, hand or on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardInstanceId,
    pub kind: CardKind,
}

impl Card {
    #[must_use]
    pub const fn building(id: CardInstanceId, def: CardDefId) -> Self {
        Self {
            id,
            kind: CardKind::Building(def),
        }
    }

    #[must_use]
    pub const fn consumable(id: CardInstanceId) -> Self {
        Self {
            id,
            kind: CardKind::Consumable,
        }
    }

    /// The same card with its identity withheld.
    #[must_use]
    pub const fn hidden(self) -> Self {
        Self {
            id: self.id,
            kind: CardKind::Hidden,
        }
    }

    #[must_use]
    pub fn def_id(&self) -> Option<CardDefId> {
        match self.kind {
            CardKind::Building(def) => Some(def),
            CardKind::Consumable | CardKind::Hidden => None,
        }
    }

    #[must_use]
    pub fn is_consumable(&self) -> bool {
        self.kind == CardKind::Consumable
    }

    /// Look up the building definition, if this is a visible building.
    ///
    /// Panics if the definition is missing from the catalog.
    #[must_use]
    pub fn definition<'a>(&self, catalog: &'a Catalog) -> Option<&'a CardDefinition> {
        self.def_id().map(|def| catalog.card(def))
    }
}

/// A building on a player's table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuiltStructure {
    pub card: Card,
    /// A worker occupies this building this round.
    pub worker_placed: bool,
}

impl BuiltStructure {
    #[must_use]
    pub const fn new(card: Card) -> Self {
        Self {
            card,
            worker_placed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_keeps_instance_id() {
        let card = Card::building(CardInstanceId(12), CardDefId::new(4));
        let hidden = card.hidden();

        assert_eq!(hidden.id, CardInstanceId(12));
        assert_eq!(hidden.kind, CardKind::Hidden);
        assert_eq!(hidden.def_id(), None);
    }

    #[test]
    fn test_consumable_has_no_definition() {
        let catalog = Catalog::standard();
        let card = Card::consumable(CardInstanceId(1));

        assert!(card.is_consumable());
        assert!(card.definition(&catalog).is_none());
    }
}
