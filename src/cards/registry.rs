//! The catalog: read-only lookup of building and workplace definitions.
//!
//! Loaded once at process start (usually `Catalog::standard()`), wrapped in
//! an `Arc` and shared by the engine and the bots. Looking up a definition
//! that is not registered is a programming error and panics.

use rustc_hash::FxHashMap;

use super::definition::{CardDefId, CardDefinition};
use super::workplace::WorkplaceDefinition;

/// Registry of building definitions, deck composition and workplaces.
///
/// ## Example
///
/// ```
/// use economy_engine::cards::{Catalog, CardDefinition, CardDefId};
///
/// let mut catalog = Catalog::new();
/// catalog.register(CardDefinition::new(CardDefId::new(1), "Farm", 1, 6), 4);
///
/// assert_eq!(catalog.card(CardDefId::new(1)).name, "Farm");
/// assert_eq!(catalog.deck_list().len(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cards: FxHashMap<CardDefId, CardDefinition>,
    /// Copies of each definition in the starting deck, in registration order.
    deck: Vec<(CardDefId, u32)>,
    workplaces: Vec<WorkplaceDefinition>,
}

impl Catalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a building with the number of copies in the deck.
    ///
    /// Panics if a definition with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition, copies: u32) {
        if self.cards.contains_key(&card.id) {
            panic!("Card definition {} already registered", card.id);
        }
        self.deck.push((card.id, copies));
        self.cards.insert(card.id, card);
    }

    /// Register a public workplace.
    pub fn register_workplace(&mut self, workplace: WorkplaceDefinition) {
        self.workplaces.push(workplace);
    }

    /// Get a definition by ID.
    #[must_use]
    pub fn get(&self, id: CardDefId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a definition by ID, panicking if not found.
    #[must_use]
    pub fn card(&self, id: CardDefId) -> &CardDefinition {
        self.cards
            .get(&id)
            .unwrap_or_else(|| panic!("Card definition {id} not in catalog"))
    }

    #[must_use]
    pub fn contains(&self, id: CardDefId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over definitions in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        let mut defs: Vec<_> = self.cards.values().collect();
        defs.sort_by_key(|d| d.id);
        defs.into_iter()
    }

    /// The starting deck, one entry per physical copy, in registration order.
    #[must_use]
    pub fn deck_list(&self) -> Vec<CardDefId> {
        self.deck
            .iter()
            .flat_map(|&(id, copies)| std::iter::repeat(id).take(copies as usize))
            .collect()
    }

    /// All public workplace definitions.
    #[must_use]
    pub fn workplaces(&self) -> &[WorkplaceDefinition] {
        &self.workplaces
    }

    /// Workplaces that appear on the board in `round`.
    pub fn workplaces_opening(&self, round: u32) -> impl Iterator<Item = &WorkplaceDefinition> {
        self.workplaces.iter().filter(move |w| w.opens_round == round)
    }
}
