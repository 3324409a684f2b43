//! Workplaces - board slots a worker may occupy.
//!
//! `WorkplaceDefinition` is catalog data (name, effect, opening round).
//! `Workplace` is the live slot on the board with its occupants. Sold
//! buildings become workplaces too, and keep the sold card as `source`.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, Effect};
use super::instance::Card;
use crate::core::PlayerId;

/// Identifier of a workplace on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkplaceId(pub u16);

impl std::fmt::Display for WorkplaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// Catalog entry for a public workplace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkplaceDefinition {
    pub name: String,
    pub effect_text: String,
    pub effect: Effect,
    /// More than one worker may stand here at once.
    pub multi: bool,
    /// Round in which the workplace appears on the board.
    pub opens_round: u32,
    /// Number of copies for 2, 3 and 4 players.
    pub copies: [u8; 3],
}

impl WorkplaceDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, effect: Effect, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effect_text: text.into(),
            effect,
            multi: false,
            opens_round: 1,
            copies: [1, 1, 1],
        }
    }

    #[must_use]
    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    #[must_use]
    pub fn opens(mut self, round: u32) -> Self {
        self.opens_round = round;
        self
    }

    #[must_use]
    pub fn copies(mut self, copies: [u8; 3]) -> Self {
        self.copies = copies;
        self
    }

    /// Copies placed on the board for a table of `player_count`.
    #[must_use]
    pub fn copies_for(&self, player_count: usize) -> usize {
        let slot = player_count.clamp(2, 4) - 2;
        usize::from(self.copies[slot])
    }
}

/// A live workplace on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workplace {
    pub id: WorkplaceId,
    pub name: String,
    pub effect_text: String,
    pub effect: Effect,
    pub multi: bool,
    /// Seats of the workers standing here this round.
    pub occupants: Vec<PlayerId>,
    /// The sold building this workplace came from.
    pub source: Option<Card>,
}

impl Workplace {
    #[must_use]
    pub fn public(id: WorkplaceId, def: &WorkplaceDefinition) -> Self {
        Self {
            id,
            name: def.name.clone(),
            effect_text: def.effect_text.clone(),
            effect: def.effect,
            multi: def.multi,
            occupants: Vec::new(),
            source: None,
        }
    }

    /// A workplace created from a building sold at payday.
    #[must_use]
    pub fn from_sold(id: WorkplaceId, card: Card, def: &CardDefinition) -> Self {
        Self {
            id,
            name: def.name.clone(),
            effect_text: def.effect_text.clone(),
            effect: def.effect,
            multi: false,
            occupants: Vec::new(),
            source: Some(card),
        }
    }

    /// Whether another worker fits here.
    #[must_use]
    pub fn has_room(&self) -> bool {
        self.multi || self.occupants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_for_clamps_player_count() {
        let build = Effect::Build { discount: 0, draw_after: 0 };
        let def = WorkplaceDefinition::new("Carpenter", build, "Build").copies([1, 2, 3]);

        assert_eq!(def.copies_for(2), 1);
        assert_eq!(def.copies_for(3), 2);
        assert_eq!(def.copies_for(4), 3);
    }

    #[test]
    fn test_single_slot_fills() {
        let def = WorkplaceDefinition::new("School", Effect::Hire, "Hire a worker");
        let mut slot = Workplace::public(WorkplaceId(0), &def);
        assert!(slot.has_room());

        slot.occupants.push(PlayerId::new(1));
        assert!(!slot.has_room());
    }

    #[test]
    fn test_multi_slot_never_fills() {
        let def = WorkplaceDefinition::new("Mine", Effect::Draw { count: 1 }, "Draw 1").multi();
        let mut slot = Workplace::public(WorkplaceId(1), &def);
        slot.occupants.extend([PlayerId::new(0), PlayerId::new(1)]);
        assert!(slot.has_room());
    }
}
