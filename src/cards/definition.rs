//! Card definitions - static building data.
//!
//! `CardDefinition` holds the immutable properties of a building type:
//! "Factory" costs 3, is worth 12 VP and lets its owner discard two cards to
//! draw four. Instance data (which copy, where it is) lives in `Card`.
//!
//! `Effect` is shared with public workplaces: a sold building turns into a
//! public workplace carrying its definition's effect.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Identifier of a card definition ("Factory"), not of a copy in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardDefId(pub u16);

impl CardDefId {
    /// Create a new definition ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for CardDefId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Def({})", self.0)
    }
}

/// Category tags referenced by scoring bonuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardTag {
    /// Produces food (consumable goods).
    Farm,
    /// Produces goods (card draw engines).
    Factory,
}

/// Action granted to a worker placed on a workplace or building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Nothing to do; placing a worker here is not allowed.
    None,
    /// Draw building cards.
    Draw { count: u32 },
    /// Gain consumable goods cards.
    Consumables { count: u32 },
    /// Gain consumables until the hand holds `up_to` cards.
    FillConsumables { up_to: u32 },
    /// Take the start-player marker for next round, then draw.
    StartPlayer { draw: u32 },
    /// Hire one worker, available from next round.
    Hire,
    /// Hire until the player owns `target` workers.
    HireUpTo { target: u32 },
    /// Hire one robot worker that draws no wages.
    HireRobot,
    /// Build one building from hand.
    Build { discount: u32, draw_after: u32 },
    /// Build two buildings of equal cost paying for only one.
    DualBuild,
    /// Reveal cards from the deck, keep one, discard the rest.
    DesignOffice { reveal: u32 },
    /// Discard cards from hand, then draw.
    DiscardDraw { discard: u32, draw: u32 },
    /// Discard cards from hand, then take money from the household.
    DiscardIncome { discard: u32, income: i64 },
    /// Discard cards from hand, then gain victory point tokens.
    DiscardTokens { discard: u32, vp: i64 },
    /// Draw `draw`, or `empty_draw` when the hand is empty.
    DrawWhenEmpty { draw: u32, empty_draw: u32 },
}

impl Effect {
    /// Whether a worker may be placed on something with this effect.
    #[must_use]
    pub fn is_placeable(self) -> bool {
        !matches!(self, Effect::None)
    }

    /// Whether resolving this effect opens a selection sub-phase.
    #[must_use]
    pub fn opens_selection(self) -> bool {
        matches!(
            self,
            Effect::Build { .. }
                | Effect::DualBuild
                | Effect::DesignOffice { .. }
                | Effect::DiscardDraw { .. }
                | Effect::DiscardIncome { .. }
                | Effect::DiscardTokens { .. }
        )
    }
}

/// Always-on building abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Passive {
    /// Raises the end-of-round hand limit.
    HandLimit(u32),
    /// Raises the worker cap.
    WorkerCap(u32),
    /// Forgives up to this many unpaid-debt markers at scoring.
    DebtExemption(u32),
}

/// End-of-game victory point bonus granted by a building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreBonus {
    /// Points per building owned (this one included).
    PerBuilding(i64),
    /// Points per owned building carrying the tag.
    PerTag(CardTag, i64),
    /// Points per owned unsellable building.
    PerUnsellable(i64),
    /// Points per worker owned.
    PerWorker(i64),
}

/// Static building definition.
///
/// ## Example
///
/// ```
/// use economy_engine::cards::{CardDefinition, CardDefId, CardTag, Effect};
///
/// let factory = CardDefinition::new(CardDefId::new(7), "Factory", 3, 12)
///     .with_tag(CardTag::Factory)
///     .with_effect(Effect::DiscardDraw { discard: 2, draw: 4 }, "Discard 2, draw 4");
///
/// assert!(factory.has_tag(CardTag::Factory));
/// assert!(!factory.unsellable);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardDefId,
    pub name: String,
    /// Build cost, paid by discarding this many other cards.
    pub cost: u32,
    /// Base victory points; also the cash value when sold at payday.
    pub vp: i64,
    pub tags: SmallVec<[CardTag; 2]>,
    pub unsellable: bool,
    /// Display text only; behavior comes from `effect`, `passive`, `bonus`.
    pub effect_text: String,
    pub effect: Effect,
    pub passive: Option<Passive>,
    pub bonus: Option<ScoreBonus>,
}

impl CardDefinition {
    /// Create a definition with no abilities.
    #[must_use]
    pub fn new(id: CardDefId, name: impl Into<String>, cost: u32, vp: i64) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            vp,
            tags: SmallVec::new(),
            unsellable: false,
            effect_text: String::new(),
            effect: Effect::None,
            passive: None,
            bonus: None,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: CardTag) -> Self {
        self.tags.push(tag);
        self
    }

    #[must_use]
    pub fn unsellable(mut self) -> Self {
        self.unsellable = true;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect, text: impl Into<String>) -> Self {
        self.effect = effect;
        self.effect_text = text.into();
        self
    }

    #[must_use]
    pub fn with_passive(mut self, passive: Passive, text: impl Into<String>) -> Self {
        self.passive = Some(passive);
        self.effect_text = text.into();
        self
    }

    #[must_use]
    pub fn with_bonus(mut self, bonus: ScoreBonus, text: impl Into<String>) -> Self {
        self.bonus = Some(bonus);
        self.effect_text = text.into();
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: CardTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Cost after a build discount, never below zero.
    #[must_use]
    pub fn discounted_cost(&self, discount: u32) -> u32 {
        self.cost.saturating_sub(discount)
    }
}
