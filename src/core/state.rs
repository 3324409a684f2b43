//! Game state: the single root owned by the rule engine.
//!
//! ## GameState
//!
//! - Phase, round, start player, current player
//! - Shared deck and discard pile (top of the deck is the front)
//! - Per-player state, public workplaces, household treasury
//! - Append-only log and move history
//! - At most one phase sub-state, matching `phase`
//!
//! Deck, discard, log and history are `im` persistent vectors so the engine
//! can apply a move to a clone and commit only on success.
//!
//! ## Card conservation
//!
//! Building cards move between deck, discard, hands, tables, sold-building
//! workplaces and a pending design-office reveal, but are never created or
//! destroyed. Consumable goods are minted from an unlimited supply and
//! retired when discarded.

use std::collections::BTreeSet;

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::{MoveRecord, Placement};
use super::config::MatchConfig;
use super::event::{GameEvent, LogEntry};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{BuiltStructure, Card, CardInstanceId, Workplace, WorkplaceId};
use crate::rules::scoring::ScoreBreakdown;

/// Named stage of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Work,
    Build,
    Discard,
    DesignOffice,
    DualConstruction,
    Payday,
    Cleanup,
    GameEnd,
}

impl Phase {
    /// Payday and cleanup let every affected player act independently.
    #[must_use]
    pub fn is_simultaneous(self) -> bool {
        matches!(self, Phase::Payday | Phase::Cleanup)
    }
}

/// Everything one player owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Cash on hand.
    pub money: i64,
    /// Workers owned, robots included.
    pub workers: u32,
    /// Workers not yet placed this round.
    pub available_workers: u32,
    pub worker_cap: u32,
    pub hand: Vec<Card>,
    pub buildings: Vec<BuiltStructure>,
    pub vp_tokens: i64,
    /// Workers that draw no wages.
    pub robots: u32,
    pub unpaid_debts: u32,
    pub hand_limit: u32,
}

impl PlayerState {
    #[must_use]
    pub fn new(config: &MatchConfig, money: i64) -> Self {
        Self {
            money,
            workers: config.starting_workers,
            available_workers: config.starting_workers,
            worker_cap: config.worker_cap,
            hand: Vec::new(),
            buildings: Vec::new(),
            vp_tokens: 0,
            robots: 0,
            unpaid_debts: 0,
            hand_limit: config.hand_limit,
        }
    }

    /// Workers that draw wages at payday.
    #[must_use]
    pub fn paid_workers(&self) -> u32 {
        self.workers.saturating_sub(self.robots)
    }

    #[must_use]
    pub fn hand_position(&self, id: CardInstanceId) -> Option<usize> {
        self.hand.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn building_position(&self, id: CardInstanceId) -> Option<usize> {
        self.buildings.iter().position(|b| b.card.id == id)
    }

    /// Remove a card from hand by instance id.
    pub fn take_from_hand(&mut self, id: CardInstanceId) -> Option<Card> {
        let pos = self.hand_position(id)?;
        Some(self.hand.remove(pos))
    }
}

/// Build sub-phase: the player picks one card from hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSelection {
    pub player: PlayerId,
    pub placement: Placement,
    pub discount: u32,
    pub draw_after: u32,
}

/// Dual-construction sub-phase: two equal-cost cards are toggled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualSelection {
    pub player: PlayerId,
    pub placement: Placement,
    pub selected: SmallVec<[CardInstanceId; 2]>,
}

/// Design-office sub-phase: revealed cards waiting for a pick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealPick {
    pub player: PlayerId,
    pub placement: Placement,
    pub revealed: Vec<Card>,
}

/// What happens once the discard selection is confirmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscardPurpose {
    /// Discards pay for the locked cards, which are then built. One card
    /// came from a build selection, two from dual construction.
    Build {
        cards: SmallVec<[CardInstanceId; 2]>,
        discount: u32,
        draw_after: u32,
    },
    Draw { count: u32 },
    Income { amount: i64 },
    Tokens { vp: i64 },
}

/// Discard sub-phase triggered by a worker placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardSelection {
    pub player: PlayerId,
    pub placement: Placement,
    pub required: u32,
    /// Cards in hand that may not be selected (being built).
    pub locked: SmallVec<[CardInstanceId; 2]>,
    pub selected: BTreeSet<CardInstanceId>,
    pub purpose: DiscardPurpose,
}

/// One player's pending wage payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaydayRecord {
    pub owed: i64,
    /// Buildings marked for sale.
    pub selected: BTreeSet<CardInstanceId>,
    pub confirmed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaydayState {
    /// Wage per paid worker this round.
    pub wage: i64,
    /// `None` for players who were settled on entry.
    pub records: PlayerMap<Option<PaydayRecord>>,
}

impl PaydayState {
    /// Players still required to confirm.
    pub fn pending(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.records
            .iter()
            .filter(|(_, r)| r.as_ref().is_some_and(|r| !r.confirmed))
            .map(|(p, _)| p)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending().next().is_none()
    }
}

/// One player's pending end-of-round discard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupRecord {
    pub required: u32,
    pub selected: BTreeSet<CardInstanceId>,
    pub confirmed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupState {
    /// `None` for players within their hand limit.
    pub records: PlayerMap<Option<CleanupRecord>>,
}

impl CleanupState {
    pub fn pending(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.records
            .iter()
            .filter(|(_, r)| r.as_ref().is_some_and(|r| !r.confirmed))
            .map(|(p, _)| p)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending().next().is_none()
    }
}

/// Phase-scoped sub-state. Exactly one variant per non-work phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubState {
    Build(BuildSelection),
    Discard(DiscardSelection),
    DesignOffice(RevealPick),
    DualConstruction(DualSelection),
    Payday(PaydayState),
    Cleanup(CleanupState),
    /// Ranked score breakdowns, present once the match is over.
    Final(Vec<ScoreBreakdown>),
}

impl SubState {
    /// The phase this sub-state belongs to.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            SubState::Build(_) => Phase::Build,
            SubState::Discard(_) => Phase::Discard,
            SubState::DesignOffice(_) => Phase::DesignOffice,
            SubState::DualConstruction(_) => Phase::DualConstruction,
            SubState::Payday(_) => Phase::Payday,
            SubState::Cleanup(_) => Phase::Cleanup,
            SubState::Final(_) => Phase::GameEnd,
        }
    }
}

/// Complete match state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    /// Current round, starting at 1.
    pub round: u32,
    pub start_player: PlayerId,
    pub current_player: PlayerId,
    pub deck: Vector<Card>,
    pub discard: Vector<Card>,
    pub players: PlayerMap<PlayerState>,
    pub workplaces: Vec<Workplace>,
    /// Shared treasury: receives wages, pays out income.
    pub household: i64,
    pub log: Vector<LogEntry>,
    pub history: Vector<MoveRecord>,
    pub sub_state: Option<SubState>,
    /// Bumped on every accepted move.
    pub version: u64,
    pub next_card_id: u32,
    pub next_workplace_id: u16,
    pub rng: GameRng,
}

impl GameState {
    /// Create a bare state: players funded, no cards dealt, no workplaces.
    #[must_use]
    pub fn new(config: &MatchConfig, start_player: PlayerId, seed: u64) -> Self {
        let count = config.player_count;
        let players = PlayerMap::new(count, |p| {
            // Seats after the start player get $1 more each
            let offset = (p.index() + count - start_player.index()) % count;
            PlayerState::new(config, config.starting_money + offset as i64)
        });

        Self {
            phase: Phase::Work,
            round: 1,
            start_player,
            current_player: start_player,
            deck: Vector::new(),
            discard: Vector::new(),
            players,
            workplaces: Vec::new(),
            household: 0,
            log: Vector::new(),
            history: Vector::new(),
            sub_state: None,
            version: 0,
            next_card_id: 0,
            next_workplace_id: 0,
            rng: GameRng::new(seed),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameEnd
    }

    /// Final ranked scores, once the match is over.
    #[must_use]
    pub fn final_scores(&self) -> Option<&[ScoreBreakdown]> {
        match &self.sub_state {
            Some(SubState::Final(scores)) => Some(scores),
            _ => None,
        }
    }

    // === Allocation ===

    pub fn alloc_card_id(&mut self) -> CardInstanceId {
        let id = CardInstanceId(self.next_card_id);
        self.next_card_id += 1;
        id
    }

    pub fn alloc_workplace_id(&mut self) -> WorkplaceId {
        let id = WorkplaceId(self.next_workplace_id);
        self.next_workplace_id += 1;
        id
    }

    // === Log ===

    /// Append a log line with its structured event.
    pub fn log(&mut self, text: impl Into<String>, event: GameEvent) {
        let entry = LogEntry::new(self.round, text, event);
        self.log.push_back(entry);
    }

    // === Cards ===

    /// Shuffle the discard pile into the deck once the deck runs out.
    fn refill_deck(&mut self) {
        if !self.deck.is_empty() || self.discard.is_empty() {
            return;
        }
        let mut cards: Vec<Card> = std::mem::take(&mut self.discard).into_iter().collect();
        self.rng.shuffle(&mut cards);
        self.deck = cards.into_iter().collect();
    }

    /// Take the top card of the deck, reshuffling the discard pile if needed.
    pub fn pop_deck(&mut self) -> Option<Card> {
        self.refill_deck();
        self.deck.pop_front()
    }

    /// Draw up to `count` cards into a hand. Returns how many were drawn.
    pub fn draw(&mut self, player: PlayerId, count: u32) -> u32 {
        let mut drawn = 0;
        for _ in 0..count {
            match self.pop_deck() {
                Some(card) => {
                    self.players[player].hand.push(card);
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }

    /// Give a player fresh consumable goods.
    pub fn gain_consumables(&mut self, player: PlayerId, count: u32) {
        for _ in 0..count {
            let id = self.alloc_card_id();
            self.players[player].hand.push(Card::consumable(id));
        }
    }

    /// Put a card out of play: buildings to the discard pile, goods back to supply.
    pub fn discard_card(&mut self, card: Card) {
        if !card.is_consumable() {
            self.discard.push_back(card);
        }
    }

    /// Cards available to draw or reveal, counting the reshuffle.
    #[must_use]
    pub fn drawable(&self) -> usize {
        self.deck.len() + self.discard.len()
    }

    #[must_use]
    pub fn workplace(&self, id: WorkplaceId) -> Option<&Workplace> {
        self.workplaces.iter().find(|w| w.id == id)
    }

    pub fn workplace_mut(&mut self, id: WorkplaceId) -> Option<&mut Workplace> {
        self.workplaces.iter_mut().find(|w| w.id == id)
    }

    // === Invariant helpers ===

    /// Every card in play, wherever it sits.
    #[must_use]
    pub fn all_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self.deck.iter().chain(self.discard.iter()).copied().collect();
        for (_, p) in self.players.iter() {
            cards.extend(p.hand.iter().copied());
            cards.extend(p.buildings.iter().map(|b| b.card));
        }
        cards.extend(self.workplaces.iter().filter_map(|w| w.source));
        if let Some(SubState::DesignOffice(pick)) = &self.sub_state {
            cards.extend(pick.revealed.iter().copied());
        }
        cards
    }

    /// Sorted instance ids of all non-consumable cards.
    #[must_use]
    pub fn building_census(&self) -> Vec<CardInstanceId> {
        let mut ids: Vec<_> = self
            .all_cards()
            .into_iter()
            .filter(|c| !c.is_consumable())
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Whether some card instance id appears twice.
    #[must_use]
    pub fn has_duplicate_cards(&self) -> bool {
        let cards = self.all_cards();
        let unique: BTreeSet<_> = cards.iter().map(|c| c.id).collect();
        unique.len() != cards.len()
    }

    /// Byte snapshot for equality and replay checks.
    #[must_use]
    pub fn snapshot_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("game state is plain data and always serializes")
    }
}
