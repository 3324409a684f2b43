//! Match setup.

use std::sync::Arc;

use crate::cards::{Card, Catalog};
use crate::core::{ConfigError, GameEvent, GameRng, GameState, MatchConfig, PlayerId};

use super::engine::Engine;

/// Builder for an engine and its opening state.
///
/// ```
/// use economy_engine::rules::MatchBuilder;
///
/// let (_engine, state) = MatchBuilder::new().player_count(3).build(7).unwrap();
/// assert_eq!(state.player_count(), 3);
/// assert_eq!(state.round, 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MatchBuilder {
    config: MatchConfig,
    catalog: Option<Arc<Catalog>>,
    start_player: Option<PlayerId>,
}

impl MatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn player_count(mut self, count: usize) -> Self {
        self.config.player_count = count;
        self
    }

    #[must_use]
    pub fn rounds(mut self, rounds: u32) -> Self {
        self.config.rounds = rounds;
        self
    }

    /// Replace all table settings at once.
    #[must_use]
    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom catalog instead of the standard set.
    #[must_use]
    pub fn catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Fix the first start player instead of drawing one from the seed.
    #[must_use]
    pub fn start_player(mut self, player: PlayerId) -> Self {
        self.start_player = Some(player);
        self
    }

    /// Shuffle the deck, deal opening hands and open the round-1 board.
    pub fn build(self, seed: u64) -> Result<(Engine, GameState), ConfigError> {
        self.config.validate()?;
        let count = self.config.player_count;
        let catalog = self.catalog.unwrap_or_else(|| Arc::new(Catalog::standard()));

        let start_player = match self.start_player {
            Some(player) if player.index() < count => player,
            Some(player) => return Err(ConfigError::PlayerCount(player.index() + 1)),
            None => {
                let mut seating = GameRng::new(seed).for_context("seating");
                PlayerId::new(seating.gen_range_usize(0..count) as u8)
            }
        };

        let mut state = GameState::new(&self.config, start_player, seed);
        // Ids follow the shuffled order, so a hidden card's id says nothing
        // about what it is
        let mut defs = catalog.deck_list();
        state.rng.shuffle(&mut defs);
        let deck: Vec<Card> = defs
            .into_iter()
            .map(|def| Card::building(state.alloc_card_id(), def))
            .collect();
        state.deck = deck.into_iter().collect();

        for player in start_player.seat_order(count) {
            state.draw(player, self.config.starting_hand);
        }

        state.log(
            format!("Match started with {count} players, {start_player} starts"),
            GameEvent::MatchStarted { players: count },
        );
        tracing::debug!(seed, count, %start_player, "match set up");

        let engine = Engine::new(catalog, self.config);
        engine.start_round(&mut state);
        Ok((engine, state))
    }
}
