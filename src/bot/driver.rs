//! Polling driver and bot-vs-bot helper.

use crate::core::{GameState, Move, PlayerId, PlayerMap};
use crate::rules::RulesEngine;

use super::config::BotConfig;
use super::decide_move;

/// Drives one seat, acting at most once per state version.
///
/// A host can poll every driver after each update; a driver that already
/// answered the current version stays quiet until the state moves.
#[derive(Clone, Debug)]
pub struct BotDriver {
    player: PlayerId,
    config: BotConfig,
    last_version: Option<u64>,
}

impl BotDriver {
    #[must_use]
    pub fn new(player: PlayerId, config: BotConfig) -> Self {
        Self {
            player,
            config,
            last_version: None,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Decide a move for this version, unless one was already produced.
    pub fn poll<E: RulesEngine>(&mut self, engine: &E, state: &GameState) -> Option<Move> {
        if self.last_version == Some(state.version) {
            return None;
        }
        let mv = decide_move(engine, state, self.player, &self.config)?;
        self.last_version = Some(state.version);
        Some(mv)
    }
}

/// Let bots play until the match ends or `max_moves` moves were applied.
///
/// Returns the number of moves applied.
pub fn play_out<E: RulesEngine>(
    engine: &E,
    state: &mut GameState,
    bots: &PlayerMap<BotConfig>,
    max_moves: usize,
) -> usize {
    let mut applied = 0;
    while applied < max_moves && engine.is_terminal(state).is_none() {
        let next = engine
            .acting_players(state)
            .into_iter()
            .find_map(|player| {
                decide_move(engine, state, player, &bots[player]).map(|mv| (player, mv))
            });

        let Some((player, mv)) = next else {
            tracing::warn!(version = state.version, "no bot could move");
            break;
        };
        if let Err(err) = engine.apply_move(state, player, mv) {
            tracing::warn!(%player, %mv, %err, "bot move rejected");
            break;
        }
        applied += 1;
    }
    applied
}
