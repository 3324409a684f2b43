//! Bot decision module.
//!
//! `decide_move` is a pure function of `(engine, state, player, config)`:
//! - it only reads `state.view_for(player)`, never hidden information
//! - it only returns moves the engine lists as legal for that view
//! - the same inputs always give the same move
//!
//! ## Tiers
//!
//! - `Easy`: weighted random over worker placements and picks
//! - `Normal`: greedy fixed priorities
//! - `Hard`: one-ply lookahead with a position evaluation
//!
//! Toggle-and-confirm sub-phases (discard, dual construction, payday sale)
//! are always driven by the deterministic planners, which only ever toggle
//! toward a fixed target and so cannot cycle.

pub mod config;
pub mod driver;
pub mod eval;
pub mod planner;
pub mod policy;

pub use config::{BotConfig, Difficulty};
pub use driver::{play_out, BotDriver};
pub use policy::{GreedyPolicy, LookaheadPolicy, MovePolicy, WeightedRandomPolicy};

use crate::core::{GameRng, GameState, Move, Phase, PlayerId};
use crate::rules::RulesEngine;

use planner::plan_selection;

/// Pick a move for `player`, or `None` if they may not act.
#[must_use]
pub fn decide_move<E: RulesEngine>(
    engine: &E,
    state: &GameState,
    player: PlayerId,
    config: &BotConfig,
) -> Option<Move> {
    if !engine.acting_players(state).contains(&player) {
        return None;
    }

    let view = state.view_for(player);
    let legal = engine.legal_moves(&view, player);
    if legal.is_empty() {
        return None;
    }

    let context = format!("{}:{}", player.index(), view.version);
    let mut rng = GameRng::new(config.seed).for_context(&context);
    let random_pick = config.difficulty == Difficulty::Easy
        && matches!(view.phase, Phase::Build | Phase::DesignOffice);

    let planned = if view.phase == Phase::Work || random_pick {
        match config.difficulty {
            Difficulty::Easy => WeightedRandomPolicy {
                pass_weight: config.pass_weight,
            }
            .choose(engine, &view, player, &legal, &mut rng),
            Difficulty::Normal => GreedyPolicy.choose(engine, &view, player, &legal, &mut rng),
            Difficulty::Hard => LookaheadPolicy {
                continuation_limit: config.continuation_limit,
            }
            .choose(engine, &view, player, &legal, &mut rng),
        }
    } else {
        plan_selection(engine.catalog(), &view, player)
    };

    match planned.filter(|mv| legal.contains(mv)) {
        Some(mv) => Some(mv),
        None => {
            tracing::debug!(%player, ?planned, "planned move not legal, falling back");
            legal
                .iter()
                .copied()
                .find(|&mv| mv != Move::CancelAction)
                .or_else(|| legal.first().copied())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::MatchBuilder;

    #[test]
    fn test_waiting_player_gets_nothing() {
        let (engine, state) = MatchBuilder::new().build(4).unwrap();
        let idle = state.current_player.next(2);
        assert_eq!(decide_move(&engine, &state, idle, &BotConfig::default()), None);
    }

    #[test]
    fn test_same_inputs_same_move() {
        let (engine, state) = MatchBuilder::new().player_count(3).build(4).unwrap();
        let player = state.current_player;
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            let config = BotConfig::new(difficulty).with_seed(12);
            let a = decide_move(&engine, &state, player, &config);
            let b = decide_move(&engine, &state, player, &config);
            assert!(a.is_some());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_decision_ignores_hidden_information() {
        let (engine, state) = MatchBuilder::new().build(30).unwrap();
        let player = state.current_player;
        let rival = player.next(2);

        // Reorder what the player cannot see
        let mut shuffled = state.clone();
        let mut deck: Vec<_> = shuffled.deck.iter().copied().collect();
        deck.reverse();
        shuffled.deck = deck.into_iter().collect();
        shuffled.player_mut(rival).hand.reverse();

        let config = BotConfig::new(Difficulty::Hard);
        assert_eq!(
            decide_move(&engine, &state, player, &config),
            decide_move(&engine, &shuffled, player, &config)
        );
    }
}
