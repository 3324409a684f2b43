//! Move policies, one per difficulty tier.
//!
//! Policies pick among moves the engine already accepted as legal for the
//! redacted view. Toggle-and-confirm sub-phases never reach them; those are
//! handled by the planners.

use crate::core::{GameRng, GameState, Move, Phase, PlayerId};
use crate::rules::RulesEngine;

use super::eval::{move_priority, relative_value};
use super::planner::plan_selection;

// =============================================================================
// Policy Trait
// =============================================================================

/// Chooses one move from a non-empty list of legal moves.
pub trait MovePolicy<E: RulesEngine>: Send + Sync {
    fn choose(
        &self,
        engine: &E,
        view: &GameState,
        player: PlayerId,
        legal: &[Move],
        rng: &mut GameRng,
    ) -> Option<Move>;
}

// =============================================================================
// Easy
// =============================================================================

/// Weighted random choice; passing and cancelling are unlikely.
#[derive(Clone, Debug)]
pub struct WeightedRandomPolicy {
    pub pass_weight: f32,
}

impl Default for WeightedRandomPolicy {
    fn default() -> Self {
        Self { pass_weight: 0.1 }
    }
}

impl<E: RulesEngine> MovePolicy<E> for WeightedRandomPolicy {
    fn choose(
        &self,
        engine: &E,
        view: &GameState,
        player: PlayerId,
        legal: &[Move],
        rng: &mut GameRng,
    ) -> Option<Move> {
        let weights: Vec<f32> = legal
            .iter()
            .map(|&mv| match mv {
                Move::Pass => self.pass_weight,
                Move::CancelAction => 0.0,
                _ => (move_priority(engine, view, player, mv) as f32).max(0.5),
            })
            .collect();

        match rng.choose_weighted(&weights) {
            Some(index) => Some(legal[index]),
            None => rng.choose(legal).copied(),
        }
    }
}

// =============================================================================
// Normal
// =============================================================================

/// Highest fixed priority wins; ties go to the earlier move.
#[derive(Clone, Debug, Default)]
pub struct GreedyPolicy;

impl<E: RulesEngine> MovePolicy<E> for GreedyPolicy {
    fn choose(
        &self,
        engine: &E,
        view: &GameState,
        player: PlayerId,
        legal: &[Move],
        _rng: &mut GameRng,
    ) -> Option<Move> {
        let mut best: Option<(f64, Move)> = None;
        for &mv in legal {
            let priority = move_priority(engine, view, player, mv);
            if best.map_or(true, |(p, _)| priority > p) {
                best = Some((priority, mv));
            }
        }
        best.map(|(_, mv)| mv)
    }
}

// =============================================================================
// Hard
// =============================================================================

/// One-ply lookahead.
///
/// Each candidate is applied to a copy of the view, the follow-up selection
/// sub-phase is played out with the planners, and the resulting position is
/// scored against the strongest opponent.
#[derive(Clone, Debug)]
pub struct LookaheadPolicy {
    pub continuation_limit: u32,
}

impl Default for LookaheadPolicy {
    fn default() -> Self {
        Self { continuation_limit: 16 }
    }
}

impl LookaheadPolicy {
    fn evaluate<E: RulesEngine>(
        &self,
        engine: &E,
        view: &GameState,
        player: PlayerId,
        mv: Move,
    ) -> Option<f64> {
        let mut after = view.clone();
        engine.try_apply(&mut after, player, mv).ok()?;

        for _ in 0..self.continuation_limit {
            let own_selection = matches!(
                after.phase,
                Phase::Build | Phase::Discard | Phase::DesignOffice | Phase::DualConstruction
            ) && after.current_player == player;
            if !own_selection {
                break;
            }
            let Some(next) = plan_selection(engine.catalog(), &after, player) else {
                break;
            };
            if next == Move::CancelAction || engine.try_apply(&mut after, player, next).is_err() {
                break;
            }
        }

        Some(relative_value(engine, &after, player))
    }
}

impl<E: RulesEngine> MovePolicy<E> for LookaheadPolicy {
    fn choose(
        &self,
        engine: &E,
        view: &GameState,
        player: PlayerId,
        legal: &[Move],
        _rng: &mut GameRng,
    ) -> Option<Move> {
        let mut best: Option<(f64, Move)> = None;
        for &mv in legal {
            if mv == Move::CancelAction {
                continue;
            }
            let Some(value) = self.evaluate(engine, view, player, mv) else {
                continue;
            };
            // Greedy order settles near-equal evaluations
            let score = value + 0.01 * move_priority(engine, view, player, mv);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, mv));
            }
        }
        best.map(|(_, mv)| mv).or_else(|| legal.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::MatchBuilder;

    fn opening() -> (crate::rules::Engine, GameState) {
        MatchBuilder::new().player_count(2).build(17).unwrap()
    }

    #[test]
    fn test_greedy_never_passes_with_options() {
        let (engine, state) = opening();
        let player = state.current_player;
        let view = state.view_for(player);
        let legal = engine.legal_moves(&view, player);
        let mut rng = GameRng::new(1);

        let mv = GreedyPolicy.choose(&engine, &view, player, &legal, &mut rng).unwrap();
        assert_ne!(mv, Move::Pass);
        assert!(legal.contains(&mv));
    }

    #[test]
    fn test_weighted_random_is_seeded() {
        let (engine, state) = opening();
        let player = state.current_player;
        let view = state.view_for(player);
        let legal = engine.legal_moves(&view, player);
        let policy = WeightedRandomPolicy::default();

        let a = policy.choose(&engine, &view, player, &legal, &mut GameRng::new(5));
        let b = policy.choose(&engine, &view, player, &legal, &mut GameRng::new(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_lookahead_picks_legal_move() {
        let (engine, state) = opening();
        let player = state.current_player;
        let view = state.view_for(player);
        let legal = engine.legal_moves(&view, player);

        let mv = LookaheadPolicy::default()
            .choose(&engine, &view, player, &legal, &mut GameRng::new(0))
            .unwrap();
        assert!(legal.contains(&mv));
        assert_ne!(mv, Move::Pass);
    }
}
