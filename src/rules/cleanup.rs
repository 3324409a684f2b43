//! End of round: hand-limit discards, round advance and game end.

use std::collections::BTreeSet;

use crate::cards::Workplace;
use crate::core::{
    CleanupRecord, CleanupState, GameEvent, GameState, MoveError, Phase, PlayerId, PlayerMap,
    Result, SubState,
};

use super::construction::toggle;
use super::engine::{sub_state_mismatch, Engine, RulesEngine};
use super::scoring;

impl Engine {
    pub(super) fn begin_cleanup(&self, state: &mut GameState) {
        state.phase = Phase::Cleanup;
        state.log("Cleanup", GameEvent::PhaseChanged { phase: Phase::Cleanup });

        let records = PlayerMap::new(state.player_count(), |player| {
            let me = state.player(player);
            let excess = me.hand.len().saturating_sub(me.hand_limit as usize);
            (excess > 0).then(|| CleanupRecord {
                required: excess as u32,
                selected: BTreeSet::new(),
                confirmed: false,
            })
        });

        let cleanup = CleanupState { records };
        if cleanup.is_complete() {
            self.finish_round(state);
        } else {
            state.sub_state = Some(SubState::Cleanup(cleanup));
        }
    }

    pub(super) fn apply_toggle_cleanup(
        &self,
        state: &mut GameState,
        player: PlayerId,
        index: usize,
    ) -> Result<()> {
        let hand = &state.players[player].hand;
        let card = *hand.get(index).ok_or(MoveError::IndexOutOfRange {
            index,
            len: hand.len(),
        })?;

        let Some(SubState::Cleanup(cleanup)) = &mut state.sub_state else {
            sub_state_mismatch(state.phase)
        };
        let record = cleanup.records[player]
            .as_mut()
            .ok_or(MoveError::NotYourTurn { player })?;
        if record.confirmed {
            return Err(MoveError::AlreadyConfirmed);
        }
        toggle(&mut record.selected, card.id, record.required)?;

        state.log(
            format!("{player} updated their discard selection"),
            GameEvent::SelectionChanged { player },
        );
        Ok(())
    }

    pub(super) fn apply_confirm_cleanup(
        &self,
        state: &mut GameState,
        player: PlayerId,
    ) -> Result<()> {
        let Some(SubState::Cleanup(cleanup)) = &mut state.sub_state else {
            sub_state_mismatch(state.phase)
        };
        let record = cleanup.records[player]
            .as_mut()
            .ok_or(MoveError::NotYourTurn { player })?;
        if record.confirmed {
            return Err(MoveError::AlreadyConfirmed);
        }
        if record.selected.len() != record.required as usize {
            return Err(MoveError::SelectionIncomplete {
                required: record.required as usize,
                selected: record.selected.len(),
            });
        }
        record.confirmed = true;
        let selected = record.selected.clone();
        let complete = cleanup.is_complete();

        Self::discard_from_hand(state, player, &selected);
        if complete {
            state.sub_state = None;
            self.finish_round(state);
        }
        Ok(())
    }

    fn finish_round(&self, state: &mut GameState) {
        state.sub_state = None;
        if state.round >= self.config().rounds {
            self.end_game(state);
        } else {
            state.round += 1;
            self.start_round(state);
        }
    }

    /// Recall workers, open this round's workplaces and hand the first turn
    /// to the start player.
    pub(super) fn start_round(&self, state: &mut GameState) {
        let round = state.round;
        state.log(format!("Round {round} begins"), GameEvent::RoundStarted { round });
        tracing::debug!(round, "round started");

        for workplace in &mut state.workplaces {
            workplace.occupants.clear();
        }
        for (_, me) in state.players.iter_mut() {
            me.available_workers = me.workers;
            for building in &mut me.buildings {
                building.worker_placed = false;
            }
        }

        let count = state.player_count();
        for def in self.catalog().workplaces_opening(round) {
            for _ in 0..def.copies_for(count) {
                let id = state.alloc_workplace_id();
                state.workplaces.push(Workplace::public(id, def));
                state.log(
                    format!("{} opened", def.name),
                    GameEvent::WorkplaceOpened { workplace: id },
                );
            }
        }

        state.phase = Phase::Work;
        state.current_player = state.start_player;
        state.log("Work", GameEvent::PhaseChanged { phase: Phase::Work });
    }

    fn end_game(&self, state: &mut GameState) {
        let scores = scoring::rank(self.catalog(), self.config(), state);
        let winner = scores[0].player;

        state.phase = Phase::GameEnd;
        state.sub_state = Some(SubState::Final(scores));
        state.log(format!("{winner} wins"), GameEvent::GameEnded { winner });
        tracing::info!(%winner, "match finished");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::Catalog;
    use crate::core::MatchConfig;

    fn setup() -> (Engine, GameState) {
        let engine = Engine::new(Arc::new(Catalog::standard()), MatchConfig::new(2));
        let state = GameState::new(engine.config(), PlayerId::new(1), 8);
        (engine, state)
    }

    #[test]
    fn test_over_limit_players_discard_independently() {
        let (engine, mut state) = setup();
        let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
        state.gain_consumables(p0, 7);
        state.gain_consumables(p1, 6);

        engine.begin_cleanup(&mut state);
        assert_eq!(engine.acting_players(&state), vec![p0, p1]);

        engine.toggle_discard(&mut state, p1, 0).unwrap();
        assert_eq!(engine.toggle_discard(&mut state, p1, 1), Err(MoveError::SelectionFull));
        engine.confirm_discard(&mut state, p1).unwrap();
        assert_eq!(engine.confirm_discard(&mut state, p1), Err(MoveError::AlreadyConfirmed));
        assert_eq!(engine.acting_players(&state), vec![p0]);

        engine.toggle_discard(&mut state, p0, 0).unwrap();
        engine.toggle_discard(&mut state, p0, 1).unwrap();
        engine.confirm_discard(&mut state, p0).unwrap();

        assert_eq!(state.round, 2);
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.current_player, p1);
        assert_eq!(state.player(p0).hand.len(), 5);
    }

    #[test]
    fn test_cancel_clears_only_own_selection() {
        let engine = Engine::new(Arc::new(Catalog::standard()), MatchConfig::new(3));
        let mut state = GameState::new(engine.config(), PlayerId::new(0), 8);
        let (p0, p1, p2) = (PlayerId::new(0), PlayerId::new(1), PlayerId::new(2));
        state.gain_consumables(p0, 7);
        state.gain_consumables(p1, 6);

        engine.begin_cleanup(&mut state);
        engine.toggle_discard(&mut state, p0, 0).unwrap();
        engine.toggle_discard(&mut state, p0, 1).unwrap();
        engine.toggle_discard(&mut state, p1, 0).unwrap();

        // Seat 2 is within its hand limit and has no record
        assert_eq!(
            engine.cancel_action(&mut state, p2),
            Err(MoveError::NotYourTurn { player: p2 })
        );

        engine.cancel_action(&mut state, p0).unwrap();
        let selected = |state: &GameState, player: PlayerId| match &state.sub_state {
            Some(SubState::Cleanup(cleanup)) => {
                cleanup.records[player].as_ref().map(|r| r.selected.len())
            }
            other => panic!("expected cleanup, got {other:?}"),
        };
        assert_eq!(state.phase, Phase::Cleanup);
        assert_eq!(selected(&state, p0), Some(0));
        assert_eq!(selected(&state, p1), Some(1));
        assert_eq!(engine.cancel_action(&mut state, p0), Err(MoveError::NothingToCancel));
        assert!(engine.confirm_discard(&mut state, p0).is_err());

        // Cancelling after confirming changes nothing
        engine.confirm_discard(&mut state, p1).unwrap();
        let before = state.clone();
        assert_eq!(engine.cancel_action(&mut state, p1), Err(MoveError::AlreadyConfirmed));
        assert_eq!(state, before);

        engine.toggle_discard(&mut state, p0, 2).unwrap();
        engine.toggle_discard(&mut state, p0, 3).unwrap();
        engine.confirm_discard(&mut state, p0).unwrap();
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_last_round_ends_the_game() {
        let (engine, mut state) = setup();
        state.round = engine.config().rounds;

        engine.begin_cleanup(&mut state);

        assert!(state.is_over());
        let scores = state.final_scores().unwrap();
        assert_eq!(scores.len(), 2);
        assert!(engine.is_terminal(&state).is_some());
    }

    #[test]
    fn test_start_round_opens_scheduled_workplaces() {
        let (engine, mut state) = setup();
        state.round = 3;
        engine.start_round(&mut state);

        let names: Vec<_> = state.workplaces.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Market"]);
    }
}
