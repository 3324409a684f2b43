//! Rules engine trait and the match engine.
//!
//! `RulesEngine` is the seam bots and hosts program against:
//! - which players may act
//! - which moves are legal
//! - how a move changes state
//! - whether the match is over
//!
//! `Engine` implements it for the economy game. It is a synchronous reducer:
//! `apply_move` mutates the given state in place, all-or-nothing. The move
//! runs against a persistent clone and is committed only if it succeeds, so a
//! rejected move leaves the caller's state untouched (version included).

use std::sync::Arc;

use crate::cards::{Catalog, CardInstanceId, WorkplaceId};
use crate::core::{
    GameState, MatchConfig, Move, MoveError, MoveRecord, Phase, Placement, PlayerId, Result,
    SubState,
};

use super::scoring::ScoreBreakdown;

/// Outcome of a finished match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    /// Breakdowns ordered by rank.
    pub ranking: Vec<ScoreBreakdown>,
}

impl GameResult {
    /// The top-ranked player.
    #[must_use]
    pub fn winner(&self) -> PlayerId {
        self.ranking[0].player
    }

    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner() == player
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `candidate_moves`: every syntactically possible move for the phase;
///   legality is decided by `try_apply`
/// - `try_apply`: deterministic, all-or-nothing, no logging
/// - `is_terminal`: `None` while the match continues
pub trait RulesEngine {
    fn config(&self) -> &MatchConfig;

    fn catalog(&self) -> &Catalog;

    /// Players allowed to submit a move right now.
    fn acting_players(&self, state: &GameState) -> Vec<PlayerId>;

    /// Moves worth trying for `player` in the current phase.
    fn candidate_moves(&self, state: &GameState, player: PlayerId) -> Vec<Move>;

    /// Validate and apply a move. On error the state is unchanged.
    fn try_apply(&self, state: &mut GameState, player: PlayerId, mv: Move) -> Result<()>;

    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Apply a move, tracing accepted and rejected moves.
    fn apply_move(&self, state: &mut GameState, player: PlayerId, mv: Move) -> Result<()> {
        match self.try_apply(state, player, mv) {
            Ok(()) => {
                tracing::trace!(%player, %mv, version = state.version, "move applied");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(%player, %mv, %err, phase = ?state.phase, "move rejected");
                Err(err)
            }
        }
    }

    /// Whether `apply_move` would accept the move.
    fn is_legal(&self, state: &GameState, player: PlayerId, mv: Move) -> bool {
        let mut scratch = state.clone();
        self.try_apply(&mut scratch, player, mv).is_ok()
    }

    /// All moves `apply_move` would accept for `player`.
    fn legal_moves(&self, state: &GameState, player: PlayerId) -> Vec<Move> {
        self.candidate_moves(state, player)
            .into_iter()
            .filter(|&mv| self.is_legal(state, player, mv))
            .collect()
    }
}

/// The economy game rules, bound to a catalog and match settings.
#[derive(Clone, Debug)]
pub struct Engine {
    catalog: Arc<Catalog>,
    config: MatchConfig,
}

/// Abort on a sub-state that disagrees with the phase.
pub(super) fn sub_state_mismatch(phase: Phase) -> ! {
    panic!("sub-state does not match phase {phase:?}")
}

impl Engine {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: MatchConfig) -> Self {
        Self { catalog, config }
    }

    // === Move API: one entry point per move ===

    pub fn place_worker(
        &self,
        state: &mut GameState,
        player: PlayerId,
        workplace: WorkplaceId,
    ) -> Result<()> {
        self.apply_move(state, player, Move::PlaceWorker { workplace })
    }

    pub fn place_worker_on_building(
        &self,
        state: &mut GameState,
        player: PlayerId,
        card: CardInstanceId,
    ) -> Result<()> {
        self.apply_move(state, player, Move::PlaceWorkerOnBuilding { card })
    }

    pub fn pass(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        self.apply_move(state, player, Move::Pass)
    }

    pub fn select_build_card(
        &self,
        state: &mut GameState,
        player: PlayerId,
        index: usize,
    ) -> Result<()> {
        self.apply_move(state, player, Move::SelectBuildCard { index })
    }

    pub fn toggle_dual_card(
        &self,
        state: &mut GameState,
        player: PlayerId,
        index: usize,
    ) -> Result<()> {
        self.apply_move(state, player, Move::ToggleDualCard { index })
    }

    pub fn confirm_dual_construction(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        self.apply_move(state, player, Move::ConfirmDualConstruction)
    }

    pub fn select_design_office_card(
        &self,
        state: &mut GameState,
        player: PlayerId,
        index: usize,
    ) -> Result<()> {
        self.apply_move(state, player, Move::SelectDesignOfficeCard { index })
    }

    pub fn toggle_discard(
        &self,
        state: &mut GameState,
        player: PlayerId,
        index: usize,
    ) -> Result<()> {
        self.apply_move(state, player, Move::ToggleDiscard { index })
    }

    pub fn confirm_discard(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        self.apply_move(state, player, Move::ConfirmDiscard)
    }

    pub fn toggle_payday_sell(
        &self,
        state: &mut GameState,
        player: PlayerId,
        building: usize,
    ) -> Result<()> {
        self.apply_move(state, player, Move::TogglePaydaySell { building })
    }

    pub fn confirm_payday_sell(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        self.apply_move(state, player, Move::ConfirmPaydaySell)
    }

    pub fn cancel_action(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        self.apply_move(state, player, Move::CancelAction)
    }

    // === Dispatch ===

    fn dispatch(&self, state: &mut GameState, player: PlayerId, mv: Move) -> Result<()> {
        if state.is_over() {
            return Err(MoveError::GameOver);
        }
        if player.index() >= state.player_count() {
            return Err(MoveError::NotYourTurn { player });
        }
        if !state.phase.is_simultaneous() && state.current_player != player {
            return Err(MoveError::NotYourTurn { player });
        }

        match (state.phase, mv) {
            (Phase::Work, Move::PlaceWorker { workplace }) => {
                self.apply_placement(state, player, Placement::Workplace(workplace))
            }
            (Phase::Work, Move::PlaceWorkerOnBuilding { card }) => {
                self.apply_placement(state, player, Placement::Building(card))
            }
            (Phase::Work, Move::Pass) => self.apply_pass(state, player),
            (Phase::Build, Move::SelectBuildCard { index }) => {
                self.apply_select_build(state, player, index)
            }
            (Phase::DualConstruction, Move::ToggleDualCard { index }) => {
                self.apply_toggle_dual(state, player, index)
            }
            (Phase::DualConstruction, Move::ConfirmDualConstruction) => {
                self.apply_confirm_dual(state, player)
            }
            (Phase::DesignOffice, Move::SelectDesignOfficeCard { index }) => {
                self.apply_design_pick(state, player, index)
            }
            (Phase::Discard, Move::ToggleDiscard { index }) => {
                self.apply_toggle_discard(state, player, index)
            }
            (Phase::Discard, Move::ConfirmDiscard) => self.apply_confirm_discard(state, player),
            (Phase::Cleanup, Move::ToggleDiscard { index }) => {
                self.apply_toggle_cleanup(state, player, index)
            }
            (Phase::Cleanup, Move::ConfirmDiscard) => self.apply_confirm_cleanup(state, player),
            (Phase::Payday, Move::TogglePaydaySell { building }) => {
                self.apply_toggle_sell(state, player, building)
            }
            (Phase::Payday, Move::ConfirmPaydaySell) => self.apply_confirm_sell(state, player),
            (_, Move::CancelAction) => self.apply_cancel(state, player),
            (phase, mv) => Err(MoveError::WrongPhase { mv: mv.name(), phase }),
        }
    }

    /// Abort if the phase and sub-state disagree.
    fn check_phase_invariant(state: &GameState) {
        let consistent = match (&state.sub_state, state.phase) {
            (None, Phase::Work) => true,
            (Some(sub), phase) => sub.phase() == phase,
            (None, _) => false,
        };
        if !consistent {
            sub_state_mismatch(state.phase);
        }
    }
}

impl RulesEngine for Engine {
    fn config(&self) -> &MatchConfig {
        &self.config
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn acting_players(&self, state: &GameState) -> Vec<PlayerId> {
        match &state.sub_state {
            Some(SubState::Payday(payday)) => payday.pending().collect(),
            Some(SubState::Cleanup(cleanup)) => cleanup.pending().collect(),
            Some(SubState::Final(_)) => Vec::new(),
            _ => vec![state.current_player],
        }
    }

    fn candidate_moves(&self, state: &GameState, player: PlayerId) -> Vec<Move> {
        if player.index() >= state.player_count() {
            return Vec::new();
        }
        let me = state.player(player);
        let hand_len = me.hand.len();

        match state.phase {
            Phase::Work => {
                let mut moves: Vec<Move> = state
                    .workplaces
                    .iter()
                    .map(|w| Move::PlaceWorker { workplace: w.id })
                    .collect();
                moves.extend(
                    me.buildings
                        .iter()
                        .map(|b| Move::PlaceWorkerOnBuilding { card: b.card.id }),
                );
                moves.push(Move::Pass);
                moves
            }
            Phase::Build => {
                let mut moves: Vec<Move> =
                    (0..hand_len).map(|index| Move::SelectBuildCard { index }).collect();
                moves.push(Move::CancelAction);
                moves
            }
            Phase::DualConstruction => {
                let mut moves: Vec<Move> =
                    (0..hand_len).map(|index| Move::ToggleDualCard { index }).collect();
                moves.extend([Move::ConfirmDualConstruction, Move::CancelAction]);
                moves
            }
            Phase::DesignOffice => {
                let revealed = match &state.sub_state {
                    Some(SubState::DesignOffice(pick)) => pick.revealed.len(),
                    _ => 0,
                };
                let mut moves: Vec<Move> = (0..revealed)
                    .map(|index| Move::SelectDesignOfficeCard { index })
                    .collect();
                moves.push(Move::CancelAction);
                moves
            }
            Phase::Discard | Phase::Cleanup => {
                let mut moves: Vec<Move> =
                    (0..hand_len).map(|index| Move::ToggleDiscard { index }).collect();
                moves.extend([Move::ConfirmDiscard, Move::CancelAction]);
                moves
            }
            Phase::Payday => {
                let mut moves: Vec<Move> = (0..me.buildings.len())
                    .map(|building| Move::TogglePaydaySell { building })
                    .collect();
                moves.extend([Move::ConfirmPaydaySell, Move::CancelAction]);
                moves
            }
            Phase::GameEnd => Vec::new(),
        }
    }

    fn try_apply(&self, state: &mut GameState, player: PlayerId, mv: Move) -> Result<()> {
        let mut next = state.clone();
        self.dispatch(&mut next, player, mv)?;
        Self::check_phase_invariant(&next);

        next.history.push_back(MoveRecord {
            player,
            mv,
            round: state.round,
            version: state.version,
        });
        next.version = state.version + 1;
        *state = next;
        Ok(())
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.final_scores().map(|scores| GameResult {
            ranking: scores.to_vec(),
        })
    }
}
