//! Work phase: worker placement, immediate effects and turn order.
//!
//! A placement whose effect needs a selection (build, dual construction,
//! design office, discard-for-something) only opens the sub-phase. The
//! worker is committed when the sub-phase resolves, so cancelling costs
//! nothing.

use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::cards::{Effect, Passive};
use crate::core::{
    BuildSelection, DiscardPurpose, DiscardSelection, DualSelection, GameEvent, GameState,
    MoveError, Phase, Placement, PlayerId, PlayerState, Result, RevealPick, SubState,
};

use super::engine::{Engine, RulesEngine};

impl Engine {
    pub(super) fn apply_placement(
        &self,
        state: &mut GameState,
        player: PlayerId,
        placement: Placement,
    ) -> Result<()> {
        let (effect, label) = self.placement_target(state, player, placement)?;
        self.check_effect(state, player, effect)?;

        state.log(
            format!("{player} placed a worker on {label}"),
            GameEvent::WorkerPlaced { player, placement },
        );

        if effect.opens_selection() {
            self.open_selection(state, player, placement, effect);
        } else {
            Self::commit_placement(state, player, placement);
            self.resolve_immediate(state, player, effect);
            self.end_turn(state);
        }
        Ok(())
    }

    pub(super) fn apply_pass(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        state.player_mut(player).available_workers = 0;
        state.log(format!("{player} passed"), GameEvent::Passed { player });
        self.end_turn(state);
        Ok(())
    }

    /// Resolve what a placement targets, checking availability and room.
    fn placement_target(
        &self,
        state: &GameState,
        player: PlayerId,
        placement: Placement,
    ) -> Result<(Effect, String)> {
        let me = state.player(player);
        if me.available_workers == 0 {
            return Err(MoveError::NoAvailableWorkers);
        }

        match placement {
            Placement::Workplace(id) => {
                let workplace = state.workplace(id).ok_or(MoveError::UnknownTarget)?;
                if !workplace.effect.is_placeable() {
                    return Err(MoveError::NoEffect);
                }
                if !workplace.has_room() {
                    return Err(MoveError::Occupied);
                }
                Ok((workplace.effect, workplace.name.clone()))
            }
            Placement::Building(id) => {
                let building = me
                    .buildings
                    .iter()
                    .find(|b| b.card.id == id)
                    .ok_or(MoveError::UnknownTarget)?;
                if building.worker_placed {
                    return Err(MoveError::Occupied);
                }
                let def = building.card.definition(self.catalog()).ok_or(MoveError::NoEffect)?;
                if !def.effect.is_placeable() {
                    return Err(MoveError::NoEffect);
                }
                Ok((def.effect, def.name.clone()))
            }
        }
    }

    /// Eligibility gate: an effect that cannot do anything is not playable.
    fn check_effect(&self, state: &GameState, player: PlayerId, effect: Effect) -> Result<()> {
        let me = state.player(player);
        let held = me.hand.len();
        let hand_at_least = |required: u32| {
            if held >= required as usize {
                Ok(())
            } else {
                Err(MoveError::HandTooSmall {
                    required: required as usize,
                    held,
                })
            }
        };

        match effect {
            Effect::Hire | Effect::HireRobot => {
                if me.workers >= me.worker_cap {
                    return Err(MoveError::WorkerLimit);
                }
            }
            Effect::HireUpTo { target } => {
                if me.workers >= target.min(me.worker_cap) {
                    return Err(MoveError::WorkerLimit);
                }
            }
            Effect::Build { discount, .. } => {
                if !self.can_build_any(me, discount) {
                    return Err(MoveError::CannotAffordBuild);
                }
            }
            Effect::DualBuild => {
                if !self.can_dual_build(me) {
                    return Err(MoveError::CannotAffordBuild);
                }
            }
            Effect::DesignOffice { .. } => {
                if state.drawable() == 0 {
                    return Err(MoveError::DeckExhausted);
                }
            }
            Effect::DiscardDraw { discard, .. } | Effect::DiscardTokens { discard, .. } => {
                hand_at_least(discard)?;
            }
            Effect::DiscardIncome { discard, income } => {
                hand_at_least(discard)?;
                if state.household < income {
                    return Err(MoveError::TreasuryTooSmall {
                        required: income,
                        held: state.household,
                    });
                }
            }
            Effect::FillConsumables { up_to } => {
                if held >= up_to as usize {
                    return Err(MoveError::NoEffect);
                }
            }
            Effect::None => return Err(MoveError::NoEffect),
            Effect::Draw { .. }
            | Effect::Consumables { .. }
            | Effect::StartPlayer { .. }
            | Effect::DrawWhenEmpty { .. } => {}
        }
        Ok(())
    }

    /// Some building in hand can be paid for with the rest of the hand.
    pub(super) fn can_build_any(&self, me: &PlayerState, discount: u32) -> bool {
        let spare = me.hand.len().saturating_sub(1);
        me.hand
            .iter()
            .filter_map(|c| c.definition(self.catalog()))
            .any(|def| def.discounted_cost(discount) as usize <= spare)
    }

    /// Two buildings of equal cost are in hand and the rest covers that cost.
    pub(super) fn can_dual_build(&self, me: &PlayerState) -> bool {
        let spare = me.hand.len().saturating_sub(2);
        let mut costs: Vec<u32> = me
            .hand
            .iter()
            .filter_map(|c| c.definition(self.catalog()))
            .map(|def| def.cost)
            .collect();
        costs.sort_unstable();
        costs.windows(2).any(|w| w[0] == w[1] && w[0] as usize <= spare)
    }

    fn open_selection(
        &self,
        state: &mut GameState,
        player: PlayerId,
        placement: Placement,
        effect: Effect,
    ) {
        let discard = |required: u32, purpose: DiscardPurpose| {
            SubState::Discard(DiscardSelection {
                player,
                placement,
                required,
                locked: SmallVec::new(),
                selected: BTreeSet::new(),
                purpose,
            })
        };

        let sub = match effect {
            Effect::Build { discount, draw_after } => SubState::Build(BuildSelection {
                player,
                placement,
                discount,
                draw_after,
            }),
            Effect::DualBuild => SubState::DualConstruction(DualSelection {
                player,
                placement,
                selected: SmallVec::new(),
            }),
            Effect::DesignOffice { reveal } => {
                let revealed = (0..reveal).map_while(|_| state.pop_deck()).collect();
                SubState::DesignOffice(RevealPick {
                    player,
                    placement,
                    revealed,
                })
            }
            Effect::DiscardDraw { discard: n, draw } => {
                discard(n, DiscardPurpose::Draw { count: draw })
            }
            Effect::DiscardIncome { discard: n, income } => {
                discard(n, DiscardPurpose::Income { amount: income })
            }
            Effect::DiscardTokens { discard: n, vp } => discard(n, DiscardPurpose::Tokens { vp }),
            other => unreachable!("{other:?} resolves immediately"),
        };

        state.phase = sub.phase();
        state.sub_state = Some(sub);
    }

    /// Consume the worker and occupy the target.
    pub(super) fn commit_placement(state: &mut GameState, player: PlayerId, placement: Placement) {
        state.player_mut(player).available_workers -= 1;
        match placement {
            Placement::Workplace(id) => {
                if let Some(workplace) = state.workplace_mut(id) {
                    workplace.occupants.push(player);
                }
            }
            Placement::Building(id) => {
                let me = state.player_mut(player);
                if let Some(building) = me.buildings.iter_mut().find(|b| b.card.id == id) {
                    building.worker_placed = true;
                }
            }
        }
    }

    fn resolve_immediate(&self, state: &mut GameState, player: PlayerId, effect: Effect) {
        match effect {
            Effect::Draw { count } => self.draw_logged(state, player, count),
            Effect::Consumables { count } => Self::consumables_logged(state, player, count),
            Effect::FillConsumables { up_to } => {
                let missing = (up_to as usize).saturating_sub(state.player(player).hand.len());
                Self::consumables_logged(state, player, missing as u32);
            }
            Effect::StartPlayer { draw } => {
                state.start_player = player;
                state.log(
                    format!("{player} will start next round"),
                    GameEvent::StartPlayerClaimed { player },
                );
                self.draw_logged(state, player, draw);
            }
            Effect::Hire => Self::hire(state, player, 1, false),
            Effect::HireUpTo { target } => {
                let me = state.player(player);
                let hires = target.min(me.worker_cap).saturating_sub(me.workers);
                Self::hire(state, player, hires, false);
            }
            Effect::HireRobot => Self::hire(state, player, 1, true),
            Effect::DrawWhenEmpty { draw, empty_draw } => {
                let count = if state.player(player).hand.is_empty() { empty_draw } else { draw };
                self.draw_logged(state, player, count);
            }
            other => unreachable!("{other:?} resolves through a selection"),
        }
    }

    /// New workers join the pool next round.
    fn hire(state: &mut GameState, player: PlayerId, count: u32, robot: bool) {
        for _ in 0..count {
            let me = state.player_mut(player);
            me.workers += 1;
            if robot {
                me.robots += 1;
            }
            let what = if robot { "a robot" } else { "a worker" };
            state.log(format!("{player} hired {what}"), GameEvent::WorkerHired { player, robot });
        }
    }

    pub(super) fn draw_logged(&self, state: &mut GameState, player: PlayerId, count: u32) {
        if count == 0 {
            return;
        }
        let drawn = state.draw(player, count);
        state.log(
            format!("{player} drew {drawn} card(s)"),
            GameEvent::CardsDrawn { player, count: drawn },
        );
    }

    fn consumables_logged(state: &mut GameState, player: PlayerId, count: u32) {
        if count == 0 {
            return;
        }
        state.gain_consumables(player, count);
        state.log(
            format!("{player} gained {count} consumer goods"),
            GameEvent::ConsumablesGained { player, count },
        );
    }

    /// Re-derive hand limit and worker cap from owned buildings.
    pub(super) fn refresh_passives(&self, state: &mut GameState, player: PlayerId) {
        let config = self.config();
        let (mut hand_limit, mut worker_cap) = (config.hand_limit, config.worker_cap);
        for building in &state.player(player).buildings {
            match building.card.definition(self.catalog()).and_then(|d| d.passive) {
                Some(Passive::HandLimit(extra)) => hand_limit += extra,
                Some(Passive::WorkerCap(extra)) => worker_cap += extra,
                Some(Passive::DebtExemption(_)) | None => {}
            }
        }
        let me = state.player_mut(player);
        me.hand_limit = hand_limit;
        me.worker_cap = worker_cap.max(me.workers);
    }

    /// Close any sub-phase and hand the turn to the next seat with workers.
    ///
    /// With nobody left to place, the round moves on to payday.
    pub(super) fn end_turn(&self, state: &mut GameState) {
        state.sub_state = None;
        state.phase = Phase::Work;

        let count = state.player_count();
        let next = state
            .current_player
            .next(count)
            .seat_order(count)
            .find(|&p| state.player(p).available_workers > 0);

        match next {
            Some(player) => state.current_player = player,
            None => self.begin_payday(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{Card, Catalog, Workplace, WorkplaceDefinition};
    use crate::core::MatchConfig;

    fn engine_and_state() -> (Engine, GameState) {
        let engine = Engine::new(Arc::new(Catalog::standard()), MatchConfig::new(2));
        let state = GameState::new(engine.config(), PlayerId::new(0), 3);
        (engine, state)
    }

    fn add_workplace(state: &mut GameState, def: WorkplaceDefinition) -> crate::cards::WorkplaceId {
        let id = state.alloc_workplace_id();
        state.workplaces.push(Workplace::public(id, &def));
        id
    }

    #[test]
    fn test_hire_blocked_at_cap() {
        let (engine, mut state) = engine_and_state();
        let school = WorkplaceDefinition::new("School", Effect::Hire, "Hire");
        let school = add_workplace(&mut state, school);
        state.player_mut(PlayerId::new(0)).workers = 5;

        let mv = crate::core::Move::PlaceWorker { workplace: school };
        let err = engine.try_apply(&mut state, PlayerId::new(0), mv);
        assert_eq!(err, Err(MoveError::WorkerLimit));
    }

    #[test]
    fn test_immediate_effect_advances_turn() {
        let (engine, mut state) = engine_and_state();
        let mine = WorkplaceDefinition::new("Mine", Effect::Draw { count: 1 }, "Draw").multi();
        let mine = add_workplace(&mut state, mine);
        let card = Card::building(state.alloc_card_id(), crate::cards::standard::FARM);
        state.deck.push_back(card);

        engine.place_worker(&mut state, PlayerId::new(0), mine).unwrap();

        assert_eq!(state.player(PlayerId::new(0)).hand, vec![card]);
        assert_eq!(state.player(PlayerId::new(0)).available_workers, 1);
        assert_eq!(state.current_player, PlayerId::new(1));
        assert_eq!(state.version, 1);
    }

    #[test]
    fn test_dual_build_needs_matching_costs() {
        let (engine, mut state) = engine_and_state();
        let mut me = state.player(PlayerId::new(0)).clone();
        for def in [crate::cards::standard::FARM, crate::cards::standard::DESIGN_OFFICE] {
            me.hand.push(Card::building(state.alloc_card_id(), def));
        }
        me.hand.push(Card::consumable(state.alloc_card_id()));
        assert!(engine.can_dual_build(&me));

        me.hand.pop();
        assert!(!engine.can_dual_build(&me));
    }

    #[test]
    fn test_pass_forfeits_remaining_workers() {
        let (engine, mut state) = engine_and_state();
        engine.pass(&mut state, PlayerId::new(0)).unwrap();

        assert_eq!(state.player(PlayerId::new(0)).available_workers, 0);
        assert_eq!(state.current_player, PlayerId::new(1));
    }
}
