//! Selection sub-phases opened by a placement: build, dual construction,
//! design office and discard-for-effect. Also `CancelAction` for every phase.

use smallvec::{smallvec, SmallVec};
use std::collections::BTreeSet;

use crate::cards::{BuiltStructure, CardInstanceId};
use crate::core::{
    BuildSelection, DiscardPurpose, DiscardSelection, DualSelection, GameEvent, GameState,
    MoveError, Phase, Placement, PlayerId, Result, SubState,
};

use super::engine::{sub_state_mismatch, Engine, RulesEngine};

impl Engine {
    // === Build ===

    pub(super) fn apply_select_build(
        &self,
        state: &mut GameState,
        player: PlayerId,
        index: usize,
    ) -> Result<()> {
        let Some(SubState::Build(selection)) = &state.sub_state else {
            sub_state_mismatch(state.phase)
        };
        let (placement, discount, draw_after) =
            (selection.placement, selection.discount, selection.draw_after);

        let hand = &state.player(player).hand;
        let card = *hand.get(index).ok_or(MoveError::IndexOutOfRange {
            index,
            len: hand.len(),
        })?;
        let def = card.definition(self.catalog()).ok_or(MoveError::NotBuildable)?;
        let cost = def.discounted_cost(discount);
        if hand.len() - 1 < cost as usize {
            return Err(MoveError::HandTooSmall {
                required: cost as usize + 1,
                held: hand.len(),
            });
        }

        let purpose = DiscardPurpose::Build {
            cards: smallvec![card.id],
            discount,
            draw_after,
        };
        self.pay_for_build(state, player, placement, cost, purpose);
        Ok(())
    }

    /// Build now when free, otherwise open the payment discard.
    fn pay_for_build(
        &self,
        state: &mut GameState,
        player: PlayerId,
        placement: Placement,
        cost: u32,
        purpose: DiscardPurpose,
    ) {
        let DiscardPurpose::Build { cards, draw_after, .. } = &purpose else {
            panic!("build payment opened for {purpose:?}")
        };
        let locked = cards.clone();

        if cost == 0 {
            let draw_after = *draw_after;
            Self::commit_placement(state, player, placement);
            self.build_cards(state, player, &locked);
            self.draw_logged(state, player, draw_after);
            self.end_turn(state);
            return;
        }

        state.phase = Phase::Discard;
        state.sub_state = Some(SubState::Discard(DiscardSelection {
            player,
            placement,
            required: cost,
            locked,
            selected: BTreeSet::new(),
            purpose,
        }));
    }

    /// Move cards from hand onto the table.
    fn build_cards(&self, state: &mut GameState, player: PlayerId, cards: &[CardInstanceId]) {
        for &id in cards {
            let Some(card) = state.player_mut(player).take_from_hand(id) else {
                panic!("{id} reserved for construction is missing from hand")
            };
            state.player_mut(player).buildings.push(BuiltStructure::new(card));

            if let Some(def) = card.definition(self.catalog()) {
                let (name, def_id, heavy) = (def.name.clone(), def.id, def.cost >= 4);
                state.log(
                    format!("{player} built {name}"),
                    GameEvent::StructureBuilt {
                        player,
                        def: def_id,
                        heavy,
                    },
                );
            }
        }
        self.refresh_passives(state, player);
    }

    // === Dual construction ===

    pub(super) fn apply_toggle_dual(
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
        let cost_of = |id: CardInstanceId| {
            hand.iter()
                .find(|c| c.id == id)
                .and_then(|c| c.definition(self.catalog()))
                .map(|d| d.cost)
        };

        let Some(SubState::DualConstruction(selection)) = &mut state.sub_state else {
            sub_state_mismatch(state.phase)
        };

        if let Some(pos) = selection.selected.iter().position(|&id| id == card.id) {
            selection.selected.remove(pos);
        } else {
            let cost = card.definition(self.catalog()).ok_or(MoveError::NotBuildable)?.cost;
            if selection.selected.len() >= 2 {
                return Err(MoveError::SelectionFull);
            }
            if let Some(&first) = selection.selected.first() {
                if cost_of(first) != Some(cost) {
                    return Err(MoveError::CostMismatch);
                }
            }
            selection.selected.push(card.id);
        }

        state.log(
            format!("{player} updated their construction plan"),
            GameEvent::SelectionChanged { player },
        );
        Ok(())
    }

    pub(super) fn apply_confirm_dual(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        let Some(SubState::DualConstruction(selection)) = &state.sub_state else {
            sub_state_mismatch(state.phase)
        };
        if selection.selected.len() != 2 {
            return Err(MoveError::SelectionIncomplete {
                required: 2,
                selected: selection.selected.len(),
            });
        }
        let (placement, cards) = (selection.placement, selection.selected.clone());

        let me = state.player(player);
        let cost = me
            .hand
            .iter()
            .find(|c| c.id == cards[0])
            .and_then(|c| c.definition(self.catalog()))
            .ok_or(MoveError::NotBuildable)?
            .cost;
        if me.hand.len() - 2 < cost as usize {
            return Err(MoveError::HandTooSmall {
                required: cost as usize + 2,
                held: me.hand.len(),
            });
        }

        let purpose = DiscardPurpose::Build {
            cards,
            discount: 0,
            draw_after: 0,
        };
        self.pay_for_build(state, player, placement, cost, purpose);
        Ok(())
    }

    // === Design office ===

    pub(super) fn apply_design_pick(
        &self,
        state: &mut GameState,
        player: PlayerId,
        index: usize,
    ) -> Result<()> {
        let Some(SubState::DesignOffice(pick)) = &state.sub_state else {
            sub_state_mismatch(state.phase)
        };
        if index >= pick.revealed.len() {
            return Err(MoveError::IndexOutOfRange {
                index,
                len: pick.revealed.len(),
            });
        }
        let mut revealed = pick.revealed.clone();
        let placement = pick.placement;

        state.sub_state = None;
        let kept = revealed.remove(index);
        state.player_mut(player).hand.push(kept);
        for card in revealed {
            state.discard_card(card);
        }

        Self::commit_placement(state, player, placement);
        state.log(format!("{player} kept one revealed card"), GameEvent::CardKept { player });
        self.end_turn(state);
        Ok(())
    }

    // === Discard for an effect ===

    pub(super) fn apply_toggle_discard(
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

        let Some(SubState::Discard(selection)) = &mut state.sub_state else {
            sub_state_mismatch(state.phase)
        };
        if selection.locked.contains(&card.id) {
            return Err(MoveError::CardLocked);
        }
        toggle(&mut selection.selected, card.id, selection.required)?;

        state.log(
            format!("{player} updated their discard selection"),
            GameEvent::SelectionChanged { player },
        );
        Ok(())
    }

    pub(super) fn apply_confirm_discard(
        &self,
        state: &mut GameState,
        player: PlayerId,
    ) -> Result<()> {
        let Some(SubState::Discard(selection)) = &state.sub_state else {
            sub_state_mismatch(state.phase)
        };
        if selection.selected.len() != selection.required as usize {
            return Err(MoveError::SelectionIncomplete {
                required: selection.required as usize,
                selected: selection.selected.len(),
            });
        }
        let DiscardSelection {
            placement,
            selected,
            purpose,
            ..
        } = selection.clone();

        if let DiscardPurpose::Income { amount } = purpose {
            if state.household < amount {
                return Err(MoveError::TreasuryTooSmall {
                    required: amount,
                    held: state.household,
                });
            }
        }

        Self::commit_placement(state, player, placement);
        Self::discard_from_hand(state, player, &selected);

        match purpose {
            DiscardPurpose::Build { cards, draw_after, .. } => {
                self.build_cards(state, player, &cards);
                self.draw_logged(state, player, draw_after);
            }
            DiscardPurpose::Draw { count } => self.draw_logged(state, player, count),
            DiscardPurpose::Income { amount } => {
                state.household -= amount;
                state.player_mut(player).money += amount;
                state.log(
                    format!("{player} took ${amount} from the household"),
                    GameEvent::IncomeTaken { player, amount },
                );
            }
            DiscardPurpose::Tokens { vp } => {
                state.player_mut(player).vp_tokens += vp;
                state.log(
                    format!("{player} gained {vp} VP"),
                    GameEvent::TokensGained { player, vp },
                );
            }
        }

        self.end_turn(state);
        Ok(())
    }

    /// Remove the given cards from a hand and put them out of play.
    pub(super) fn discard_from_hand(
        state: &mut GameState,
        player: PlayerId,
        cards: &BTreeSet<CardInstanceId>,
    ) {
        let mut count = 0;
        for &id in cards {
            if let Some(card) = state.player_mut(player).take_from_hand(id) {
                state.discard_card(card);
                count += 1;
            }
        }
        state.log(
            format!("{player} discarded {count} card(s)"),
            GameEvent::CardsDiscarded { player, count },
        );
    }

    // === Cancel ===

    pub(super) fn apply_cancel(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        match state.sub_state.take() {
            None => Err(MoveError::NothingToCancel),
            Some(SubState::Discard(DiscardSelection {
                placement,
                purpose: DiscardPurpose::Build {
                    cards,
                    discount,
                    draw_after,
                },
                ..
            })) => {
                Self::reopen_build(state, player, placement, cards, discount, draw_after);
                Ok(())
            }
            Some(SubState::Build(_) | SubState::DualConstruction(_) | SubState::Discard(_)) => {
                self.abandon_selection(state, player);
                Ok(())
            }
            Some(SubState::DesignOffice(pick)) => {
                for card in pick.revealed.into_iter().rev() {
                    state.deck.push_front(card);
                }
                self.abandon_selection(state, player);
                Ok(())
            }
            Some(SubState::Payday(mut payday)) => {
                let record = payday.records[player]
                    .as_mut()
                    .ok_or(MoveError::NotYourTurn { player })?;
                clear_selection(&mut record.selected, record.confirmed)?;
                state.sub_state = Some(SubState::Payday(payday));
                Self::log_cleared(state, player);
                Ok(())
            }
            Some(SubState::Cleanup(mut cleanup)) => {
                let record = cleanup.records[player]
                    .as_mut()
                    .ok_or(MoveError::NotYourTurn { player })?;
                clear_selection(&mut record.selected, record.confirmed)?;
                state.sub_state = Some(SubState::Cleanup(cleanup));
                Self::log_cleared(state, player);
                Ok(())
            }
            Some(SubState::Final(_)) => Err(MoveError::GameOver),
        }
    }

    /// Back to the worker phase with the worker still available.
    fn abandon_selection(&self, state: &mut GameState, player: PlayerId) {
        state.phase = Phase::Work;
        state.log(
            format!("{player} cancelled their action"),
            GameEvent::SelectionCancelled { player },
        );
    }

    /// Step back from a build payment to the selection that opened it.
    fn reopen_build(
        state: &mut GameState,
        player: PlayerId,
        placement: Placement,
        cards: SmallVec<[CardInstanceId; 2]>,
        discount: u32,
        draw_after: u32,
    ) {
        let (phase, selection) = if cards.len() == 1 {
            let selection = BuildSelection {
                player,
                placement,
                discount,
                draw_after,
            };
            (Phase::Build, SubState::Build(selection))
        } else {
            let selection = DualSelection {
                player,
                placement,
                selected: cards,
            };
            (Phase::DualConstruction, SubState::DualConstruction(selection))
        };
        state.phase = phase;
        state.sub_state = Some(selection);
        state.log(
            format!("{player} took back their payment"),
            GameEvent::SelectionCancelled { player },
        );
    }

    fn log_cleared(state: &mut GameState, player: PlayerId) {
        state.log(
            format!("{player} cleared their selection"),
            GameEvent::SelectionCancelled { player },
        );
    }
}

/// Toggle `id` in a bounded selection.
pub(super) fn toggle(
    selected: &mut BTreeSet<CardInstanceId>,
    id: CardInstanceId,
    limit: u32,
) -> Result<()> {
    if selected.remove(&id) {
        return Ok(());
    }
    if selected.len() >= limit as usize {
        return Err(MoveError::SelectionFull);
    }
    selected.insert(id);
    Ok(())
}

fn clear_selection(selected: &mut BTreeSet<CardInstanceId>, confirmed: bool) -> Result<()> {
    if confirmed {
        return Err(MoveError::AlreadyConfirmed);
    }
    if selected.is_empty() {
        return Err(MoveError::NothingToCancel);
    }
    selected.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::standard::{DESIGN_OFFICE, FACTORY, FARM};
    use crate::cards::{Card, Catalog, Effect, Workplace, WorkplaceDefinition, WorkplaceId};
    use crate::core::{MatchConfig, Move};

    fn setup() -> (Engine, GameState) {
        let engine = Engine::new(Arc::new(Catalog::standard()), MatchConfig::new(2));
        let state = GameState::new(engine.config(), PlayerId::new(0), 11);
        (engine, state)
    }

    fn workplace(state: &mut GameState, effect: Effect) -> WorkplaceId {
        let id = state.alloc_workplace_id();
        state
            .workplaces
            .push(Workplace::public(id, &WorkplaceDefinition::new("Test", effect, "")));
        id
    }

    fn give(state: &mut GameState, player: PlayerId, def: crate::cards::CardDefId) -> Card {
        let card = Card::building(state.alloc_card_id(), def);
        state.player_mut(player).hand.push(card);
        card
    }

    #[test]
    fn test_build_through_payment_discard() {
        let (engine, mut state) = setup();
        let p0 = PlayerId::new(0);
        let carpenter = workplace(&mut state, Effect::Build { discount: 0, draw_after: 0 });
        let factory = give(&mut state, p0, FACTORY);
        state.gain_consumables(p0, 3);

        engine.place_worker(&mut state, p0, carpenter).unwrap();
        assert_eq!(state.phase, Phase::Build);
        engine.select_build_card(&mut state, p0, 0).unwrap();
        assert_eq!(state.phase, Phase::Discard);

        assert_eq!(engine.toggle_discard(&mut state, p0, 0), Err(MoveError::CardLocked));
        for index in 1..=3 {
            engine.toggle_discard(&mut state, p0, index).unwrap();
        }
        engine.confirm_discard(&mut state, p0).unwrap();

        let me = state.player(p0);
        assert_eq!(me.buildings.len(), 1);
        assert_eq!(me.buildings[0].card, factory);
        assert!(me.hand.is_empty());
        assert_eq!(me.available_workers, 1);
        assert_eq!(state.phase, Phase::Work);
    }

    #[test]
    fn test_cancel_keeps_worker() {
        let (engine, mut state) = setup();
        let p0 = PlayerId::new(0);
        let carpenter = workplace(&mut state, Effect::Build { discount: 0, draw_after: 0 });
        give(&mut state, p0, FARM);
        state.gain_consumables(p0, 1);

        engine.place_worker(&mut state, p0, carpenter).unwrap();
        engine.cancel_action(&mut state, p0).unwrap();

        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.current_player, p0);
        assert_eq!(state.player(p0).available_workers, 2);
        assert!(state.workplace(carpenter).unwrap().occupants.is_empty());
    }

    #[test]
    fn test_cancel_payment_returns_to_build() {
        let (engine, mut state) = setup();
        let p0 = PlayerId::new(0);
        let contractor = workplace(&mut state, Effect::Build { discount: 1, draw_after: 2 });
        give(&mut state, p0, FACTORY);
        give(&mut state, p0, FARM);
        state.gain_consumables(p0, 2);

        engine.place_worker(&mut state, p0, contractor).unwrap();
        engine.select_build_card(&mut state, p0, 0).unwrap();
        engine.toggle_discard(&mut state, p0, 2).unwrap();
        engine.cancel_action(&mut state, p0).unwrap();

        assert_eq!(state.phase, Phase::Build);
        let Some(SubState::Build(selection)) = &state.sub_state else {
            panic!("expected a build selection, got {:?}", state.sub_state)
        };
        assert_eq!((selection.discount, selection.draw_after), (1, 2));
        assert_eq!(state.player(p0).hand.len(), 4);
        assert_eq!(state.player(p0).available_workers, 2);

        // A cheaper card can be chosen instead
        engine.select_build_card(&mut state, p0, 1).unwrap();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.player(p0).buildings[0].card.kind, crate::cards::CardKind::Building(FARM));

        // A second cancel from the build selection unwinds the placement
        let (engine, mut state) = setup();
        let carpenter = workplace(&mut state, Effect::Build { discount: 0, draw_after: 0 });
        give(&mut state, p0, FARM);
        state.gain_consumables(p0, 1);
        engine.place_worker(&mut state, p0, carpenter).unwrap();
        engine.select_build_card(&mut state, p0, 0).unwrap();
        engine.cancel_action(&mut state, p0).unwrap();
        engine.cancel_action(&mut state, p0).unwrap();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.sub_state, None);
    }

    #[test]
    fn test_cancel_dual_payment_keeps_pair() {
        let (engine, mut state) = setup();
        let p0 = PlayerId::new(0);
        let dual = workplace(&mut state, Effect::DualBuild);
        let farm = give(&mut state, p0, FARM);
        let office = give(&mut state, p0, DESIGN_OFFICE);
        state.gain_consumables(p0, 1);

        engine.place_worker(&mut state, p0, dual).unwrap();
        engine.toggle_dual_card(&mut state, p0, 0).unwrap();
        engine.toggle_dual_card(&mut state, p0, 1).unwrap();
        engine.confirm_dual_construction(&mut state, p0).unwrap();
        engine.cancel_action(&mut state, p0).unwrap();

        assert_eq!(state.phase, Phase::DualConstruction);
        let Some(SubState::DualConstruction(selection)) = &state.sub_state else {
            panic!("expected a dual selection, got {:?}", state.sub_state)
        };
        assert_eq!(selection.selected.as_slice(), &[farm.id, office.id]);
        engine.confirm_dual_construction(&mut state, p0).unwrap();
        assert_eq!(state.phase, Phase::Discard);
    }

    #[test]
    fn test_dual_rejects_cost_mismatch() {
        let (engine, mut state) = setup();
        let p0 = PlayerId::new(0);
        let dual = workplace(&mut state, Effect::DualBuild);
        give(&mut state, p0, FARM);
        give(&mut state, p0, DESIGN_OFFICE);
        give(&mut state, p0, FACTORY);
        state.gain_consumables(p0, 1);

        engine.place_worker(&mut state, p0, dual).unwrap();
        engine.toggle_dual_card(&mut state, p0, 0).unwrap();
        assert_eq!(engine.toggle_dual_card(&mut state, p0, 2), Err(MoveError::CostMismatch));
        engine.toggle_dual_card(&mut state, p0, 1).unwrap();
        engine.confirm_dual_construction(&mut state, p0).unwrap();

        assert_eq!(state.phase, Phase::Discard);
        assert_eq!(engine.toggle_discard(&mut state, p0, 1), Err(MoveError::CardLocked));
        engine.toggle_discard(&mut state, p0, 3).unwrap();
        engine.confirm_discard(&mut state, p0).unwrap();
        assert_eq!(state.player(p0).buildings.len(), 2);
    }

    #[test]
    fn test_design_office_cancel_restores_deck_order() {
        let (engine, mut state) = setup();
        let p0 = PlayerId::new(0);
        let office = workplace(&mut state, Effect::DesignOffice { reveal: 5 });
        for _ in 0..6 {
            let card = Card::building(state.alloc_card_id(), FARM);
            state.deck.push_back(card);
        }
        let before = state.deck.clone();

        engine.place_worker(&mut state, p0, office).unwrap();
        assert_eq!(state.deck.len(), 1);
        engine.cancel_action(&mut state, p0).unwrap();
        assert_eq!(state.deck, before);
    }

    #[test]
    fn test_design_office_pick_discards_the_rest() {
        let (engine, mut state) = setup();
        let p0 = PlayerId::new(0);
        let office = workplace(&mut state, Effect::DesignOffice { reveal: 5 });
        for _ in 0..5 {
            let card = Card::building(state.alloc_card_id(), FARM);
            state.deck.push_back(card);
        }
        let census = state.building_census();

        engine.place_worker(&mut state, p0, office).unwrap();
        engine.apply_move(&mut state, p0, Move::SelectDesignOfficeCard { index: 2 }).unwrap();

        assert_eq!(state.player(p0).hand.len(), 1);
        assert_eq!(state.discard.len(), 4);
        assert_eq!(state.building_census(), census);
    }

    #[test]
    fn test_market_rejects_short_hand() {
        let (engine, mut state) = setup();
        let p0 = PlayerId::new(0);
        let market = workplace(&mut state, Effect::DiscardIncome { discard: 2, income: 12 });
        state.household = 20;
        give(&mut state, p0, FARM);
        let before = state.clone();

        let result = engine.place_worker(&mut state, p0, market);
        assert_eq!(result, Err(MoveError::HandTooSmall { required: 2, held: 1 }));
        assert_eq!(state, before);
    }
}
