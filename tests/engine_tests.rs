//! Rule engine tests: turn order, move validation and rejection.

use std::sync::Arc;

use economy_engine::cards::standard::FARM;
use economy_engine::cards::{Card, Catalog, Workplace};
use economy_engine::core::{GameEvent, Move, MoveError, Phase, PlayerId};
use economy_engine::rules::{MatchBuilder, RulesEngine};

fn two_player() -> (economy_engine::Engine, economy_engine::GameState) {
    MatchBuilder::new()
        .player_count(2)
        .start_player(PlayerId::new(0))
        .build(42)
        .unwrap()
}

/// Only the current player may act during the work phase.
#[test]
fn test_turn_exclusivity() {
    let (engine, mut state) = two_player();
    let mine = state.workplaces.iter().find(|w| w.name == "Mine").unwrap().id;

    assert_eq!(engine.acting_players(&state), vec![PlayerId::new(0)]);
    assert!(engine.legal_moves(&state, PlayerId::new(1)).is_empty());

    let before = state.clone();
    let result = engine.place_worker(&mut state, PlayerId::new(1), mine);
    assert_eq!(result, Err(MoveError::NotYourTurn { player: PlayerId::new(1) }));
    assert_eq!(state, before);
}

/// A discard-for-income workplace needs enough cards in hand.
#[test]
fn test_market_rejects_single_card_hand() {
    let catalog = Catalog::standard();
    let (engine, mut state) = MatchBuilder::new()
        .catalog(Arc::new(catalog.clone()))
        .start_player(PlayerId::new(0))
        .build(7)
        .unwrap();
    let market = catalog.workplaces().iter().find(|w| w.name == "Market").unwrap();
    let id = state.alloc_workplace_id();
    state.workplaces.push(Workplace::public(id, market));
    state.household = 50;

    let p0 = PlayerId::new(0);
    state.player_mut(p0).hand.truncate(1);
    let version = state.version;
    let before = state.clone();

    let result = engine.place_worker(&mut state, p0, id);

    assert_eq!(result, Err(MoveError::HandTooSmall { required: 2, held: 1 }));
    assert_eq!(state, before);
    assert_eq!(state.version, version);
    assert!(!engine.legal_moves(&state, p0).contains(&Move::PlaceWorker { workplace: id }));
}

/// Income comes out of the household and needs it to be funded.
#[test]
fn test_income_requires_household_funds() {
    let catalog = Catalog::standard();
    let (engine, mut state) = MatchBuilder::new().start_player(PlayerId::new(0)).build(7).unwrap();
    let stall = catalog.workplaces().iter().find(|w| w.name == "Stall").unwrap();
    let id = state.alloc_workplace_id();
    state.workplaces.push(Workplace::public(id, stall));
    let p0 = PlayerId::new(0);

    assert_eq!(
        engine.place_worker(&mut state, p0, id),
        Err(MoveError::TreasuryTooSmall { required: 6, held: 0 })
    );

    state.household = 10;
    engine.place_worker(&mut state, p0, id).unwrap();
    assert_eq!(state.phase, Phase::Discard);
    engine.toggle_discard(&mut state, p0, 0).unwrap();
    engine.confirm_discard(&mut state, p0).unwrap();

    assert_eq!(state.household, 4);
    assert_eq!(state.player(p0).money, 11);
    assert_eq!(state.player(p0).hand.len(), 2);
}

/// Every accepted move bumps the version and is recorded in history.
#[test]
fn test_version_and_history() {
    let (engine, mut state) = two_player();
    let quarry = state.workplaces.iter().find(|w| w.name == "Quarry").unwrap().id;

    engine.place_worker(&mut state, PlayerId::new(0), quarry).unwrap();

    assert_eq!(state.version, 1);
    assert_eq!(state.history.len(), 1);
    let record = &state.history[0];
    assert_eq!(record.player, PlayerId::new(0));
    assert_eq!(record.mv, Move::PlaceWorker { workplace: quarry });
    assert_eq!(record.version, 0);
    assert!(state
        .log
        .iter()
        .any(|e| e.event == GameEvent::StartPlayerClaimed { player: PlayerId::new(0) }));
}

/// Single-occupancy workplaces refuse a second worker in the same round.
#[test]
fn test_occupied_workplace() {
    let (engine, mut state) = two_player();
    let school = state.workplaces.iter().find(|w| w.name == "School").unwrap().id;

    engine.place_worker(&mut state, PlayerId::new(0), school).unwrap();
    assert_eq!(
        engine.place_worker(&mut state, PlayerId::new(1), school),
        Err(MoveError::Occupied)
    );
    // Hired worker arrives next round
    assert_eq!(state.player(PlayerId::new(0)).workers, 3);
    assert_eq!(state.player(PlayerId::new(0)).available_workers, 1);
}

/// Players without workers are skipped; nobody left means payday.
#[test]
fn test_turn_skips_exhausted_players() {
    let (engine, mut state) = two_player();
    let mine = state.workplaces.iter().find(|w| w.name == "Mine").unwrap().id;
    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));

    engine.pass(&mut state, p1).unwrap_err();
    engine.pass(&mut state, p0).unwrap();
    engine.place_worker(&mut state, p1, mine).unwrap();
    assert_eq!(state.current_player, p1);
    engine.place_worker(&mut state, p1, mine).unwrap();

    // Both out of workers: wages were paid in cash and round 2 began
    assert_eq!(state.round, 2);
    assert_eq!(state.phase, Phase::Work);
    assert_eq!(state.player(p0).available_workers, 2);
    assert!(state.workplaces.iter().any(|w| w.name == "Stall"));
}

/// Building on a worker's own building is owner-only and once per round.
#[test]
fn test_own_building_placement() {
    let (engine, mut state) = two_player();
    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
    let farm = Card::building(state.alloc_card_id(), FARM);
    state
        .player_mut(p0)
        .buildings
        .push(economy_engine::BuiltStructure::new(farm));

    engine.place_worker_on_building(&mut state, p0, farm.id).unwrap();
    assert_eq!(state.player(p0).hand.len(), 5);

    assert_eq!(
        engine.place_worker_on_building(&mut state, p1, farm.id),
        Err(MoveError::UnknownTarget)
    );
    engine.pass(&mut state, p1).unwrap();
    assert_eq!(
        engine.place_worker_on_building(&mut state, p0, farm.id),
        Err(MoveError::Occupied)
    );
}

/// Moves from the wrong phase are rejected.
#[test]
fn test_wrong_phase() {
    let (engine, mut state) = two_player();
    let result = engine.confirm_discard(&mut state, PlayerId::new(0));
    assert_eq!(
        result,
        Err(MoveError::WrongPhase {
            mv: "confirmDiscard",
            phase: Phase::Work
        })
    );
    assert_eq!(engine.cancel_action(&mut state, PlayerId::new(0)), Err(MoveError::NothingToCancel));
}
