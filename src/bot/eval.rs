//! Heuristics shared by the bot tiers.
//!
//! All functions read a redacted view; hidden cards are valued at a flat
//! average.

use crate::cards::{Card, CardKind, Catalog, Effect};
use crate::core::{GameState, Move, Phase, PlayerId, PlayerState};
use crate::rules::{score_player, wage_per_worker, RulesEngine};

const HIDDEN_CARD_VALUE: f64 = 2.0;
const CONSUMABLE_VALUE: f64 = 0.5;

/// How much a card in hand is worth keeping.
#[must_use]
pub fn card_value(catalog: &Catalog, card: &Card) -> f64 {
    match card.kind {
        CardKind::Consumable => CONSUMABLE_VALUE,
        CardKind::Hidden => HIDDEN_CARD_VALUE,
        CardKind::Building(def) => {
            let def = catalog.card(def);
            let bonus = if def.bonus.is_some() { 2.0 } else { 0.0 };
            1.0 + def.vp as f64 / 4.0 + bonus
        }
    }
}

/// Cash still missing for this round's wages, if payday is ahead.
fn wage_gap(state: &GameState, me: &PlayerState) -> i64 {
    if matches!(state.phase, Phase::Payday | Phase::Cleanup | Phase::GameEnd) {
        return 0;
    }
    (wage_per_worker(state.round) * i64::from(me.paid_workers()) - me.money).max(0)
}

/// Estimated final standing of `player`: current score plus future potential.
#[must_use]
pub fn position_value<E: RulesEngine>(engine: &E, state: &GameState, player: PlayerId) -> f64 {
    let me = state.player(player);
    let score = score_player(engine.catalog(), engine.config(), player, me).total as f64;
    let rounds_left = engine.config().rounds.saturating_sub(state.round) as f64;

    let hand: f64 = me.hand.iter().map(|c| card_value(engine.catalog(), c)).sum();
    let workforce = f64::from(me.workers) * rounds_left * 2.5 + f64::from(me.robots) * rounds_left;
    let gap = wage_gap(state, me) as f64;

    score + hand + workforce - gap * 2.0
}

/// Value of `player`'s position relative to the strongest opponent.
#[must_use]
pub fn relative_value<E: RulesEngine>(engine: &E, state: &GameState, player: PlayerId) -> f64 {
    let best_rival = state
        .players
        .player_ids()
        .filter(|&p| p != player)
        .map(|p| position_value(engine, state, p))
        .fold(f64::MIN, f64::max);
    position_value(engine, state, player) - 0.25 * best_rival.max(0.0)
}

/// Highest-VP card in hand that the rest of the hand can pay for.
#[must_use]
pub fn best_build(catalog: &Catalog, me: &PlayerState, discount: u32) -> Option<usize> {
    let spare = me.hand.len().saturating_sub(1);
    me.hand
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.definition(catalog).map(|d| (i, d)))
        .filter(|(_, d)| d.discounted_cost(discount) as usize <= spare)
        .max_by(|(ia, a), (ib, b)| a.vp.cmp(&b.vp).then(ib.cmp(ia)))
        .map(|(i, _)| i)
}

/// Fixed priority of resolving `effect` now.
#[must_use]
pub fn effect_priority<E: RulesEngine>(
    engine: &E,
    state: &GameState,
    player: PlayerId,
    effect: Effect,
) -> f64 {
    let catalog = engine.catalog();
    let me = state.player(player);
    let rounds_left = engine.config().rounds.saturating_sub(state.round) as f64;
    let gap = wage_gap(state, me) as f64;
    let held = me.hand.len() as f64;

    match effect {
        Effect::None => 0.0,
        Effect::Build { discount, draw_after } => {
            let vp = best_build(catalog, me, discount)
                .and_then(|i| me.hand[i].definition(catalog))
                .map_or(0, |d| d.vp);
            10.0 + vp as f64 / 2.0 + f64::from(draw_after)
        }
        Effect::DualBuild => 14.0,
        Effect::Hire | Effect::HireUpTo { .. } => {
            if rounds_left >= 3.0 {
                8.0 + rounds_left / 2.0
            } else {
                1.0
            }
        }
        Effect::HireRobot => 6.0 + rounds_left,
        Effect::DiscardIncome { discard, income } => {
            2.0 + income as f64 / (2.0 * f64::from(discard)) + gap.min(income as f64)
        }
        Effect::DiscardTokens { discard, vp } => vp as f64 - 1.5 * f64::from(discard),
        Effect::Draw { count } => 2.0 * f64::from(count),
        Effect::Consumables { count } => 1.5 * f64::from(count),
        Effect::FillConsumables { up_to } => 1.5 * (f64::from(up_to) - held).max(0.0),
        Effect::StartPlayer { draw } => {
            let claim = if state.start_player == player { 0.5 } else { 2.5 };
            claim + 2.0 * f64::from(draw)
        }
        Effect::DesignOffice { .. } => 4.5,
        Effect::DiscardDraw { discard, draw } => 1.0 + 2.0 * (f64::from(draw) - f64::from(discard)),
        Effect::DrawWhenEmpty { draw, empty_draw } => {
            let count = if me.hand.is_empty() { empty_draw } else { draw };
            2.0 * f64::from(count)
        }
    }
}

/// Effect a worker-placement move would resolve.
#[must_use]
pub fn placement_effect<E: RulesEngine>(
    engine: &E,
    state: &GameState,
    player: PlayerId,
    mv: Move,
) -> Option<Effect> {
    match mv {
        Move::PlaceWorker { workplace } => state.workplace(workplace).map(|w| w.effect),
        Move::PlaceWorkerOnBuilding { card } => state
            .player(player)
            .buildings
            .iter()
            .find(|b| b.card.id == card)
            .and_then(|b| b.card.definition(engine.catalog()))
            .map(|d| d.effect),
        _ => None,
    }
}

/// Greedy priority of any move; higher is better.
#[must_use]
pub fn move_priority<E: RulesEngine>(
    engine: &E,
    state: &GameState,
    player: PlayerId,
    mv: Move,
) -> f64 {
    let catalog = engine.catalog();
    let me = state.player(player);
    match mv {
        Move::Pass => -1.0,
        Move::CancelAction => -2.0,
        Move::PlaceWorker { .. } | Move::PlaceWorkerOnBuilding { .. } => {
            placement_effect(engine, state, player, mv)
                .map_or(0.0, |effect| effect_priority(engine, state, player, effect))
        }
        Move::SelectBuildCard { index } => me
            .hand
            .get(index)
            .and_then(|c| c.definition(catalog))
            .map_or(0.0, |d| d.vp as f64),
        Move::SelectDesignOfficeCard { index } => match &state.sub_state {
            Some(crate::core::SubState::DesignOffice(pick)) => {
                pick.revealed.get(index).map_or(0.0, |c| card_value(catalog, c))
            }
            _ => 0.0,
        },
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard::{FARM, MANSION, REALTOR};
    use crate::cards::CardInstanceId;
    use crate::core::MatchConfig;

    #[test]
    fn test_card_values_order() {
        let catalog = Catalog::standard();
        let goods = card_value(&catalog, &Card::consumable(CardInstanceId(0)));
        let farm = card_value(&catalog, &Card::building(CardInstanceId(1), FARM));
        let mansion = card_value(&catalog, &Card::building(CardInstanceId(2), MANSION));

        assert!(goods < farm);
        assert!(farm < mansion);
    }

    #[test]
    fn test_best_build_respects_payment() {
        let catalog = Catalog::standard();
        let mut me = PlayerState::new(&MatchConfig::new(2), 5);
        me.hand = vec![
            Card::building(CardInstanceId(0), FARM),
            Card::building(CardInstanceId(1), REALTOR),
            Card::consumable(CardInstanceId(2)),
        ];

        // Realtor costs 5, only two cards to pay with
        assert_eq!(best_build(&catalog, &me, 0), Some(0));
        assert_eq!(best_build(&catalog, &me, 3), Some(1));
    }
}
