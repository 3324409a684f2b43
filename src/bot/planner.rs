//! Deterministic planners for selection sub-phases.
//!
//! Each planner computes a target selection from the view, then emits the
//! next toggle toward it or the confirm once it is reached. Targets depend
//! only on the hand and table, which toggles do not change, so repeated
//! planning converges.

use std::collections::BTreeSet;

use crate::cards::{CardInstanceId, Catalog};
use crate::core::{GameState, Move, PaydayRecord, PlayerId, PlayerState, SubState};

use super::eval::{best_build, card_value};

/// Next move for `player` in the current selection sub-phase.
///
/// Returns `None` outside selection sub-phases or when `player` has no part
/// in the current one.
#[must_use]
pub fn plan_selection(catalog: &Catalog, view: &GameState, player: PlayerId) -> Option<Move> {
    let me = view.player(player);
    match view.sub_state.as_ref()? {
        SubState::Build(selection) => Some(
            best_build(catalog, me, selection.discount)
                .map_or(Move::CancelAction, |index| Move::SelectBuildCard { index }),
        ),
        SubState::DualConstruction(selection) => Some(plan_dual(catalog, me, &selection.selected)),
        SubState::DesignOffice(pick) => {
            let index = pick
                .revealed
                .iter()
                .enumerate()
                .max_by(|(ia, a), (ib, b)| {
                    card_value(catalog, a)
                        .total_cmp(&card_value(catalog, b))
                        .then(ib.cmp(ia))
                })
                .map(|(i, _)| i)?;
            Some(Move::SelectDesignOfficeCard { index })
        }
        SubState::Discard(selection) => Some(plan_discard(
            catalog,
            me,
            &selection.locked,
            &selection.selected,
            selection.required,
        )),
        SubState::Cleanup(cleanup) => {
            let record = cleanup.records[player].as_ref().filter(|r| !r.confirmed)?;
            Some(plan_discard(catalog, me, &[], &record.selected, record.required))
        }
        SubState::Payday(payday) => {
            let record = payday.records[player].as_ref().filter(|r| !r.confirmed)?;
            Some(plan_sale(catalog, me, record))
        }
        SubState::Final(_) => None,
    }
}

/// Discard the least valuable unlocked cards.
fn plan_discard(
    catalog: &Catalog,
    me: &PlayerState,
    locked: &[CardInstanceId],
    selected: &BTreeSet<CardInstanceId>,
    required: u32,
) -> Move {
    if selected.len() >= required as usize {
        return Move::ConfirmDiscard;
    }
    me.hand
        .iter()
        .enumerate()
        .filter(|(_, c)| !locked.contains(&c.id) && !selected.contains(&c.id))
        .min_by(|(ia, a), (ib, b)| {
            card_value(catalog, a)
                .total_cmp(&card_value(catalog, b))
                .then(ia.cmp(ib))
        })
        .map_or(Move::CancelAction, |(index, _)| Move::ToggleDiscard { index })
}

/// Build the most valuable affordable pair of equal-cost buildings.
fn plan_dual(catalog: &Catalog, me: &PlayerState, selected: &[CardInstanceId]) -> Move {
    let spare = me.hand.len().saturating_sub(2);
    let buildings: Vec<_> = me
        .hand
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.definition(catalog).map(|d| (i, c.id, d)))
        .collect();

    let mut best: Option<(i64, usize, usize)> = None;
    for (a, &(ia, _, da)) in buildings.iter().enumerate() {
        for &(ib, _, db) in &buildings[a + 1..] {
            if da.cost != db.cost || da.cost as usize > spare {
                continue;
            }
            let vp = da.vp + db.vp;
            if best.map_or(true, |(v, _, _)| vp > v) {
                best = Some((vp, ia, ib));
            }
        }
    }

    let Some((_, ia, ib)) = best else {
        return Move::CancelAction;
    };
    let target = [me.hand[ia].id, me.hand[ib].id];

    if let Some(stray) = selected.iter().find(|&&id| !target.contains(&id)) {
        if let Some(index) = me.hand_position(*stray) {
            return Move::ToggleDualCard { index };
        }
    }
    for index in [ia, ib] {
        if !selected.contains(&me.hand[index].id) {
            return Move::ToggleDualCard { index };
        }
    }
    Move::ConfirmDualConstruction
}

/// Sell the cheapest set of buildings that covers the wages without
/// overselling; sell everything sellable when even that falls short.
pub(crate) fn sale_target(
    catalog: &Catalog,
    me: &PlayerState,
    owed: i64,
) -> BTreeSet<CardInstanceId> {
    let mut sellable: Vec<(CardInstanceId, i64)> = me
        .buildings
        .iter()
        .filter_map(|b| b.card.definition(catalog).map(|d| (b.card.id, d)))
        .filter(|(_, d)| !d.unsellable)
        .map(|(id, d)| (id, d.vp))
        .collect();

    let shortfall = owed - me.money;
    let total: i64 = sellable.iter().map(|(_, vp)| vp).sum();
    if total < shortfall {
        return sellable.into_iter().map(|(id, _)| id).collect();
    }

    if let Some(&(id, _)) = sellable
        .iter()
        .filter(|(_, vp)| *vp >= shortfall)
        .min_by_key(|(id, vp)| (*vp, *id))
    {
        return BTreeSet::from([id]);
    }

    // No single building covers it: take the largest until covered
    sellable.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut target = BTreeSet::new();
    let mut raised = 0;
    for (id, vp) in sellable {
        if raised >= shortfall {
            break;
        }
        raised += vp;
        target.insert(id);
    }
    target
}

fn plan_sale(catalog: &Catalog, me: &PlayerState, record: &PaydayRecord) -> Move {
    let target = sale_target(catalog, me, record.owed);
    let differing = me
        .buildings
        .iter()
        .position(|b| target.contains(&b.card.id) != record.selected.contains(&b.card.id));

    match differing {
        Some(building) => Move::TogglePaydaySell { building },
        None => Move::ConfirmPaydaySell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard::{FACTORY, FARM, LAW_OFFICE, STEEL_MILL};
    use crate::cards::{BuiltStructure, Card, CardDefId};
    use crate::core::MatchConfig;

    fn owner(money: i64, defs: &[CardDefId]) -> PlayerState {
        let mut me = PlayerState::new(&MatchConfig::new(2), money);
        for (i, &def) in defs.iter().enumerate() {
            me.buildings
                .push(BuiltStructure::new(Card::building(CardInstanceId(i as u32), def)));
        }
        me
    }

    #[test]
    fn test_single_building_covers_shortfall() {
        let catalog = Catalog::standard();
        let me = owner(0, &[STEEL_MILL, FARM, FACTORY]);

        // Shortfall 8: Factory (12) is the cheapest single cover
        assert_eq!(sale_target(&catalog, &me, 8), BTreeSet::from([CardInstanceId(2)]));
    }

    #[test]
    fn test_combination_when_no_single_cover() {
        let catalog = Catalog::standard();
        let me = owner(0, &[FARM, FACTORY, LAW_OFFICE]);

        // Shortfall 15: Factory then Farm; Law Office is unsellable
        assert_eq!(
            sale_target(&catalog, &me, 15),
            BTreeSet::from([CardInstanceId(0), CardInstanceId(1)])
        );
    }

    #[test]
    fn test_everything_when_short() {
        let catalog = Catalog::standard();
        let me = owner(1, &[FARM]);
        assert_eq!(sale_target(&catalog, &me, 20), BTreeSet::from([CardInstanceId(0)]));
    }

    #[test]
    fn test_discard_prefers_consumables() {
        let catalog = Catalog::standard();
        let mut me = owner(0, &[]);
        me.hand = vec![
            Card::building(CardInstanceId(0), FACTORY),
            Card::consumable(CardInstanceId(1)),
        ];

        let mv = plan_discard(&catalog, &me, &[], &BTreeSet::new(), 1);
        assert_eq!(mv, Move::ToggleDiscard { index: 1 });

        let done = plan_discard(&catalog, &me, &[], &BTreeSet::from([CardInstanceId(1)]), 1);
        assert_eq!(done, Move::ConfirmDiscard);
    }
}
