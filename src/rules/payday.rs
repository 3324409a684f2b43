//! Payday: wages, forced sales and unpaid-wage debt.
//!
//! Players who can pay in cash, or who own nothing sellable, settle on entry.
//! Everyone else picks buildings to sell and confirms independently; the
//! round moves to cleanup once the last record is confirmed.

use std::collections::BTreeSet;

use crate::cards::{CardInstanceId, Workplace};
use crate::core::{
    GameEvent, GameState, MoveError, PaydayRecord, PaydayState, Phase, PlayerId, PlayerMap,
    PlayerState, Result, SubState,
};

use super::construction::toggle;
use super::engine::{sub_state_mismatch, Engine, RulesEngine};

/// Wage per paid worker for a round.
///
/// ```
/// use economy_engine::rules::wage_per_worker;
///
/// assert_eq!(wage_per_worker(2), 2);
/// assert_eq!(wage_per_worker(5), 3);
/// assert_eq!(wage_per_worker(6), 4);
/// assert_eq!(wage_per_worker(8), 5);
/// ```
#[must_use]
pub fn wage_per_worker(round: u32) -> i64 {
    match round {
        0..=2 => 2,
        3..=5 => 3,
        6..=7 => 4,
        _ => 5,
    }
}

impl Engine {
    pub(super) fn begin_payday(&self, state: &mut GameState) {
        state.phase = Phase::Payday;
        state.log("Payday", GameEvent::PhaseChanged { phase: Phase::Payday });

        let wage = wage_per_worker(state.round);
        let count = state.player_count();
        let mut records = PlayerMap::with_value(count, None);

        for player in state.start_player.seat_order(count) {
            let me = state.player(player);
            let owed = wage * i64::from(me.paid_workers());
            if me.money >= owed || !self.has_sellable(me) {
                Self::settle_wages(state, player, owed);
            } else {
                records[player] = Some(PaydayRecord {
                    owed,
                    selected: BTreeSet::new(),
                    confirmed: false,
                });
            }
        }

        let payday = PaydayState { wage, records };
        if payday.is_complete() {
            self.begin_cleanup(state);
        } else {
            state.sub_state = Some(SubState::Payday(payday));
        }
    }

    fn has_sellable(&self, me: &PlayerState) -> bool {
        me.buildings
            .iter()
            .filter_map(|b| b.card.definition(self.catalog()))
            .any(|def| !def.unsellable)
    }

    /// Pay what cash allows to the household. Any shortfall, whatever its
    /// size, becomes a single unpaid-debt marker.
    fn settle_wages(state: &mut GameState, player: PlayerId, owed: i64) {
        let me = state.player_mut(player);
        let paid = owed.min(me.money.max(0));
        let shortfall = owed - paid;
        me.money -= paid;
        if shortfall > 0 {
            me.unpaid_debts += 1;
        }

        state.household += paid;
        state.log(
            format!("{player} paid ${paid} in wages"),
            GameEvent::WagesPaid { player, amount: paid },
        );
        if shortfall > 0 {
            state.log(
                format!("{player} could not pay ${shortfall}"),
                GameEvent::DebtIncurred {
                    player,
                    amount: shortfall as u32,
                },
            );
        }
    }

    pub(super) fn apply_toggle_sell(
        &self,
        state: &mut GameState,
        player: PlayerId,
        building: usize,
    ) -> Result<()> {
        let buildings = &state.players[player].buildings;
        let structure = buildings.get(building).ok_or(MoveError::IndexOutOfRange {
            index: building,
            len: buildings.len(),
        })?;
        let def = structure.card.definition(self.catalog()).ok_or(MoveError::Unsellable)?;
        if def.unsellable {
            return Err(MoveError::Unsellable);
        }
        let id = structure.card.id;

        let Some(SubState::Payday(payday)) = &mut state.sub_state else {
            sub_state_mismatch(state.phase)
        };
        let record = payday.records[player]
            .as_mut()
            .ok_or(MoveError::NotYourTurn { player })?;
        if record.confirmed {
            return Err(MoveError::AlreadyConfirmed);
        }
        toggle(&mut record.selected, id, u32::MAX)?;

        state.log(
            format!("{player} updated their sale plan"),
            GameEvent::SelectionChanged { player },
        );
        Ok(())
    }

    pub(super) fn apply_confirm_sell(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        let Some(SubState::Payday(payday)) = &state.sub_state else {
            sub_state_mismatch(state.phase)
        };
        let record = payday.records[player]
            .as_ref()
            .ok_or(MoveError::NotYourTurn { player })?;
        if record.confirmed {
            return Err(MoveError::AlreadyConfirmed);
        }
        let (owed, selected) = (record.owed, record.selected.clone());

        self.check_sale(state.player(player), owed, &selected)?;

        if let Some(SubState::Payday(payday)) = &mut state.sub_state {
            if let Some(record) = payday.records[player].as_mut() {
                record.confirmed = true;
            }
        }

        for &id in &selected {
            self.sell_building(state, player, id);
        }
        self.refresh_passives(state, player);
        Self::settle_wages(state, player, owed);

        let complete = matches!(&state.sub_state, Some(SubState::Payday(p)) if p.is_complete());
        if complete {
            state.sub_state = None;
            self.begin_cleanup(state);
        }
        Ok(())
    }

    /// Sell enough to cover wages, but no building more than needed.
    ///
    /// Short of the wages, every sellable building must be marked. Once the
    /// wages are covered, dropping the cheapest marked building must leave
    /// them uncovered; otherwise the sale is excessive.
    fn check_sale(
        &self,
        me: &PlayerState,
        owed: i64,
        selected: &BTreeSet<CardInstanceId>,
    ) -> Result<()> {
        let mut sellable = 0;
        let mut marked_value = 0;
        let mut cheapest_marked: Option<i64> = None;

        for structure in &me.buildings {
            let Some(def) = structure.card.definition(self.catalog()) else {
                continue;
            };
            if def.unsellable {
                continue;
            }
            sellable += 1;
            if selected.contains(&structure.card.id) {
                marked_value += def.vp;
                cheapest_marked = Some(cheapest_marked.map_or(def.vp, |v: i64| v.min(def.vp)));
            }
        }

        let funds = me.money + marked_value;
        if funds < owed && selected.len() < sellable {
            return Err(MoveError::MustSellMore);
        }
        if let Some(cheapest) = cheapest_marked {
            if funds >= owed && funds - cheapest >= owed {
                return Err(MoveError::ExcessiveSale);
            }
        }
        Ok(())
    }

    /// Turn a building into a single-occupancy public workplace.
    fn sell_building(&self, state: &mut GameState, player: PlayerId, id: CardInstanceId) {
        let me = state.player_mut(player);
        let Some(pos) = me.building_position(id) else {
            panic!("{id} marked for sale is not owned by {player}")
        };
        let structure = me.buildings.remove(pos);
        let Some(def) = structure.card.definition(self.catalog()) else {
            panic!("{id} marked for sale has no definition")
        };
        let value = def.vp;
        me.money += value;

        let workplace_id = state.alloc_workplace_id();
        state.workplaces.push(Workplace::from_sold(workplace_id, structure.card, def));
        state.log(
            format!("{player} sold {} for ${value}", def.name),
            GameEvent::StructureSold {
                player,
                def: def.id,
                value,
            },
        );
        state.log(
            format!("{} is now a public workplace", def.name),
            GameEvent::WorkplaceOpened { workplace: workplace_id },
        );
    }
}
