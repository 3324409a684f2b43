//! Final scoring.
//!
//! `total = building_vp + bonus_vp + money_vp + debt_vp`, where bonus VP
//! includes victory point tokens, money converts 1:1, and each unpaid-debt
//! marker costs the configured penalty unless a debt exemption forgives it.

use serde::{Deserialize, Serialize};

use crate::cards::{Catalog, Passive, ScoreBonus};
use crate::core::{GameState, MatchConfig, PlayerId, PlayerState};

/// One player's score, itemised.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub player: PlayerId,
    pub building_vp: i64,
    pub bonus_vp: i64,
    pub money_vp: i64,
    /// Zero or negative.
    pub debt_vp: i64,
    pub total: i64,
}

/// Score a single player.
#[must_use]
pub fn score_player(
    catalog: &Catalog,
    config: &MatchConfig,
    player: PlayerId,
    me: &PlayerState,
) -> ScoreBreakdown {
    let defs: Vec<_> = me
        .buildings
        .iter()
        .filter_map(|b| b.card.definition(catalog))
        .collect();

    let building_vp: i64 = defs.iter().map(|d| d.vp).sum();

    let bonus_vp = me.vp_tokens
        + defs
            .iter()
            .filter_map(|d| d.bonus)
            .map(|bonus| match bonus {
                ScoreBonus::PerBuilding(vp) => vp * defs.len() as i64,
                ScoreBonus::PerTag(tag, vp) => {
                    vp * defs.iter().filter(|d| d.has_tag(tag)).count() as i64
                }
                ScoreBonus::PerUnsellable(vp) => {
                    vp * defs.iter().filter(|d| d.unsellable).count() as i64
                }
                ScoreBonus::PerWorker(vp) => vp * i64::from(me.workers),
            })
            .sum::<i64>();

    let exemption: i64 = defs
        .iter()
        .filter_map(|d| match d.passive {
            Some(Passive::DebtExemption(n)) => Some(i64::from(n)),
            _ => None,
        })
        .sum();
    let debts = i64::from(me.unpaid_debts);
    let debt_vp = -config.debt_penalty * debts + config.debt_penalty * debts.min(exemption);

    let money_vp = me.money;

    ScoreBreakdown {
        player,
        building_vp,
        bonus_vp,
        money_vp,
        debt_vp,
        total: building_vp + bonus_vp + money_vp + debt_vp,
    }
}

/// Score everyone, best first. Ties go to the lower seat index.
#[must_use]
pub fn rank(catalog: &Catalog, config: &MatchConfig, state: &GameState) -> Vec<ScoreBreakdown> {
    let mut scores: Vec<_> = state
        .players
        .iter()
        .map(|(player, me)| score_player(catalog, config, player, me))
        .collect();
    scores.sort_by(|a, b| b.total.cmp(&a.total).then(a.player.cmp(&b.player)));
    scores
}
