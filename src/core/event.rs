//! Log entries and the structured events attached to them.
//!
//! The log is append-only. Each entry carries free text for display and a
//! `GameEvent` the presentation layer can switch on (sound cues, animations)
//! without parsing the text.

use serde::{Deserialize, Serialize};

use super::action::Placement;
use super::player::PlayerId;
use super::state::Phase;
use crate::cards::{CardDefId, WorkplaceId};

/// What happened, in machine-readable form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    MatchStarted { players: usize },
    RoundStarted { round: u32 },
    PhaseChanged { phase: Phase },
    WorkplaceOpened { workplace: WorkplaceId },
    WorkerPlaced { player: PlayerId, placement: Placement },
    Passed { player: PlayerId },
    CardsDrawn { player: PlayerId, count: u32 },
    ConsumablesGained { player: PlayerId, count: u32 },
    StartPlayerClaimed { player: PlayerId },
    WorkerHired { player: PlayerId, robot: bool },
    /// `heavy` marks buildings costing 4 or more.
    StructureBuilt { player: PlayerId, def: CardDefId, heavy: bool },
    CardsDiscarded { player: PlayerId, count: u32 },
    IncomeTaken { player: PlayerId, amount: i64 },
    TokensGained { player: PlayerId, vp: i64 },
    CardKept { player: PlayerId },
    SelectionChanged { player: PlayerId },
    SelectionCancelled { player: PlayerId },
    WagesPaid { player: PlayerId, amount: i64 },
    StructureSold { player: PlayerId, def: CardDefId, value: i64 },
    DebtIncurred { player: PlayerId, amount: u32 },
    GameEnded { winner: PlayerId },
}

/// One line of the match log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub text: String,
    pub event: GameEvent,
}

impl LogEntry {
    #[must_use]
    pub fn new(round: u32, text: impl Into<String>, event: GameEvent) -> Self {
        Self {
            round,
            text: text.into(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serialization() {
        let entry = LogEntry::new(
            4,
            "Player 2 built Factory",
            GameEvent::StructureBuilt {
                player: PlayerId::new(1),
                def: CardDefId::new(8),
                heavy: false,
            },
        );

        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
