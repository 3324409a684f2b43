//! Moves: the closed set of things a player can do.
//!
//! Every move carries only small primitive arguments (indices into the
//! acting player's hand or buildings, a workplace id, or nothing). The
//! acting player comes from the caller context, never from the move.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::{CardInstanceId, WorkplaceId};

/// Where a worker is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    /// A public workplace (including sold buildings).
    Workplace(WorkplaceId),
    /// One of the acting player's own buildings.
    Building(CardInstanceId),
}

/// A player move.
///
/// ```
/// use economy_engine::core::Move;
///
/// let mv = Move::ToggleDiscard { index: 2 };
/// assert_eq!(mv.name(), "toggleDiscard");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    PlaceWorker { workplace: WorkplaceId },
    PlaceWorkerOnBuilding { card: CardInstanceId },
    /// Forfeit the remaining workers for this round.
    Pass,
    SelectBuildCard { index: usize },
    ToggleDualCard { index: usize },
    ConfirmDualConstruction,
    SelectDesignOfficeCard { index: usize },
    ToggleDiscard { index: usize },
    ConfirmDiscard,
    TogglePaydaySell { building: usize },
    ConfirmPaydaySell,
    CancelAction,
}

impl Move {
    /// Stable move name, used in logs and diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Move::PlaceWorker { .. } => "placeWorker",
            Move::PlaceWorkerOnBuilding { .. } => "placeWorkerOnBuilding",
            Move::Pass => "pass",
            Move::SelectBuildCard { .. } => "selectBuildCard",
            Move::ToggleDualCard { .. } => "toggleDualCard",
            Move::ConfirmDualConstruction => "confirmDualConstruction",
            Move::SelectDesignOfficeCard { .. } => "selectDesignOfficeCard",
            Move::ToggleDiscard { .. } => "toggleDiscard",
            Move::ConfirmDiscard => "confirmDiscard",
            Move::TogglePaydaySell { .. } => "togglePaydaySell",
            Move::ConfirmPaydaySell => "confirmPaydaySell",
            Move::CancelAction => "cancelAction",
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::PlaceWorker { workplace } => write!(f, "placeWorker({workplace})"),
            Move::PlaceWorkerOnBuilding { card } => write!(f, "placeWorkerOnBuilding({card})"),
            Move::SelectBuildCard { index }
            | Move::ToggleDualCard { index }
            | Move::SelectDesignOfficeCard { index }
            | Move::ToggleDiscard { index } => write!(f, "{}({index})", self.name()),
            Move::TogglePaydaySell { building } => write!(f, "togglePaydaySell({building})"),
            _ => f.write_str(self.name()),
        }
    }
}

/// An accepted move, kept for replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: PlayerId,
    pub mv: Move,
    pub round: u32,
    /// State version the move was applied to.
    pub version: u64,
}
