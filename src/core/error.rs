//! Move rejection reasons.
//!
//! A rejected move never changes state. Callers that do not care why can
//! ignore the error; the presentation layer infers rejection from the state
//! version not moving.

use thiserror::Error;

use super::player::PlayerId;
use super::state::Phase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("{player} may not act now")]
    NotYourTurn { player: PlayerId },

    #[error("{mv} is not accepted during {phase:?}")]
    WrongPhase { mv: &'static str, phase: Phase },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown workplace or building")]
    UnknownTarget,

    #[error("no workers available")]
    NoAvailableWorkers,

    #[error("target is occupied")]
    Occupied,

    #[error("nothing happens there")]
    NoEffect,

    #[error("hand holds {held} cards, {required} required")]
    HandTooSmall { required: usize, held: usize },

    #[error("household holds ${held}, ${required} required")]
    TreasuryTooSmall { required: i64, held: i64 },

    #[error("the deck and discard pile are empty")]
    DeckExhausted,

    #[error("worker limit reached")]
    WorkerLimit,

    #[error("nothing in hand can be built")]
    CannotAffordBuild,

    #[error("card cannot be built")]
    NotBuildable,

    #[error("dual construction needs two buildings of equal cost")]
    CostMismatch,

    #[error("selection needs {required}, has {selected}")]
    SelectionIncomplete { required: usize, selected: usize },

    #[error("selection is full")]
    SelectionFull,

    #[error("card is reserved for construction")]
    CardLocked,

    #[error("building cannot be sold")]
    Unsellable,

    #[error("must sell every sellable building before running short")]
    MustSellMore,

    #[error("sale exceeds what the wages require")]
    ExcessiveSale,

    #[error("already confirmed")]
    AlreadyConfirmed,

    #[error("nothing to cancel")]
    NothingToCancel,

    #[error("the match is over")]
    GameOver,
}

/// Invalid match setup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("player count {0} outside 2..=4")]
    PlayerCount(usize),

    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("starting workers exceed worker cap")]
    WorkersOverCap,
}

pub type Result<T> = std::result::Result<T, MoveError>;
