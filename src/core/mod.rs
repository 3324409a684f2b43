//! Core types: players, state, moves, events, errors, RNG, configuration.

pub mod action;
pub mod config;
pub mod error;
pub mod event;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Move, MoveRecord, Placement};
pub use config::MatchConfig;
pub use error::{ConfigError, MoveError, Result};
pub use event::{GameEvent, LogEntry};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{
    BuildSelection, CleanupRecord, CleanupState, DiscardPurpose, DiscardSelection, DualSelection,
    GameState, PaydayRecord, PaydayState, Phase, PlayerState, RevealPick, SubState,
};
