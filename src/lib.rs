//! # economy-engine
//!
//! Rule engine and bot players for a multi-round worker-placement economy
//! card game for 2-4 players.
//!
//! ## Design Principles
//!
//! 1. **Authoritative Reducer**: The engine owns no state. Every move takes
//!    `&mut GameState` and either applies completely or is rejected with a
//!    `MoveError` and leaves the state untouched.
//!
//! 2. **N-Player First**: Every API takes the player as context. Payday and
//!    cleanup are simultaneous: each affected player acts independently.
//!
//! 3. **Injected Catalog**: Building and workplace definitions live in an
//!    immutable `Catalog` shared by the engine and bots.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so moves are
//!   tried on a clone and committed on success, and bots look ahead cheaply.
//!
//! - **Fair Bots**: Bots decide from `GameState::view_for`, which hides other
//!   hands and the deck, and only choose moves the engine reports as legal.
//!
//! - **Determinism**: One seeded ChaCha stream per match; bincode snapshots of
//!   equal states are byte-identical.
//!
//! ## Modules
//!
//! - `core`: Players, state, moves, events, errors, RNG, configuration
//! - `cards`: Building definitions, card instances, workplaces, catalog
//! - `rules`: The rule engine, match setup, scoring, redacted views
//! - `bot`: Easy / Normal / Hard decision policies

pub mod bot;
pub mod cards;
pub mod core;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, GameEvent, GameRng, GameRngState, GameState, LogEntry, MatchConfig, Move,
    MoveError, MoveRecord, Phase, Placement, PlayerId, PlayerMap, PlayerState, SubState,
};

pub use crate::cards::{
    BuiltStructure, Card, CardDefId, CardDefinition, CardInstanceId, CardKind, CardTag, Catalog,
    Effect, Passive, ScoreBonus, Workplace, WorkplaceDefinition, WorkplaceId,
};

pub use crate::rules::{
    rank, score_player, wage_per_worker, Engine, GameResult, MatchBuilder, RulesEngine,
    ScoreBreakdown,
};

pub use crate::bot::{decide_move, play_out, BotConfig, BotDriver, Difficulty};
