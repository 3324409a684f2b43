//! Rule engine.
//!
//! `Engine` owns no state: every move takes `&mut GameState` and either
//! applies completely or returns a `MoveError` and changes nothing.
//!
//! ## Phases
//!
//! ```text
//! work -> {build | discard | designOffice | dualConstruction} -> work ...
//!      -> payday -> cleanup -> work (next round) | gameEnd
//! ```
//!
//! Work and its selection sub-phases belong to the current player. Payday
//! and cleanup keep one record per affected player, and those players act
//! independently until every record is confirmed.

mod cleanup;
mod construction;
pub mod engine;
mod payday;
pub mod scoring;
mod setup;
mod view;
mod work;

pub use engine::{Engine, GameResult, RulesEngine};
pub use payday::wage_per_worker;
pub use scoring::{rank, score_player, ScoreBreakdown};
pub use setup::MatchBuilder;
