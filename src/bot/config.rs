//! Bot configuration parameters.

use serde::{Deserialize, Serialize};

/// Bot strength tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Seeded weighted random over legal moves.
    Easy,
    /// Greedy fixed priorities.
    #[default]
    Normal,
    /// One-ply lookahead scored by a position evaluation.
    Hard,
}

/// Bot configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    pub difficulty: Difficulty,

    /// Random seed. Combined with the state version and seat, so the same
    /// seed and state always produce the same move.
    pub seed: u64,

    /// Relative weight of passing for the Easy tier.
    /// Other moves weigh at least 0.5.
    pub pass_weight: f32,

    /// How many follow-up selection moves the Hard tier plays out after a
    /// placement before evaluating the position.
    pub continuation_limit: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            seed: 42,
            pass_weight: 0.1,
            continuation_limit: 16,
        }
    }
}

impl BotConfig {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_pass_weight(mut self, weight: f32) -> Self {
        self.pass_weight = weight;
        self
    }

    #[must_use]
    pub fn with_continuation_limit(mut self, limit: u32) -> Self {
        self.continuation_limit = limit;
        self
    }
}
