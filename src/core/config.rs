//! Match configuration.
//!
//! `MatchConfig` holds the table-level numbers: player count, match length,
//! starting resources and limits. It is plain serde data so a host can load
//! it from whatever settings store it uses; `validate` checks it before a
//! match is set up.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Table-level settings for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub player_count: usize,
    /// The match ends after this many rounds.
    pub rounds: u32,
    pub starting_workers: u32,
    pub worker_cap: u32,
    pub hand_limit: u32,
    pub starting_hand: u32,
    /// Cash of the start player; each following seat gets $1 more.
    pub starting_money: i64,
    /// Victory points lost per unpaid-debt marker.
    pub debt_penalty: i64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            rounds: 9,
            starting_workers: 2,
            worker_cap: 5,
            hand_limit: 5,
            starting_hand: 3,
            starting_money: 5,
            debt_penalty: 3,
        }
    }
}

impl MatchConfig {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Check the settings describe a playable match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=4).contains(&self.player_count) {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        if self.rounds == 0 {
            return Err(ConfigError::NonPositive("rounds"));
        }
        if self.starting_workers == 0 {
            return Err(ConfigError::NonPositive("starting_workers"));
        }
        if self.starting_workers > self.worker_cap {
            return Err(ConfigError::WorkersOverCap);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(MatchConfig::default().validate(), Ok(()));
        assert_eq!(MatchConfig::new(4).validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_player_count() {
        assert_eq!(MatchConfig::new(1).validate(), Err(ConfigError::PlayerCount(1)));
        assert_eq!(MatchConfig::new(5).validate(), Err(ConfigError::PlayerCount(5)));
    }

    #[test]
    fn test_rejects_workers_over_cap() {
        let config = MatchConfig {
            starting_workers: 6,
            ..MatchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WorkersOverCap));
    }

    #[test]
    fn test_config_serialization() {
        let config = MatchConfig::new(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
