//! Rules configuration.
//!
//! Capacities and starting values are configuration, not constants baked
//! into the zones. The defaults are the standard ruleset: 10 mana
//! crystals, a hand of 10, a board of 7, 30 starting health.
//!
//! ```
//! use ccg_rules::core::RulesConfig;
//!
//! let config = RulesConfig::default().with_seed(7).with_starting_health(20);
//! assert_eq!(config.max_board_size, 7);
//! assert_eq!(config.starting_health, 20);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Match-wide rules configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Upper bound on mana crystals.
    pub max_mana: i32,

    /// Hand capacity; cards drawn past it are burned.
    pub max_hand_size: usize,

    /// Board capacity, counting pending reservations.
    pub max_board_size: usize,

    /// Hero health (and max health) at match start.
    pub starting_health: i32,

    /// Maximum number of secrets a player may have in play.
    pub max_secrets: usize,

    /// Seed for the world RNG.
    pub seed: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_mana: 10,
            max_hand_size: 10,
            max_board_size: 7,
            starting_health: 30,
            max_secrets: 5,
            seed: 0,
        }
    }
}

impl RulesConfig {
    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the mana crystal cap.
    #[must_use]
    pub fn with_max_mana(mut self, max_mana: i32) -> Self {
        self.max_mana = max_mana;
        self
    }

    /// Set the hand capacity.
    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    /// Set the board capacity.
    #[must_use]
    pub fn with_max_board_size(mut self, size: usize) -> Self {
        self.max_board_size = size;
        self
    }

    /// Set the starting hero health.
    #[must_use]
    pub fn with_starting_health(mut self, health: i32) -> Self {
        self.starting_health = health;
        self
    }

    /// Set the secret limit.
    #[must_use]
    pub fn with_max_secrets(mut self, count: usize) -> Self {
        self.max_secrets = count;
        self
    }

    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json(text: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| EngineError::invalid(format!("rules config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no match could be played with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_mana <= 0 {
            return Err(EngineError::invalid("max_mana must be positive"));
        }
        if self.max_hand_size == 0 || self.max_board_size == 0 {
            return Err(EngineError::invalid("zone capacities must be positive"));
        }
        if self.starting_health <= 0 {
            return Err(EngineError::invalid("starting_health must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RulesConfig::default();
        assert_eq!(config.max_mana, 10);
        assert_eq!(config.max_hand_size, 10);
        assert_eq!(config.max_board_size, 7);
        assert_eq!(config.starting_health, 30);
    }

    #[test]
    fn test_builder() {
        let config = RulesConfig::default()
            .with_max_board_size(5)
            .with_max_hand_size(8)
            .with_max_secrets(2);

        assert_eq!(config.max_board_size, 5);
        assert_eq!(config.max_hand_size, 8);
        assert_eq!(config.max_secrets, 2);
    }

    #[test]
    fn test_from_json_partial() {
        let config = RulesConfig::from_json(r#"{ "seed": 99, "max_board_size": 4 }"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.max_board_size, 4);
        assert_eq!(config.max_mana, 10);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let err = RulesConfig::default().with_max_board_size(0).validate().unwrap_err();
        assert!(err.is_invalid_argument());

        assert!(RulesConfig::from_json(r#"{ "max_hand_size": 0 }"#).is_err());
        assert!(RulesConfig::from_json("not json").is_err());
    }
}
