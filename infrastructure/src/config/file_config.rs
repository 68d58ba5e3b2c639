//! Raw TOML configuration data types
//!
//! Example configuration:
//!
//! ```toml
//! revote_cooldown = 60             # seconds
//! vote_time_limit = 30             # seconds
//! vote_percentage_threshold = 50   # 0-100, 0 = any participation passes
//! language = "en"
//!
//! [worlds]
//! world = true
//! world_nether = false
//! ```

use serde::{Deserialize, Serialize};
use sleepvote_domain::{PartitionId, PassThreshold};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Configuration problems that are corrected or tolerated at load time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("vote_percentage_threshold {0} is outside 0-100 and will be clamped")]
    ThresholdOutOfRange(i64),

    #[error("vote_time_limit is 0, votes will end immediately")]
    ZeroVoteTimeLimit,

    #[error("language cannot be empty")]
    EmptyLanguage,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Seconds between the end of one vote and the next
    pub revote_cooldown: u64,
    /// Seconds a vote stays open
    pub vote_time_limit: u64,
    /// Minimum yes-percentage to pass, as written (clamped on use)
    pub vote_percentage_threshold: i64,
    /// Message language code
    pub language: String,
    /// Per-world voting toggles; unlisted worlds are enabled
    pub worlds: BTreeMap<String, bool>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            revote_cooldown: 60,
            vote_time_limit: 30,
            vote_percentage_threshold: 50,
            language: "en".to_string(),
            worlds: BTreeMap::new(),
        }
    }
}

impl FileConfig {
    /// Validate the configuration, returning every detected issue
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if PassThreshold::clamped(self.vote_percentage_threshold).1 {
            issues.push(ConfigValidationError::ThresholdOutOfRange(
                self.vote_percentage_threshold,
            ));
        }
        if self.vote_time_limit == 0 {
            issues.push(ConfigValidationError::ZeroVoteTimeLimit);
        }
        if self.language.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyLanguage);
        }
        issues
    }

    pub fn revote_cooldown(&self) -> Duration {
        Duration::from_secs(self.revote_cooldown)
    }

    pub fn vote_time_limit(&self) -> Duration {
        Duration::from_secs(self.vote_time_limit)
    }

    pub fn threshold(&self) -> PassThreshold {
        PassThreshold::new(self.vote_percentage_threshold)
    }

    pub fn is_world_enabled(&self, world: &PartitionId) -> bool {
        self.worlds.get(world.as_str()).copied().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_plugin() {
        let config = FileConfig::default();
        assert_eq!(config.revote_cooldown(), Duration::from_secs(60));
        assert_eq!(config.vote_time_limit(), Duration::from_secs(30));
        assert_eq!(config.threshold().percent(), 50);
        assert_eq!(config.language, "en");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: FileConfig = toml::from_str(
            r#"
            vote_percentage_threshold = 75

            [worlds]
            world_nether = false
            "#,
        )
        .unwrap();

        assert_eq!(config.threshold().percent(), 75);
        assert_eq!(config.revote_cooldown, 60);
        assert!(!config.is_world_enabled(&PartitionId::new("world_nether")));
        assert!(config.is_world_enabled(&PartitionId::new("world")));
    }

    #[test]
    fn test_out_of_range_threshold_is_reported_and_clamped() {
        let config = FileConfig {
            vote_percentage_threshold: 150,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::ThresholdOutOfRange(150)]
        );
        assert_eq!(config.threshold().percent(), 100);

        let config = FileConfig {
            vote_percentage_threshold: -5,
            ..Default::default()
        };
        assert_eq!(config.threshold().percent(), 0);
    }

    #[test]
    fn test_zero_time_limit_is_reported() {
        let config = FileConfig {
            vote_time_limit: 0,
            language: " ".to_string(),
            ..Default::default()
        };
        let issues = config.validate();
        assert!(issues.contains(&ConfigValidationError::ZeroVoteTimeLimit));
        assert!(issues.contains(&ConfigValidationError::EmptyLanguage));
    }
}
