//! Topic exploration configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Largest number of topics offered at once
pub const MAX_SAMPLE_SIZE: usize = 3;

/// When topic metadata generation is waited for
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetadataMode {
    /// The proposal step waits (bounded) for the guide
    Eager,
    /// Generation runs detached; confirmation waits if still pending
    #[default]
    Background,
}

/// Exploration dialogue settings
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorationConfig {
    /// Topics offered per turn
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Recent turns scanned for interests
    #[serde(default = "default_interest_window")]
    pub interest_window: usize,

    #[serde(default)]
    pub metadata_mode: MetadataMode,

    /// Longest wait for an in-flight metadata job, in seconds
    #[serde(default = "default_confirm_wait")]
    pub confirm_wait_secs: u64,

    /// Idle seconds before a session expires (0 = never)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Language named in prompts
    #[serde(default = "default_language")]
    pub language: String,
}

impl ExplorationConfig {
    pub fn confirm_wait(&self) -> Duration {
        Duration::from_secs(self.confirm_wait_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sample_size == 0 || self.sample_size > MAX_SAMPLE_SIZE {
            return Err(ValidationError::InvalidSampleSize {
                max: MAX_SAMPLE_SIZE,
                actual: self.sample_size,
            });
        }
        if self.interest_window == 0 {
            return Err(ValidationError::MustBePositive("exploration.interest_window"));
        }
        if self.language.trim().is_empty() {
            return Err(ValidationError::MissingRequired("EXPLORATION__LANGUAGE"));
        }
        Ok(())
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            interest_window: default_interest_window(),
            metadata_mode: MetadataMode::default(),
            confirm_wait_secs: default_confirm_wait(),
            session_ttl_secs: default_session_ttl(),
            language: default_language(),
        }
    }
}

fn default_sample_size() -> usize {
    3
}

fn default_interest_window() -> usize {
    10
}

fn default_confirm_wait() -> u64 {
    20
}

fn default_session_ttl() -> u64 {
    3600
}

fn default_language() -> String {
    "English".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exploration_defaults() {
        let config = ExplorationConfig::default();
        assert_eq!(config.sample_size, 3);
        assert_eq!(config.interest_window, 10);
        assert_eq!(config.metadata_mode, MetadataMode::Background);
        assert_eq!(config.confirm_wait(), Duration::from_secs(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sample_size_bounds() {
        for bad in [0, 4] {
            let config = ExplorationConfig {
                sample_size: bad,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ValidationError::InvalidSampleSize { .. })
            ));
        }
    }

    #[test]
    fn test_metadata_mode_parses_lowercase() {
        let mode: MetadataMode = serde_json::from_str("\"eager\"").unwrap();
        assert_eq!(mode, MetadataMode::Eager);
    }
}
