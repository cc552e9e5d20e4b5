//! Tracker configuration.

use crate::{Result, StatsError};
use serde::{Deserialize, Serialize};

/// Configuration shared by `EpisodeStats` and `VecEpisodeStats`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeStatsConfig {
    /// Capacity of the return, length and time history queues
    pub deque_size: usize,
}

impl Default for EpisodeStatsConfig {
    fn default() -> Self {
        Self { deque_size: 100 }
    }
}

impl EpisodeStatsConfig {
    /// Set the history queue capacity
    pub fn with_deque_size(mut self, deque_size: usize) -> Self {
        self.deque_size = deque_size;
        self
    }

    /// Reject configurations the trackers cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.deque_size == 0 {
            return Err(StatsError::InvalidConfig(
                "deque_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deque_size() {
        let config = EpisodeStatsConfig::default();
        assert_eq!(config.deque_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_deque_size_rejected() {
        let config = EpisodeStatsConfig::default().with_deque_size(0);
        assert!(matches!(
            config.validate(),
            Err(StatsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EpisodeStatsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EpisodeStatsConfig::default());

        let config: EpisodeStatsConfig = serde_json::from_str(r#"{"deque_size": 5}"#).unwrap();
        assert_eq!(config.deque_size, 5);
    }
}
