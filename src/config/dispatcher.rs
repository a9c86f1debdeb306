//! Schedule dispatcher configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

impl DispatcherConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ValidationError::InvalidBatchSize);
        }
        Ok(())
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_batch_size() -> u32 {
    25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DispatcherConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.batch_size, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = DispatcherConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPollInterval));
    }

    #[test]
    fn batch_size_bounds() {
        for batch_size in [0, 1001] {
            let config = DispatcherConfig {
                batch_size,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidBatchSize));
        }
    }
}
