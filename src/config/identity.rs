//! Identity provider configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::HttpIdentityConfig;

/// Management API access for the identity provider
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Base URL (e.g., "https://auth.example.com")
    pub base_url: String,

    /// Service account token
    pub api_token: SecretString,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl IdentityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("IDENTITY__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidIdentityUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }

    pub fn http_config(&self) -> HttpIdentityConfig {
        HttpIdentityConfig::new(self.base_url.clone(), self.api_token.clone())
            .with_timeout(self.timeout())
    }
}

fn default_timeout_secs() -> u64 {
    10
}
