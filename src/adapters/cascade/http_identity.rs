//! HTTP identity provider adapter.
//!
//! Deletes users through the provider's management API:
//!
//! ```text
//! DELETE {base_url}/v2/users/{user_id}
//! Authorization: Bearer {api_token}
//! ```
//!
//! The user id is appended as a single percent-encoded path segment, so
//! ids containing `?`, `#` or `%` address exactly that user.
//!
//! A 404 means the user is already gone and counts as success.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::AccountId;
use crate::ports::{CascadeTargetError, IdentityProvider};

const TARGET: &str = "identity_provider";

/// Connection settings for the identity provider.
#[derive(Debug, Clone)]
pub struct HttpIdentityConfig {
    /// Management API base URL (e.g., "https://auth.example.com")
    pub base_url: String,

    /// Service account token for the management API.
    pub api_token: SecretString,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpIdentityConfig {
    pub fn new(base_url: impl Into<String>, api_token: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            api_token,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn user_url(&self, user_id: &AccountId) -> Result<Url, CascadeTargetError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            CascadeTargetError::new(TARGET, format!("Invalid base URL: {}", e))
        })?;
        url.path_segments_mut()
            .map_err(|_| CascadeTargetError::new(TARGET, "Base URL cannot have a path"))?
            .pop_if_empty()
            .extend(["v2", "users", user_id.as_str()]);
        Ok(url)
    }
}

/// Identity provider reached over HTTP.
pub struct HttpIdentityProvider {
    config: HttpIdentityConfig,
    http_client: Client,
}

impl HttpIdentityProvider {
    pub fn new(config: HttpIdentityConfig) -> Result<Self, CascadeTargetError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CascadeTargetError::new(TARGET, format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

/// Maps a response status to the cascade outcome.
fn interpret_status(status: StatusCode) -> Result<(), CascadeTargetError> {
    if status.is_success() || status == StatusCode::NOT_FOUND {
        return Ok(());
    }
    Err(CascadeTargetError::new(
        TARGET,
        format!("Unexpected status {}", status),
    ))
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn delete_user(&self, user_id: &AccountId) -> Result<(), CascadeTargetError> {
        let url = self.config.user_url(user_id)?;

        let response = self
            .http_client
            .delete(url)
            .bearer_auth(self.config.api_token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user_id, "Identity provider request failed");
                CascadeTargetError::new(TARGET, format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(user_id = %user_id, "Identity provider user already absent");
        }
        interpret_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> HttpIdentityConfig {
        HttpIdentityConfig::new(base_url, SecretString::new("token".to_string()))
    }

    fn url_for(base_url: &str, id: &str) -> Url {
        config(base_url)
            .user_url(&AccountId::new(id).unwrap())
            .unwrap()
    }

    #[test]
    fn user_url_joins_base_and_id() {
        assert_eq!(
            url_for("https://auth.example.com/", "u1").as_str(),
            "https://auth.example.com/v2/users/u1"
        );
        assert_eq!(
            url_for("https://auth.example.com", "u1").as_str(),
            "https://auth.example.com/v2/users/u1"
        );
    }

    #[test]
    fn user_url_keeps_base_path() {
        assert_eq!(
            url_for("https://example.com/identity/", "u1").as_str(),
            "https://example.com/identity/v2/users/u1"
        );
    }

    #[test]
    fn user_url_escapes_url_metacharacters() {
        let query = url_for("https://auth.example.com", "victim?x=1");
        assert_eq!(query.as_str(), "https://auth.example.com/v2/users/victim%3Fx=1");
        assert_eq!(query.query(), None);

        let fragment = url_for("https://auth.example.com", "victim#frag");
        assert_eq!(fragment.as_str(), "https://auth.example.com/v2/users/victim%23frag");
        assert_eq!(fragment.fragment(), None);

        let percent = url_for("https://auth.example.com", "100%41");
        assert_eq!(percent.as_str(), "https://auth.example.com/v2/users/100%2541");
    }

    #[test]
    fn escaped_id_is_the_last_path_segment() {
        let url = url_for("https://auth.example.com", "victim?x=1#y");
        let segments: Vec<_> = url.path_segments().unwrap().collect();
        assert_eq!(segments, vec!["v2", "users", "victim%3Fx=1%23y"]);
    }

    #[test]
    fn invalid_base_url_fails_request() {
        let err = config("not a url")
            .user_url(&AccountId::new("u1").unwrap())
            .unwrap_err();
        assert_eq!(err.target, "identity_provider");
    }

    #[test]
    fn success_and_not_found_are_ok() {
        assert!(interpret_status(StatusCode::OK).is_ok());
        assert!(interpret_status(StatusCode::NO_CONTENT).is_ok());
        assert!(interpret_status(StatusCode::NOT_FOUND).is_ok());
    }

    #[test]
    fn server_errors_fail() {
        let err = interpret_status(StatusCode::SERVICE_UNAVAILABLE).unwrap_err();
        assert_eq!(err.target, "identity_provider");
        assert!(interpret_status(StatusCode::UNAUTHORIZED).is_err());
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        assert_eq!(config("http://x").timeout, Duration::from_secs(10));
    }

    #[test]
    fn builds_client() {
        let provider =
            HttpIdentityProvider::new(config("http://x").with_timeout(Duration::from_secs(2)));
        assert!(provider.is_ok());
    }
}
