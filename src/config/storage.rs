//! Object storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::application::handlers::account::DEFAULT_AVATAR_PREFIX;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the local object store
    pub root: PathBuf,

    /// Key prefix under which avatars are stored
    #[serde(default = "default_avatar_prefix")]
    pub avatar_prefix: String,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.root.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__ROOT"));
        }
        let prefix = self.avatar_prefix.trim_matches('/');
        let invalid_segment = |s: &str| s.is_empty() || s == "." || s == "..";
        if prefix.is_empty() || prefix.split('/').any(invalid_segment) {
            return Err(ValidationError::InvalidAvatarPrefix);
        }
        Ok(())
    }
}

fn default_avatar_prefix() -> String {
    DEFAULT_AVATAR_PREFIX.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prefix: &str) -> StorageConfig {
        StorageConfig {
            root: PathBuf::from("/var/lib/accounts"),
            avatar_prefix: prefix.to_string(),
        }
    }

    #[test]
    fn default_prefix_is_valid() {
        assert!(config(&default_avatar_prefix()).validate().is_ok());
    }

    #[test]
    fn nested_prefix_is_valid() {
        assert!(config("media/avatars/").validate().is_ok());
    }

    #[test]
    fn traversal_prefix_is_rejected() {
        assert_eq!(
            config("../avatars").validate(),
            Err(ValidationError::InvalidAvatarPrefix)
        );
        assert_eq!(config("").validate(), Err(ValidationError::InvalidAvatarPrefix));
        assert_eq!(
            config("media/./avatars").validate(),
            Err(ValidationError::InvalidAvatarPrefix)
        );
    }
}
