//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Stable identifier of an account.
///
/// Matches the authenticated identity of the account owner, so the same
/// type is used for both the requester and the account being acted upon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new AccountId.
    ///
    /// The id ends up as a path segment in object keys and identity
    /// provider URLs, so path separators, control characters and the
    /// relative segments `.` and `..` are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("account_id"));
        }
        if id.contains(|c: char| c == '/' || c == '\\') {
            return Err(ValidationError::invalid_format(
                "account_id",
                "must not contain path separators",
            ));
        }
        if id.chars().any(char::is_control) {
            return Err(ValidationError::invalid_format(
                "account_id",
                "must not contain control characters",
            ));
        }
        if id == "." || id == ".." {
            return Err(ValidationError::invalid_format(
                "account_id",
                "must not be a relative path segment",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}
