//! Cascade target ports - the independent sinks purged when a deletion fires.
//!
//! Each target is called at least once per fired deletion and possibly
//! more often (redelivery, overlapping attempts). Implementations MUST
//! treat an already-absent resource as success so a repeated call never
//! fails just because an earlier attempt got there first.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::AccountId;

/// Failure of a cascade target.
///
/// Transient failures are redelivered. A permanent failure means the
/// target rejected the request itself and the same call can never succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{target} failed: {message}")]
pub struct CascadeTargetError {
    pub target: &'static str,
    pub message: String,
    pub permanent: bool,
}

impl CascadeTargetError {
    /// A transient failure, such as an outage or timeout.
    pub fn new(target: &'static str, message: impl Into<String>) -> Self {
        Self {
            target,
            message: message.into(),
            permanent: false,
        }
    }

    /// A failure that retrying cannot fix.
    pub fn permanent(target: &'static str, message: impl Into<String>) -> Self {
        Self {
            target,
            message: message.into(),
            permanent: true,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }
}

/// External identity provider holding the user's login.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Delete the user. An unknown user is success.
    async fn delete_user(&self, user_id: &AccountId) -> Result<(), CascadeTargetError>;
}

/// Primary data store holding the account record and owned data.
#[async_trait]
pub trait PrimaryStore: Send + Sync {
    /// Stamp a `deleted_at` tombstone, then remove owned data and the
    /// account record. The first tombstone stamp wins on repeats.
    async fn delete_account_and_related_data(
        &self,
        user_id: &AccountId,
    ) -> Result<(), CascadeTargetError>;
}

/// Object storage holding user media.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Delete an object. A missing object is success.
    async fn delete_object(&self, key: &str) -> Result<(), CascadeTargetError>;
}
