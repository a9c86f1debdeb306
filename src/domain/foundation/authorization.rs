//! Authorization support types.
//!
//! Every account lifecycle entry point is self-service: the authenticated
//! requester may only act on their own account. The guard is an explicit
//! function called first in each handler, returning a typed result rather
//! than relying on an implicit wrapper.

use super::AccountId;

/// Result of an authorization check.
///
/// Contains both the decision and context for logging/auditing.
#[derive(Debug, Clone)]
pub struct AuthorizationResult {
    /// Whether access was granted.
    pub granted: bool,

    /// The action being performed (e.g., "request_deletion").
    pub action: &'static str,

    /// The account being acted upon.
    pub account_id: String,

    /// The user who requested access.
    pub requester_id: String,
}

impl AuthorizationResult {
    /// Creates a successful authorization result.
    pub fn granted(
        action: &'static str,
        account_id: impl Into<String>,
        requester_id: impl Into<String>,
    ) -> Self {
        Self {
            granted: true,
            action,
            account_id: account_id.into(),
            requester_id: requester_id.into(),
        }
    }

    /// Creates a denied authorization result.
    pub fn denied(
        action: &'static str,
        account_id: impl Into<String>,
        requester_id: impl Into<String>,
    ) -> Self {
        Self {
            granted: false,
            action,
            account_id: account_id.into(),
            requester_id: requester_id.into(),
        }
    }

    /// Returns true if access was granted.
    pub fn is_granted(&self) -> bool {
        self.granted
    }
}

/// Checks that the requester is acting on their own account.
///
/// Denials are logged with full context here; callers surface only a bare
/// `Forbidden` so nothing about the target account leaks.
pub fn ensure_self_service(
    action: &'static str,
    requester_id: &AccountId,
    account_id: &AccountId,
) -> AuthorizationResult {
    if requester_id == account_id {
        AuthorizationResult::granted(action, account_id.as_str(), requester_id.as_str())
    } else {
        tracing::warn!(
            action,
            requester_id = %requester_id,
            account_id = %account_id,
            "Self-service check denied"
        );
        AuthorizationResult::denied(action, account_id.as_str(), requester_id.as_str())
    }
}
