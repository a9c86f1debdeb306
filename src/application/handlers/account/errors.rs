//! Errors surfaced by the account lifecycle handlers and worker.

use std::fmt;

use thiserror::Error;

use crate::domain::account::TriggerDecodeError;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::{AccountStoreError, SchedulerError};

/// One independent target purged by the deletion worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeStep {
    IdentityProvider,
    PrimaryStore,
    ObjectStore,
}

impl CascadeStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeStep::IdentityProvider => "identity_provider",
            CascadeStep::PrimaryStore => "primary_store",
            CascadeStep::ObjectStore => "object_store",
        }
    }
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure of a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeletionError {
    /// The requester is not the account owner.
    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Store(#[from] AccountStoreError),

    /// At least one cascade target failed; the trigger must be redelivered.
    #[error("Cascade incomplete, failed steps: {}", format_steps(.failed_steps))]
    CascadeIncomplete { failed_steps: Vec<CascadeStep> },

    /// Every failed cascade target rejected the request outright;
    /// redelivery cannot help.
    #[error("Cascade rejected, failed steps: {}", format_steps(.failed_steps))]
    CascadeRejected { failed_steps: Vec<CascadeStep> },

    #[error(transparent)]
    InvalidTrigger(#[from] TriggerDecodeError),

    #[error(transparent)]
    InvalidAccountId(#[from] ValidationError),
}

fn format_steps(steps: &[CascadeStep]) -> String {
    steps
        .iter()
        .map(CascadeStep::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl DeletionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DeletionError::Forbidden => ErrorCode::Forbidden,
            DeletionError::Scheduler(SchedulerError::Conflict { .. }) => ErrorCode::ScheduleConflict,
            DeletionError::Scheduler(SchedulerError::NotFound { .. }) => ErrorCode::ScheduleNotFound,
            DeletionError::Scheduler(SchedulerError::Backend(_)) => ErrorCode::SchedulerError,
            DeletionError::Store(AccountStoreError::NotFound(_)) => ErrorCode::AccountNotFound,
            DeletionError::Store(AccountStoreError::Backend(_)) => ErrorCode::DatabaseError,
            DeletionError::CascadeIncomplete { .. } => ErrorCode::CascadeIncomplete,
            DeletionError::CascadeRejected { .. } => ErrorCode::CascadeRejected,
            DeletionError::InvalidTrigger(_) => ErrorCode::InvalidTrigger,
            DeletionError::InvalidAccountId(_) => ErrorCode::ValidationFailed,
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DeletionError::Scheduler(SchedulerError::Backend(_))
                | DeletionError::Store(AccountStoreError::Backend(_))
                | DeletionError::CascadeIncomplete { .. }
        )
    }
}

impl From<DeletionError> for DomainError {
    fn from(err: DeletionError) -> Self {
        let code = err.code();
        match err {
            DeletionError::CascadeIncomplete { ref failed_steps }
            | DeletionError::CascadeRejected { ref failed_steps } => {
                DomainError::new(code, err.to_string())
                    .with_detail("failed_steps", format_steps(failed_steps))
            }
            other => DomainError::new(code, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::ScheduleName;
    use crate::domain::foundation::AccountId;

    #[test]
    fn forbidden_maps_to_forbidden_code() {
        let err = DeletionError::Forbidden;
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert!(!err.is_retryable());
        assert_eq!(DomainError::from(err).message(), "Forbidden");
    }

    #[test]
    fn scheduler_errors_map_by_kind() {
        let conflict = DeletionError::from(SchedulerError::Conflict {
            group: "g".to_string(),
            name: ScheduleName::from_string("n"),
        });
        assert_eq!(conflict.code(), ErrorCode::ScheduleConflict);

        let backend = DeletionError::from(SchedulerError::backend("down"));
        assert_eq!(backend.code(), ErrorCode::SchedulerError);
        assert!(backend.is_retryable());
    }

    #[test]
    fn store_not_found_is_not_retryable() {
        let err = DeletionError::from(AccountStoreError::NotFound(AccountId::new("u1").unwrap()));
        assert_eq!(err.code(), ErrorCode::AccountNotFound);
        assert!(!err.is_retryable());
    }

    #[test]
    fn cascade_incomplete_lists_failed_steps() {
        let err = DeletionError::CascadeIncomplete {
            failed_steps: vec![CascadeStep::IdentityProvider, CascadeStep::ObjectStore],
        };
        assert!(err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Cascade incomplete, failed steps: identity_provider, object_store"
        );

        let domain = DomainError::from(err);
        assert_eq!(domain.code, ErrorCode::CascadeIncomplete);
        assert_eq!(
            domain.details.get("failed_steps").map(String::as_str),
            Some("identity_provider, object_store")
        );
    }

    #[test]
    fn cascade_rejected_is_not_retryable() {
        let err = DeletionError::CascadeRejected {
            failed_steps: vec![CascadeStep::ObjectStore],
        };
        assert!(!err.is_retryable());
        assert_eq!(err.code(), ErrorCode::CascadeRejected);
        assert_eq!(
            DomainError::from(err).details.get("failed_steps").map(String::as_str),
            Some("object_store")
        );
    }

    #[test]
    fn invalid_trigger_maps_to_invalid_trigger_code() {
        let err = DeletionError::from(TriggerDecodeError::MalformedJson("eof".to_string()));
        assert_eq!(err.code(), ErrorCode::InvalidTrigger);
        assert!(!err.is_retryable());
    }
}
