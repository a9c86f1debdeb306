//! SchedulerGateway port - Interface for the one-shot job scheduler.
//!
//! The scheduler owns named, grouped, single-fire timers. The uniqueness of
//! `(group, name)` is the only synchronization primitive between concurrent
//! deletion requests, so adapters MUST enforce it atomically and report a
//! duplicate as [`SchedulerError::Conflict`].
//!
//! ## Idempotency Signals
//!
//! - `Conflict` on create: a schedule with that name already exists
//! - `NotFound` on delete: the schedule already fired or was removed
//!
//! Neither is a failure from the lifecycle's point of view; callers
//! normalize both to success.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::account::{DeletionSchedule, ScheduleHandle, ScheduleName};
use crate::domain::foundation::Timestamp;

/// Errors returned by scheduler adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("Schedule {group}/{name} already exists")]
    Conflict { group: String, name: ScheduleName },

    #[error("Schedule {group}/{name} not found")]
    NotFound { group: String, name: ScheduleName },

    #[error("Scheduler backend error: {0}")]
    Backend(String),
}

impl SchedulerError {
    pub fn backend(message: impl Into<String>) -> Self {
        SchedulerError::Backend(message.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SchedulerError::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SchedulerError::NotFound { .. })
    }
}

/// Port for creating and removing one-shot schedules.
#[async_trait]
pub trait SchedulerGateway: Send + Sync {
    /// Create a single-fire schedule.
    ///
    /// # Errors
    ///
    /// - `Conflict` if `(schedule.group, schedule.name)` already exists
    /// - `Backend` for any other failure
    async fn create_one_shot(
        &self,
        schedule: &DeletionSchedule,
    ) -> Result<ScheduleHandle, SchedulerError>;

    /// Delete a schedule.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such schedule exists
    /// - `Backend` for any other failure
    async fn delete(&self, group: &str, name: &ScheduleName) -> Result<(), SchedulerError>;

    /// Look up a live schedule.
    async fn get(
        &self,
        group: &str,
        name: &ScheduleName,
    ) -> Result<Option<DeletionSchedule>, SchedulerError>;
}

/// Port exposing fired schedules to an in-process dispatcher.
///
/// Stands in for the push delivery an external scheduler performs. A
/// schedule stays due until it is completed, which is what gives the
/// dispatcher at-least-once delivery.
#[async_trait]
pub trait ScheduleFeed: Send + Sync {
    /// Schedules for `target` whose fire time is at or before `now`,
    /// oldest first.
    ///
    /// Filtering by target happens here so that due schedules of other
    /// workers never occupy this worker's batch.
    async fn due(
        &self,
        now: Timestamp,
        target: &str,
        limit: u32,
    ) -> Result<Vec<DeletionSchedule>, SchedulerError>;

    /// Remove a schedule after its target ran successfully.
    ///
    /// Completing an absent schedule is not an error.
    async fn complete(&self, group: &str, name: &ScheduleName) -> Result<(), SchedulerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that traits are object-safe
    #[allow(dead_code)]
    fn assert_gateway_object_safe(_: &dyn SchedulerGateway) {}

    #[allow(dead_code)]
    fn assert_feed_object_safe(_: &dyn ScheduleFeed) {}

    #[test]
    fn conflict_and_not_found_are_distinguishable() {
        let name = ScheduleName::from_string("delete-account-u1");
        let conflict = SchedulerError::Conflict {
            group: "g".to_string(),
            name: name.clone(),
        };
        let missing = SchedulerError::NotFound {
            group: "g".to_string(),
            name,
        };

        assert!(conflict.is_conflict());
        assert!(!conflict.is_not_found());
        assert!(missing.is_not_found());
        assert!(!SchedulerError::backend("timeout").is_conflict());
    }

    #[test]
    fn error_messages_name_the_schedule() {
        let err = SchedulerError::Conflict {
            group: "account-deletion".to_string(),
            name: ScheduleName::from_string("delete-account-u1"),
        };
        assert_eq!(
            err.to_string(),
            "Schedule account-deletion/delete-account-u1 already exists"
        );
    }
}
