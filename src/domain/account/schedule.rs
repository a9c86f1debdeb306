//! One-shot deletion schedules.
//!
//! A schedule is identified by `(group, name)`. The name is derived
//! deterministically from the account id, which is what turns a duplicate
//! create into a detectable conflict instead of a second live schedule.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::SchedulerTrigger;
use crate::domain::foundation::{AccountId, Timestamp};

/// Prefix of every deletion schedule name.
pub const SCHEDULE_NAME_PREFIX: &str = "delete-account-";

/// Name of a deletion schedule, unique within its group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleName(String);

impl ScheduleName {
    /// Derives the schedule name for an account.
    pub fn for_account(account_id: &AccountId) -> Self {
        Self(format!("{}{}", SCHEDULE_NAME_PREFIX, account_id))
    }

    /// Wraps a name read back from a scheduler or handle.
    pub fn from_string(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to a created schedule, as returned by the scheduler.
///
/// Handles take the form `schedule/<group>/<name>`, optionally preceded by
/// a backend-specific resource prefix. Only the trailing name segment is
/// ever interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleHandle(String);

impl ScheduleHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Builds the canonical handle for a schedule.
    pub fn for_schedule(group: &str, name: &ScheduleName) -> Self {
        Self(format!("schedule/{}/{}", group, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the schedule name from the handle.
    ///
    /// Returns `None` when the handle has no `group/name` tail.
    pub fn schedule_name(&self) -> Option<ScheduleName> {
        let mut segments = self.0.rsplit('/');
        let name = segments.next().filter(|s| !s.is_empty())?;
        segments.next().filter(|s| !s.is_empty())?;
        Some(ScheduleName::from_string(name))
    }
}

impl fmt::Display for ScheduleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, grouped, one-shot timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionSchedule {
    pub name: ScheduleName,
    pub group: String,
    pub fire_at: Timestamp,
    /// Opaque reference to whatever the scheduler invokes on fire.
    pub target: String,
    /// Serialized trigger delivered to the target.
    pub payload: String,
}

impl DeletionSchedule {
    /// Builds the schedule that purges `account_id` at `fire_at`.
    pub fn for_account(
        account_id: &AccountId,
        group: impl Into<String>,
        target: impl Into<String>,
        fire_at: Timestamp,
    ) -> Self {
        Self {
            name: ScheduleName::for_account(account_id),
            group: group.into(),
            fire_at: fire_at.truncate_to_secs(),
            target: target.into(),
            payload: SchedulerTrigger::account_deletion(account_id.clone()).encode(),
        }
    }

    /// Canonical handle for this schedule.
    pub fn handle(&self) -> ScheduleHandle {
        ScheduleHandle::for_schedule(&self.group, &self.name)
    }

    /// Returns true when the schedule should have fired by `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        !self.fire_at.is_after(&now)
    }
}
