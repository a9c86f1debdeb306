//! Account record as seen by the deletion lifecycle.

use serde::{Deserialize, Serialize};

use super::ScheduleHandle;
use crate::domain::foundation::{AccountId, Timestamp};

/// A pending deletion: both halves of the paired marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDeletion {
    /// When the account will be purged.
    pub fire_at: Timestamp,
    /// Reference to the scheduled one-shot job.
    pub handle: ScheduleHandle,
}

/// Deletion state derived from the persisted marker fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionState {
    /// No deletion scheduled.
    Active,
    /// Both marker fields present.
    Pending(PendingDeletion),
    /// Exactly one marker field present (or an empty handle).
    ///
    /// Never written by this crate, but can be observed after a crash or
    /// manual edit. The surviving half is kept so cancel can still reach
    /// the remote schedule.
    Drifted {
        fire_at: Option<Timestamp>,
        handle: Option<ScheduleHandle>,
    },
}

impl DeletionState {
    /// Returns true if a consistent pending deletion exists.
    pub fn is_pending(&self) -> bool {
        matches!(self, DeletionState::Pending(_))
    }
}

/// Persisted account record, restricted to the fields this crate owns.
///
/// The marker fields are kept as raw options because storage may hold a
/// record that drifted out of the paired invariant; use
/// [`Account::deletion_state`] to classify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub pending_deletion_at: Option<Timestamp>,
    pub schedule_handle: Option<ScheduleHandle>,
}

impl Account {
    /// Creates an active account with no pending deletion.
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            pending_deletion_at: None,
            schedule_handle: None,
        }
    }

    /// Classifies the marker fields.
    pub fn deletion_state(&self) -> DeletionState {
        let handle = self
            .schedule_handle
            .clone()
            .filter(|h| !h.as_str().is_empty());

        match (self.pending_deletion_at, handle) {
            (None, None) if self.schedule_handle.is_none() => DeletionState::Active,
            (Some(fire_at), Some(handle)) => {
                DeletionState::Pending(PendingDeletion { fire_at, handle })
            }
            (fire_at, handle) => DeletionState::Drifted { fire_at, handle },
        }
    }

    /// Returns true if both marker fields are set or both are empty.
    pub fn marker_is_consistent(&self) -> bool {
        self.pending_deletion_at.is_some() == self.schedule_handle.is_some()
    }

    /// Sets both marker fields together.
    pub fn mark_pending(&mut self, fire_at: Timestamp, handle: ScheduleHandle) {
        self.pending_deletion_at = Some(fire_at);
        self.schedule_handle = Some(handle);
    }

    /// Clears both marker fields together.
    pub fn clear_pending(&mut self) {
        self.pending_deletion_at = None;
        self.schedule_handle = None;
    }
}
