//! RequestDeletionHandler - Schedules an account for deletion after the
//! grace period.
//!
//! The scheduler's `(group, name)` uniqueness is the only guard against
//! concurrent requests; nothing here takes a lock. The loser of a race
//! sees `Conflict` and treats it as success.

use std::sync::Arc;

use crate::domain::account::{DeletionSchedule, ScheduleName};
use crate::domain::foundation::{ensure_self_service, AccountId, Timestamp};
use crate::ports::{AccountStore, AccountStoreError, Clock, SchedulerError, SchedulerGateway};

use super::errors::DeletionError;
use super::settings::LifecycleSettings;

/// Command to request deletion of an account.
#[derive(Debug, Clone)]
pub struct RequestDeletionCommand {
    /// Authenticated caller.
    pub requester_id: AccountId,
    /// Account to delete.
    pub account_id: AccountId,
}

/// What a successful request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDeletionOutcome {
    /// A new schedule was created and the marker persisted.
    Scheduled { fire_at: Timestamp },
    /// The account already carried a consistent marker.
    AlreadyPending,
    /// Another request owns the schedule. `repaired` is true when the
    /// marker was missing and was rebuilt from the existing schedule.
    ConflictAdopted { repaired: bool },
    /// No such account; nothing to do.
    AccountMissing,
}

/// Handler for deletion requests.
pub struct RequestDeletionHandler {
    accounts: Arc<dyn AccountStore>,
    scheduler: Arc<dyn SchedulerGateway>,
    clock: Arc<dyn Clock>,
    settings: LifecycleSettings,
}

impl RequestDeletionHandler {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        scheduler: Arc<dyn SchedulerGateway>,
        clock: Arc<dyn Clock>,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            accounts,
            scheduler,
            clock,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: RequestDeletionCommand,
    ) -> Result<RequestDeletionOutcome, DeletionError> {
        // 1. Self-service only
        let auth = ensure_self_service("request_deletion", &cmd.requester_id, &cmd.account_id);
        if !auth.is_granted() {
            return Err(DeletionError::Forbidden);
        }

        // 2. Load current marker
        let account = match self.accounts.get(&cmd.account_id).await {
            Ok(account) => account,
            Err(AccountStoreError::NotFound(_)) => {
                tracing::warn!(account_id = %cmd.account_id, "Deletion requested for missing account");
                return Ok(RequestDeletionOutcome::AccountMissing);
            }
            Err(e) => return Err(e.into()),
        };

        if account.deletion_state().is_pending() {
            tracing::debug!(account_id = %cmd.account_id, "Deletion already pending");
            return Ok(RequestDeletionOutcome::AlreadyPending);
        }

        // 3. Create the one-shot schedule
        let fire_at = self.clock.now().add(self.settings.grace_period);
        let schedule = DeletionSchedule::for_account(
            &cmd.account_id,
            &self.settings.schedule_group,
            &self.settings.worker_target,
            fire_at,
        );

        let handle = match self.scheduler.create_one_shot(&schedule).await {
            Ok(handle) => handle,
            Err(SchedulerError::Conflict { .. }) => {
                tracing::info!(
                    account_id = %cmd.account_id,
                    schedule = %schedule.name,
                    "Deletion schedule already exists"
                );
                return Ok(self.adopt_existing(&cmd.account_id, &schedule.name).await);
            }
            Err(e) => {
                tracing::error!(account_id = %cmd.account_id, error = %e, "Failed to create deletion schedule");
                return Err(e.into());
            }
        };

        // 4. Persist both marker fields together
        match self
            .accounts
            .set_pending_deletion(&cmd.account_id, schedule.fire_at, &handle)
            .await
        {
            Ok(()) => {}
            Err(AccountStoreError::NotFound(_)) => {
                tracing::warn!(account_id = %cmd.account_id, "Account vanished before marker write");
                self.discard_orphan(&cmd.account_id, &schedule.name).await;
                return Ok(RequestDeletionOutcome::AccountMissing);
            }
            Err(e) => {
                tracing::error!(
                    account_id = %cmd.account_id,
                    schedule = %schedule.name,
                    error = %e,
                    "Schedule created but marker write failed"
                );
                return Err(e.into());
            }
        }

        tracing::info!(
            account_id = %cmd.account_id,
            fire_at = %schedule.fire_at,
            handle = %handle,
            "Account deletion scheduled"
        );

        Ok(RequestDeletionOutcome::Scheduled {
            fire_at: schedule.fire_at,
        })
    }

    /// Best-effort removal of a schedule whose account no longer exists.
    async fn discard_orphan(&self, account_id: &AccountId, name: &ScheduleName) {
        match self
            .scheduler
            .delete(&self.settings.schedule_group, name)
            .await
        {
            Ok(()) => {
                tracing::info!(account_id = %account_id, schedule = %name, "Removed orphaned deletion schedule");
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                tracing::warn!(account_id = %account_id, error = %e, "Could not remove orphaned deletion schedule");
            }
        }
    }

    /// Rebuilds a missing marker from the schedule that won the race.
    ///
    /// Best effort: failures are logged and the request still succeeds.
    async fn adopt_existing(
        &self,
        account_id: &AccountId,
        name: &ScheduleName,
    ) -> RequestDeletionOutcome {
        let not_repaired = RequestDeletionOutcome::ConflictAdopted { repaired: false };

        match self.accounts.get(account_id).await {
            Ok(account) if account.deletion_state().is_pending() => return not_repaired,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(account_id = %account_id, error = %e, "Could not re-read account after conflict");
                return not_repaired;
            }
        }

        let existing = match self.scheduler.get(&self.settings.schedule_group, name).await {
            Ok(Some(existing)) => existing,
            Ok(None) => return not_repaired,
            Err(e) => {
                tracing::warn!(account_id = %account_id, error = %e, "Could not load existing schedule");
                return not_repaired;
            }
        };

        match self
            .accounts
            .set_pending_deletion(account_id, existing.fire_at, &existing.handle())
            .await
        {
            Ok(()) => {
                tracing::warn!(
                    account_id = %account_id,
                    fire_at = %existing.fire_at,
                    "Repaired missing deletion marker from existing schedule"
                );
                RequestDeletionOutcome::ConflictAdopted { repaired: true }
            }
            Err(e) => {
                tracing::warn!(account_id = %account_id, error = %e, "Marker repair failed");
                not_repaired
            }
        }
    }
}
