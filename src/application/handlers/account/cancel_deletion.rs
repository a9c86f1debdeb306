//! CancelDeletionHandler - Removes a pending deletion during the grace
//! period.

use std::sync::Arc;

use crate::domain::account::{DeletionState, ScheduleName};
use crate::domain::foundation::{ensure_self_service, AccountId};
use crate::ports::{AccountStore, AccountStoreError, SchedulerError, SchedulerGateway};

use super::errors::DeletionError;
use super::settings::LifecycleSettings;

/// Command to cancel a pending deletion.
#[derive(Debug, Clone)]
pub struct CancelDeletionCommand {
    pub requester_id: AccountId,
    pub account_id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelDeletionOutcome {
    /// The schedule is gone and the marker cleared.
    Cancelled,
    /// Nothing was pending.
    NotPending,
}

/// Handler for deletion cancellations.
pub struct CancelDeletionHandler {
    accounts: Arc<dyn AccountStore>,
    scheduler: Arc<dyn SchedulerGateway>,
    settings: LifecycleSettings,
}

impl CancelDeletionHandler {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        scheduler: Arc<dyn SchedulerGateway>,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            accounts,
            scheduler,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelDeletionCommand,
    ) -> Result<CancelDeletionOutcome, DeletionError> {
        // 1. Self-service only
        let auth = ensure_self_service("cancel_deletion", &cmd.requester_id, &cmd.account_id);
        if !auth.is_granted() {
            return Err(DeletionError::Forbidden);
        }

        // 2. Resolve which schedule to remove
        let account = match self.accounts.get(&cmd.account_id).await {
            Ok(account) => account,
            Err(AccountStoreError::NotFound(_)) => {
                tracing::warn!(account_id = %cmd.account_id, "Cancel requested for missing account");
                return Ok(CancelDeletionOutcome::NotPending);
            }
            Err(e) => return Err(e.into()),
        };

        let fallback = || ScheduleName::for_account(&cmd.account_id);
        let name = match account.deletion_state() {
            DeletionState::Active => {
                tracing::debug!(account_id = %cmd.account_id, "No pending deletion to cancel");
                return Ok(CancelDeletionOutcome::NotPending);
            }
            DeletionState::Pending(pending) => {
                pending.handle.schedule_name().unwrap_or_else(fallback)
            }
            DeletionState::Drifted { fire_at, handle } => {
                tracing::warn!(
                    account_id = %cmd.account_id,
                    has_fire_at = fire_at.is_some(),
                    has_handle = handle.is_some(),
                    "Cancelling drifted deletion marker"
                );
                handle
                    .and_then(|h| h.schedule_name())
                    .unwrap_or_else(fallback)
            }
        };

        // 3. Remove the schedule; already-gone is fine
        match self
            .scheduler
            .delete(&self.settings.schedule_group, &name)
            .await
        {
            Ok(()) => {}
            Err(SchedulerError::NotFound { .. }) => {
                tracing::debug!(account_id = %cmd.account_id, schedule = %name, "Schedule already absent");
            }
            Err(e) => {
                tracing::error!(account_id = %cmd.account_id, error = %e, "Failed to delete deletion schedule");
                return Err(e.into());
            }
        }

        // 4. Clear both marker fields
        self.accounts.clear_pending_deletion(&cmd.account_id).await?;

        tracing::info!(account_id = %cmd.account_id, "Account deletion cancelled");
        Ok(CancelDeletionOutcome::Cancelled)
    }
}
