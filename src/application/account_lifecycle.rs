//! AccountLifecycleService - Entry points for authenticated callers.
//!
//! Wraps the request and cancel handlers behind two calls that return no
//! body on success. Handler outcomes are logged, not exposed.

use std::sync::Arc;

use crate::domain::foundation::AccountId;
use crate::ports::{AccountStore, Clock, SchedulerGateway};

use super::handlers::account::{
    CancelDeletionCommand, CancelDeletionHandler, DeletionError, LifecycleSettings,
    RequestDeletionCommand, RequestDeletionHandler,
};

/// Self-service account deletion.
pub struct AccountLifecycleService {
    request: RequestDeletionHandler,
    cancel: CancelDeletionHandler,
}

impl AccountLifecycleService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        scheduler: Arc<dyn SchedulerGateway>,
        clock: Arc<dyn Clock>,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            request: RequestDeletionHandler::new(
                accounts.clone(),
                scheduler.clone(),
                clock,
                settings.clone(),
            ),
            cancel: CancelDeletionHandler::new(accounts, scheduler, settings),
        }
    }

    /// Schedule `account_id` for deletion after the grace period.
    pub async fn request_deletion(
        &self,
        requester_id: &AccountId,
        account_id: &AccountId,
    ) -> Result<(), DeletionError> {
        let outcome = self
            .request
            .handle(RequestDeletionCommand {
                requester_id: requester_id.clone(),
                account_id: account_id.clone(),
            })
            .await?;
        tracing::debug!(account_id = %account_id, outcome = ?outcome, "Deletion request handled");
        Ok(())
    }

    /// Cancel a pending deletion of `account_id`.
    pub async fn cancel_deletion(
        &self,
        requester_id: &AccountId,
        account_id: &AccountId,
    ) -> Result<(), DeletionError> {
        let outcome = self
            .cancel
            .handle(CancelDeletionCommand {
                requester_id: requester_id.clone(),
                account_id: account_id.clone(),
            })
            .await?;
        tracing::debug!(account_id = %account_id, outcome = ?outcome, "Deletion cancel handled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedClock, InMemoryAccountStore, InMemoryScheduler};
    use crate::domain::account::Account;
    use crate::domain::foundation::Timestamp;

    #[tokio::test]
    async fn request_then_cancel_restores_active_account() {
        let accounts = Arc::new(InMemoryAccountStore::new());
        let scheduler = Arc::new(InMemoryScheduler::new());
        let u1 = AccountId::new("u1").unwrap();
        accounts.insert(Account::new(u1.clone())).await;
        let service = AccountLifecycleService::new(
            accounts.clone(),
            scheduler.clone(),
            Arc::new(FixedClock::new(Timestamp::now())),
            LifecycleSettings::default(),
        );

        service.request_deletion(&u1, &u1).await.unwrap();
        assert_eq!(scheduler.schedule_count().await, 1);

        service.cancel_deletion(&u1, &u1).await.unwrap();
        assert_eq!(scheduler.schedule_count().await, 0);
        assert_eq!(accounts.account(&u1).await, Some(Account::new(u1)));
    }

    #[tokio::test]
    async fn foreign_requester_is_forbidden_on_both_paths() {
        let service = AccountLifecycleService::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryScheduler::new()),
            Arc::new(FixedClock::new(Timestamp::now())),
            LifecycleSettings::default(),
        );
        let owner = AccountId::new("u1").unwrap();
        let other = AccountId::new("u2").unwrap();

        assert_eq!(
            service.request_deletion(&other, &owner).await,
            Err(DeletionError::Forbidden)
        );
        assert_eq!(
            service.cancel_deletion(&other, &owner).await,
            Err(DeletionError::Forbidden)
        );
    }
}
