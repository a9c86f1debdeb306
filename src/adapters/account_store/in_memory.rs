//! In-memory account store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, ScheduleHandle};
use crate::domain::foundation::{AccountId, Timestamp};
use crate::ports::{AccountStore, AccountStoreError};

/// In-memory storage for account records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record as-is, including drifted markers.
    pub async fn insert(&self, account: Account) {
        self.accounts.write().await.insert(account.id.clone(), account);
    }

    /// Returns a snapshot of a record, if present.
    pub async fn account(&self, account_id: &AccountId) -> Option<Account> {
        self.accounts.read().await.get(account_id).cloned()
    }

    /// Returns a snapshot of every record.
    pub async fn accounts(&self) -> Vec<Account> {
        self.accounts.read().await.values().cloned().collect()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), AccountStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AccountStoreError::backend("Simulated write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get(&self, account_id: &AccountId) -> Result<Account, AccountStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AccountStoreError::backend("Simulated read failure"));
        }
        self.account(account_id)
            .await
            .ok_or_else(|| AccountStoreError::NotFound(account_id.clone()))
    }

    async fn set_pending_deletion(
        &self,
        account_id: &AccountId,
        fire_at: Timestamp,
        handle: &ScheduleHandle,
    ) -> Result<(), AccountStoreError> {
        self.check_writable()?;
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(account_id)
            .ok_or_else(|| AccountStoreError::NotFound(account_id.clone()))?;
        account.mark_pending(fire_at, handle.clone());
        Ok(())
    }

    async fn clear_pending_deletion(
        &self,
        account_id: &AccountId,
    ) -> Result<(), AccountStoreError> {
        self.check_writable()?;
        if let Some(account) = self.accounts.write().await.get_mut(account_id) {
            account.clear_pending();
        }
        Ok(())
    }

    async fn delete_account_record(
        &self,
        account_id: &AccountId,
    ) -> Result<(), AccountStoreError> {
        self.check_writable()?;
        self.accounts.write().await.remove(account_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> AccountId {
        AccountId::new("u1").unwrap()
    }

    fn handle() -> ScheduleHandle {
        ScheduleHandle::new("schedule/account-deletion/delete-account-u1")
    }

    #[tokio::test]
    async fn get_missing_returns_not_found() {
        let store = InMemoryAccountStore::new();
        let result = store.get(&id()).await;
        assert!(matches!(result, Err(AccountStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn set_and_clear_write_both_fields() {
        let store = InMemoryAccountStore::new();
        store.insert(Account::new(id())).await;
        let fire_at = Timestamp::from_unix_secs(5_000).unwrap();

        store.set_pending_deletion(&id(), fire_at, &handle()).await.unwrap();
        let pending = store.get(&id()).await.unwrap();
        assert_eq!(pending.pending_deletion_at, Some(fire_at));
        assert_eq!(pending.schedule_handle, Some(handle()));

        store.clear_pending_deletion(&id()).await.unwrap();
        let cleared = store.get(&id()).await.unwrap();
        assert!(cleared.pending_deletion_at.is_none());
        assert!(cleared.schedule_handle.is_none());
    }

    #[tokio::test]
    async fn set_pending_on_missing_account_fails() {
        let store = InMemoryAccountStore::new();
        let result = store
            .set_pending_deletion(&id(), Timestamp::now(), &handle())
            .await;
        assert!(matches!(result, Err(AccountStoreError::NotFound(_))));
        assert!(store.account(&id()).await.is_none());
    }

    #[tokio::test]
    async fn delete_record_is_idempotent() {
        let store = InMemoryAccountStore::new();
        store.insert(Account::new(id())).await;

        store.delete_account_record(&id()).await.unwrap();
        store.delete_account_record(&id()).await.unwrap();

        assert!(store.account(&id()).await.is_none());
    }

    #[tokio::test]
    async fn simulated_write_failure_leaves_record_untouched() {
        let store = InMemoryAccountStore::new();
        store.insert(Account::new(id())).await;
        store.fail_writes(true);

        let result = store
            .set_pending_deletion(&id(), Timestamp::now(), &handle())
            .await;

        assert!(matches!(result, Err(AccountStoreError::Backend(_))));
        assert_eq!(store.account(&id()).await, Some(Account::new(id())));
    }
}
