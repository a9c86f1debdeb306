//! AccountStore port for the persisted deletion marker.
//!
//! All writes are single-record and unconditional. The paired-fields
//! invariant is kept by always writing or clearing both marker fields in
//! the same call; no method sets one alone.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::account::{Account, ScheduleHandle};
use crate::domain::foundation::{AccountId, Timestamp};

/// Errors returned by account store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountStoreError {
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    #[error("Account store error: {0}")]
    Backend(String),
}

impl AccountStoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        AccountStoreError::Backend(message.into())
    }
}

/// Repository for the account deletion marker.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Load an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record exists.
    async fn get(&self, account_id: &AccountId) -> Result<Account, AccountStoreError>;

    /// Set both `pending_deletion_at` and `schedule_handle`.
    async fn set_pending_deletion(
        &self,
        account_id: &AccountId,
        fire_at: Timestamp,
        handle: &ScheduleHandle,
    ) -> Result<(), AccountStoreError>;

    /// Clear both marker fields.
    async fn clear_pending_deletion(&self, account_id: &AccountId)
        -> Result<(), AccountStoreError>;

    /// Remove the account record. Removing an absent record succeeds.
    async fn delete_account_record(&self, account_id: &AccountId)
        -> Result<(), AccountStoreError>;
}
