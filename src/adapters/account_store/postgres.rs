//! PostgreSQL implementation of AccountStore.
//!
//! The `accounts` table carries a CHECK constraint that the two marker
//! columns are either both NULL or both set, so a partial write is
//! rejected by the database as well as avoided by the queries below.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::account::{Account, ScheduleHandle};
use crate::domain::foundation::{AccountId, Timestamp};
use crate::ports::{AccountStore, AccountStoreError};

/// PostgreSQL implementation of the AccountStore port.
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an account.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    pending_deletion_at: Option<DateTime<Utc>>,
    schedule_handle: Option<String>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountStoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let id = AccountId::new(row.id)
            .map_err(|e| AccountStoreError::backend(format!("Invalid account id: {}", e)))?;

        Ok(Account {
            id,
            pending_deletion_at: row.pending_deletion_at.map(Timestamp::from_datetime),
            schedule_handle: row.schedule_handle.map(ScheduleHandle::new),
        })
    }
}

fn db_error(context: &str, err: sqlx::Error) -> AccountStoreError {
    AccountStoreError::backend(format!("{}: {}", context, err))
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn get(&self, account_id: &AccountId) -> Result<Account, AccountStoreError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, pending_deletion_at, schedule_handle
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load account", e))?;

        row.ok_or_else(|| AccountStoreError::NotFound(account_id.clone()))?
            .try_into()
    }

    async fn set_pending_deletion(
        &self,
        account_id: &AccountId,
        fire_at: Timestamp,
        handle: &ScheduleHandle,
    ) -> Result<(), AccountStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET pending_deletion_at = $2, schedule_handle = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account_id.as_str())
        .bind(fire_at.as_datetime())
        .bind(handle.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to set pending deletion", e))?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::NotFound(account_id.clone()));
        }
        Ok(())
    }

    async fn clear_pending_deletion(
        &self,
        account_id: &AccountId,
    ) -> Result<(), AccountStoreError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET pending_deletion_at = NULL, schedule_handle = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to clear pending deletion", e))?;
        Ok(())
    }

    async fn delete_account_record(
        &self,
        account_id: &AccountId,
    ) -> Result<(), AccountStoreError> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete account", e))?;
        Ok(())
    }
}
