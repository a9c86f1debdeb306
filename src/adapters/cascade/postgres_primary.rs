//! PostgreSQL primary store.
//!
//! Runs the whole purge in one transaction: stamp the tombstone (first
//! stamp wins), drop owned rows, drop the account row.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::AccountId;
use crate::ports::{CascadeTargetError, PrimaryStore};

const TARGET: &str = "primary_store";

pub struct PostgresPrimaryStore {
    pool: PgPool,
}

impl PostgresPrimaryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str, err: sqlx::Error) -> CascadeTargetError {
    CascadeTargetError::new(TARGET, format!("{}: {}", context, err))
}

#[async_trait]
impl PrimaryStore for PostgresPrimaryStore {
    async fn delete_account_and_related_data(
        &self,
        user_id: &AccountId,
    ) -> Result<(), CascadeTargetError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO account_tombstones (account_id, deleted_at)
            VALUES ($1, NOW())
            ON CONFLICT (account_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to stamp tombstone", e))?;

        let owned = sqlx::query("DELETE FROM account_owned_data WHERE account_id = $1")
            .bind(user_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete owned data", e))?;

        let account = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(user_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete account", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit purge", e))?;

        tracing::debug!(
            user_id = %user_id,
            owned_rows = owned.rows_affected(),
            account_rows = account.rows_affected(),
            "Primary store purged"
        );
        Ok(())
    }
}
