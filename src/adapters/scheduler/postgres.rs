//! PostgreSQL implementation of the scheduler ports.
//!
//! Schedules live in `deletion_schedules` with primary key
//! `(group_name, name)`. The key constraint is what turns concurrent
//! creates into exactly one row and a `Conflict` for every other caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::account::{DeletionSchedule, ScheduleHandle, ScheduleName};
use crate::domain::foundation::Timestamp;
use crate::ports::{ScheduleFeed, SchedulerError, SchedulerGateway};

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed one-shot scheduler.
pub struct PostgresScheduler {
    pool: PgPool,
}

impl PostgresScheduler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a schedule.
#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    group_name: String,
    name: String,
    fire_at: DateTime<Utc>,
    target: String,
    payload: String,
}

impl From<ScheduleRow> for DeletionSchedule {
    fn from(row: ScheduleRow) -> Self {
        DeletionSchedule {
            name: ScheduleName::from_string(row.name),
            group: row.group_name,
            fire_at: Timestamp::from_datetime(row.fire_at),
            target: row.target,
            payload: row.payload,
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl SchedulerGateway for PostgresScheduler {
    async fn create_one_shot(
        &self,
        schedule: &DeletionSchedule,
    ) -> Result<ScheduleHandle, SchedulerError> {
        let result = sqlx::query(
            r#"
            INSERT INTO deletion_schedules (group_name, name, fire_at, target, payload)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&schedule.group)
        .bind(schedule.name.as_str())
        .bind(schedule.fire_at.as_datetime())
        .bind(&schedule.target)
        .bind(&schedule.payload)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(schedule.handle()),
            Err(e) if is_unique_violation(&e) => Err(SchedulerError::Conflict {
                group: schedule.group.clone(),
                name: schedule.name.clone(),
            }),
            Err(e) => Err(SchedulerError::backend(format!(
                "Failed to create schedule: {}",
                e
            ))),
        }
    }

    async fn delete(&self, group: &str, name: &ScheduleName) -> Result<(), SchedulerError> {
        let result = sqlx::query("DELETE FROM deletion_schedules WHERE group_name = $1 AND name = $2")
            .bind(group)
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| SchedulerError::backend(format!("Failed to delete schedule: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(SchedulerError::NotFound {
                group: group.to_string(),
                name: name.clone(),
            });
        }
        Ok(())
    }

    async fn get(
        &self,
        group: &str,
        name: &ScheduleName,
    ) -> Result<Option<DeletionSchedule>, SchedulerError> {
        let row: Option<ScheduleRow> = sqlx::query_as(
            r#"
            SELECT group_name, name, fire_at, target, payload
            FROM deletion_schedules
            WHERE group_name = $1 AND name = $2
            "#,
        )
        .bind(group)
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SchedulerError::backend(format!("Failed to load schedule: {}", e)))?;

        Ok(row.map(DeletionSchedule::from))
    }
}

#[async_trait]
impl ScheduleFeed for PostgresScheduler {
    async fn due(
        &self,
        now: Timestamp,
        target: &str,
        limit: u32,
    ) -> Result<Vec<DeletionSchedule>, SchedulerError> {
        let rows: Vec<ScheduleRow> = sqlx::query_as(
            r#"
            SELECT group_name, name, fire_at, target, payload
            FROM deletion_schedules
            WHERE target = $2 AND fire_at <= $1
            ORDER BY fire_at
            LIMIT $3
            "#,
        )
        .bind(now.as_datetime())
        .bind(target)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SchedulerError::backend(format!("Failed to load due schedules: {}", e)))?;

        Ok(rows.into_iter().map(DeletionSchedule::from).collect())
    }

    async fn complete(&self, group: &str, name: &ScheduleName) -> Result<(), SchedulerError> {
        sqlx::query("DELETE FROM deletion_schedules WHERE group_name = $1 AND name = $2")
            .bind(group)
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| SchedulerError::backend(format!("Failed to complete schedule: {}", e)))?;
        Ok(())
    }
}
