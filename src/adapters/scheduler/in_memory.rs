//! In-memory scheduler for tests and single-process deployments.
//!
//! Enforces `(group, name)` uniqueness under a single write lock, so
//! concurrent creates for the same account race exactly like they would
//! against a real scheduler backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{DeletionSchedule, ScheduleHandle, ScheduleName};
use crate::domain::foundation::Timestamp;
use crate::ports::{ScheduleFeed, SchedulerError, SchedulerGateway};

type ScheduleKey = (String, ScheduleName);

/// In-memory one-shot scheduler.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduler {
    schedules: Arc<RwLock<HashMap<ScheduleKey, DeletionSchedule>>>,
    create_calls: Arc<AtomicUsize>,
    fail_creates: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
    fail_completes: Arc<AtomicBool>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent create fail with a backend error.
    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent delete fail with a backend error.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent complete fail with a backend error.
    pub fn fail_completes(&self, fail: bool) {
        self.fail_completes.store(fail, Ordering::SeqCst);
    }

    /// Inserts a schedule directly, bypassing conflict detection.
    pub async fn insert(&self, schedule: DeletionSchedule) {
        let key = (schedule.group.clone(), schedule.name.clone());
        self.schedules.write().await.insert(key, schedule);
    }

    /// Removes a schedule directly, as if it fired and was consumed.
    pub async fn remove(&self, group: &str, name: &ScheduleName) -> Option<DeletionSchedule> {
        self.schedules
            .write()
            .await
            .remove(&(group.to_string(), name.clone()))
    }

    /// Number of live schedules.
    pub async fn schedule_count(&self) -> usize {
        self.schedules.read().await.len()
    }

    /// Number of create attempts that reached the backend.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchedulerGateway for InMemoryScheduler {
    async fn create_one_shot(
        &self,
        schedule: &DeletionSchedule,
    ) -> Result<ScheduleHandle, SchedulerError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(SchedulerError::backend("Simulated scheduler outage"));
        }

        let key = (schedule.group.clone(), schedule.name.clone());
        let mut schedules = self.schedules.write().await;
        if schedules.contains_key(&key) {
            return Err(SchedulerError::Conflict {
                group: schedule.group.clone(),
                name: schedule.name.clone(),
            });
        }
        schedules.insert(key, schedule.clone());
        Ok(schedule.handle())
    }

    async fn delete(&self, group: &str, name: &ScheduleName) -> Result<(), SchedulerError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(SchedulerError::backend("Simulated scheduler outage"));
        }

        self.remove(group, name)
            .await
            .map(|_| ())
            .ok_or_else(|| SchedulerError::NotFound {
                group: group.to_string(),
                name: name.clone(),
            })
    }

    async fn get(
        &self,
        group: &str,
        name: &ScheduleName,
    ) -> Result<Option<DeletionSchedule>, SchedulerError> {
        let schedules = self.schedules.read().await;
        Ok(schedules.get(&(group.to_string(), name.clone())).cloned())
    }
}

#[async_trait]
impl ScheduleFeed for InMemoryScheduler {
    async fn due(
        &self,
        now: Timestamp,
        target: &str,
        limit: u32,
    ) -> Result<Vec<DeletionSchedule>, SchedulerError> {
        let schedules = self.schedules.read().await;
        let mut due: Vec<_> = schedules
            .values()
            .filter(|s| s.target == target && s.is_due(now))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.fire_at.cmp(&b.fire_at));
        due.truncate(limit as usize);
        Ok(due)
    }

    async fn complete(&self, group: &str, name: &ScheduleName) -> Result<(), SchedulerError> {
        if self.fail_completes.load(Ordering::SeqCst) {
            return Err(SchedulerError::backend("Simulated scheduler outage"));
        }
        self.remove(group, name).await;
        Ok(())
    }
}
