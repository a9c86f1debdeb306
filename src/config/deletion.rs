//! Deletion lifecycle configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::handlers::account::{
    LifecycleSettings, DEFAULT_GRACE_PERIOD_DAYS, DEFAULT_SCHEDULE_GROUP, DEFAULT_WORKER_TARGET,
};

/// Grace period and scheduler naming.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletionConfig {
    /// Days between a request and the purge
    #[serde(default = "default_grace_period_days")]
    pub grace_period_days: i64,

    /// Scheduler group holding deletion schedules
    #[serde(default = "default_schedule_group")]
    pub schedule_group: String,

    /// Target invoked when a deletion schedule fires
    #[serde(default = "default_worker_target")]
    pub worker_target: String,
}

impl DeletionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.grace_period_days < 1 {
            return Err(ValidationError::InvalidGracePeriod);
        }
        if self.schedule_group.is_empty() || self.schedule_group.contains('/') {
            return Err(ValidationError::InvalidScheduleGroup);
        }
        if self.worker_target.is_empty() {
            return Err(ValidationError::MissingRequired("DELETION__WORKER_TARGET"));
        }
        Ok(())
    }

    pub fn lifecycle_settings(&self) -> LifecycleSettings {
        LifecycleSettings {
            grace_period: chrono::Duration::days(self.grace_period_days),
            schedule_group: self.schedule_group.clone(),
            worker_target: self.worker_target.clone(),
        }
    }
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            grace_period_days: default_grace_period_days(),
            schedule_group: default_schedule_group(),
            worker_target: default_worker_target(),
        }
    }
}

fn default_grace_period_days() -> i64 {
    DEFAULT_GRACE_PERIOD_DAYS
}

fn default_schedule_group() -> String {
    DEFAULT_SCHEDULE_GROUP.to_string()
}

fn default_worker_target() -> String {
    DEFAULT_WORKER_TARGET.to_string()
}
