//! Tunables shared by the lifecycle handlers.

use chrono::Duration;

/// Default grace period between request and purge.
pub const DEFAULT_GRACE_PERIOD_DAYS: i64 = 30;

/// Default scheduler group for deletion schedules.
pub const DEFAULT_SCHEDULE_GROUP: &str = "account-deletion";

/// Default target invoked when a deletion schedule fires.
pub const DEFAULT_WORKER_TARGET: &str = "account-deletion-worker";

/// Settings for request and cancel handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleSettings {
    pub grace_period: Duration,
    pub schedule_group: String,
    pub worker_target: String,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            grace_period: Duration::days(DEFAULT_GRACE_PERIOD_DAYS),
            schedule_group: DEFAULT_SCHEDULE_GROUP.to_string(),
            worker_target: DEFAULT_WORKER_TARGET.to_string(),
        }
    }
}
