//! Account lifecycle handlers.
//!
//! - `request_deletion` - Schedule a purge after the grace period
//! - `cancel_deletion` - Remove a pending purge
//! - `execute_deletion` - Run the cascade when a schedule fires

mod cancel_deletion;
mod errors;
mod execute_deletion;
mod request_deletion;
mod settings;

pub use cancel_deletion::{CancelDeletionCommand, CancelDeletionHandler, CancelDeletionOutcome};
pub use errors::{CascadeStep, DeletionError};
pub use execute_deletion::{DeletionWorker, DEFAULT_AVATAR_PREFIX};
pub use request_deletion::{RequestDeletionCommand, RequestDeletionHandler, RequestDeletionOutcome};
pub use settings::{
    LifecycleSettings, DEFAULT_GRACE_PERIOD_DAYS, DEFAULT_SCHEDULE_GROUP, DEFAULT_WORKER_TARGET,
};
