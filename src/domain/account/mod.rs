//! Account deletion lifecycle domain.
//!
//! ```text
//! Active --request--> PendingDeletion --fire--> Purged (terminal)
//! PendingDeletion --cancel--> Active
//! ```

mod account;
mod schedule;
mod trigger;

pub use account::{Account, DeletionState, PendingDeletion};
pub use schedule::{DeletionSchedule, ScheduleHandle, ScheduleName, SCHEDULE_NAME_PREFIX};
pub use trigger::{DeletionEvent, SchedulerTrigger, TriggerDecodeError};
