//! Application layer - Commands, Handlers, and background services.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod account_lifecycle;
pub mod handlers;
pub mod schedule_dispatcher;

pub use account_lifecycle::AccountLifecycleService;
pub use handlers::{
    CancelDeletionCommand, CancelDeletionHandler, CancelDeletionOutcome, CascadeStep,
    DeletionError, DeletionWorker, LifecycleSettings, RequestDeletionCommand,
    RequestDeletionHandler, RequestDeletionOutcome,
};
pub use schedule_dispatcher::{DispatchReport, ScheduleDispatcher, ScheduleDispatcherConfig};
