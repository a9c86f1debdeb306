//! Application handlers.
//!
//! Command handlers that orchestrate the account lifecycle.

pub mod account;

pub use account::{
    CancelDeletionCommand, CancelDeletionHandler, CancelDeletionOutcome, CascadeStep,
    DeletionError, DeletionWorker, LifecycleSettings, RequestDeletionCommand,
    RequestDeletionHandler, RequestDeletionOutcome,
};
