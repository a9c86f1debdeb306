//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Lifecycle Ports
//!
//! - `SchedulerGateway` - One-shot, named, grouped timers
//! - `ScheduleFeed` - Due schedules for the in-process dispatcher
//! - `AccountStore` - Persisted pending-deletion marker
//! - `Clock` - Current time
//!
//! ## Cascade Ports
//!
//! - `IdentityProvider` - Login/identity records
//! - `PrimaryStore` - Account record and owned data
//! - `ObjectStore` - User media

mod account_store;
mod cascade_targets;
mod clock;
mod scheduler_gateway;

pub use account_store::{AccountStore, AccountStoreError};
pub use cascade_targets::{CascadeTargetError, IdentityProvider, ObjectStore, PrimaryStore};
pub use clock::Clock;
pub use scheduler_gateway::{ScheduleFeed, SchedulerError, SchedulerGateway};
