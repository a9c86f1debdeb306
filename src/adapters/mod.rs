//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the lifecycle to external systems:
//! - `account_store` - Account records (in-memory, PostgreSQL)
//! - `scheduler` - One-shot schedules (in-memory, PostgreSQL)
//! - `cascade` - Identity provider, primary store, object store
//! - `clock` - System and fixed clocks

pub mod account_store;
pub mod cascade;
pub mod clock;
pub mod scheduler;

pub use account_store::{InMemoryAccountStore, PostgresAccountStore};
pub use cascade::{
    HttpIdentityConfig, HttpIdentityProvider, InMemoryIdentityProvider, InMemoryObjectStore,
    InMemoryPrimaryStore, LocalObjectStore, PostgresPrimaryStore,
};
pub use clock::{FixedClock, SystemClock};
pub use scheduler::{InMemoryScheduler, PostgresScheduler};
