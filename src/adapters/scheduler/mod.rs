//! Scheduler adapters.
//!
//! - `InMemoryScheduler` - Lock-guarded map, for tests and single-process runs
//! - `PostgresScheduler` - `deletion_schedules` table keyed by `(group_name, name)`

mod in_memory;
mod postgres;

pub use in_memory::InMemoryScheduler;
pub use postgres::PostgresScheduler;
