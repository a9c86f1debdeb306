//! Clock port - injectable source of the current time.

use crate::domain::foundation::Timestamp;

/// Abstraction over time sources for testability.
///
/// Production code injects `SystemClock`; tests inject a `FixedClock` they
/// can advance to walk through a grace period deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
