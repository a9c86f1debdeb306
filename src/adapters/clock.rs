//! Clock adapters.

use std::sync::{Arc, RwLock};

use chrono::Duration;

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Manually controlled time for tests and simulations.
///
/// Clones share the same underlying instant, so a test can keep one copy
/// and advance it while the services hold another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<Timestamp>>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = guard.add(duration);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}
