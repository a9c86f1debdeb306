//! ScheduleDispatcher - Delivers fired deletion schedules to the worker.
//!
//! Polls a [`ScheduleFeed`] for schedules whose fire time has passed and
//! hands each payload to the [`DeletionWorker`]:
//!
//! | Worker result | Schedule |
//! |---------------|----------|
//! | `Ok` | completed (removed) |
//! | `CascadeIncomplete` / other retryable | kept, redelivered next poll |
//! | `InvalidTrigger` / `CascadeRejected` | completed and logged, never retried |
//!
//! Delivery is at-least-once: a crash or a failed `complete` after the
//! worker succeeded redelivers a trigger whose cascade is already done,
//! which the idempotent targets absorb.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 1s | How often to check for due schedules |
//! | `batch_size` | 25 | Max schedules dispatched per poll |
//! | `target` | `account-deletion-worker` | Only schedules for this target are dispatched |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::ports::{Clock, ScheduleFeed, SchedulerError};

use crate::domain::account::DeletionSchedule;

use super::handlers::account::{DeletionWorker, DEFAULT_WORKER_TARGET};

/// Configuration for the ScheduleDispatcher service.
#[derive(Debug, Clone)]
pub struct ScheduleDispatcherConfig {
    pub poll_interval: Duration,
    pub batch_size: u32,
    pub target: String,
}

impl Default for ScheduleDispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            batch_size: 25,
            target: DEFAULT_WORKER_TARGET.to_string(),
        }
    }
}

impl ScheduleDispatcherConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }
}

/// Counts from one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Cascade finished; schedule removed.
    pub completed: usize,
    /// Cascade or completion failed; schedule kept for redelivery.
    pub retrying: usize,
    /// Payload undecodable or rejected for good; schedule removed.
    pub discarded: usize,
}

/// Background service that fires due deletion schedules.
pub struct ScheduleDispatcher {
    feed: Arc<dyn ScheduleFeed>,
    worker: Arc<DeletionWorker>,
    clock: Arc<dyn Clock>,
    config: ScheduleDispatcherConfig,
}

impl ScheduleDispatcher {
    pub fn new(
        feed: Arc<dyn ScheduleFeed>,
        worker: Arc<DeletionWorker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_config(feed, worker, clock, ScheduleDispatcherConfig::default())
    }

    pub fn with_config(
        feed: Arc<dyn ScheduleFeed>,
        worker: Arc<DeletionWorker>,
        clock: Arc<dyn Clock>,
        config: ScheduleDispatcherConfig,
    ) -> Self {
        Self {
            feed,
            worker,
            clock,
            config,
        }
    }

    /// Run the dispatch loop until the shutdown signal is received.
    ///
    /// Feed errors are logged and retried on the next tick; they never
    /// stop the loop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.poll_interval);
        tracing::info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            batch_size = self.config.batch_size,
            "Schedule dispatcher started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.tick().await;
                        tracing::info!("Schedule dispatcher stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    async fn tick(&self) {
        if let Err(e) = self.dispatch_due().await {
            tracing::error!(error = %e, "Schedule dispatch failed");
        }
    }

    /// Dispatch one batch of due schedules for the configured target.
    ///
    /// Only a failure to read the feed aborts the pass; a schedule that
    /// cannot be completed is counted as retrying and the batch goes on.
    pub async fn dispatch_due(&self) -> Result<DispatchReport, SchedulerError> {
        let now = self.clock.now();
        let due = self
            .feed
            .due(now, &self.config.target, self.config.batch_size)
            .await?;
        let mut report = DispatchReport::default();

        for schedule in due {
            match self.worker.handle_trigger(&schedule.payload).await {
                Ok(()) => {
                    if self.complete(&schedule).await {
                        report.completed += 1;
                    } else {
                        report.retrying += 1;
                    }
                }
                Err(e) if !e.is_retryable() => {
                    tracing::error!(
                        schedule = %schedule.name,
                        error = %e,
                        "Dropping schedule that can never succeed"
                    );
                    if self.complete(&schedule).await {
                        report.discarded += 1;
                    } else {
                        report.retrying += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        schedule = %schedule.name,
                        error = %e,
                        "Deletion will be redelivered"
                    );
                    report.retrying += 1;
                }
            }
        }

        if report != DispatchReport::default() {
            tracing::debug!(
                completed = report.completed,
                retrying = report.retrying,
                discarded = report.discarded,
                "Dispatch pass finished"
            );
        }
        Ok(report)
    }

    /// Removes a handled schedule; on failure it stays due and is redelivered.
    async fn complete(&self, schedule: &DeletionSchedule) -> bool {
        match self.feed.complete(&schedule.group, &schedule.name).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    schedule = %schedule.name,
                    error = %e,
                    "Failed to complete schedule, it will be redelivered"
                );
                false
            }
        }
    }
}
