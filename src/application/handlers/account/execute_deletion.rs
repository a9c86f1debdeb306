//! DeletionWorker - Purges an account when its schedule fires.
//!
//! The three targets are independent and run concurrently. Every target
//! is idempotent, so a redelivered trigger simply re-runs all three; the
//! worker keeps no record of which steps already succeeded.

use std::sync::Arc;

use crate::domain::account::{DeletionEvent, SchedulerTrigger};
use crate::domain::foundation::AccountId;
use crate::ports::{CascadeTargetError, IdentityProvider, ObjectStore, PrimaryStore};

use super::errors::{CascadeStep, DeletionError};

/// Default key prefix for user avatars in object storage.
pub const DEFAULT_AVATAR_PREFIX: &str = "avatars";

/// Executes the deletion cascade for fired schedules.
pub struct DeletionWorker {
    identity: Arc<dyn IdentityProvider>,
    primary: Arc<dyn PrimaryStore>,
    objects: Arc<dyn ObjectStore>,
    avatar_prefix: String,
}

impl DeletionWorker {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        primary: Arc<dyn PrimaryStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            identity,
            primary,
            objects,
            avatar_prefix: DEFAULT_AVATAR_PREFIX.to_string(),
        }
    }

    pub fn with_avatar_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.avatar_prefix = prefix.into();
        self
    }

    /// Object key of the user's avatar.
    pub fn avatar_key(&self, user_id: &AccountId) -> String {
        format!("{}/{}", self.avatar_prefix.trim_end_matches('/'), user_id)
    }

    /// Decodes a raw trigger payload and runs the cascade.
    pub async fn handle_trigger(&self, raw: &str) -> Result<(), DeletionError> {
        let trigger = SchedulerTrigger::decode(raw).map_err(|e| {
            tracing::error!(error = %e, "Discarding undecodable deletion trigger");
            e
        })?;
        self.execute(trigger.into_deletion_event()).await
    }

    /// Runs all cascade steps for one user.
    ///
    /// Every step is attempted. If any step failed transiently the result
    /// is `CascadeIncomplete` naming all failed steps; if every failure was
    /// permanent it is `CascadeRejected`.
    pub async fn execute(&self, event: DeletionEvent) -> Result<(), DeletionError> {
        let user_id = &event.user_id;
        let avatar_key = self.avatar_key(user_id);

        tracing::info!(user_id = %user_id, "Executing account deletion");

        let (identity, primary, objects) = futures::join!(
            self.identity.delete_user(user_id),
            self.primary.delete_account_and_related_data(user_id),
            self.objects.delete_object(&avatar_key),
        );

        let failures: Vec<(CascadeStep, bool)> = [
            (CascadeStep::IdentityProvider, identity),
            (CascadeStep::PrimaryStore, primary),
            (CascadeStep::ObjectStore, objects),
        ]
        .into_iter()
        .filter_map(|(step, result)| step_failure(user_id, step, result))
        .collect();

        if !failures.is_empty() {
            let retryable = failures.iter().any(|(_, permanent)| !permanent);
            let failed_steps: Vec<CascadeStep> = failures.into_iter().map(|(step, _)| step).collect();
            if retryable {
                tracing::warn!(
                    user_id = %user_id,
                    failed = failed_steps.len(),
                    "Account deletion incomplete, awaiting redelivery"
                );
                return Err(DeletionError::CascadeIncomplete { failed_steps });
            }
            tracing::error!(
                user_id = %user_id,
                failed = failed_steps.len(),
                "Account deletion rejected by cascade targets"
            );
            return Err(DeletionError::CascadeRejected { failed_steps });
        }

        tracing::info!(user_id = %user_id, "Account deletion complete");
        Ok(())
    }
}

/// Logs a step outcome; a failure yields the step and whether it is permanent.
fn step_failure(
    user_id: &AccountId,
    step: CascadeStep,
    result: Result<(), CascadeTargetError>,
) -> Option<(CascadeStep, bool)> {
    match result {
        Ok(()) => {
            tracing::debug!(user_id = %user_id, step = %step, "Cascade step done");
            None
        }
        Err(e) => {
            tracing::warn!(
                user_id = %user_id,
                step = %step,
                permanent = e.is_permanent(),
                error = %e,
                "Cascade step failed"
            );
            Some((step, e.is_permanent()))
        }
    }
}
