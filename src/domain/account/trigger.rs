//! Scheduler trigger payloads.
//!
//! The scheduler delivers an untyped JSON document when a schedule fires:
//!
//! ```text
//! { "Event": "AccountDeletion", "Payload": { "user_id": "<account id>" } }
//! ```
//!
//! It is decoded once at the boundary into [`SchedulerTrigger`]; nothing
//! downstream inspects the raw document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::AccountId;

/// Event delivered to the deletion worker when a schedule fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionEvent {
    pub user_id: AccountId,
}

/// All trigger kinds the scheduler may deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Event", content = "Payload")]
pub enum SchedulerTrigger {
    AccountDeletion(DeletionEvent),
}

/// Failure to decode a trigger payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerDecodeError {
    #[error("Trigger payload is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Trigger payload does not match a known event: {0}")]
    UnknownEvent(String),
}

impl SchedulerTrigger {
    /// Builds the account deletion trigger.
    pub fn account_deletion(user_id: AccountId) -> Self {
        SchedulerTrigger::AccountDeletion(DeletionEvent { user_id })
    }

    /// Decodes a raw payload string.
    pub fn decode(raw: &str) -> Result<Self, TriggerDecodeError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| TriggerDecodeError::MalformedJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decodes an already-parsed JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self, TriggerDecodeError> {
        serde_json::from_value(value).map_err(|e| TriggerDecodeError::UnknownEvent(e.to_string()))
    }

    /// Encodes the trigger as the wire payload.
    pub fn encode(&self) -> String {
        serde_json::json!(self).to_string()
    }

    /// Consumes the trigger into its deletion event.
    pub fn into_deletion_event(self) -> DeletionEvent {
        match self {
            SchedulerTrigger::AccountDeletion(event) => event,
        }
    }
}
