//! The normalized response envelope returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::IntentDecision;
use crate::turn::Role;

/// What every `process_query` call returns, success or failure.
///
/// Runtime errors never escape the orchestrator; a failure path still
/// produces a well-formed envelope with `error_handled` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Unique response identifier.
    pub id: String,

    /// The assistant-facing response text. Never empty.
    pub content: String,

    /// Always [`Role::Assistant`].
    pub role: Role,

    /// Which handler produced (or was substituted to produce) the content.
    pub handler_id: String,

    /// The classification decision behind this response.
    pub intent: IntentDecision,

    /// True when a handler failure was recovered into synthesized guidance.
    pub error_handled: bool,

    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

impl ResponseEnvelope {
    pub fn new(
        content: impl Into<String>,
        handler_id: impl Into<String>,
        intent: IntentDecision,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role: Role::Assistant,
            handler_id: handler_id.into(),
            intent,
            error_handled: false,
            timestamp: Utc::now(),
        }
    }

    pub fn with_error_handled(mut self) -> Self {
        self.error_handled = true;
        self
    }
}
