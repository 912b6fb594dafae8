//! Turn and session domain types.
//!
//! These are the core value objects that flow through the system:
//! a user query becomes a `Turn`, gets routed to a handler, and the
//! handler's output becomes the next `Turn` in the same session.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::IntentDecision;

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a turn's author in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The routed handler's response
    Assistant,
}

/// A single exchange entry in a session. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique turn ID
    pub id: String,

    /// Who authored this turn
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// The intent decision that produced this turn (assistant turns only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentDecision>,

    /// Structured facts extracted from this turn that update subject
    /// state (named entities, quantities, identifiers). May be empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subject_delta: BTreeMap<String, serde_json::Value>,
}

impl Turn {
    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            intent: None,
            subject_delta: BTreeMap::new(),
        }
    }

    /// Create a new assistant turn carrying the decision that produced it.
    pub fn assistant(content: impl Into<String>, intent: IntentDecision) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            intent: Some(intent),
            subject_delta: BTreeMap::new(),
        }
    }

    /// Attach extracted facts to this turn.
    pub fn with_subject_delta(mut self, delta: BTreeMap<String, serde_json::Value>) -> Self {
        self.subject_delta = delta;
        self
    }
}
