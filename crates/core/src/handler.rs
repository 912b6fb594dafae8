//! Handler trait — the seam between the router and specialized responders.
//!
//! Handlers are external collaborators from the router's point of view:
//! pure async functions from a context-enriched query to a structured
//! result, callable with a timeout. The orchestrator depends only on
//! this trait, never on concrete handler types.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HandlerError;
use crate::intent::Confidence;

/// A context-enriched query: the unit passed to handlers.
///
/// Kept as a structured two-part value — prior-context block plus
/// current-query block — rather than an opaque concatenated string, so
/// handlers and tests can reason about each part independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualQuery {
    /// Synthesized prior context: conversation summary and known
    /// subject facts. `None` on the first turn of a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_context: Option<String>,

    /// The current raw query text.
    pub current: String,
}

impl ContextualQuery {
    /// A query with no prior context.
    pub fn bare(current: impl Into<String>) -> Self {
        Self {
            prior_context: None,
            current: current.into(),
        }
    }

    /// A query enriched with a prior-context block.
    pub fn with_context(prior: impl Into<String>, current: impl Into<String>) -> Self {
        Self {
            prior_context: Some(prior.into()),
            current: current.into(),
        }
    }

    /// Render as delimited text for handlers that consume plain prompts.
    pub fn render(&self) -> String {
        match &self.prior_context {
            Some(prior) => format!(
                "[Prior context]\n{}\n\n[Current query]\n{}",
                prior, self.current
            ),
            None => self.current.clone(),
        }
    }
}

/// The structured result a handler returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerOutput {
    /// The response text shown to the user.
    pub content: String,

    /// Structured facts for the subject state (merged by the Context
    /// Manager, never written by the handler directly).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facts: BTreeMap<String, serde_json::Value>,

    /// The handler's self-reported confidence in its answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl HandlerOutput {
    /// A plain text result with no facts.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            facts: BTreeMap::new(),
            confidence: None,
        }
    }

    pub fn with_fact(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.facts.insert(key.into(), value);
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// The core Handler trait.
///
/// Implementations must be idempotent enough to be safely retried by
/// the caller; the orchestrator itself makes exactly one attempt.
#[async_trait]
pub trait Handler: Send + Sync {
    /// The unique handler id. Must match the registered capability.
    fn id(&self) -> &str;

    /// Process a context-enriched query into a structured result.
    async fn invoke(&self, query: &ContextualQuery) -> Result<HandlerOutput, HandlerError>;
}
