//! Intent classification result types.

use serde::{Deserialize, Serialize};

/// Confidence tier derived from the normalized relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// The result of classifying one query against the registry.
///
/// Created fresh per query; never persisted beyond the request cycle
/// except as a field attached to an assistant [`Turn`](crate::Turn).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDecision {
    /// Original query text, never mutated.
    pub query: String,

    /// Chosen handler, or one of the sentinel values
    /// [`UNCERTAIN`](Self::UNCERTAIN) / [`NONE`](Self::NONE).
    pub handler_id: String,

    /// Confidence tier.
    pub confidence: Confidence,

    /// Raw relevance score (non-negative).
    pub score: f64,

    /// True when no handler cleared its threshold and the default
    /// handler was substituted.
    pub fallback_applied: bool,
}

impl IntentDecision {
    /// Sentinel handler id: the query could not be confidently classified.
    pub const UNCERTAIN: &'static str = "uncertain";

    /// Sentinel handler id: no enabled capabilities exist.
    pub const NONE: &'static str = "none";

    /// A confident (or medium-confidence) match.
    pub fn matched(
        query: impl Into<String>,
        handler_id: impl Into<String>,
        confidence: Confidence,
        score: f64,
    ) -> Self {
        Self {
            query: query.into(),
            handler_id: handler_id.into(),
            confidence,
            score,
            fallback_applied: false,
        }
    }

    /// Classification was too weak or ambiguous; fallback routing applies.
    pub fn uncertain(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            handler_id: Self::UNCERTAIN.into(),
            confidence: Confidence::Low,
            score: 0.0,
            fallback_applied: true,
        }
    }

    /// No enabled capabilities exist to classify against.
    pub fn none(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            handler_id: Self::NONE.into(),
            confidence: Confidence::Low,
            score: 0.0,
            fallback_applied: true,
        }
    }

    /// Whether this decision names a concrete handler (not a sentinel).
    pub fn is_routed(&self) -> bool {
        self.handler_id != Self::UNCERTAIN && self.handler_id != Self::NONE
    }
}
