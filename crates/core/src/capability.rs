//! Capability declarations — what a handler claims expertise in.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Describes one handler's area of expertise for intent matching.
///
/// Immutable after registration for a running process; removed only by
/// explicit deregistration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capability {
    /// Unique handler identifier.
    pub handler_id: String,

    /// Single tokens that raise the relevance score.
    pub keywords: Vec<String>,

    /// Multi-word strings that raise the score more strongly than
    /// single keywords. Matched via substring containment.
    pub phrases: Vec<String>,

    /// Domain-signal tokens (e.g. AWS service names). A co-occurrence
    /// bonus applies when one of these appears alongside an action
    /// signal.
    #[serde(default)]
    pub domain_signals: Vec<String>,

    /// Action-signal tokens (e.g. "cost", "estimate").
    #[serde(default)]
    pub action_signals: Vec<String>,

    /// Tie-breaker; higher wins when scores are equal.
    #[serde(default)]
    pub priority: i32,

    /// Minimum normalized score required to treat this handler as a
    /// confident match. Must be in `[0, 1]`.
    pub confidence_threshold: f64,
}

impl Capability {
    /// Create a capability with the given id and threshold.
    pub fn new(handler_id: impl Into<String>, confidence_threshold: f64) -> Self {
        Self {
            handler_id: handler_id.into(),
            keywords: Vec::new(),
            phrases: Vec::new(),
            domain_signals: Vec::new(),
            action_signals: Vec::new(),
            priority: 0,
            confidence_threshold,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_domain_signals<I, S>(mut self, signals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_signals = signals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_action_signals<I, S>(mut self, signals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.action_signals = signals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Validate the registry invariants: non-empty id, threshold in `[0,1]`.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.handler_id.trim().is_empty() {
            return Err(RegistryError::InvalidCapability {
                handler_id: self.handler_id.clone(),
                reason: "handler_id must not be empty".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(RegistryError::InvalidCapability {
                handler_id: self.handler_id.clone(),
                reason: format!(
                    "confidence_threshold {} outside [0, 1]",
                    self.confidence_threshold
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assembles_fields() {
        let cap = Capability::new("cost", 0.5)
            .with_keywords(["cost", "price"])
            .with_phrases(["how much"])
            .with_priority(5);

        assert_eq!(cap.handler_id, "cost");
        assert_eq!(cap.keywords.len(), 2);
        assert_eq!(cap.phrases, vec!["how much"]);
        assert_eq!(cap.priority, 5);
        assert!(cap.validate().is_ok());
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        assert!(Capability::new("x", 1.5).validate().is_err());
        assert!(Capability::new("x", -0.1).validate().is_err());
        assert!(Capability::new("x", 0.0).validate().is_ok());
        assert!(Capability::new("x", 1.0).validate().is_ok());
    }

    #[test]
    fn empty_id_rejected() {
        assert!(Capability::new("  ", 0.5).validate().is_err());
    }
}
