//! Rule-based intent classifier.
//!
//! Scores an incoming query against every enabled capability with a
//! simple additive scheme: keywords, phrases, and a domain/action
//! co-occurrence bonus. Intentionally rule-based rather than a learned
//! model — determinism is the contract, and the specific weights are
//! tunable configuration, not load-bearing constants.

use tracing::debug;

use switchboard_core::capability::Capability;
use switchboard_core::intent::{Confidence, IntentDecision};

use crate::registry::CapabilityRegistry;

/// Tunable scoring weights.
///
/// `threshold_scale` maps a capability's `confidence_threshold` in
/// `[0, 1]` onto the raw additive score axis: a capability is eligible
/// when `score >= threshold * scale` and a match is high-confidence
/// when `score >= 2 * threshold * scale`.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Points per matched keyword occurrence.
    pub keyword: u32,
    /// Points per matched phrase occurrence.
    pub phrase: u32,
    /// Bonus when a domain signal and an action signal co-occur.
    pub co_occurrence: u32,
    /// Threshold-to-score scale factor.
    pub threshold_scale: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword: 2,
            phrase: 3,
            co_occurrence: 2,
            threshold_scale: 4.0,
        }
    }
}

/// Scores queries against a registry snapshot. Stateless and pure:
/// a fixed (query, registry) pair always yields the same decision.
#[derive(Debug, Clone, Default)]
pub struct IntentClassifier {
    weights: ScoringWeights,
}

impl IntentClassifier {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Classify a query against every enabled capability.
    ///
    /// Ranking is (score desc, priority desc, handler_id asc) — the
    /// lexicographic leg makes equal-score, equal-priority ties
    /// deterministic and testable.
    pub fn classify(&self, query: &str, registry: &CapabilityRegistry) -> IntentDecision {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return IntentDecision::uncertain(query);
        }

        let capabilities = registry.list_enabled();
        if capabilities.is_empty() {
            return IntentDecision::none(query);
        }

        let mut ranked: Vec<(&Capability, u32)> = capabilities
            .iter()
            .map(|c| (*c, self.score(&normalized, c)))
            .filter(|(c, score)| {
                (*score as f64) >= c.confidence_threshold * self.weights.threshold_scale
            })
            .collect();

        ranked.sort_by(|(a, sa), (b, sb)| {
            sb.cmp(sa)
                .then(b.priority.cmp(&a.priority))
                .then(a.handler_id.cmp(&b.handler_id))
        });

        let Some(&(top, score)) = ranked.first() else {
            debug!(query = %normalized, "No capability cleared its threshold");
            return IntentDecision::uncertain(query);
        };

        // A lone weak signal (at most one keyword hit's worth of score)
        // is too ambiguous to route on.
        if score <= self.weights.keyword {
            debug!(
                query = %normalized,
                handler = %top.handler_id,
                score,
                "Single weak signal, classifying as uncertain"
            );
            let mut decision = IntentDecision::uncertain(query);
            decision.score = score as f64;
            return decision;
        }

        let raw = score as f64;
        let high_cutoff = 2.0 * top.confidence_threshold * self.weights.threshold_scale;
        let confidence = if raw >= high_cutoff {
            Confidence::High
        } else {
            Confidence::Medium
        };

        debug!(
            query = %normalized,
            handler = %top.handler_id,
            score,
            confidence = %confidence,
            "Classified query"
        );
        IntentDecision::matched(query, &top.handler_id, confidence, raw)
    }

    /// Additive relevance score of one capability against a normalized
    /// query.
    fn score(&self, normalized: &str, capability: &Capability) -> u32 {
        let mut score = 0;

        for keyword in &capability.keywords {
            score += self.weights.keyword * count_occurrences(normalized, &keyword.to_lowercase());
        }
        for phrase in &capability.phrases {
            score += self.weights.phrase * count_occurrences(normalized, &phrase.to_lowercase());
        }

        // Co-occurrence bonus: a domain signal and an action signal
        // both present (e.g. an AWS service name alongside "cost").
        if !capability.domain_signals.is_empty() && !capability.action_signals.is_empty() {
            let domain = capability
                .domain_signals
                .iter()
                .any(|s| normalized.contains(&s.to_lowercase()));
            let action = capability
                .action_signals
                .iter()
                .any(|s| normalized.contains(&s.to_lowercase()));
            if domain && action {
                score += self.weights.co_occurrence;
            }
        }

        score
    }
}

fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use switchboard_core::error::HandlerError;
    use switchboard_core::handler::{ContextualQuery, Handler, HandlerOutput};

    struct NoopHandler {
        id: String,
    }

    impl NoopHandler {
        fn new(id: &str) -> Arc<dyn Handler> {
            Arc::new(Self { id: id.into() })
        }
    }

    #[async_trait]
    impl Handler for NoopHandler {
        fn id(&self) -> &str {
            &self.id
        }

        async fn invoke(&self, _query: &ContextualQuery) -> Result<HandlerOutput, HandlerError> {
            Ok(HandlerOutput::text("ok"))
        }
    }

    fn cost_capability() -> Capability {
        Capability::new("cost", 0.5)
            .with_keywords(["cost", "price"])
            .with_phrases(["how much"])
            .with_priority(5)
    }

    fn registry_with(caps: Vec<Capability>) -> CapabilityRegistry {
        let mut reg = CapabilityRegistry::new();
        for cap in caps {
            let id = cap.handler_id.clone();
            reg.register(cap, NoopHandler::new(&id)).unwrap();
        }
        reg
    }

    #[test]
    fn empty_query_is_uncertain() {
        let reg = registry_with(vec![cost_capability()]);
        let classifier = IntentClassifier::default();

        for query in ["", "   ", "\t\n"] {
            let d = classifier.classify(query, &reg);
            assert_eq!(d.handler_id, IntentDecision::UNCERTAIN);
            assert_eq!(d.confidence, Confidence::Low);
            assert!(d.fallback_applied);
        }
    }

    #[test]
    fn no_enabled_capabilities_is_none() {
        let mut reg = registry_with(vec![cost_capability()]);
        reg.disable("cost");
        let classifier = IntentClassifier::default();

        let d = classifier.classify("how much does ec2 cost", &reg);
        assert_eq!(d.handler_id, IntentDecision::NONE);
        assert!(d.fallback_applied);
    }

    #[test]
    fn phrase_plus_keyword_is_high_confidence() {
        // Phrase "how much" (+3) and keyword "cost" (+2): score 5,
        // well above the 0.5 threshold, so confidence is high.
        let reg = registry_with(vec![cost_capability()]);
        let classifier = IntentClassifier::default();

        let d = classifier.classify("how much does ec2 cost", &reg);
        assert_eq!(d.handler_id, "cost");
        assert_eq!(d.score, 5.0);
        assert_eq!(d.confidence, Confidence::High);
        assert!(!d.fallback_applied);
        assert_eq!(d.query, "how much does ec2 cost");
    }

    #[test]
    fn single_keyword_is_uncertain() {
        let reg = registry_with(vec![cost_capability()]);
        let classifier = IntentClassifier::default();

        let d = classifier.classify("the cost", &reg);
        assert_eq!(d.handler_id, IntentDecision::UNCERTAIN);
        assert_eq!(d.confidence, Confidence::Low);
        assert!(d.fallback_applied);
        assert_eq!(d.score, 2.0);
    }

    #[test]
    fn unrelated_query_is_uncertain() {
        let reg = registry_with(vec![cost_capability()]);
        let classifier = IntentClassifier::default();

        let d = classifier.classify("configure a security group", &reg);
        assert_eq!(d.handler_id, IntentDecision::UNCERTAIN);
        assert!(d.fallback_applied);
    }

    #[test]
    fn co_occurrence_bonus_applies() {
        let cap = Capability::new("cost", 0.5)
            .with_keywords(["price"])
            .with_domain_signals(["ec2", "rds", "s3"])
            .with_action_signals(["price", "cost"]);
        let reg = registry_with(vec![cap]);
        let classifier = IntentClassifier::default();

        // keyword "price" (+2) + co-occurrence of "ec2" and "price" (+2)
        let d = classifier.classify("ec2 price please", &reg);
        assert_eq!(d.handler_id, "cost");
        assert_eq!(d.score, 4.0);
        assert_eq!(d.confidence, Confidence::High);
    }

    #[test]
    fn classification_is_deterministic() {
        let reg = registry_with(vec![
            cost_capability(),
            Capability::new("general", 0.2).with_keywords(["help", "aws"]),
        ]);
        let classifier = IntentClassifier::default();

        let first = classifier.classify("how much does ec2 cost", &reg);
        for _ in 0..10 {
            let again = classifier.classify("how much does ec2 cost", &reg);
            assert_eq!(first.handler_id, again.handler_id);
            assert_eq!(first.score, again.score);
            assert_eq!(first.confidence, again.confidence);
        }
    }

    #[test]
    fn equal_score_and_priority_breaks_lexicographically() {
        // Registered in reverse lexicographic order on purpose.
        let beta = Capability::new("beta", 0.5)
            .with_keywords(["deploy", "rollout"])
            .with_priority(3);
        let alpha = Capability::new("alpha", 0.5)
            .with_keywords(["deploy", "rollout"])
            .with_priority(3);
        let reg = registry_with(vec![beta, alpha]);
        let classifier = IntentClassifier::default();

        for _ in 0..5 {
            let d = classifier.classify("deploy the rollout", &reg);
            assert_eq!(d.handler_id, "alpha");
        }
    }

    #[test]
    fn higher_priority_wins_equal_scores() {
        let low = Capability::new("zlow", 0.5)
            .with_keywords(["deploy", "rollout"])
            .with_priority(1);
        let high = Capability::new("zhigh", 0.5)
            .with_keywords(["deploy", "rollout"])
            .with_priority(9);
        let reg = registry_with(vec![low, high]);
        let classifier = IntentClassifier::default();

        let d = classifier.classify("deploy the rollout", &reg);
        assert_eq!(d.handler_id, "zhigh");
    }

    #[test]
    fn raising_threshold_never_increases_selection() {
        // Threshold monotonicity: the permissive variant matches, the
        // strict variant of the same capability does not.
        let query = "how much does ec2 cost";
        let classifier = IntentClassifier::default();

        let mut permissive = cost_capability();
        permissive.confidence_threshold = 0.5;
        let d = classifier.classify(query, &registry_with(vec![permissive]));
        assert_eq!(d.handler_id, "cost");

        let mut strict = cost_capability();
        strict.confidence_threshold = 1.0; // eligibility cutoff now 4.0; score 5 still clears
        let d = classifier.classify(query, &registry_with(vec![strict]));
        assert_eq!(d.handler_id, "cost");
        assert_eq!(d.confidence, Confidence::Medium); // but no longer high

        let mut impossible = cost_capability();
        impossible.confidence_threshold = 1.0;
        let d = classifier.classify("price", &registry_with(vec![impossible]));
        assert_ne!(d.handler_id, "cost");
    }

    #[test]
    fn repeated_keyword_occurrences_accumulate() {
        let reg = registry_with(vec![cost_capability()]);
        let classifier = IntentClassifier::default();

        let d = classifier.classify("cost cost cost", &reg);
        assert_eq!(d.score, 6.0);
        assert_eq!(d.handler_id, "cost");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let reg = registry_with(vec![cost_capability()]);
        let classifier = IntentClassifier::default();

        let d = classifier.classify("HOW MUCH does EC2 Cost?", &reg);
        assert_eq!(d.handler_id, "cost");
        assert_eq!(d.confidence, Confidence::High);
    }
}
