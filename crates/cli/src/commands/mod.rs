//! Command implementations and shared wiring.

pub mod ask;
pub mod capabilities;
pub mod serve;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use switchboard_config::{AppConfig, CapabilityOverride, ConfigError};
use switchboard_context::ContextBudget;
use switchboard_core::capability::Capability;
use switchboard_handlers::{CostEstimateHandler, GeneralHandler};
use switchboard_orchestrator::Orchestrator;
use switchboard_routing::{CapabilityRegistry, IntentClassifier, ScoringWeights};

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load(path),
        None => AppConfig::from_env(),
    }
}

/// Register the built-in handlers, with any configured capability
/// overrides applied.
pub fn build_registry(config: &AppConfig) -> Result<CapabilityRegistry, Box<dyn std::error::Error>> {
    let mut registry = CapabilityRegistry::new();
    registry.register(
        apply_overrides(CostEstimateHandler::capability(), &config.capability_overrides),
        Arc::new(CostEstimateHandler::new()),
    )?;
    registry.register(
        apply_overrides(GeneralHandler::capability(), &config.capability_overrides),
        Arc::new(GeneralHandler::new()),
    )?;
    Ok(registry)
}

pub fn build_orchestrator(config: &AppConfig) -> Result<Arc<Orchestrator>, Box<dyn std::error::Error>> {
    let registry = build_registry(config)?;
    let classifier = IntentClassifier::new(ScoringWeights {
        keyword: config.classifier.keyword_weight,
        phrase: config.classifier.phrase_weight,
        co_occurrence: config.classifier.co_occurrence_bonus,
        threshold_scale: config.classifier.threshold_scale,
    });

    let orchestrator = Orchestrator::builder(Arc::new(RwLock::new(registry)))
        .classifier(classifier)
        .default_handler_id(&config.default_handler_id)
        .handler_timeout(Duration::from_millis(config.handler_timeout_ms))
        .context_budget(ContextBudget::new(config.context_budget))
        .max_snapshots(config.max_history_snapshots)
        .build();
    Ok(Arc::new(orchestrator))
}

fn apply_overrides(mut capability: Capability, overrides: &[CapabilityOverride]) -> Capability {
    if let Some(over) = overrides
        .iter()
        .find(|o| o.handler_id == capability.handler_id)
    {
        if !over.keywords.is_empty() {
            capability.keywords = over.keywords.clone();
        }
        if !over.phrases.is_empty() {
            capability.phrases = over.phrases.clone();
        }
        if let Some(priority) = over.priority {
            capability.priority = priority;
        }
        if let Some(threshold) = over.confidence_threshold {
            capability.confidence_threshold = threshold;
        }
    }
    capability
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_set_fields() {
        let config_override = CapabilityOverride {
            handler_id: "cost".into(),
            keywords: vec!["tarif".into()],
            phrases: vec![],
            priority: Some(9),
            confidence_threshold: None,
        };
        let capability =
            apply_overrides(CostEstimateHandler::capability(), &[config_override]);

        assert_eq!(capability.keywords, vec!["tarif"]);
        assert_eq!(capability.priority, 9);
        assert!(!capability.phrases.is_empty());
        assert_eq!(capability.confidence_threshold, 0.5);
    }

    #[test]
    fn default_config_builds_a_working_registry() {
        let registry = build_registry(&AppConfig::default()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("cost").is_ok());
        assert!(registry.get("general").is_ok());
    }
}
