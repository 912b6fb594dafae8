//! The six-phase routing state machine.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use switchboard_context::ContextBudget;
use switchboard_core::error::HandlerError;
use switchboard_core::handler::HandlerOutput;
use switchboard_core::turn::{SessionId, Turn};
use switchboard_core::{IntentDecision, ResponseEnvelope};
use switchboard_routing::{CapabilityRegistry, IntentClassifier};

use crate::guidance;
use crate::sessions::SessionStore;

const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_millis(25_000);

/// Builder for [`Orchestrator`]. Only the registry is mandatory.
pub struct OrchestratorBuilder {
    registry: Arc<RwLock<CapabilityRegistry>>,
    classifier: IntentClassifier,
    default_handler_id: String,
    handler_timeout: Duration,
    context_budget: ContextBudget,
    max_snapshots: usize,
}

impl OrchestratorBuilder {
    fn new(registry: Arc<RwLock<CapabilityRegistry>>) -> Self {
        Self {
            registry,
            classifier: IntentClassifier::default(),
            default_handler_id: "general".to_string(),
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
            context_budget: ContextBudget::default(),
            max_snapshots: 5,
        }
    }

    pub fn classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn default_handler_id(mut self, id: impl Into<String>) -> Self {
        self.default_handler_id = id.into();
        self
    }

    pub fn handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    pub fn context_budget(mut self, budget: ContextBudget) -> Self {
        self.context_budget = budget;
        self
    }

    pub fn max_snapshots(mut self, max_snapshots: usize) -> Self {
        self.max_snapshots = max_snapshots;
        self
    }

    pub fn build(self) -> Orchestrator {
        Orchestrator {
            registry: self.registry,
            classifier: self.classifier,
            default_handler_id: self.default_handler_id,
            handler_timeout: self.handler_timeout,
            sessions: SessionStore::new(self.context_budget, self.max_snapshots),
        }
    }
}

/// Routes queries to specialized handlers and never fails: every path,
/// including handler errors and timeouts, produces a response envelope.
pub struct Orchestrator {
    registry: Arc<RwLock<CapabilityRegistry>>,
    classifier: IntentClassifier,
    default_handler_id: String,
    handler_timeout: Duration,
    sessions: SessionStore,
}

impl Orchestrator {
    pub fn builder(registry: Arc<RwLock<CapabilityRegistry>>) -> OrchestratorBuilder {
        OrchestratorBuilder::new(registry)
    }

    /// Shared handle to the capability registry, for surfaces that
    /// list or mutate registrations at runtime.
    pub fn registry(&self) -> Arc<RwLock<CapabilityRegistry>> {
        Arc::clone(&self.registry)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Process one query end to end.
    ///
    /// Phases: assemble context, classify, dispatch (with fallback
    /// substitution), invoke under a timeout, record the exchange,
    /// respond. The classifier sees only the current query block;
    /// prior context travels to the handler, not into scoring.
    pub async fn process_query(&self, query: &str, session_id: &SessionId) -> ResponseEnvelope {
        let session = self.sessions.get_or_create(session_id).await;
        let contextual = session.lock().await.assemble(query);

        let mut decision = {
            let registry = self.registry.read().await;
            self.classifier.classify(&contextual.current, &registry)
        };
        debug!(
            session = %session_id,
            handler = %decision.handler_id,
            confidence = %decision.confidence,
            score = decision.score,
            fallback = decision.fallback_applied,
            "Classified query"
        );

        // No enabled capabilities: synthesize without invoking anything.
        if decision.handler_id == IntentDecision::NONE {
            info!(session = %session_id, "No enabled capabilities, synthesizing response");
            let content = guidance::system_unavailable();
            let assistant = Turn::assistant(content.as_str(), decision.clone());
            session.lock().await.record_exchange(Turn::user(query), assistant);
            let handler_id = decision.handler_id.clone();
            return ResponseEnvelope::new(content, handler_id, decision).with_error_handled();
        }

        let target = if decision.fallback_applied {
            self.default_handler_id.clone()
        } else {
            decision.handler_id.clone()
        };

        let invoked: Result<HandlerOutput, HandlerError> = {
            let handler = self.registry.read().await.get(&target);
            match handler {
                Ok(handler) => {
                    match timeout(self.handler_timeout, handler.invoke(&contextual)).await {
                        Ok(result) => result,
                        Err(_) => Err(HandlerError::Timeout {
                            handler_id: target.clone(),
                            timeout_secs: self.handler_timeout.as_secs(),
                        }),
                    }
                }
                Err(err) => Err(HandlerError::Unavailable(err.to_string())),
            }
        };

        let (content, facts, error_handled) = match invoked {
            Ok(output) => {
                let mut content = output.content;
                if decision.fallback_applied {
                    content.push_str("\n\n");
                    content.push_str(guidance::REPHRASE_TIP);
                }
                (content, output.facts, false)
            }
            Err(err) => {
                warn!(
                    session = %session_id,
                    handler = %target,
                    error = %err,
                    "Handler invocation failed, synthesizing guidance"
                );
                // The delivered content is substituted guidance, not
                // the routed handler's answer.
                decision.fallback_applied = true;
                let content = if decision.is_routed() {
                    guidance::handler_failure(&decision.handler_id)
                } else {
                    guidance::fallback_failure()
                };
                (content, BTreeMap::new(), true)
            }
        };

        let assistant =
            Turn::assistant(content.as_str(), decision.clone()).with_subject_delta(facts);
        session.lock().await.record_exchange(Turn::user(query), assistant);

        let envelope = ResponseEnvelope::new(content, target.as_str(), decision);
        if error_handled {
            envelope.with_error_handled()
        } else {
            envelope
        }
    }
}
