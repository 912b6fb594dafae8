//! Capability registry — manages all registered specialized handlers.
//!
//! Entries are kept in registration order so that iteration (and
//! therefore scoring) is deterministic. A capability can be disabled
//! without removal: disabled entries are excluded from matching but
//! retain their registration slot.

use std::sync::Arc;

use tracing::info;

use switchboard_core::capability::Capability;
use switchboard_core::error::RegistryError;
use switchboard_core::handler::Handler;

/// One registered handler with its capability declaration.
pub struct RegistryEntry {
    pub capability: Capability,
    pub handler: Arc<dyn Handler>,
    pub enabled: bool,
}

/// Central registry holding all registered handler capabilities.
///
/// Registry lifetime = process lifetime; in-memory only.
pub struct CapabilityRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a handler with its capability declaration.
    ///
    /// Fails with [`RegistryError::DuplicateHandler`] if the id is
    /// already present (enabled or not), and validates the capability
    /// invariants (unique id, threshold in `[0, 1]`).
    pub fn register(
        &mut self,
        capability: Capability,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RegistryError> {
        capability.validate()?;
        let id = capability.handler_id.clone();
        if self.entries.iter().any(|e| e.capability.handler_id == id) {
            return Err(RegistryError::DuplicateHandler(id));
        }

        info!(handler = %id, priority = capability.priority, "Registered handler");
        self.entries.push(RegistryEntry {
            capability,
            handler,
            enabled: true,
        });
        Ok(())
    }

    /// Remove a handler. No-op (returns false) if absent. In-flight
    /// invocations are unaffected; the handler just becomes
    /// unreachable for future routing.
    pub fn deregister(&mut self, handler_id: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.capability.handler_id != handler_id);
        let removed = self.entries.len() < before;
        if removed {
            info!(handler = %handler_id, "Deregistered handler");
        }
        removed
    }

    /// Re-enable a disabled handler. Returns false if absent.
    pub fn enable(&mut self, handler_id: &str) -> bool {
        self.set_enabled(handler_id, true)
    }

    /// Disable a handler without removing its registration. Returns
    /// false if absent.
    pub fn disable(&mut self, handler_id: &str) -> bool {
        self.set_enabled(handler_id, false)
    }

    fn set_enabled(&mut self, handler_id: &str, enabled: bool) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| e.capability.handler_id == handler_id)
        {
            Some(entry) => {
                entry.enabled = enabled;
                info!(handler = %handler_id, enabled, "Toggled handler");
                true
            }
            None => false,
        }
    }

    /// All capabilities currently eligible for matching, in
    /// registration order.
    pub fn list_enabled(&self) -> Vec<&Capability> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| &e.capability)
            .collect()
    }

    /// All registered entries, including disabled ones.
    pub fn list_all(&self) -> impl Iterator<Item = (&Capability, bool)> {
        self.entries.iter().map(|e| (&e.capability, e.enabled))
    }

    /// Get a handler by id. Fails with
    /// [`RegistryError::HandlerNotFound`] if absent **or disabled**.
    pub fn get(&self, handler_id: &str) -> Result<Arc<dyn Handler>, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.capability.handler_id == handler_id && e.enabled)
            .map(|e| e.handler.clone())
            .ok_or_else(|| RegistryError::HandlerNotFound(handler_id.to_string()))
    }

    /// Number of registered handlers (enabled or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no registrations at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any capability is currently enabled.
    pub fn has_enabled(&self) -> bool {
        self.entries.iter().any(|e| e.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use switchboard_core::error::HandlerError;
    use switchboard_core::handler::{ContextualQuery, HandlerOutput};

    struct EchoHandler {
        id: String,
    }

    impl EchoHandler {
        fn new(id: &str) -> Arc<dyn Handler> {
            Arc::new(Self { id: id.into() })
        }
    }

    #[async_trait]
    impl Handler for EchoHandler {
        fn id(&self) -> &str {
            &self.id
        }

        async fn invoke(&self, query: &ContextualQuery) -> Result<HandlerOutput, HandlerError> {
            Ok(HandlerOutput::text(query.current.clone()))
        }
    }

    fn cap(id: &str) -> Capability {
        Capability::new(id, 0.5).with_keywords(["test"])
    }

    #[test]
    fn register_and_get() {
        let mut reg = CapabilityRegistry::new();
        reg.register(cap("cost"), EchoHandler::new("cost")).unwrap();

        assert!(reg.get("cost").is_ok());
        assert!(reg.get("missing").is_err());
        assert_eq!(reg.len(), 1);
        assert!(reg.has_enabled());
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut reg = CapabilityRegistry::new();
        reg.register(cap("cost"), EchoHandler::new("cost")).unwrap();

        let err = reg
            .register(cap("cost"), EchoHandler::new("cost"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateHandler(_)));
    }

    #[test]
    fn duplicate_rejected_even_when_disabled() {
        let mut reg = CapabilityRegistry::new();
        reg.register(cap("cost"), EchoHandler::new("cost")).unwrap();
        reg.disable("cost");

        assert!(reg.register(cap("cost"), EchoHandler::new("cost")).is_err());
    }

    #[test]
    fn deregister_is_noop_when_absent() {
        let mut reg = CapabilityRegistry::new();
        assert!(!reg.deregister("ghost"));
    }

    #[test]
    fn disabled_excluded_from_matching_and_get() {
        let mut reg = CapabilityRegistry::new();
        reg.register(cap("cost"), EchoHandler::new("cost")).unwrap();
        reg.register(cap("general"), EchoHandler::new("general"))
            .unwrap();

        assert!(reg.disable("cost"));
        assert_eq!(reg.list_enabled().len(), 1);
        assert!(reg.get("cost").is_err());
        // Still registered
        assert_eq!(reg.len(), 2);

        assert!(reg.enable("cost"));
        assert_eq!(reg.list_enabled().len(), 2);
        assert!(reg.get("cost").is_ok());
    }

    #[test]
    fn toggle_absent_handler_returns_false() {
        let mut reg = CapabilityRegistry::new();
        assert!(!reg.disable("ghost"));
        assert!(!reg.enable("ghost"));
    }

    #[test]
    fn register_deregister_register_leaves_fresh_state() {
        // Idempotent registry: no residual state across the cycle.
        let mut reg = CapabilityRegistry::new();
        reg.register(cap("cost"), EchoHandler::new("cost")).unwrap();
        reg.disable("cost");
        assert!(reg.deregister("cost"));

        reg.register(cap("cost"), EchoHandler::new("cost")).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(reg.get("cost").is_ok());
        assert_eq!(reg.list_enabled().len(), 1);
    }

    #[test]
    fn invalid_capability_rejected_at_registration() {
        let mut reg = CapabilityRegistry::new();
        let bad = Capability::new("x", 2.0);
        assert!(matches!(
            reg.register(bad, EchoHandler::new("x")).unwrap_err(),
            RegistryError::InvalidCapability { .. }
        ));
        assert!(reg.is_empty());
    }

    #[test]
    fn registration_order_preserved() {
        let mut reg = CapabilityRegistry::new();
        reg.register(cap("b"), EchoHandler::new("b")).unwrap();
        reg.register(cap("a"), EchoHandler::new("a")).unwrap();

        let ids: Vec<&str> = reg
            .list_enabled()
            .iter()
            .map(|c| c.handler_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
