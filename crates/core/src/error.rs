//! Error types for the Switchboard domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Only registry errors (developer-facing, setup-time) are allowed to
//! surface past the public API. Per-query failures — handler timeouts,
//! handler errors, context persistence problems — are recovered by the
//! orchestrator and converted into well-formed responses.

use thiserror::Error;

/// The top-level error type for all Switchboard operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Registry errors ---
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    // --- Handler errors ---
    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    // --- Context errors ---
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Registry misuse. Surfaced to the caller of the registry API at setup
/// time; fatal to that call only.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("Handler already registered: {0}")]
    DuplicateHandler(String),

    #[error("Handler not found or disabled: {0}")]
    HandlerNotFound(String),

    #[error("Invalid capability for '{handler_id}': {reason}")]
    InvalidCapability { handler_id: String, reason: String },
}

/// Wraps any failure from a specialized handler. Always recovered
/// locally by the orchestrator, never propagated to the caller.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    #[error("Handler '{handler_id}' timed out after {timeout_secs}s")]
    Timeout { handler_id: String, timeout_secs: u64 },

    #[error("Handler '{handler_id}' failed: {reason}")]
    Failed { handler_id: String, reason: String },

    #[error("Malformed handler result: {0}")]
    MalformedResult(String),

    #[error("Handler unavailable: {0}")]
    Unavailable(String),
}

/// Failure while recording or summarizing a turn. Logged, does not
/// affect the response delivered to the caller; the next turn may have
/// incomplete history as a result.
#[derive(Debug, Clone, Error)]
pub enum ContextError {
    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Context persistence failed: {0}")]
    Persistence(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_displays_correctly() {
        let err = Error::Registry(RegistryError::DuplicateHandler("cost".into()));
        assert!(err.to_string().contains("cost"));
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn handler_timeout_displays_correctly() {
        let err = Error::Handler(HandlerError::Timeout {
            handler_id: "cost".into(),
            timeout_secs: 25,
        });
        assert!(err.to_string().contains("cost"));
        assert!(err.to_string().contains("25"));
    }

    #[test]
    fn handler_errors_are_cloneable() {
        // Mock handlers in tests return stored error instances.
        let err = HandlerError::Failed {
            handler_id: "cost".into(),
            reason: "boom".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
