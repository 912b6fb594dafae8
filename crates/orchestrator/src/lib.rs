//! The query router.
//!
//! `Orchestrator::process_query` is the one public entry point: it
//! assembles session context, classifies intent, dispatches to the
//! chosen handler under a timeout, records the exchange, and always
//! returns a well-formed [`ResponseEnvelope`] — handler failures are
//! recovered into synthesized guidance, never surfaced as errors.
//!
//! Everything is constructed and threaded explicitly: the registry,
//! classifier, and session store are fields, not ambient singletons.

pub mod guidance;
pub mod router;
pub mod sessions;

pub use router::{Orchestrator, OrchestratorBuilder};
pub use sessions::SessionStore;
