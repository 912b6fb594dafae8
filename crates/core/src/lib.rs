//! # Switchboard Core
//!
//! Domain types, traits, and error definitions for the Switchboard
//! query-routing service. This crate has **zero framework dependencies**
//! — it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The handler seam is defined as a trait here; concrete handlers live in
//! their own crate. This enables:
//! - Registering new specialized handlers without touching the router
//! - Easy testing with mock/stub handlers
//! - Clean dependency graph (all crates depend inward on core)

pub mod capability;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod intent;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use capability::Capability;
pub use envelope::ResponseEnvelope;
pub use error::{ContextError, Error, HandlerError, RegistryError, Result};
pub use handler::{ContextualQuery, Handler, HandlerOutput};
pub use intent::{Confidence, IntentDecision};
pub use turn::{Role, SessionId, Turn};
