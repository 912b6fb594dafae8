//! Query routing for Switchboard.
//!
//! Two pieces:
//!
//! - [`CapabilityRegistry`] — holds registered specialized handlers and
//!   their capability declarations, in registration order, with
//!   enable/disable toggles.
//! - [`IntentClassifier`] — scores a query against every enabled
//!   capability and produces a ranked, deterministic intent decision.
//!
//! Classification is a pure function of (query, registry snapshot):
//! no randomness, no hidden state, identical inputs always produce
//! identical decisions.

pub mod classifier;
pub mod registry;

pub use classifier::{IntentClassifier, ScoringWeights};
pub use registry::CapabilityRegistry;
