//! Conversation context management.
//!
//! Tracks per-session conversation history and carried subject facts,
//! and keeps the whole thing inside a fixed unit budget. When history
//! outgrows the budget, older turns are collapsed into a compact
//! category-labeled summary while the most recent exchanges stay
//! verbatim — follow-up queries like "what about a larger instance?"
//! still resolve because the subject facts and summary travel with
//! every assembled query.
//!
//! Unit estimation is deliberately crude (four characters per unit).
//! It only needs to be monotone in text length and cheap; exact
//! tokenizer parity is not a goal.

pub mod budget;
pub mod manager;
pub mod subject;

pub use budget::{ContextBudget, estimate_units, turn_units};
pub use manager::{ContextManager, HistorySnapshot};
pub use subject::SubjectState;
