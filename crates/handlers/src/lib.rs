//! Built-in specialized handlers.
//!
//! Each handler implements the [`Handler`](switchboard_core::Handler)
//! trait and ships a `capability()` constructor describing when the
//! classifier should route to it. Handlers are self-contained: no
//! network calls, no shared state.

pub mod cost_estimate;
pub mod general;

pub use cost_estimate::CostEstimateHandler;
pub use general::GeneralHandler;
