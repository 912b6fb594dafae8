//! Unit accounting for conversation history.

use switchboard_core::turn::Turn;

/// Characters per estimated unit.
pub const UNIT_CHARS: usize = 4;

/// Fixed per-turn overhead (role marker, separators).
pub const TURN_OVERHEAD_UNITS: u64 = 4;

/// Estimate the unit cost of a piece of text, rounding up.
pub fn estimate_units(text: &str) -> u64 {
    text.len().div_ceil(UNIT_CHARS) as u64
}

/// Unit cost of a single turn including its fixed overhead.
pub fn turn_units(turn: &Turn) -> u64 {
    estimate_units(&turn.content) + TURN_OVERHEAD_UNITS
}

/// The budget a [`ContextManager`](crate::ContextManager) enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBudget {
    /// Total units the assembled context may occupy.
    pub max_units: u64,
}

impl ContextBudget {
    pub fn new(max_units: u64) -> Self {
        Self { max_units }
    }

    /// Hard cap on any single history summary. Summaries that would
    /// crowd out live turns defeat their own purpose.
    pub fn summary_cap(&self) -> u64 {
        self.max_units / 4
    }
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self { max_units: 8_000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimation_rounds_up() {
        assert_eq!(estimate_units(""), 0);
        assert_eq!(estimate_units("a"), 1);
        assert_eq!(estimate_units("abcd"), 1);
        assert_eq!(estimate_units("abcde"), 2);
    }

    #[test]
    fn turn_cost_includes_overhead() {
        let turn = Turn::user("abcd");
        assert_eq!(turn_units(&turn), 1 + TURN_OVERHEAD_UNITS);
    }

    #[test]
    fn summary_cap_is_a_quarter_of_budget() {
        let budget = ContextBudget::new(8_000);
        assert_eq!(budget.summary_cap(), 2_000);
    }
}
