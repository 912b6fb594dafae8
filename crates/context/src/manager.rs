//! Per-session history management and budget enforcement.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use switchboard_core::error::ContextError;
use switchboard_core::handler::ContextualQuery;
use switchboard_core::turn::{Role, SessionId, Turn};

use crate::budget::{ContextBudget, estimate_units, turn_units};
use crate::subject::SubjectState;

/// Turns always kept verbatim at the tail of history.
const KEEP_VERBATIM: usize = 2;

/// Queries quoted per category in a summary.
const QUERIES_PER_CATEGORY: usize = 3;

/// Characters quoted per query in a summary.
const QUERY_EXCERPT_CHARS: usize = 80;

/// A collapsed slice of older history.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub created_at: DateTime<Utc>,
    pub turns_collapsed: usize,
    pub summary: String,
}

/// Owns one session's history, subject facts, and summaries, and keeps
/// their combined unit cost under the budget.
///
/// Recording an exchange may trigger compaction: everything but the
/// [`KEEP_VERBATIM`] newest turns is collapsed into a snapshot. If
/// summarization fails, the manager falls back to dropping the oldest
/// turns outright rather than letting the session grow unbounded.
#[derive(Debug)]
pub struct ContextManager {
    session_id: SessionId,
    budget: ContextBudget,
    max_snapshots: usize,
    turns: Vec<Turn>,
    snapshots: VecDeque<HistorySnapshot>,
    subject: SubjectState,
}

impl ContextManager {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            budget: ContextBudget::default(),
            max_snapshots: 5,
            turns: Vec::new(),
            snapshots: VecDeque::new(),
            subject: SubjectState::new(),
        }
    }

    pub fn with_budget(mut self, budget: ContextBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Bounds both collapsed-history snapshots and the subject state's
    /// pre-merge history.
    pub fn with_max_snapshots(mut self, max_snapshots: usize) -> Self {
        self.max_snapshots = max_snapshots.max(1);
        self.subject = SubjectState::with_max_history(self.max_snapshots);
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &HistorySnapshot> {
        self.snapshots.iter()
    }

    pub fn subject(&self) -> &SubjectState {
        &self.subject
    }

    /// Combined unit cost of everything the next assembled context
    /// would carry.
    pub fn used_units(&self) -> u64 {
        let snapshot_units: u64 = self
            .snapshots
            .iter()
            .map(|s| estimate_units(&s.summary))
            .sum();
        let turn_cost: u64 = self.turns.iter().map(turn_units).sum();
        snapshot_units + turn_cost + estimate_units(&self.subject.render())
    }

    /// Record one completed user/assistant exchange, then enforce the
    /// budget. Subject deltas from both turns are merged in order.
    pub fn record_exchange(&mut self, user: Turn, assistant: Turn) {
        self.subject.merge(&user.subject_delta);
        self.subject.merge(&assistant.subject_delta);
        self.turns.push(user);
        self.turns.push(assistant);
        self.enforce_budget();
    }

    /// Assemble the full context for an incoming query: snapshots of
    /// collapsed history, carried subject facts, then verbatim recent
    /// turns. A fresh session yields a bare query.
    pub fn assemble(&self, current: &str) -> ContextualQuery {
        let mut prior = String::new();

        for snapshot in &self.snapshots {
            prior.push_str(&snapshot.summary);
            prior.push('\n');
        }

        if !self.subject.is_empty() {
            prior.push_str("[Known facts]\n");
            prior.push_str(&self.subject.render());
        }

        for turn in &self.turns {
            let speaker = match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            prior.push_str(speaker);
            prior.push_str(": ");
            prior.push_str(&turn.content);
            prior.push('\n');
        }

        if prior.is_empty() {
            ContextualQuery::bare(current)
        } else {
            ContextualQuery::with_context(prior.trim_end(), current)
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.snapshots.clear();
        self.subject = SubjectState::with_max_history(self.max_snapshots);
    }

    fn enforce_budget(&mut self) {
        if self.used_units() <= self.budget.max_units {
            return;
        }
        if self.turns.len() <= KEEP_VERBATIM {
            self.drop_oldest_snapshots();
            return;
        }

        let split = self.turns.len() - KEEP_VERBATIM;
        let older: Vec<Turn> = self.turns.drain(..split).collect();

        match summarize(&older, self.budget.summary_cap()) {
            Ok(summary) => {
                debug!(
                    session = %self.session_id,
                    collapsed = older.len(),
                    "Collapsed older turns into summary"
                );
                self.snapshots.push_back(HistorySnapshot {
                    created_at: Utc::now(),
                    turns_collapsed: older.len(),
                    summary,
                });
                while self.snapshots.len() > self.max_snapshots {
                    self.snapshots.pop_front();
                }
            }
            Err(err) => {
                warn!(
                    session = %self.session_id,
                    error = %err,
                    "Summarization failed, truncating history"
                );
            }
        }

        self.drop_oldest_snapshots();
    }

    /// Last-resort trim: shed oldest snapshots until within budget.
    /// The verbatim tail is never touched.
    fn drop_oldest_snapshots(&mut self) {
        while self.used_units() > self.budget.max_units && !self.snapshots.is_empty() {
            self.snapshots.pop_front();
        }
    }
}

/// Collapse a run of turns into a category-labeled summary.
///
/// Categories come from the intent decisions attached to assistant
/// turns; user queries are quoted in excerpt. Fails when even the
/// compact rendering would blow the summary cap.
fn summarize(turns: &[Turn], cap_units: u64) -> Result<String, ContextError> {
    let mut by_category: BTreeMap<String, Vec<&str>> = BTreeMap::new();

    let mut pending_query: Option<&str> = None;
    for turn in turns {
        match turn.role {
            Role::User => pending_query = Some(&turn.content),
            Role::Assistant => {
                let category = turn
                    .intent
                    .as_ref()
                    .filter(|i| i.is_routed())
                    .map(|i| i.handler_id.clone())
                    .unwrap_or_else(|| "general".to_string());
                if let Some(query) = pending_query.take() {
                    by_category.entry(category).or_default().push(query);
                }
            }
        }
    }
    // A trailing user turn with no assistant reply still counts.
    if let Some(query) = pending_query {
        by_category
            .entry("general".to_string())
            .or_default()
            .push(query);
    }

    let mut summary = String::from("[Earlier conversation]");
    for (category, queries) in &by_category {
        summary.push('\n');
        summary.push_str(category);
        summary.push_str(": ");
        let quoted: Vec<String> = queries
            .iter()
            .take(QUERIES_PER_CATEGORY)
            .map(|q| excerpt(q, QUERY_EXCERPT_CHARS))
            .collect();
        summary.push_str(&quoted.join("; "));
        if queries.len() > QUERIES_PER_CATEGORY {
            summary.push_str(&format!(" (+{} more)", queries.len() - QUERIES_PER_CATEGORY));
        }
    }

    let units = estimate_units(&summary);
    if units > cap_units {
        return Err(ContextError::Summarization(format!(
            "summary of {} turns needs {units} units, cap is {cap_units}",
            turns.len()
        )));
    }
    Ok(summary)
}

/// First `max_chars` of a string, cut on a char boundary.
fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}…")
}
