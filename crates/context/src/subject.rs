//! Carried subject facts for a session.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_max_history() -> usize {
    5
}

/// Key-value facts the conversation is currently "about": service
/// names, instance sizes, regions. Later deltas overwrite earlier
/// values for the same key; a `null` delta removes the key.
///
/// Subject facts survive history summarization, which is what keeps
/// follow-up queries resolvable after old turns are collapsed. A
/// bounded history of pre-merge snapshots is kept alongside, so
/// callers can compare what a delta changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectState {
    facts: BTreeMap<String, Value>,

    /// Pre-merge snapshots, oldest first. Only non-empty deltas push
    /// a snapshot.
    #[serde(default)]
    history: VecDeque<BTreeMap<String, Value>>,

    #[serde(default = "default_max_history")]
    max_history: usize,
}

impl Default for SubjectState {
    fn default() -> Self {
        Self {
            facts: BTreeMap::new(),
            history: VecDeque::new(),
            max_history: default_max_history(),
        }
    }
}

impl SubjectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state that retains up to `max_history` pre-merge snapshots.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            max_history: max_history.max(1),
            ..Self::default()
        }
    }

    /// Apply one turn's extracted facts on top of the current state.
    ///
    /// The pre-merge state is snapshotted first (bounded, oldest
    /// dropped). An empty delta is a no-op and pushes nothing.
    pub fn merge(&mut self, delta: &BTreeMap<String, Value>) {
        if delta.is_empty() {
            return;
        }

        self.history.push_back(self.facts.clone());
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }

        for (key, value) in delta {
            if value.is_null() {
                self.facts.remove(key);
            } else {
                self.facts.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.facts.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Pre-merge snapshots, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &BTreeMap<String, Value>> {
        self.history.iter()
    }

    /// Render the facts as one line per entry for context assembly.
    /// Deterministic ordering comes from the underlying `BTreeMap`.
    /// History is for change comparisons and is never rendered.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.facts {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            out.push_str(key);
            out.push_str(": ");
            out.push_str(&rendered);
            out.push('\n');
        }
        out
    }
}
