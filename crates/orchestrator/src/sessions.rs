//! Per-session context storage.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use switchboard_context::{ContextBudget, ContextManager};
use switchboard_core::turn::SessionId;

/// Holds one [`ContextManager`] per live session.
///
/// Each manager sits behind its own lock: concurrent queries for the
/// same session serialize on recording, while different sessions never
/// contend with each other beyond the map lookup.
pub struct SessionStore {
    budget: ContextBudget,
    max_snapshots: usize,
    sessions: Mutex<HashMap<SessionId, Arc<Mutex<ContextManager>>>>,
}

impl SessionStore {
    pub fn new(budget: ContextBudget, max_snapshots: usize) -> Self {
        Self {
            budget,
            max_snapshots,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the session's context manager, creating it on first use.
    pub async fn get_or_create(&self, id: &SessionId) -> Arc<Mutex<ContextManager>> {
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(id) {
            return Arc::clone(existing);
        }
        debug!(session = %id, "Creating session context");
        let manager = ContextManager::new(id.clone())
            .with_budget(self.budget)
            .with_max_snapshots(self.max_snapshots);
        let entry = Arc::new(Mutex::new(manager));
        sessions.insert(id.clone(), Arc::clone(&entry));
        entry
    }

    /// Drop a session's context entirely. Returns false if unknown.
    pub async fn remove(&self, id: &SessionId) -> bool {
        self.sessions.lock().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
