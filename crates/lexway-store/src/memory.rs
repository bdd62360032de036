//! In-memory session store for tests and ephemeral deployments.

use std::collections::BTreeMap;
use std::sync::Mutex;

use lexway_core::error::{LexwayError, Result};
use lexway_core::types::Turn;

use crate::SessionStore;

/// Session store holding everything in a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<BTreeMap<String, Vec<Turn>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held.
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<Vec<Turn>>> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|e| LexwayError::Store(format!("store lock poisoned: {}", e)))?;
        Ok(sessions.get(id).cloned())
    }

    fn put(&self, id: &str, turns: Vec<Turn>) -> Result<()> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| LexwayError::Store(format!("store lock poisoned: {}", e)))?;
        sessions.insert(id.to_string(), turns);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|e| LexwayError::Store(format!("store lock poisoned: {}", e)))?;
        Ok(sessions.keys().cloned().collect())
    }
}
