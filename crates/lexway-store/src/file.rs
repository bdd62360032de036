//! File-backed session store.
//!
//! All sessions live in a single JSON document mapping session id to its
//! turn list. The document is read and rewritten in full on every update;
//! a mutex serializes the read-modify-write so concurrent in-process
//! requests cannot lose an append. Other processes writing the same file
//! are not protected against.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};

use lexway_core::error::{LexwayError, Result};
use lexway_core::types::Turn;

use crate::SessionStore;

/// Session store persisting to a single JSON file.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by the given path.
    ///
    /// The file is created lazily on first `put`; a missing file reads as
    /// an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Session store at {}", path.display());
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document from disk.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file
    /// also degrades to an empty store (logged) rather than failing the
    /// request; the next successful `put` rewrites it.
    fn load(&self) -> BTreeMap<String, Vec<Turn>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(
                    "Session file {} unreadable ({}); treating store as empty",
                    self.path.display(),
                    e
                );
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(
                    "Session file {} corrupt ({}); treating store as empty",
                    self.path.display(),
                    e
                );
                BTreeMap::new()
            }
        }
    }

    /// Rewrite the whole document.
    fn save(&self, sessions: &BTreeMap<String, Vec<Turn>>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(sessions)
            .map_err(|e| LexwayError::Store(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| LexwayError::Store(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, id: &str) -> Result<Option<Vec<Turn>>> {
        Ok(self.load().get(id).cloned())
    }

    fn put(&self, id: &str, turns: Vec<Turn>) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| LexwayError::Store(format!("store lock poisoned: {}", e)))?;
        let mut sessions = self.load();
        sessions.insert(id.to_string(), turns);
        self.save(&sessions)
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.load().keys().cloned().collect())
    }
}
