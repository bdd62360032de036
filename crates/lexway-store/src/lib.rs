//! Lexway session store - injectable key-value persistence for conversations.
//!
//! Provides the [`SessionStore`] trait (`get`/`put`/`list`), a file-backed
//! implementation holding one JSON document rewritten in full per update,
//! and an in-memory implementation for tests.

pub mod file;
pub mod memory;

use lexway_core::error::Result;
use lexway_core::types::Turn;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key-value persistence for conversation sessions.
///
/// A session is an ordered list of turns keyed by an opaque string id.
/// Implementations replace the whole turn list on `put`; there are no
/// partial updates or transactions.
pub trait SessionStore: Send + Sync {
    /// Fetch the turns for a session, if it exists.
    fn get(&self, id: &str) -> Result<Option<Vec<Turn>>>;

    /// Replace the turns stored for a session, creating it if absent.
    fn put(&self, id: &str, turns: Vec<Turn>) -> Result<()>;

    /// List all known session ids.
    fn list(&self) -> Result<Vec<String>>;
}
