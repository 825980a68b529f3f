//! Durable key-value storage for session data.
//!
//! This module provides:
//! - `KeyValueStore`: the synchronous get/set/remove contract
//! - `FileStore`: one file per key under a data directory (survives restarts)
//! - `MemoryStore`: an in-process store for tests and throwaway runs
//!
//! Stores never return errors. Failures are logged and reads degrade to
//! "absent"; detecting malformed content is the caller's job.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Literal left behind by older clients that stored an unset value as text.
pub const UNDEFINED_SENTINEL: &str = "undefined";

/// Synchronous local key-value store. Values are opaque strings.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);
}

/// Read an entry, treating the `"undefined"` sentinel and empty values as absent.
pub fn read_entry(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    store
        .get(key)
        .filter(|value| !value.is_empty() && value != UNDEFINED_SENTINEL)
}
