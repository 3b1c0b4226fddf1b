//! # Key-Value Storage
//!
//! The persisted side of the session: the cart snapshot is written after
//! every mutation and read back at startup, and the last fetched price feed
//! is cached between launches. Both live behind the small [`KeyValueStore`]
//! contract so the session never knows where the bytes go.
//!
//! ## Recovery Rules
//! The session treats any unreadable or unparsable value exactly like an
//! absent one - a corrupted snapshot must never surface as a user-visible
//! error.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

/// Minimal string key-value contract for session persistence.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value; absent keys are `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Shared handles delegate, so one store can back a session and still be
/// inspected from elsewhere (tests, diagnostics).
impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).put(key, value)
    }
}

// =============================================================================
// File-Backed Store
// =============================================================================

/// One JSON file per key under a data directory.
///
/// ## Example
/// ```rust,no_run
/// use fermenta_shop::storage::{JsonFileStore, KeyValueStore};
///
/// let store = JsonFileStore::new("/tmp/fermenta-data").unwrap();
/// store.put("fermenta.cart", "[]").unwrap();
/// assert_eq!(store.get("fermenta.cart").unwrap().as_deref(), Some("[]"));
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates the data directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(JsonFileStore { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Volatile store for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().expect("store mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
