//! Storage layer for taskpad
//!
//! State lives in a flat key-value store holding JSON strings, one value per
//! key. The durable backend keeps one file per key:
//!
//! ```text
//! <data dir>/
//!   tasks.json          # JSON array of tasks (newest first)
//!   tasks.json.lock     # Lock guarding tasks.json
//!   taskFilter.json     # JSON string: "all" | "completed" | "pending"
//!   taskFilter.json.lock
//! ```
//!
//! [`Storage`] sits on top of a backend and gives typed, best-effort access:
//! reads fall back to a caller-supplied default, writes never fail the caller.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Key holding the task list
pub const TASKS_KEY: &str = "tasks";

/// Key holding the active filter
pub const FILTER_KEY: &str = "taskFilter";

/// File extension used by [`FileStore`]
const VALUE_EXTENSION: &str = "json";

/// Raw string key-value storage, in the shape of a browser's `localStorage`.
pub trait KeyValueStore: fmt::Debug {
    /// Look up the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidKey(key.to_string()))
    }
}

// =========================================================================
// Durable backend
// =========================================================================

/// Directory-backed store: one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        lock::read_locked(&path, self.lock_timeout_ms)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        lock::write_atomic_locked(&path, value.as_bytes(), self.lock_timeout_ms)
    }
}

// =========================================================================
// In-memory backend
// =========================================================================

/// In-memory store; clones share the same underlying map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =========================================================================
// Typed adapter
// =========================================================================

/// Typed JSON access over a [`KeyValueStore`] with default fallback
///
/// Persistence is best effort: [`Storage::read`] never fails and
/// [`Storage::write`] logs and swallows failures. In-memory state stays the
/// source of truth for the rest of the session. [`Storage::read_status`]
/// keeps a backend failure apart from an absent or corrupt value, for
/// callers that must not overwrite data they could not read.
#[derive(Debug)]
pub struct Storage {
    backend: Box<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Durable storage rooted at `dir`
    pub fn open_dir(dir: impl Into<PathBuf>, lock_timeout_ms: u64) -> Self {
        Self::new(FileStore::new(dir).with_lock_timeout(lock_timeout_ms))
    }

    /// Read the value under `key`, or `default` if it is absent or unreadable
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read_status(key) {
            Ok(value) => value.unwrap_or(default),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read stored value; using default");
                default
            }
        }
    }

    /// Read the value under `key`
    ///
    /// Absent and corrupt values are `Ok(None)` (corruption is logged);
    /// `Err` means the backend itself could not be read and the stored
    /// value may still be intact.
    pub fn read_status<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is corrupt; using default");
                Ok(None)
            }
        }
    }

    /// Serialize `value` and store it under `key`, logging any failure
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_write(key, value) {
            tracing::warn!(key, error = %err, "failed to persist value; keeping in-memory state");
        }
    }

    /// Fallible form of [`Storage::write`]
    pub fn try_write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json)?;
        tracing::debug!(key, bytes = json.len(), "persisted value");
        Ok(())
    }
}
