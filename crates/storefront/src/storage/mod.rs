//! Local persistent storage for session and cart snapshots.
//!
//! Models the browser's string-keyed local storage: two slots, each holding
//! a JSON-serialized snapshot, read at startup and written on every relevant
//! mutation. Access is synchronous. Writes are best-effort - the managers
//! log a failed write and carry on, they never surface it to the caller.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Errors from a storage backend write.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem write failed.
    #[error("storage write failed: {0}")]
    Io(#[from] io::Error),
}

/// A string-keyed slot store.
///
/// Absence is not an error: `read` returns `None` both for a slot that was
/// never written and for one the backend cannot read back.
pub trait StorageBackend: Send + Sync {
    /// Read the value in a slot, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Write a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be persisted. Callers are
    /// expected to treat this as best-effort and keep their in-memory state.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a slot. Removing an absent slot is a no-op.
    fn remove(&self, key: &str);
}

/// In-memory storage. The default for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .map(|slots| slots.get(key).cloned())
            .unwrap_or_default()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_owned(), value.to_owned());
        }
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.remove(key);
        }
    }
}

/// File-backed storage: one JSON file per slot under a directory.
///
/// Persists slots across process runs the way browser local storage persists
/// across reloads.
#[derive(Debug)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        // Slot keys are fixed identifiers, but sanitize anyway so a key can
        // never escape the storage directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    /// The directory slots are stored under.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StorageBackend for JsonFileStorage {
    fn read(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read storage slot");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.slot_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.slot_path(key)) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(key, error = %e, "failed to remove storage slot");
            }
        }
    }
}
