//! Durable key/value persistence for the schema and the view mode.
//!
//! The editor keeps two keys: the whole schema as one JSON blob, and the last
//! used view mode as a plain string. Both are read once at startup and
//! rewritten after every mutation. The backing store is a [`KeyValueStore`]:
//! browser `localStorage` in the WASM build, an in-memory map in tests, and a
//! directory of files in the headless binary.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::consts::{SCHEMA_KEY, VIEW_MODE_KEY};
use crate::doc::DocStore;

/// Errors produced by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend cannot be reached (no window, storage disabled, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Writing a key failed (quota exceeded, read-only medium, ...).
    #[error("write to {key} failed: {reason}")]
    Write { key: String, reason: String },

    /// Reading a key failed.
    #[error("read of {key} failed: {reason}")]
    Read { key: String, reason: String },

    /// The value could not be encoded.
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored value could not be decoded.
    #[error("stored {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

/// A string key/value store.
pub trait KeyValueStore {
    /// Read a key. A missing key is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store. Optionally refuses writes, to exercise failure paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, like a browser over quota.
    #[must_use]
    pub fn read_only() -> Self {
        Self { entries: HashMap::new(), read_only: true }
    }

    /// Pre-populate a key.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Write { key: key.to_owned(), reason: "storage is read-only".into() });
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Write { key: key.to_owned(), reason: "storage is read-only".into() });
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Bind to the current window's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside a browser or when the
    /// user agent has storage disabled.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StorageError::Unavailable("localStorage is disabled".into())),
            Err(e) => Err(StorageError::Unavailable(format!("{e:?}"))),
        }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Read { key: key.to_owned(), reason: format!("{e:?}") })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write { key: key.to_owned(), reason: format!("{e:?}") })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Write { key: key.to_owned(), reason: format!("{e:?}") })
    }
}

/// Which view is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    ThreeD,
}

impl ViewMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoD => "2d",
            Self::ThreeD => "3d",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2d" => Ok(Self::TwoD),
            "3d" => Ok(Self::ThreeD),
            other => Err(format!("unknown view mode '{other}' (expected '2d' or '3d')")),
        }
    }
}

/// Reads and writes the editor's two persisted keys.
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persistence backed by a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Load the saved schema. A missing key is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] if the blob does not parse, or the
    /// backend error if the read fails.
    pub fn load_schema(&self) -> Result<DocStore, StorageError> {
        let Some(raw) = self.store.get(SCHEMA_KEY)? else {
            return Ok(DocStore::new());
        };
        let doc = DocStore::deserialize(&raw)
            .map_err(|e| StorageError::Corrupt { key: SCHEMA_KEY.to_owned(), reason: e.to_string() })?;
        info!(entities = doc.len(), "schema loaded");
        Ok(doc)
    }

    /// Load the schema, falling back to an empty store on any failure.
    #[must_use]
    pub fn load_schema_or_default(&self) -> DocStore {
        match self.load_schema() {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "starting with an empty plan");
                DocStore::new()
            }
        }
    }

    /// Write the whole schema.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or the write fails.
    pub fn save_schema(&mut self, doc: &DocStore) -> Result<(), StorageError> {
        let json = doc.serialize()?;
        self.store.set(SCHEMA_KEY, &json)
    }

    /// Forget the saved schema.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    pub fn clear_schema(&mut self) -> Result<(), StorageError> {
        self.store.remove(SCHEMA_KEY)
    }

    /// Load the saved view mode. Missing or unrecognized values yield the default.
    #[must_use]
    pub fn load_view_mode(&self) -> ViewMode {
        match self.store.get(VIEW_MODE_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "ignoring saved view mode");
                ViewMode::default()
            }),
            Ok(None) => ViewMode::default(),
            Err(e) => {
                warn!(error = %e, "view mode unreadable");
                ViewMode::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    pub fn save_view_mode(&mut self, mode: ViewMode) -> Result<(), StorageError> {
        self.store.set(VIEW_MODE_KEY, mode.as_str())
    }

    /// Read a raw key from the underlying store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.store.get(key)
    }
}
