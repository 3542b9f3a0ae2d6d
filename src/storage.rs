//! Persistence of column layout.
//!
//! The table does not assume any storage medium. Callers inject a
//! [`LayoutStore`]; the table reads and writes two entries per storage key:
//!
//! - `"<storage_key>-columns"`: the visibility map as a JSON object of key → bool
//! - `"<storage_key>-column-order"`: the column order as a JSON array of keys
//!
//! Every read tolerates absence and malformed data, and every write is
//! best-effort: failures are logged and the in-memory state stays
//! authoritative.

use crate::error::{StorageError, StorageResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Key/value persistence collaborator.
pub trait LayoutStore: Send + Sync {
    /// Reads a value. Absence is `Ok(None)`.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes a value. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-memory store.
///
/// Clones share the same map, so several tables given clones of one store
/// and the same storage key observe each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the raw entry, bypassing `LayoutStore`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok().and_then(|m| m.get(key).cloned())
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LayoutStore for MemoryStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Store keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl LayoutStore for FileStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Layout persistence for one storage key.
#[derive(Clone)]
pub struct LayoutPersistence {
    store: Arc<dyn LayoutStore>,
    storage_key: String,
}

impl std::fmt::Debug for LayoutPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutPersistence")
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

impl LayoutPersistence {
    /// Binds a store to a storage key.
    pub fn new(store: Arc<dyn LayoutStore>, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
        }
    }

    /// The caller-supplied storage key.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Entry holding the visibility map.
    pub fn columns_key(&self) -> String {
        format!("{}-columns", self.storage_key)
    }

    /// Entry holding the column order.
    pub fn order_key(&self) -> String {
        format!("{}-column-order", self.storage_key)
    }

    /// Loads the persisted visibility map, if present and well-formed.
    pub fn load_visibility(&self) -> Option<HashMap<String, bool>> {
        self.load(&self.columns_key())
    }

    /// Loads the persisted column order, if present and well-formed.
    pub fn load_order(&self) -> Option<Vec<String>> {
        self.load(&self.order_key())
    }

    /// Persists the visibility map.
    pub fn save_visibility(&self, visibility: &HashMap<String, bool>) {
        let sorted: BTreeMap<&String, &bool> = visibility.iter().collect();
        self.save(&self.columns_key(), &sorted);
    }

    /// Persists the column order.
    pub fn save_order(&self, order: &[String]) {
        self.save(&self.order_key(), &order);
    }

    /// Removes both persisted entries.
    pub fn clear(&self) {
        for key in [self.columns_key(), self.order_key()] {
            if let Err(e) = self.store.remove(&key) {
                warn!(storage_key = %self.storage_key, entry = %key, error = %e, "failed to clear persisted layout");
            }
        }
    }

    fn load<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(storage_key = %self.storage_key, entry = %key, error = %e, "failed to read persisted layout");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(storage_key = %self.storage_key, entry = %key, error = %e, "ignoring malformed persisted layout");
                None
            }
        }
    }

    fn save<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                warn!(storage_key = %self.storage_key, entry = %key, error = %e, "failed to encode layout");
                return;
            }
        };
        match self.store.write(key, &encoded) {
            Ok(()) => debug!(storage_key = %self.storage_key, entry = %key, "persisted layout"),
            Err(e) => {
                warn!(storage_key = %self.storage_key, entry = %key, error = %e, "failed to persist layout")
            }
        }
    }
}
