//! Key -> string persistence backends.
//!
//! The manager only talks to `PersistenceStore`. Two backends are provided:
//! - `MemoryStore`: shared in-memory map, optionally size-limited
//! - `FileStore`: one JSON file per key in a data directory

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::PersistenceError;

const FILE_EXTENSION: &str = "json";

/// Durable string storage addressed by key
pub trait PersistenceStore {
    /// Read a slot; `Ok(None)` when it was never written or has been removed
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Overwrite a slot
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Delete a slot (no-op when absent)
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;

    /// Delete every slot
    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// In-memory store
///
/// Clones share the same contents, so a clone handed to a fresh manager
/// behaves like reloading the page against the same browser storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    /// Maximum total size of keys and values in bytes
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys and values exceed `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::default(),
            capacity: Some(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn used_bytes_excluding(entries: &HashMap<String, String>, key: &str) -> usize {
        entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.write();
        if let Some(capacity) = self.capacity {
            let used = Self::used_bytes_excluding(&entries, key);
            let needed = key.len() + value.len();
            let available = capacity.saturating_sub(used);
            if needed > available {
                return Err(PersistenceError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.entries.write().clear();
        Ok(())
    }
}

/// Store backed by `<dir>/<key>.json` files
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the default data directory (gallery-state in local data directory)
    pub fn default_dir() -> PathBuf {
        const DIRNAME: &str = "gallery-state";
        if let Some(mut path) = dirs::data_local_dir() {
            path.push(DIRNAME);
            return path;
        }

        // Fallback to home directory
        if let Some(mut path) = dirs::home_dir() {
            path.push(format!(".{DIRNAME}"));
            return path;
        }

        PathBuf::from(DIRNAME)
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{FILE_EXTENSION}"))
    }
}

fn io_error(key: &str, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        key: key.to_string(),
        source,
    }
}

impl PersistenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.slot_path(key);
        tracing::debug!(path = %path.display(), bytes = value.len(), "Writing store slot");

        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;
        fs::write(&path, value).map_err(|e| io_error(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }

    /// Delete every `.json` slot file in the directory, leaving other files alone
    fn clear(&mut self) -> Result<(), PersistenceError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(io_error("*", e)),
        };

        for entry in entries {
            let path = entry.map_err(|e| io_error("*", e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("*")
                .to_string();
            fs::remove_file(&path).map_err(|e| io_error(&key, e))?;
        }
        Ok(())
    }
}
