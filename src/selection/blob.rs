//! Key-value blob persistence for the selection map

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
    
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// A string-keyed slot store holding opaque text blobs
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, `None` if nothing was ever written
    fn read(&self, key: &str) -> PersistResult<Option<String>>;
    
    /// Replace the blob stored under `key`
    fn write(&self, key: &str, value: &str) -> PersistResult<()>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
    
    /// Path backing `key`
    pub fn path_for(&self, key: &str) -> PersistResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(PersistError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> PersistResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
    
    fn write(&self, key: &str, value: &str) -> PersistResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        
        // Write to a sibling file first so a crash never leaves half a blob
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        
        debug!("Persisted {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// In-process blob store. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<Mutex<bool>>,
    #[cfg(test)]
    writes: Arc<Mutex<usize>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryBlobStore {
    /// Start with `value` already stored under `key`
    pub fn with_blob(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut slots) = store.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        store
    }
    
    /// Make every following write fail
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }
    
    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|count| *count).unwrap_or(0)
    }
    
    /// Current content of a slot
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> PersistResult<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| PersistError::Unavailable("memory store poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }
    
    fn write(&self, key: &str, value: &str) -> PersistResult<()> {
        let failing = self.fail_writes.lock().map(|flag| *flag).unwrap_or(false);
        if failing {
            return Err(PersistError::Unavailable("writes disabled".to_string()));
        }
        
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| PersistError::Unavailable("memory store poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        
        #[cfg(test)]
        if let Ok(mut writes) = self.writes.lock() {
            *writes += 1;
        }
        Ok(())
    }
}
