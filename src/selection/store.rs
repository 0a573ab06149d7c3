//! The persistent selection store

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{
    blob::{BlobStore, PersistResult},
    record::{SelectionMap, SelectionRecord},
};
use crate::catalog::CatalogItem;

/// Default blob slot for the selection
pub const DEFAULT_STORAGE_KEY: &str = "selected_artworks";

/// Source of truth for which items are selected.
///
/// Every mutation writes the full map back to the blob store before
/// returning. A failed write is logged and otherwise ignored: the in-memory
/// selection stays authoritative for the rest of the session.
pub struct SelectionStore {
    blob: Arc<dyn BlobStore>,
    key: String,
    map: SelectionMap,
    last_persist_error: Option<String>,
}

impl SelectionStore {
    /// Open the store, restoring whatever selection was persisted under `key`.
    ///
    /// Absent, unreadable or malformed data all start an empty selection.
    pub fn load(blob: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let map = match blob.read(&key) {
            Ok(Some(content)) => match serde_json::from_str::<SelectionMap>(&content) {
                Ok(map) => {
                    info!("Restored {} selected items from '{}'", map.len(), key);
                    map
                }
                Err(e) => {
                    warn!("Discarding malformed selection blob '{}': {}", key, e);
                    SelectionMap::new()
                }
            },
            Ok(None) => {
                debug!("No persisted selection under '{}'", key);
                SelectionMap::new()
            }
            Err(e) => {
                warn!("Failed to read selection blob '{}': {}", key, e);
                SelectionMap::new()
            }
        };
        
        Self {
            blob,
            key,
            map,
            last_persist_error: None,
        }
    }
    
    /// Insert or replace the entry for the record's id
    pub fn set(&mut self, record: SelectionRecord) {
        self.map.insert(record);
        self.persist();
    }
    
    /// Delete the entry for `id`; no-op when absent
    pub fn remove(&mut self, id: u64) {
        self.map.remove(id);
        self.persist();
    }
    
    /// Empty the selection
    pub fn clear(&mut self) {
        self.map.clear();
        self.persist();
    }
    
    /// Merge `records` into the selection.
    ///
    /// With `overwrite` the selection becomes exactly `records`; otherwise
    /// `records` are layered on top, replacing entries with the same id.
    pub fn merge(&mut self, records: SelectionMap, overwrite: bool) {
        if overwrite {
            self.map = records;
        } else {
            self.map.extend_from(&records);
        }
        self.persist();
    }
    
    /// Apply a checkbox change for `item`
    pub fn toggle(&mut self, item: &CatalogItem, checked: bool) {
        if checked {
            self.set(SelectionRecord::from(item));
        } else {
            self.remove(item.id);
        }
    }
    
    pub fn contains(&self, id: u64) -> bool {
        self.map.contains(id)
    }
    
    pub fn get(&self, id: u64) -> Option<&SelectionRecord> {
        self.map.get(id)
    }
    
    pub fn len(&self) -> usize {
        self.map.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
    
    /// The current selection
    pub fn map(&self) -> &SelectionMap {
        &self.map
    }
    
    /// Records in display order
    pub fn records(&self) -> Vec<SelectionRecord> {
        self.map.iter().cloned().collect()
    }
    
    /// Message of the most recent failed write, cleared by the next good one
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }
    
    fn persist(&mut self) {
        match self.write_blob() {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                warn!("Failed to persist selection to '{}': {}", self.key, e);
                self.last_persist_error = Some(e.to_string());
            }
        }
    }
    
    fn write_blob(&self) -> PersistResult<()> {
        let content = serde_json::to_string(&self.map)?;
        self.blob.write(&self.key, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::MemoryBlobStore;
    
    const KEY: &str = DEFAULT_STORAGE_KEY;
    
    fn record(id: u64, title: &str) -> SelectionRecord {
        SelectionRecord::new(id, Some(title.to_string()), Some(format!("Artist {}", id)))
    }
    
    fn open(blob: &MemoryBlobStore) -> SelectionStore {
        SelectionStore::load(Arc::new(blob.clone()), KEY)
    }
    
    fn persisted(blob: &MemoryBlobStore) -> SelectionMap {
        serde_json::from_str(&blob.get(KEY).unwrap()).unwrap()
    }
    
    #[test]
    fn test_absent_blob_starts_empty() {
        let blob = MemoryBlobStore::new();
        let store = open(&blob);
        assert!(store.is_empty());
        assert_eq!(blob.write_count(), 0);
    }
    
    #[test]
    fn test_not_json_blob_starts_empty() {
        let blob = MemoryBlobStore::with_blob(KEY, "not json");
        let store = open(&blob);
        assert!(store.is_empty());
    }
    
    #[test]
    fn test_wrong_shape_blob_starts_empty() {
        let blob = MemoryBlobStore::with_blob(KEY, "[1, 2, 3]");
        assert!(open(&blob).is_empty());
    }
    
    #[test]
    fn test_restores_persisted_selection() {
        let blob = MemoryBlobStore::new();
        {
            let mut store = open(&blob);
            store.set(record(3, "c"));
            store.set(record(1, "a"));
        }
        
        let store = open(&blob);
        assert_eq!(store.len(), 2);
        assert_eq!(store.map().ids(), vec![3, 1]);
        assert_eq!(store.get(1), Some(&record(1, "a")));
    }
    
    #[test]
    fn test_every_mutation_persists() {
        let blob = MemoryBlobStore::new();
        let mut store = open(&blob);
        
        store.set(record(1, "a"));
        assert_eq!(persisted(&blob).len(), 1);
        
        store.remove(1);
        assert!(persisted(&blob).is_empty());
        
        store.remove(42);
        store.merge(vec![record(2, "b")].into_iter().collect(), false);
        assert_eq!(persisted(&blob).len(), 1);
        
        assert_eq!(blob.write_count(), 4);
    }
    
    #[test]
    fn test_clear_twice_persists_empty_twice() {
        let blob = MemoryBlobStore::new();
        let mut store = open(&blob);
        store.set(record(1, "a"));
        
        store.clear();
        assert!(store.is_empty());
        assert!(persisted(&blob).is_empty());
        
        store.clear();
        assert!(store.is_empty());
        assert!(persisted(&blob).is_empty());
        assert_eq!(blob.write_count(), 3);
    }
    
    #[test]
    fn test_merge_overwrite_replaces_everything() {
        let blob = MemoryBlobStore::new();
        let mut store = open(&blob);
        store.set(record(1, "a"));
        store.set(record(2, "b"));
        
        let incoming: SelectionMap = vec![record(2, "b2"), record(3, "c")].into_iter().collect();
        store.merge(incoming.clone(), true);
        
        assert_eq!(store.map(), &incoming);
        assert!(!store.contains(1));
    }
    
    #[test]
    fn test_merge_add_is_right_biased_union() {
        let blob = MemoryBlobStore::new();
        let mut store = open(&blob);
        store.set(record(1, "a"));
        store.set(record(2, "b"));
        let prior = store.map().clone();
        
        let incoming: SelectionMap = vec![record(2, "b2"), record(3, "c")].into_iter().collect();
        store.merge(incoming.clone(), false);
        
        for id in [1, 2, 3] {
            let expected = incoming.get(id).or_else(|| prior.get(id));
            assert_eq!(store.get(id), expected);
        }
        assert_eq!(store.len(), 3);
    }
    
    #[test]
    fn test_toggle() {
        let blob = MemoryBlobStore::new();
        let mut store = open(&blob);
        let item = CatalogItem::new(9, "The Old Guitarist").with_artist("Pablo Picasso");
        
        store.toggle(&item, true);
        assert_eq!(store.get(9).unwrap().artist.as_deref(), Some("Pablo Picasso"));
        
        store.toggle(&item, false);
        assert!(!store.contains(9));
    }
    
    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let blob = MemoryBlobStore::new();
        let mut store = open(&blob);
        blob.set_fail_writes(true);
        
        store.set(record(1, "a"));
        assert!(store.contains(1));
        assert!(store.last_persist_error().is_some());
        assert!(blob.get(KEY).is_none());
        
        blob.set_fail_writes(false);
        store.set(record(2, "b"));
        assert!(store.last_persist_error().is_none());
        assert_eq!(persisted(&blob).len(), 2);
    }
}
