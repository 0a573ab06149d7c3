//! Selection records and the ordered selection map

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::catalog::CatalogItem;

/// Snapshot of a selected item, taken at selection time so the selection
/// can be shown without re-fetching the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
}

impl SelectionRecord {
    pub fn new(id: u64, title: Option<String>, artist: Option<String>) -> Self {
        Self { id, title, artist }
    }
    
    /// Title for display, never empty
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => "Untitled",
        }
    }
    
    /// First line of the artist snapshot
    pub fn display_artist(&self) -> &str {
        self.artist
            .as_deref()
            .and_then(|artist| artist.lines().next())
            .filter(|line| !line.trim().is_empty())
            .unwrap_or("Unknown artist")
    }
}

impl From<&CatalogItem> for SelectionRecord {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            artist: item.artist_display.clone(),
        }
    }
}

/// Selected records keyed by item identifier.
///
/// Iteration follows insertion order; replacing an existing key keeps its
/// position. Equality ignores order. Serialized as a JSON object whose keys
/// are the identifiers, and every key must match its record's `id`.
#[derive(Debug, Clone, Default)]
pub struct SelectionMap {
    order: Vec<u64>,
    records: HashMap<u64, SelectionRecord>,
}

impl SelectionMap {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Insert a record under its own id, returning the record it replaced
    pub fn insert(&mut self, record: SelectionRecord) -> Option<SelectionRecord> {
        let id = record.id;
        let previous = self.records.insert(id, record);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }
    
    pub fn remove(&mut self, id: u64) -> Option<SelectionRecord> {
        let removed = self.records.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(removed)
    }
    
    pub fn get(&self, id: u64) -> Option<&SelectionRecord> {
        self.records.get(&id)
    }
    
    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }
    
    pub fn len(&self) -> usize {
        self.records.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    
    pub fn clear(&mut self) {
        self.order.clear();
        self.records.clear();
    }
    
    /// Records in display order
    pub fn iter(&self) -> impl Iterator<Item = &SelectionRecord> + '_ {
        self.order.iter().filter_map(move |id| self.records.get(id))
    }
    
    /// Identifiers in display order
    #[cfg(test)]
    pub fn ids(&self) -> Vec<u64> {
        self.order.clone()
    }
    
    /// Union with `other`, where `other` wins on shared keys
    pub fn extend_from(&mut self, other: &SelectionMap) {
        for record in other.iter() {
            self.insert(record.clone());
        }
    }
}

impl PartialEq for SelectionMap {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for SelectionMap {}

impl FromIterator<SelectionRecord> for SelectionMap {
    fn from_iter<I: IntoIterator<Item = SelectionRecord>>(iter: I) -> Self {
        let mut map = SelectionMap::new();
        for record in iter {
            map.insert(record);
        }
        map
    }
}

impl Serialize for SelectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for record in self.iter() {
            map.serialize_entry(&record.id, record)?;
        }
        map.end()
    }
}

struct SelectionMapVisitor;

impl<'de> Visitor<'de> for SelectionMapVisitor {
    type Value = SelectionMap;
    
    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of item identifiers to selection records")
    }
    
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = SelectionMap::new();
        while let Some((key, record)) = access.next_entry::<u64, SelectionRecord>()? {
            if key != record.id {
                return Err(de::Error::custom(format!(
                    "selection key {} does not match record id {}",
                    key, record.id
                )));
            }
            map.insert(record);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for SelectionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SelectionMapVisitor)
    }
}
