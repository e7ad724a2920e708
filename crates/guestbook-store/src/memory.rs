// ABOUTME: In-memory EntryDao backend, the reference implementation for the contract.
// ABOUTME: Holds entries in a RwLock-guarded BTreeMap and sorts on demand for load_all.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use guestbook_core::{Entry, Id};

use crate::dao::{EntryDao, StoreError};

/// In-memory, map-backed entry store.
///
/// This backend defines ground truth for the contract's ordering, boundary,
/// and no-op semantics. Entries live behind a `RwLock` for safe concurrent
/// access and are cloned on read. Ordering never relies on insertion order:
/// `load_all` sorts on demand.
pub struct MemoryEntryDao {
    entries: RwLock<BTreeMap<Id, Entry>>,
}

impl MemoryEntryDao {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryEntryDao {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryDao for MemoryEntryDao {
    fn add(&self, entry: Entry) -> Result<(), StoreError> {
        let mut map = self.entries.write().expect("lock poisoned");
        if map.contains_key(&entry.id) {
            return Err(StoreError::DuplicateId(entry.id));
        }
        map.insert(entry.id.clone(), entry);
        Ok(())
    }

    fn load(&self, id: &Id) -> Result<Option<Entry>, StoreError> {
        // Same shape short-circuit as the durable backend: lookups with
        // malformed ids resolve to absence in every backend.
        if !id.is_valid() {
            return Ok(None);
        }
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn remove(&self, id: &Id) -> Result<(), StoreError> {
        let mut map = self.entries.write().expect("lock poisoned");
        map.remove(id);
        Ok(())
    }

    fn update_text(&self, id: &Id, text: &str) -> Result<(), StoreError> {
        let mut map = self.entries.write().expect("lock poisoned");
        if let Some(entry) = map.get_mut(id) {
            entry.text = text.to_string();
        }
        Ok(())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.len() as u64)
    }

    fn load_all(&self) -> Result<Vec<Entry>, StoreError> {
        let map = self.entries.read().expect("lock poisoned");
        let mut all: Vec<Entry> = map.values().cloned().collect();
        // Newest first; ties broken ascending by id so the order is total.
        all.sort_by(|a, b| b.entered.cmp(&a.entered).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    fn count_newer_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let cutoff_ms = cutoff.timestamp_millis();
        let map = self.entries.read().expect("lock poisoned");
        let n = map
            .values()
            .filter(|e| e.entered.timestamp_millis() > cutoff_ms)
            .count();
        Ok(n as u64)
    }

    fn load_authored_by(&self, author: &Id) -> Result<Vec<Entry>, StoreError> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map
            .values()
            .filter(|e| &e.author_id == author)
            .cloned()
            .collect())
    }
}

impl std::fmt::Debug for MemoryEntryDao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.read().expect("lock poisoned").len();
        f.debug_struct("MemoryEntryDao")
            .field("entry_count", &count)
            .finish()
    }
}
