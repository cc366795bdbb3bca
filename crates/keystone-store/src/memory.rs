//! In-memory object store.
//!
//! Useful for tests and single-process runs. Data is not persisted across
//! restarts.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::adapter::ObjectStore;
use crate::error::StoreResult;
use crate::item::{PropertyFilter, StoredItem};
use crate::key::{Namespace, StoreKey};

/// In-memory object store.
///
/// Thread-safe through a `parking_lot` read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<HashMap<StoreKey, StoredItem>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items held, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns true if the store holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Clears all data from the store.
    pub fn clear(&self) {
        self.items.write().clear();
    }
}

impl ObjectStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn load_item(&self, key: &StoreKey) -> StoreResult<Option<StoredItem>> {
        let now = Utc::now();
        Ok(self
            .items
            .read()
            .get(key)
            .filter(|item| !item.is_expired_at(now))
            .cloned())
    }

    fn save_item(&self, item: StoredItem) -> StoreResult<()> {
        tracing::trace!(key = %item.key, backend = "memory", "saving item");
        self.items.write().insert(item.key.clone(), item);
        Ok(())
    }

    fn query(&self, namespace: &Namespace, filter: &PropertyFilter) -> StoreResult<Vec<StoredItem>> {
        let now = Utc::now();
        let mut results: Vec<StoredItem> = self
            .items
            .read()
            .values()
            .filter(|item| &item.key.namespace == namespace)
            .filter(|item| !item.is_expired_at(now))
            .filter(|item| filter.matches(&item.properties))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(results)
    }

    fn delete_item(&self, key: &StoreKey) -> StoreResult<bool> {
        Ok(self.items.write().remove(key).is_some())
    }

    fn purge_expired(&self) -> StoreResult<usize> {
        let now = Utc::now();
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|_, item| !item.is_expired_at(now));
        Ok(before - items.len())
    }
}
