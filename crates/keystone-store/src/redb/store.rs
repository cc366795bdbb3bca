//! RedbStore implementation.
//!
//! Implements the ObjectStore trait using redb as the underlying database.
//! Items are stored as JSON under their length-prefixed physical key.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};

use crate::adapter::ObjectStore;
use crate::error::StoreResult;
use crate::item::{PropertyFilter, StoredItem};
use crate::key::{Namespace, StoreKey};

const ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("items");

/// Redb-based object store.
///
/// Provides ACID transactions and is suitable for single-process use.
///
/// # Example
///
/// ```rust,ignore
/// use keystone_store::{RedbStore, ObjectStore};
///
/// let store = RedbStore::open("./keystone.redb")?;
/// assert!(store.is_healthy());
/// ```
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Opens or creates a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.initialize_tables()?;
        Ok(store)
    }

    fn initialize_tables(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(ITEMS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl ObjectStore for RedbStore {
    fn backend_name(&self) -> &'static str {
        "redb"
    }

    fn is_healthy(&self) -> bool {
        self.db.begin_read().is_ok()
    }

    fn load_item(&self, key: &StoreKey) -> StoreResult<Option<StoredItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ITEMS_TABLE)?;
        match table.get(key.physical().as_str())? {
            Some(data) => {
                let item: StoredItem = serde_json::from_slice(data.value())?;
                if item.is_expired() {
                    Ok(None)
                } else {
                    Ok(Some(item))
                }
            }
            None => Ok(None),
        }
    }

    fn save_item(&self, item: StoredItem) -> StoreResult<()> {
        let data = serde_json::to_vec(&item)?;
        let physical = item.key.physical();
        tracing::trace!(key = %item.key, backend = "redb", "saving item");

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ITEMS_TABLE)?;
            table.insert(physical.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn query(&self, namespace: &Namespace, filter: &PropertyFilter) -> StoreResult<Vec<StoredItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ITEMS_TABLE)?;
        let prefix = StoreKey::namespace_prefix(namespace);
        let now = Utc::now();

        let mut results = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            if !key.value().starts_with(&prefix) {
                continue;
            }
            let item: StoredItem = serde_json::from_slice(value.value())?;
            if !item.is_expired_at(now) && filter.matches(&item.properties) {
                results.push(item);
            }
        }
        Ok(results)
    }

    fn delete_item(&self, key: &StoreKey) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(ITEMS_TABLE)?;
            let result = table.remove(key.physical().as_str())?;
            result.is_some()
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    fn purge_expired(&self) -> StoreResult<usize> {
        let now = Utc::now();
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(ITEMS_TABLE)?;
            let mut expired_keys = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                let item: StoredItem = serde_json::from_slice(value.value())?;
                if item.is_expired_at(now) {
                    expired_keys.push(key.value().to_string());
                }
            }
            for key in &expired_keys {
                table.remove(key.as_str())?;
            }
            expired_keys.len()
        };
        write_txn.commit()?;
        Ok(removed)
    }
}
