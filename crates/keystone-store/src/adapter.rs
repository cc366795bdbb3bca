//! Object store trait definition.
//!
//! This module defines the core `ObjectStore` trait that all backends
//! implement, plus typed helpers layered on top of it.

use chrono::Duration;
use keystone_core::types::Properties;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreResult;
use crate::item::{PropertyFilter, StoredItem};
use crate::key::{Namespace, StoreKey};

/// Core object store trait.
///
/// All backends (redb, in-memory) implement this trait. Methods are
/// synchronous; implementations do their own locking. Expired items are
/// never returned.
///
/// # Example
///
/// ```rust
/// use keystone_store::{InMemoryStore, ObjectStore};
///
/// let store = InMemoryStore::new();
/// assert!(store.is_healthy());
/// assert_eq!(store.backend_name(), "memory");
/// ```
pub trait ObjectStore: Send + Sync {
    /// Returns the backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Checks if the store is healthy and accessible.
    fn is_healthy(&self) -> bool;

    /// Loads an item; `None` when absent or expired.
    fn load_item(&self, key: &StoreKey) -> StoreResult<Option<StoredItem>>;

    /// Saves an item, replacing any existing item under the same key.
    fn save_item(&self, item: StoredItem) -> StoreResult<()>;

    /// Returns every live item in `namespace` whose properties match `filter`.
    fn query(&self, namespace: &Namespace, filter: &PropertyFilter) -> StoreResult<Vec<StoredItem>>;

    /// Deletes an item. Returns true if something was removed.
    fn delete_item(&self, key: &StoreKey) -> StoreResult<bool>;

    /// Removes expired items. Returns the number removed.
    fn purge_expired(&self) -> StoreResult<usize>;
}

/// Typed load/save helpers over any [`ObjectStore`].
pub trait ObjectStoreExt: ObjectStore {
    /// Serializes `value` and saves it with `properties` and an optional time-to-live.
    fn save_object<T: Serialize + ?Sized>(
        &self,
        key: StoreKey,
        value: &T,
        properties: Properties,
        ttl: Option<Duration>,
    ) -> StoreResult<()> {
        let data = serde_json::to_value(value)?;
        self.save_item(StoredItem::new(key, data, properties).with_ttl(ttl))
    }

    /// Loads and deserializes an object together with its properties.
    fn load_object<T: DeserializeOwned>(&self, key: &StoreKey) -> StoreResult<Option<(T, Properties)>> {
        match self.load_item(key)? {
            Some(item) => {
                let value = serde_json::from_value(item.data)?;
                Ok(Some((value, item.properties)))
            }
            None => Ok(None),
        }
    }
}

impl<S: ObjectStore + ?Sized> ObjectStoreExt for S {}
