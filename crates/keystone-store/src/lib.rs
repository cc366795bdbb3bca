//! # Keystone Store
//!
//! Namespaced object store used for instrument templates, holiday calendars
//! and pricing structures.
//!
//! Every item lives under an explicit [`StoreKey`] (namespace plus id) and
//! carries a [`Properties`](keystone_core::types::Properties) bag that can be
//! queried with a [`PropertyFilter`].
//!
//! ## Backends
//!
//! - [`InMemoryStore`]: map behind a read/write lock, for tests and single runs
//! - [`RedbStore`]: persistent store on the `redb` embedded database
//!
//! ## Example
//!
//! ```rust
//! use keystone_store::{InMemoryStore, ObjectStore, ObjectStoreExt, StoreKey};
//! use keystone_core::types::Properties;
//!
//! let store = InMemoryStore::new();
//! let key = StoreKey::new("Orion", "Market.Holidays");
//! store.save_object(key.clone(), &vec!["2025-01-01"], Properties::new(), None).unwrap();
//!
//! let (dates, _): (Vec<String>, _) = store.load_object(&key).unwrap().unwrap();
//! assert_eq!(dates, vec!["2025-01-01"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod error;
pub mod item;
pub mod key;
pub mod memory;
pub mod redb;

pub use adapter::{ObjectStore, ObjectStoreExt};
pub use error::{StoreError, StoreResult};
pub use item::{PropertyFilter, StoredItem};
pub use key::{Namespace, StoreKey};
pub use memory::InMemoryStore;
pub use redb::RedbStore;
