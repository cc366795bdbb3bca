//! Persistent object store on the redb embedded database.

mod store;

pub use store::RedbStore;
