//! Key-addressed JSON blob storage for a single local profile.
//!
//! This crate stands in for browser local storage: values live under string
//! keys, survive restarts, and are scoped to one profile directory. It is
//! independent of catalog domain types so that any caller can persist its own
//! serde shapes.
//!
//! # Overview
//!
//! - [`StorageKey`] validates keys before they touch the filesystem.
//! - [`BlobStore`] is the raw byte-level contract, with a directory-backed
//!   [`DirStore`] and an in-memory [`MemoryStore`].
//! - [`JsonStore`] layers serde on top and treats unreadable or corrupt values
//!   as absent, so first runs and damaged profiles never crash callers.
//!
//! # Example
//!
//! ```
//! use local_store::{JsonStore, MemoryStore, StorageKey};
//!
//! let store = JsonStore::new(MemoryStore::default());
//! let key = StorageKey::new("brewsky_cards").expect("valid key");
//!
//! store.set(&key, &vec![1_u32, 2, 3]).expect("write succeeds");
//! let loaded: Option<Vec<u32>> = store.get(&key);
//! assert_eq!(loaded, Some(vec![1, 2, 3]));
//! ```

mod atomic_io;
mod dir_store;
mod error;
mod json_store;
mod key;
mod memory_store;

pub use dir_store::DirStore;
pub use error::StoreError;
pub use json_store::JsonStore;
pub use key::{StorageKey, StorageKeyError};
pub use memory_store::MemoryStore;

/// Raw blob storage contract shared by every backend.
///
/// Implementations store UTF-8 text under validated keys. Reads of missing
/// keys return `Ok(None)`; removal of a missing key is not an error.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] when the backend cannot be read.
    fn read(&self, key: &StorageKey) -> Result<Option<String>, StoreError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] when the backend rejects the write.
    fn write(&self, key: &StorageKey, contents: &str) -> Result<(), StoreError>;

    /// Delete the blob stored under `key`. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Remove`] when the backend rejects the removal.
    fn remove(&self, key: &StorageKey) -> Result<(), StoreError>;
}

impl<T: BlobStore + ?Sized> BlobStore for std::sync::Arc<T> {
    fn read(&self, key: &StorageKey) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &StorageKey, contents: &str) -> Result<(), StoreError> {
        (**self).write(key, contents)
    }

    fn remove(&self, key: &StorageKey) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
