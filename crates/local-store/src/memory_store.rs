//! In-memory blob store for tests and ephemeral profiles.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::{BlobStore, StorageKey, StoreError};

/// Blob store backed by a map; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<BTreeMap<StorageKey, String>>,
}

impl MemoryStore {
    /// Create a store pre-populated with raw blobs.
    ///
    /// Useful for seeding corrupt or legacy contents in tests.
    #[must_use]
    pub fn with_blobs(blobs: impl IntoIterator<Item = (StorageKey, String)>) -> Self {
        Self {
            blobs: Mutex::new(blobs.into_iter().collect()),
        }
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<StorageKey, String>> {
        // A poisoned map still holds consistent strings; keep serving it.
        self.blobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &StorageKey) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &StorageKey, contents: &str) -> Result<(), StoreError> {
        self.lock().insert(key.clone(), contents.to_owned());
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}
