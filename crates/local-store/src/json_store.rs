//! Serde layer over a [`BlobStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{BlobStore, StorageKey, StoreError};

/// JSON value store.
///
/// Reads never fail: a missing key, an unreadable backend, or a blob that no
/// longer deserialises into the requested type all yield `None`, with a
/// warning for the latter two.
#[derive(Debug, Default)]
pub struct JsonStore<B> {
    backend: B,
}

impl<B: BlobStore> JsonStore<B> {
    /// Wrap a blob backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Borrow the underlying backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Load and decode the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &StorageKey) -> Option<T> {
        let raw = match self.backend.read(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key = %key, error = %err, "stored value unreadable; treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = %key, error = %err, "stored value corrupt; treating as absent");
                None
            }
        }
    }

    /// Encode and store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] when `value` cannot be encoded, or
    /// the backend's write error.
    pub fn set<T: Serialize + ?Sized>(&self, key: &StorageKey, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value).map_err(|err| StoreError::Serialize {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        self.backend.write(key, &encoded)
    }

    /// Remove the value stored under `key`. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns the backend's removal error.
    pub fn remove(&self, key: &StorageKey) -> Result<(), StoreError> {
        self.backend.remove(key)
    }
}
