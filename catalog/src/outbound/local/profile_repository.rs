//! Signed-in profile under the session key.

use local_store::{BlobStore, JsonStore, StorageKey};
use tracing::warn;

use super::{SESSION_KEY, fixed_key, holds_raw_blob, remove_error, write_error};
use crate::domain::UserProfile;
use crate::domain::ports::{PersistenceError, ProfileRepository};

/// [`ProfileRepository`] over a JSON blob store.
///
/// A session blob that no longer decodes is deleted on load, so a damaged
/// profile reads as signed out rather than failing every command.
#[derive(Debug)]
pub struct LocalProfileRepository<B> {
    store: JsonStore<B>,
    key: StorageKey,
}

impl<B: BlobStore> LocalProfileRepository<B> {
    /// Wrap `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            store: JsonStore::new(backend),
            key: fixed_key(SESSION_KEY),
        }
    }
}

impl<B: BlobStore> ProfileRepository for LocalProfileRepository<B> {
    fn load(&self) -> Option<UserProfile> {
        let profile = self.store.get(&self.key);
        if profile.is_none() && holds_raw_blob(&self.store, &self.key) {
            warn!(key = %self.key, "discarding unreadable session profile");
            if let Err(err) = self.store.remove(&self.key) {
                warn!(key = %self.key, error = %err, "failed to discard session profile");
            }
        }
        profile
    }

    fn save(&self, profile: &UserProfile) -> Result<(), PersistenceError> {
        self.store
            .set(&self.key, profile)
            .map_err(|err| write_error(&self.key, &err))
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        self.store
            .remove(&self.key)
            .map_err(|err| remove_error(&self.key, &err))
    }
}
