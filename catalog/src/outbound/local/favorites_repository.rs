//! Per-user favorites under `favorites.<user id>`.

use local_store::{BlobStore, JsonStore, StorageKey};

use super::{FAVORITES_PREFIX, write_error};
use crate::domain::ports::{FavoritesRepository, PersistenceError};
use crate::domain::{CoffeeShopRecord, UserId};

/// [`FavoritesRepository`] over a JSON blob store.
#[derive(Debug)]
pub struct LocalFavoritesRepository<B> {
    store: JsonStore<B>,
}

impl<B: BlobStore> LocalFavoritesRepository<B> {
    /// Wrap `backend`.
    pub const fn new(backend: B) -> Self {
        Self {
            store: JsonStore::new(backend),
        }
    }
}

fn favorites_key(user: &UserId) -> Result<StorageKey, PersistenceError> {
    let raw = format!("{FAVORITES_PREFIX}.{user}");
    StorageKey::new(raw.as_str()).map_err(|err| PersistenceError::write(raw, err.to_string()))
}

impl<B: BlobStore> FavoritesRepository for LocalFavoritesRepository<B> {
    fn load(&self, user: &UserId) -> Vec<CoffeeShopRecord> {
        favorites_key(user)
            .ok()
            .and_then(|key| self.store.get(&key))
            .unwrap_or_default()
    }

    fn save(&self, user: &UserId, favorites: &[CoffeeShopRecord]) -> Result<(), PersistenceError> {
        let key = favorites_key(user)?;
        self.store
            .set(&key, favorites)
            .map_err(|err| write_error(&key, &err))
    }
}
