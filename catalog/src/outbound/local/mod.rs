//! Repositories backed by a key-addressed JSON blob store.
//!
//! Each repository owns a [`JsonStore`] over any [`BlobStore`]; share one
//! [`DirStore`](local_store::DirStore) between them by wrapping it in an
//! `Arc`.

mod dto;
mod favorites_repository;
mod profile_repository;
mod shop_repository;

use local_store::{BlobStore, JsonStore, StorageKey, StoreError};

use crate::domain::ports::PersistenceError;

pub use favorites_repository::LocalFavoritesRepository;
pub use profile_repository::LocalProfileRepository;
pub use shop_repository::LocalShopRepository;

/// Key holding the signed-in profile.
pub const SESSION_KEY: &str = "brewsky_user";
/// Key holding the user-added shops.
pub const CARDS_KEY: &str = "brewsky_cards";
/// Prefix of per-user favorites keys.
pub const FAVORITES_PREFIX: &str = "favorites";

fn fixed_key(raw: &'static str) -> StorageKey {
    // Constant keys are valid by construction; the tests pin each one.
    StorageKey::new(raw).unwrap_or_else(|err| panic!("invalid built-in key {raw}: {err}"))
}

fn write_error(key: &StorageKey, err: &StoreError) -> PersistenceError {
    PersistenceError::write(key.as_str(), err.to_string())
}

fn remove_error(key: &StorageKey, err: &StoreError) -> PersistenceError {
    PersistenceError::remove(key.as_str(), err.to_string())
}

/// Whether a blob exists under `key` even though it failed to decode.
fn holds_raw_blob<B: BlobStore>(store: &JsonStore<B>, key: &StorageKey) -> bool {
    matches!(store.backend().read(key), Ok(Some(_)))
}
