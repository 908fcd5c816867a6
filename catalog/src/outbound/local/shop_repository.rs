//! User-added shops under the cards key.

use local_store::{BlobStore, JsonStore, StorageKey};
use serde_json::Value;
use tracing::{debug, warn};

use super::dto::StoredShopDto;
use super::{CARDS_KEY, fixed_key, write_error};
use crate::domain::CoffeeShopRecord;
use crate::domain::ports::{PersistenceError, ShopRepository};

/// [`ShopRepository`] over a JSON blob store.
#[derive(Debug)]
pub struct LocalShopRepository<B> {
    store: JsonStore<B>,
    key: StorageKey,
}

impl<B: BlobStore> LocalShopRepository<B> {
    /// Wrap `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            store: JsonStore::new(backend),
            key: fixed_key(CARDS_KEY),
        }
    }
}

impl<B: BlobStore> ShopRepository for LocalShopRepository<B> {
    /// Cards are decoded one by one; a card that no longer decodes is
    /// skipped so the rest of the list survives the next save.
    fn load(&self) -> Vec<CoffeeShopRecord> {
        let raw: Vec<Value> = self.store.get(&self.key).unwrap_or_default();
        let total = raw.len();
        let shops: Vec<CoffeeShopRecord> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, card)| match serde_json::from_value::<StoredShopDto>(card) {
                Ok(stored) => Some(CoffeeShopRecord::from(stored)),
                Err(error) => {
                    warn!(key = %self.key, index, %error, "skipping unreadable stored shop");
                    None
                }
            })
            .collect();
        debug!(count = shops.len(), skipped = total - shops.len(), "loaded user-added shops");
        shops
    }

    fn save(&self, shops: &[CoffeeShopRecord]) -> Result<(), PersistenceError> {
        let stored: Vec<StoredShopDto> = shops.iter().map(StoredShopDto::from).collect();
        self.store
            .set(&self.key, &stored)
            .map_err(|err| write_error(&self.key, &err))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use local_store::MemoryStore;
    use mockable::DefaultClock;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{FixtureSession, Notifier, RecordingNotifier};
    use crate::domain::{CatalogService, Coordinates, ShopDraft, ShopId, UserId, preset_shops};

    fn user_added() -> Vec<CoffeeShopRecord> {
        preset_shops()
            .into_iter()
            .take(2)
            .map(|record| CoffeeShopRecord {
                is_user_added: true,
                ..record
            })
            .collect()
    }

    #[rstest]
    fn saved_shops_load_back_in_order() {
        let repo = LocalShopRepository::new(MemoryStore::default());
        let shops = user_added();

        repo.save(&shops).expect("save succeeds");

        assert_eq!(repo.load(), shops);
    }

    #[rstest]
    fn missing_key_loads_empty() {
        assert!(LocalShopRepository::new(MemoryStore::default()).load().is_empty());
    }

    #[rstest]
    fn unreadable_card_is_skipped() {
        let cards = r#"[
            {"id": 7, "name": "Kept", "address": "Twisp, WA", "rating": 4,
             "review": "Fine.", "image": "", "dateAdded": "2025-01-10T12:00:00Z"},
            {"id": 8, "name": "Broken", "rating": 9}
        ]"#;
        let backend = MemoryStore::with_blobs([(fixed_key(CARDS_KEY), cards.to_owned())]);

        let loaded = LocalShopRepository::new(backend).load();

        let names: Vec<&str> = loaded.iter().map(|shop| shop.name.as_str()).collect();
        assert_eq!(names, vec!["Kept"]);
    }

    #[rstest]
    fn add_then_remove_restores_the_catalog() {
        let backend = Arc::new(MemoryStore::default());
        let repo = Arc::new(LocalShopRepository::new(Arc::clone(&backend)));
        let seeded: Vec<CoffeeShopRecord> = user_added()
            .into_iter()
            .zip([1_736_467_200_000, 1_736_380_800_000])
            .map(|(shop, id)| CoffeeShopRecord {
                id: ShopId::new(id),
                ..shop
            })
            .collect();
        repo.save(&seeded).expect("seed succeeds");
        let mut service = CatalogService::new(
            Arc::clone(&repo),
            Arc::new(FixtureSession::signed_in(UserId::for_email("ada@example.com"))),
            Arc::new(RecordingNotifier::default()) as Arc<dyn Notifier>,
            Arc::new(DefaultClock),
        );
        let before: Vec<CoffeeShopRecord> = service.shops().cloned().collect();

        let added = service
            .add(&ShopDraft {
                name: "Merit Coffee".to_owned(),
                location: "San Antonio, TX".to_owned(),
                rating: 5,
                review: "Bright, clean pour-overs.".to_owned(),
                image: None,
                coordinates: Some(Coordinates::new(-98.49, 29.42).expect("valid coordinates")),
            })
            .expect("add succeeds");
        assert!(service.remove(added.id).expect("remove succeeds"));

        let after: Vec<CoffeeShopRecord> = service.shops().cloned().collect();
        assert_eq!(after, before);
        assert_eq!(repo.load(), seeded);
    }

    #[rstest]
    fn corrupt_blob_loads_empty() {
        let backend = MemoryStore::with_blobs([(fixed_key(CARDS_KEY), "{not json".to_owned())]);
        assert!(LocalShopRepository::new(backend).load().is_empty());
    }
}
