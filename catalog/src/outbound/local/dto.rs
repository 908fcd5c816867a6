//! Stored shape of user-added shops.
//!
//! The browser client persisted cards as `{id, name, address, coordinates,
//! rating, review, image, dateAdded}`; the address field carries what the
//! domain calls the location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CoffeeShopRecord, Coordinates, Rating, ShopId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StoredShopDto {
    pub(super) id: ShopId,
    pub(super) name: String,
    pub(super) address: String,
    #[serde(default)]
    pub(super) coordinates: Option<Coordinates>,
    pub(super) rating: Rating,
    #[serde(default)]
    pub(super) review: String,
    #[serde(default)]
    pub(super) image: Option<String>,
    pub(super) date_added: DateTime<Utc>,
}

impl From<&CoffeeShopRecord> for StoredShopDto {
    fn from(record: &CoffeeShopRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            address: record.location.clone(),
            coordinates: record.coordinates,
            rating: record.rating,
            review: record.review.clone(),
            image: record.image.clone(),
            date_added: record.date_added,
        }
    }
}

impl From<StoredShopDto> for CoffeeShopRecord {
    fn from(stored: StoredShopDto) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            location: stored.address,
            rating: stored.rating,
            review: stored.review,
            image: stored.image.filter(|url| !url.trim().is_empty()),
            date_added: stored.date_added,
            coordinates: stored.coordinates,
            is_user_added: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn decodes_browser_card_shape() {
        let raw = json!({
            "id": 1_736_500_000_000_u64,
            "name": "Blue Star",
            "address": "Twisp, WA",
            "coordinates": [-120.12, 48.36],
            "rating": 4,
            "review": "Good pour-over.",
            "image": "",
            "dateAdded": "2025-01-10T12:00:00Z"
        });

        let stored: StoredShopDto = serde_json::from_value(raw).expect("card decodes");
        let record = CoffeeShopRecord::from(stored);

        assert_eq!(record.location, "Twisp, WA");
        assert!(record.image.is_none());
        assert!(record.is_user_added);
        assert_eq!(
            record.coordinates.map(|c| (c.longitude(), c.latitude())),
            Some((-120.12, 48.36))
        );
    }

    #[rstest]
    fn encodes_location_as_address() {
        let mut record = crate::domain::preset_shops().remove(0);
        record.is_user_added = true;

        let encoded = serde_json::to_value(StoredShopDto::from(&record)).expect("encodes");

        assert_eq!(encoded["address"], json!(record.location));
        assert!(encoded.get("location").is_none());
        assert!(encoded.get("isUserAdded").is_none());
    }
}
