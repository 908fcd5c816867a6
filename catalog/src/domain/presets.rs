//! Curated shops shipped with the catalog.

use chrono::{DateTime, Utc};

use super::shop::{CoffeeShopRecord, Rating, ShopId};

struct Preset {
    id: u64,
    name: &'static str,
    location: &'static str,
    rating: u8,
    review: &'static str,
    image: &'static str,
    added_at: i64,
}

/// 2025-01-01T00:00:00Z.
const FIRST_PRESET_AT: i64 = 1_735_689_600;
const DAY: i64 = 86_400;

const PRESETS: [Preset; 5] = [
    Preset {
        id: 1,
        name: "Starbucks",
        location: "Multiple Locations Worldwide",
        rating: 4,
        review: "Consistent quality and wide variety of drinks. Great for a reliable coffee experience.",
        image: "https://images.unsplash.com/photo-1559827260-dc66d52bef19?w=400&h=200&fit=crop&crop=center",
        added_at: FIRST_PRESET_AT,
    },
    Preset {
        id: 2,
        name: "Dutch Bros Coffee",
        location: "Pacific Northwest & Southwest US",
        rating: 5,
        review: "Amazing energy drinks and friendly baristas! Love their seasonal specials and drive-thru service.",
        image: "https://images.unsplash.com/photo-1542181961-9590d0c79dab?w=400&h=200&fit=crop&crop=center",
        added_at: FIRST_PRESET_AT + DAY,
    },
    Preset {
        id: 3,
        name: "Bluestar Coffee Roasters",
        location: "Twisp, WA",
        rating: 5,
        review: "Hidden gem in the beautiful Methow Valley! Exceptional locally roasted beans and cozy atmosphere.",
        image: "https://images.unsplash.com/photo-1501339847302-ac426a4a7cbb?w=400&h=200&fit=crop&crop=center",
        added_at: FIRST_PRESET_AT + 2 * DAY,
    },
    Preset {
        id: 4,
        name: "Cruisin Coffee",
        location: "Bellingham, WA",
        rating: 4,
        review: "Great local coffee spot with a fun nautical theme. Perfect for studying and the baristas know their craft.",
        image: "https://images.unsplash.com/photo-1447933601403-0c6688de566e?w=400&h=200&fit=crop&crop=center",
        added_at: FIRST_PRESET_AT + 3 * DAY,
    },
    Preset {
        id: 5,
        name: "Blue Bottle Coffee",
        location: "Oakland, CA (Multiple Locations)",
        rating: 4,
        review: "Artisanal coffee with attention to detail. Their single-origin pour-overs are exceptional.",
        image: "https://images.unsplash.com/photo-1509042239860-f550ce710b93?w=400&h=200&fit=crop&crop=center",
        added_at: FIRST_PRESET_AT + 4 * DAY,
    },
];

/// Build the preset records in their fixed order.
///
/// Presets are never user-added, carry no coordinates, and cannot be edited
/// or deleted.
#[must_use]
pub fn preset_shops() -> Vec<CoffeeShopRecord> {
    PRESETS
        .iter()
        .map(|preset| CoffeeShopRecord {
            id: ShopId::new(preset.id),
            name: preset.name.to_owned(),
            location: preset.location.to_owned(),
            rating: Rating::try_from(preset.rating).unwrap_or_default(),
            review: preset.review.to_owned(),
            image: Some(preset.image.to_owned()),
            date_added: DateTime::<Utc>::from_timestamp(preset.added_at, 0).unwrap_or_default(),
            coordinates: None,
            is_user_added: false,
        })
        .collect()
}
