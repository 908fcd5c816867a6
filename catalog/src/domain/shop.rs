//! Coffee-shop records and their value types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable shop identifier, unique across presets and user submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopId(u64);

impl ShopId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ShopId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Highest rating a shop can carry.
pub const MAX_RATING: u8 = 5;

/// Star rating between 0 and [`MAX_RATING`].
///
/// Zero is representable so that legacy records survive loading; the add
/// flow rejects it.
///
/// # Examples
/// ```
/// use catalog::domain::Rating;
///
/// assert_eq!(Rating::try_from(4).map(Rating::get), Ok(4));
/// assert!(Rating::try_from(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

/// Error returned for ratings above [`MAX_RATING`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be between 0 and {MAX_RATING}, got {0}")]
pub struct RatingOutOfRange(pub u8);

impl Rating {
    /// Raw star count.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > MAX_RATING {
            return Err(RatingOutOfRange(value));
        }
        Ok(Self(value))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic position in degrees.
///
/// Serialised as a `[longitude, latitude]` pair, the order map libraries use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    longitude: f64,
    latitude: f64,
}

/// Validation failures for [`Coordinates`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinatesError {
    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude must be a finite value within [-180, 180], got {0}")]
    Longitude(f64),
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude must be a finite value within [-90, 90], got {0}")]
    Latitude(f64),
}

impl Coordinates {
    /// Validate and construct a position.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatesError`] when either component is non-finite or
    /// out of range.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, CoordinatesError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::Longitude(longitude));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::Latitude(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    /// Planar distance in degrees between two positions.
    ///
    /// Not a geodesic distance; adequate for "is this close to the map
    /// centre" checks over small areas.
    #[must_use]
    pub fn planar_distance(self, other: Self) -> f64 {
        (self.longitude - other.longitude).hypot(self.latitude - other.latitude)
    }
}

impl TryFrom<[f64; 2]> for Coordinates {
    type Error = CoordinatesError;

    fn try_from([longitude, latitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.longitude, value.latitude]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// A catalog entry, either a curated preset or a user submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeShopRecord {
    /// Unique identifier.
    pub id: ShopId,
    /// Display name.
    pub name: String,
    /// Free-text address or region.
    pub location: String,
    /// Star rating.
    pub rating: Rating,
    /// Free-text review.
    pub review: String,
    /// Optional image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Creation timestamp; never changes after insertion.
    pub date_added: DateTime<Utc>,
    /// Geocoded position, present only for entries picked from suggestions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Whether a user submitted this entry.
    #[serde(default)]
    pub is_user_added: bool,
}

impl CoffeeShopRecord {
    /// Whether any of name, location or review contains `needle`.
    ///
    /// `needle` must already be lower-cased.
    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        [&self.name, &self.location, &self.review]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}
