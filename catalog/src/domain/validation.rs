//! Submission drafts and their field-level validation.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use url::Url;

use super::shop::{CoffeeShopRecord, Coordinates, MAX_RATING, Rating};

/// Field name used for the shop name.
pub const FIELD_NAME: &str = "name";
/// Field name used for the location and its geocoded coordinates.
pub const FIELD_LOCATION: &str = "location";
/// Field name used for the rating.
pub const FIELD_RATING: &str = "rating";
/// Field name used for the review.
pub const FIELD_REVIEW: &str = "review";
/// Field name used for the optional image URL.
pub const FIELD_IMAGE: &str = "image";

/// Field-keyed validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterate over `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Structured details suitable for [`super::Error::with_details`].
    #[must_use]
    pub fn to_details(&self) -> Value {
        json!({ "fields": self.0 })
    }

    /// Record `message` for `field`, replacing an earlier message.
    pub(crate) fn set(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Record `message` for `field` unless the field already failed.
    pub(crate) fn set_if_absent(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }
}

/// Raw add-form input before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopDraft {
    /// Shop name.
    pub name: String,
    /// Free-text location, usually the picked suggestion's display name.
    pub location: String,
    /// Selected star count; zero means "not selected".
    pub rating: u8,
    /// Review text.
    pub review: String,
    /// Optional image URL; blank values are treated as absent.
    pub image: Option<String>,
    /// Coordinates of the picked suggestion.
    pub coordinates: Option<Coordinates>,
}

/// A draft whose every field passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidShop {
    /// Trimmed shop name.
    pub name: String,
    /// Trimmed location.
    pub location: String,
    /// Rating between 1 and 5.
    pub rating: Rating,
    /// Trimmed review.
    pub review: String,
    /// Parsed image URL.
    pub image: Option<Url>,
    /// Geocoded position.
    pub coordinates: Coordinates,
}

impl ShopDraft {
    /// Validate every field, collecting all failures.
    ///
    /// A missing coordinate pair is reported against the location field and
    /// takes precedence over the "required" message, because a location the
    /// user typed but never picked cannot be placed on the map.
    ///
    /// # Errors
    ///
    /// Returns the collected [`FieldErrors`] when any field fails.
    ///
    /// # Examples
    /// ```
    /// use catalog::domain::ShopDraft;
    ///
    /// let errors = ShopDraft::default().validate().expect_err("blank draft");
    /// assert_eq!(errors.get("rating"), Some("Please select a rating"));
    /// ```
    pub fn validate(&self) -> Result<ValidShop, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.set(FIELD_NAME, "Coffee shop name is required");
        }

        let location = self.location.trim();
        if location.is_empty() {
            errors.set(FIELD_LOCATION, "Location is required");
        }
        if self.coordinates.is_none() {
            errors.set(FIELD_LOCATION, "Please select a location from the suggestions");
        }

        let rating = match self.rating {
            0 => None,
            raw => Rating::try_from(raw).ok(),
        };
        if rating.is_none() {
            let message = if self.rating == 0 {
                "Please select a rating".to_owned()
            } else {
                format!("Rating must be between 1 and {MAX_RATING}")
            };
            errors.set(FIELD_RATING, message);
        }

        let review = self.review.trim();
        if review.is_empty() {
            errors.set(FIELD_REVIEW, "Review is required");
        }

        let image = self.parsed_image(&mut errors);

        match (rating, self.coordinates) {
            (Some(rating_value), Some(coordinates)) if errors.is_empty() => Ok(ValidShop {
                name: name.to_owned(),
                location: location.to_owned(),
                rating: rating_value,
                review: review.to_owned(),
                image,
                coordinates,
            }),
            _ => Err(errors),
        }
    }

    fn parsed_image(&self, errors: &mut FieldErrors) -> Option<Url> {
        let raw = self.image.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
            _ => {
                errors.set_if_absent(FIELD_IMAGE, "Image must be a valid http(s) URL");
                None
            }
        }
    }
}

/// Partial edit of a user-submitted record.
///
/// `None` keeps the stored value. New coordinates replace the stored ones;
/// without them the stored position is kept even when the location text
/// changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopChanges {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement location text.
    pub location: Option<String>,
    /// Replacement rating.
    pub rating: Option<u8>,
    /// Replacement review.
    pub review: Option<String>,
    /// Replacement image URL; `Some("")` clears the image.
    pub image: Option<String>,
    /// Replacement coordinates.
    pub coordinates: Option<Coordinates>,
}

impl ShopChanges {
    /// Whether the changes leave the record untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the changes over `record`, producing a draft to validate.
    #[must_use]
    pub fn merge_into(&self, record: &CoffeeShopRecord) -> ShopDraft {
        ShopDraft {
            name: self.name.clone().unwrap_or_else(|| record.name.clone()),
            location: self
                .location
                .clone()
                .unwrap_or_else(|| record.location.clone()),
            rating: self.rating.unwrap_or_else(|| record.rating.get()),
            review: self.review.clone().unwrap_or_else(|| record.review.clone()),
            image: self.image.clone().or_else(|| record.image.clone()),
            coordinates: self.coordinates.or(record.coordinates),
        }
    }
}
