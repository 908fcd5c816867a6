//! Viewport-centre proximity matching for user-added shops.

use std::collections::BTreeSet;

use super::shop::{CoffeeShopRecord, Coordinates, ShopId};

/// Default match radius in degrees.
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 0.05;

/// Error returned for a threshold that is not a positive finite number.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("proximity threshold must be a positive finite number of degrees, got {0}")]
pub struct InvalidThreshold(pub f64);

/// Associates a map centre with nearby user-added shops.
///
/// Distance is planar in degrees; a shop matches when it lies strictly
/// closer than the threshold.
///
/// # Examples
/// ```
/// use catalog::domain::{Coordinates, ProximityMatcher};
///
/// let matcher = ProximityMatcher::default();
/// let centre = Coordinates::new(-120.18, 48.36).expect("valid centre");
/// assert!(matcher.nearby(centre, &[]).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityMatcher {
    threshold: f64,
}

impl Default for ProximityMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PROXIMITY_THRESHOLD,
        }
    }
}

impl ProximityMatcher {
    /// Matcher with a custom radius.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidThreshold`] for zero, negative or non-finite values.
    pub const fn new(threshold: f64) -> Result<Self, InvalidThreshold> {
        if threshold.is_finite() && threshold > 0.0 {
            Ok(Self { threshold })
        } else {
            Err(InvalidThreshold(threshold))
        }
    }

    /// Match radius in degrees.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether `record` is a placed user submission within range of `centre`.
    #[must_use]
    pub fn is_near(&self, centre: Coordinates, record: &CoffeeShopRecord) -> bool {
        record.is_user_added
            && record
                .coordinates
                .is_some_and(|position| position.planar_distance(centre) < self.threshold)
    }

    /// User-added shops near `centre`, in input order.
    #[must_use]
    pub fn nearby<'a>(
        &self,
        centre: Coordinates,
        records: &'a [CoffeeShopRecord],
    ) -> Vec<&'a CoffeeShopRecord> {
        records
            .iter()
            .filter(|record| self.is_near(centre, record))
            .collect()
    }

    /// Append shops near `centre` to `visible`, skipping ids already shown.
    ///
    /// Returns how many shops were appended.
    pub fn merge_nearby(
        &self,
        centre: Coordinates,
        records: &[CoffeeShopRecord],
        visible: &mut Vec<CoffeeShopRecord>,
    ) -> usize {
        let mut shown: BTreeSet<ShopId> = visible.iter().map(|record| record.id).collect();
        let before = visible.len();
        visible.extend(
            self.nearby(centre, records)
                .into_iter()
                .filter(|record| shown.insert(record.id))
                .cloned(),
        );
        visible.len() - before
    }
}
