//! Search, filter and sort over a snapshot of the catalog.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::filter::{CatalogFilter, FilterSortState, SortKey};
use super::shop::CoffeeShopRecord;

/// Outcome of a catalog query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Matching records in display order.
    pub shops: Vec<CoffeeShopRecord>,
    /// Size of the collection the query ran over.
    pub total: usize,
}

impl QueryResult {
    /// Number of records that survived search and filtering.
    #[must_use]
    pub fn filtered(&self) -> usize {
        self.shops.len()
    }

    /// "Showing X of Y" summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Showing {} of {} coffee shops", self.filtered(), self.total)
    }
}

/// Run search, filter and sort over `records`.
///
/// The term matches case-insensitively anywhere in name, location or review;
/// a blank term matches everything. Sorting is stable, so records with equal
/// keys keep their collection order.
#[must_use]
pub fn run_query<'a, I>(records: I, term: &str, state: FilterSortState, now: DateTime<Utc>) -> QueryResult
where
    I: IntoIterator<Item = &'a CoffeeShopRecord>,
{
    let needle = (!term.trim().is_empty()).then(|| term.to_lowercase());
    let mut total = 0_usize;
    let mut shops: Vec<CoffeeShopRecord> = records
        .into_iter()
        .inspect(|_| total += 1)
        .filter(|record| needle.as_deref().is_none_or(|text| record.matches_text(text)))
        .filter(|record| passes_filter(record, state.filter, now))
        .cloned()
        .collect();

    sort_records(&mut shops, state.sort);
    QueryResult { shops, total }
}

fn passes_filter(record: &CoffeeShopRecord, filter: CatalogFilter, now: DateTime<Utc>) -> bool {
    match filter {
        CatalogFilter::None => true,
        CatalogFilter::RatingFloor(floor) => record.rating >= floor,
        CatalogFilter::DateRange(window) => window
            .cutoff(now)
            .is_none_or(|cutoff| record.date_added >= cutoff),
        CatalogFilter::NameRange(band) => band.contains(&record.name),
    }
}

/// Sort `records` in place by `key`, keeping ties in their current order.
pub fn sort_records(records: &mut [CoffeeShopRecord], key: SortKey) {
    match key {
        SortKey::Rating => records.sort_by_key(|record| Reverse(record.rating)),
        SortKey::Name => records.sort_by_cached_key(|record| collation_key(&record.name)),
        SortKey::Date => records.sort_by_key(|record| Reverse(record.date_added)),
    }
}

/// Primary key folds case and accents; the lowercased name breaks ties so
/// "Eclair" still precedes "Éclair".
fn collation_key(name: &str) -> (String, String) {
    let folded = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    (folded, name.to_lowercase())
}
