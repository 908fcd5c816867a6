//! Sort and filter selection for catalog queries.
//!
//! Only one filter can be active at a time. [`CatalogFilter`] makes that a
//! property of the type; [`FlatFilter`] is the three-field wire form the
//! browsing UI emits, converted with [`CatalogFilter::try_from`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use super::shop::Rating;

/// Error returned when parsing an unknown selector string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {input}")]
pub struct ParseSelectorError {
    /// Which selector was being parsed.
    pub kind: &'static str,
    /// The unrecognised input value.
    pub input: String,
}

impl ParseSelectorError {
    fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_owned(),
        }
    }
}

/// Ordering applied to query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Highest rating first.
    Rating,
    /// Alphabetical, ignoring case.
    Name,
}

impl SortKey {
    /// Wire representation.
    ///
    /// # Examples
    /// ```
    /// use catalog::domain::SortKey;
    ///
    /// assert_eq!(SortKey::default().as_str(), "date");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Rating => "rating",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "rating" => Ok(Self::Rating),
            "name" => Ok(Self::Name),
            _ => Err(ParseSelectorError::new("sort key", s)),
        }
    }
}

/// Recency window for the date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateWindow {
    /// The last seven days.
    Week,
    /// The last calendar month.
    Month,
    /// The last calendar year.
    Year,
}

impl DateWindow {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Earliest `dateAdded` still inside the window ending at `now`.
    ///
    /// Calendar windows clamp to the end of shorter months, so a month
    /// before 31 March is 28 (or 29) February. Returns `None` only when the
    /// subtraction leaves chrono's representable range.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Week => now.checked_sub_signed(Duration::days(7)),
            Self::Month => now.checked_sub_months(Months::new(1)),
            Self::Year => now.checked_sub_months(Months::new(12)),
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateWindow {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(ParseSelectorError::new("date range", s)),
        }
    }
}

/// Alphabetical band for the name filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameBand {
    /// Names starting with a to g.
    #[serde(rename = "a-g")]
    AToG,
    /// Names starting with h to n.
    #[serde(rename = "h-n")]
    HToN,
    /// Names starting with o to s.
    #[serde(rename = "o-s")]
    OToS,
    /// Names starting with t to z.
    #[serde(rename = "t-z")]
    TToZ,
}

impl NameBand {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AToG => "a-g",
            Self::HToN => "h-n",
            Self::OToS => "o-s",
            Self::TToZ => "t-z",
        }
    }

    const fn bounds(self) -> (char, char) {
        match self {
            Self::AToG => ('a', 'g'),
            Self::HToN => ('h', 'n'),
            Self::OToS => ('o', 's'),
            Self::TToZ => ('t', 'z'),
        }
    }

    /// Whether `name` starts, case-insensitively, with a letter in the band.
    ///
    /// # Examples
    /// ```
    /// use catalog::domain::NameBand;
    ///
    /// assert!(NameBand::AToG.contains("Blue Bottle Coffee"));
    /// assert!(!NameBand::AToG.contains("Starbucks"));
    /// assert!(!NameBand::TToZ.contains("1st Street Espresso"));
    /// ```
    #[must_use]
    pub fn contains(self, name: &str) -> bool {
        let (low, high) = self.bounds();
        name.chars()
            .next()
            .into_iter()
            .flat_map(char::to_lowercase)
            .next()
            .is_some_and(|first| (low..=high).contains(&first))
    }
}

impl fmt::Display for NameBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameBand {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a-g" => Ok(Self::AToG),
            "h-n" => Ok(Self::HToN),
            "o-s" => Ok(Self::OToS),
            "t-z" => Ok(Self::TToZ),
            _ => Err(ParseSelectorError::new("name range", s)),
        }
    }
}

/// The single active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CatalogFilter {
    /// Keep everything.
    #[default]
    None,
    /// Keep shops rated at least this many stars.
    RatingFloor(Rating),
    /// Keep shops added inside the window.
    DateRange(DateWindow),
    /// Keep shops whose name starts inside the band.
    NameRange(NameBand),
}

/// Combined sort and filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FilterSortState {
    /// Result ordering.
    pub sort: SortKey,
    /// Active filter.
    pub filter: CatalogFilter,
}

impl FilterSortState {
    /// State with the given sort and no filter.
    ///
    /// Selecting a sort key clears any filter, mirroring the browsing panel.
    #[must_use]
    pub const fn sorted_by(sort: SortKey) -> Self {
        Self {
            sort,
            filter: CatalogFilter::None,
        }
    }

    /// Replace the active filter, keeping the sort key.
    #[must_use]
    pub const fn with_filter(self, filter: CatalogFilter) -> Self {
        Self {
            sort: self.sort,
            filter,
        }
    }
}

/// Sentinel the flat form uses for "no selection".
pub const ALL: &str = "all";

/// Flat filter selection as emitted by the browsing panel.
///
/// `rating` of zero and `"all"` for the ranges mean "inactive".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatFilter {
    /// Minimum rating, or zero.
    #[serde(default)]
    pub rating: u8,
    /// Date window or `"all"`.
    #[serde(default = "all")]
    pub date_range: String,
    /// Name band or `"all"`.
    #[serde(default = "all")]
    pub name_range: String,
}

fn all() -> String {
    ALL.to_owned()
}

impl Default for FlatFilter {
    fn default() -> Self {
        Self {
            rating: 0,
            date_range: all(),
            name_range: all(),
        }
    }
}

/// Reasons a [`FlatFilter`] cannot become a [`CatalogFilter`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterSelectionError {
    /// More than one of the three filters is active.
    #[error("only one filter may be active at a time")]
    Conflicting,
    /// Rating floor outside 1 to 5.
    #[error("rating filter must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    /// Unknown range selector.
    #[error(transparent)]
    Unknown(#[from] ParseSelectorError),
}

impl TryFrom<FlatFilter> for CatalogFilter {
    type Error = FilterSelectionError;

    fn try_from(value: FlatFilter) -> Result<Self, Self::Error> {
        let rating = match value.rating {
            0 => None,
            raw => Some(
                Rating::try_from(raw).map_err(|_| FilterSelectionError::RatingOutOfRange(raw))?,
            ),
        };
        let date = parse_range::<DateWindow>(&value.date_range)?;
        let name = parse_range::<NameBand>(&value.name_range)?;

        match (rating, date, name) {
            (None, None, None) => Ok(Self::None),
            (Some(floor), None, None) => Ok(Self::RatingFloor(floor)),
            (None, Some(window), None) => Ok(Self::DateRange(window)),
            (None, None, Some(band)) => Ok(Self::NameRange(band)),
            _ => Err(FilterSelectionError::Conflicting),
        }
    }
}

fn parse_range<T>(raw: &str) -> Result<Option<T>, ParseSelectorError>
where
    T: FromStr<Err = ParseSelectorError>,
{
    if raw.is_empty() || raw == ALL {
        return Ok(None);
    }
    raw.parse().map(Some)
}

impl From<CatalogFilter> for FlatFilter {
    fn from(value: CatalogFilter) -> Self {
        let mut flat = Self::default();
        match value {
            CatalogFilter::None => {}
            CatalogFilter::RatingFloor(floor) => flat.rating = floor.get(),
            CatalogFilter::DateRange(window) => window.as_str().clone_into(&mut flat.date_range),
            CatalogFilter::NameRange(band) => band.as_str().clone_into(&mut flat.name_range),
        }
        flat
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .expect("valid date")
    }

    #[rstest]
    #[case(SortKey::Date)]
    #[case(SortKey::Rating)]
    #[case(SortKey::Name)]
    fn sort_keys_parse_their_own_names(#[case] key: SortKey) {
        assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
    }

    #[rstest]
    fn unknown_sort_key_is_rejected() {
        let err = "price".parse::<SortKey>().expect_err("unknown key");
        assert_eq!(err.to_string(), "unknown sort key: price");
    }

    #[rstest]
    #[case(DateWindow::Week, at(2025, 1, 3))]
    #[case(DateWindow::Month, at(2024, 12, 10))]
    #[case(DateWindow::Year, at(2024, 1, 10))]
    fn windows_compute_cutoffs(#[case] window: DateWindow, #[case] expected: DateTime<Utc>) {
        assert_eq!(window.cutoff(at(2025, 1, 10)), Some(expected));
    }

    #[rstest]
    fn month_window_clamps_to_shorter_month() {
        assert_eq!(DateWindow::Month.cutoff(at(2025, 3, 31)), Some(at(2025, 2, 28)));
    }

    #[rstest]
    #[case(NameBand::AToG, "dutch bros", true)]
    #[case(NameBand::HToN, "Hidden Gem", true)]
    #[case(NameBand::OToS, "Starbucks", true)]
    #[case(NameBand::TToZ, "Twisp Roasters", true)]
    #[case(NameBand::AToG, "", false)]
    #[case(NameBand::TToZ, "Élan", false)]
    fn name_bands_match_first_letter(
        #[case] band: NameBand,
        #[case] name: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(band.contains(name), expected);
    }

    #[rstest]
    fn default_flat_filter_is_inactive() {
        assert_eq!(CatalogFilter::try_from(FlatFilter::default()), Ok(CatalogFilter::None));
    }

    #[rstest]
    #[case::rating(FlatFilter { rating: 4, ..FlatFilter::default() },
        CatalogFilter::RatingFloor(Rating::try_from(4).expect("rating")))]
    #[case::date(FlatFilter { date_range: "month".to_owned(), ..FlatFilter::default() },
        CatalogFilter::DateRange(DateWindow::Month))]
    #[case::name(FlatFilter { name_range: "h-n".to_owned(), ..FlatFilter::default() },
        CatalogFilter::NameRange(NameBand::HToN))]
    fn single_flat_filter_converts(#[case] flat: FlatFilter, #[case] expected: CatalogFilter) {
        assert_eq!(CatalogFilter::try_from(flat.clone()), Ok(expected));
        assert_eq!(FlatFilter::from(expected), flat);
    }

    #[rstest]
    fn two_active_filters_are_rejected() {
        let flat = FlatFilter {
            rating: 3,
            date_range: "week".to_owned(),
            ..FlatFilter::default()
        };
        assert_eq!(CatalogFilter::try_from(flat), Err(FilterSelectionError::Conflicting));
    }

    #[rstest]
    fn out_of_range_rating_floor_is_rejected() {
        let flat = FlatFilter {
            rating: 7,
            ..FlatFilter::default()
        };
        assert_eq!(
            CatalogFilter::try_from(flat),
            Err(FilterSelectionError::RatingOutOfRange(7))
        );
    }

    #[rstest]
    fn flat_filter_decodes_wire_names() {
        let flat: FlatFilter =
            serde_json::from_str(r#"{"rating":0,"dateRange":"all","nameRange":"t-z"}"#)
                .expect("decode flat filter");
        assert_eq!(
            CatalogFilter::try_from(flat),
            Ok(CatalogFilter::NameRange(NameBand::TToZ))
        );
    }

    #[rstest]
    fn selecting_a_sort_clears_the_filter() {
        let state = FilterSortState::default()
            .with_filter(CatalogFilter::DateRange(DateWindow::Week));
        let resorted = FilterSortState::sorted_by(SortKey::Name);
        assert_eq!(state.sort, SortKey::Date);
        assert_eq!(resorted.filter, CatalogFilter::None);
    }
}
