//! Location suggestions for the add form.
//!
//! Each keystroke issues a search ticket. Only the response to the most
//! recently issued ticket is used; slower responses to earlier keystrokes
//! come back as [`SearchOutcome::Stale`] so they cannot overwrite newer
//! suggestions.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::domain::Coordinates;
use crate::domain::ports::{Geocoder, GeocoderError, NoticeLevel, Notifier, PlaceCandidate};

/// Queries shorter than this many characters are not sent.
pub const MIN_QUERY_CHARS: usize = 3;
/// Maximum number of suggestions offered.
pub const MAX_SUGGESTIONS: usize = 5;

const SEARCH_FAILED: &str = "Failed to search locations. Please try again.";

/// Result of one suggestion lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Suggestions for the latest query; empty when nothing matched, the
    /// query was too short, or the geocoder failed.
    Suggestions(Vec<PlaceCandidate>),
    /// A newer query was issued while this one was in flight.
    Stale,
}

impl SearchOutcome {
    /// Suggestions, treating a stale outcome as empty.
    #[must_use]
    pub fn into_suggestions(self) -> Vec<PlaceCandidate> {
        match self {
            Self::Suggestions(found) => found,
            Self::Stale => Vec::new(),
        }
    }
}

/// Latest-wins suggestion lookup over a [`Geocoder`].
pub struct LocationSearch<G> {
    geocoder: Arc<G>,
    notifier: Arc<dyn Notifier>,
    latest: AtomicU64,
}

impl<G: Geocoder> LocationSearch<G> {
    /// Create a new lookup.
    pub const fn new(geocoder: Arc<G>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            geocoder,
            notifier,
            latest: AtomicU64::new(0),
        }
    }

    /// Suggest places for `query`.
    ///
    /// Failures never propagate: they yield no suggestions plus an error
    /// notice.
    pub async fn suggest(&self, query: &str) -> SearchOutcome {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return SearchOutcome::Suggestions(Vec::new());
        }

        let result = self.geocoder.search(trimmed).await;
        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!(ticket, query = trimmed, "discarding stale location results");
            return SearchOutcome::Stale;
        }

        match result {
            Ok(mut found) => {
                found.truncate(MAX_SUGGESTIONS);
                debug!(query = trimmed, count = found.len(), "location suggestions");
                SearchOutcome::Suggestions(found)
            }
            Err(err) => {
                self.degrade(&err);
                SearchOutcome::Suggestions(Vec::new())
            }
        }
    }

    /// Display name for the place at `coordinates`, if one is known.
    ///
    /// Failures yield `None` plus an error notice.
    pub async fn describe(&self, coordinates: Coordinates) -> Option<String> {
        match self.geocoder.reverse(coordinates).await {
            Ok(found) => found.map(|place| place.display_name),
            Err(err) => {
                self.degrade(&err);
                None
            }
        }
    }

    fn degrade(&self, err: &GeocoderError) {
        warn!(error = %err, retryable = err.is_retryable(), "location lookup failed");
        self.notifier.notify(NoticeLevel::Error, SEARCH_FAILED);
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rstest::{fixture, rstest};
    use tokio::sync::Notify;

    use super::*;
    use crate::domain::ports::{FixtureGeocoder, MockGeocoder, RecordingNotifier};

    fn place(name: &str) -> PlaceCandidate {
        PlaceCandidate {
            display_name: name.to_owned(),
            coordinates: Coordinates::new(-120.18, 48.36).expect("valid coordinates"),
        }
    }

    #[fixture]
    fn notifier() -> Arc<RecordingNotifier> {
        Arc::new(RecordingNotifier::default())
    }

    fn search_with<G: Geocoder>(geocoder: G, notifier: &Arc<RecordingNotifier>) -> LocationSearch<G> {
        LocationSearch::new(Arc::new(geocoder), Arc::clone(notifier) as Arc<dyn Notifier>)
    }

    #[rstest]
    #[tokio::test]
    async fn short_queries_are_not_sent(notifier: Arc<RecordingNotifier>) {
        let mut geocoder = MockGeocoder::new();
        geocoder.expect_search().times(0);
        let search = search_with(geocoder, &notifier);

        assert_eq!(search.suggest(" tw ").await, SearchOutcome::Suggestions(Vec::new()));
    }

    #[rstest]
    #[tokio::test]
    async fn results_are_truncated(notifier: Arc<RecordingNotifier>) {
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_search()
            .withf(|query| query == "Twisp")
            .times(1)
            .returning(|_| Ok((0..8).map(|n| place(&format!("Twisp {n}"))).collect()));
        let search = search_with(geocoder, &notifier);

        let found = search.suggest("Twisp").await.into_suggestions();
        assert_eq!(found.len(), MAX_SUGGESTIONS);
        assert_eq!(found.first().map(|p| p.display_name.as_str()), Some("Twisp 0"));
    }

    #[rstest]
    #[tokio::test]
    async fn failures_degrade_to_empty_with_notice(notifier: Arc<RecordingNotifier>) {
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_search()
            .returning(|_| Err(GeocoderError::timeout("5s elapsed")));
        let search = search_with(geocoder, &notifier);

        assert_eq!(
            search.suggest("Bellingham").await,
            SearchOutcome::Suggestions(Vec::new())
        );
        assert_eq!(
            notifier.take(),
            vec![(NoticeLevel::Error, SEARCH_FAILED.to_owned())]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn describe_returns_display_name(notifier: Arc<RecordingNotifier>) {
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_reverse()
            .returning(|_| Ok(Some(place("Twisp, Okanogan County, Washington"))));
        let search = search_with(geocoder, &notifier);

        let centre = Coordinates::new(-120.12, 48.36).expect("valid coordinates");
        assert_eq!(
            search.describe(centre).await.as_deref(),
            Some("Twisp, Okanogan County, Washington")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_place_is_not_an_error(notifier: Arc<RecordingNotifier>) {
        let search = search_with(FixtureGeocoder, &notifier);

        let open_sea = Coordinates::new(-140.0, 30.0).expect("valid coordinates");
        assert_eq!(search.describe(open_sea).await, None);
        assert_eq!(
            search.suggest("Atlantis").await,
            SearchOutcome::Suggestions(Vec::new())
        );
        assert!(notifier.take().is_empty());
    }

    /// Geocoder whose first search waits until released.
    struct GatedGeocoder {
        gate: Notify,
        entered: Notify,
    }

    #[async_trait]
    impl Geocoder for GatedGeocoder {
        async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocoderError> {
            if query == "Twi" {
                self.entered.notify_one();
                self.gate.notified().await;
            }
            Ok(vec![place(query)])
        }

        async fn reverse(
            &self,
            _coordinates: Coordinates,
        ) -> Result<Option<PlaceCandidate>, GeocoderError> {
            Ok(None)
        }
    }

    #[rstest]
    #[tokio::test]
    async fn slower_earlier_response_is_discarded(notifier: Arc<RecordingNotifier>) {
        let geocoder = GatedGeocoder {
            gate: Notify::new(),
            entered: Notify::new(),
        };
        let search = search_with(geocoder, &notifier);

        let first = search.suggest("Twi");
        let second = async {
            search.geocoder.entered.notified().await;
            let outcome = search.suggest("Twisp").await;
            search.geocoder.gate.notify_one();
            outcome
        };
        let (earlier, later) = tokio::join!(first, second);

        assert_eq!(earlier, SearchOutcome::Stale);
        assert_eq!(later, SearchOutcome::Suggestions(vec![place("Twisp")]));
    }
}
