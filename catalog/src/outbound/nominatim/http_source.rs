//! Reqwest-backed Nominatim geocoder adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain place candidates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{PlaceDto, ReverseDto};
use crate::domain::Coordinates;
use crate::domain::ports::{Geocoder, GeocoderError, PlaceCandidate};

/// Public Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/";

const DEFAULT_USER_AGENT: &str = "brewsky-catalog/0.1";
const SEARCH_LIMIT: &str = "5";

/// Outbound identity for Nominatim requests.
///
/// The public instance's usage policy requires an identifying user agent.
pub struct NominatimHttpIdentity {
    /// HTTP user-agent sent to Nominatim.
    pub user_agent: String,
}

impl Default for NominatimHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Geocoder adapter that performs HTTP GET requests against one Nominatim
/// base URL.
pub struct NominatimHttpSource {
    client: Client,
    search_url: Url,
    reverse_url: Url,
    user_agent: String,
}

impl NominatimHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = NominatimHttpSource::new(base_url, timeout);
    /// assert!(source.is_ok() || source.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns [`GeocoderError::InvalidRequest`] when `base_url` cannot carry
    /// endpoint paths, or [`GeocoderError::Transport`] when the reqwest client
    /// cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, GeocoderError> {
        Self::with_identity(base_url, timeout, NominatimHttpIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// See [`NominatimHttpSource::new`].
    pub fn with_identity(
        base_url: Url,
        timeout: Duration,
        identity: NominatimHttpIdentity,
    ) -> Result<Self, GeocoderError> {
        let base = normalise_base(base_url)?;
        let search_url = endpoint(&base, "search")?;
        let reverse_url = endpoint(&base, "reverse")?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| GeocoderError::transport(error.to_string()))?;
        Ok(Self {
            client,
            search_url,
            reverse_url,
            user_agent: identity.user_agent,
        })
    }

    async fn fetch(&self, url: Url) -> Result<Vec<u8>, GeocoderError> {
        debug!(url = %url, "nominatim request");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Geocoder for NominatimHttpSource {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocoderError> {
        let url = build_search_url(&self.search_url, query)?;
        let body = self.fetch(url).await?;
        parse_search(&body)
    }

    async fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<PlaceCandidate>, GeocoderError> {
        let url = build_reverse_url(&self.reverse_url, coordinates);
        let body = self.fetch(url).await?;
        parse_reverse(&body)
    }
}

fn normalise_base(mut base: Url) -> Result<Url, GeocoderError> {
    if base.cannot_be_a_base() {
        return Err(GeocoderError::invalid_request(format!(
            "geocoder URL '{base}' cannot carry endpoint paths"
        )));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn endpoint(base: &Url, path: &str) -> Result<Url, GeocoderError> {
    base.join(path).map_err(|error| {
        GeocoderError::invalid_request(format!("cannot build {path} endpoint: {error}"))
    })
}

fn build_search_url(endpoint: &Url, query: &str) -> Result<Url, GeocoderError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(GeocoderError::invalid_request("search text must not be blank"));
    }
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("q", trimmed)
        .append_pair("format", "json")
        .append_pair("addressdetails", "1")
        .append_pair("limit", SEARCH_LIMIT);
    Ok(url)
}

fn build_reverse_url(endpoint: &Url, coordinates: Coordinates) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("lat", &coordinates.latitude().to_string())
        .append_pair("lon", &coordinates.longitude().to_string())
        .append_pair("format", "json");
    url
}

fn parse_search(body: &[u8]) -> Result<Vec<PlaceCandidate>, GeocoderError> {
    let decoded: Vec<PlaceDto> = serde_json::from_slice(body).map_err(|error| {
        GeocoderError::decode(format!("invalid Nominatim search payload: {error}"))
    })?;
    decoded
        .into_iter()
        .map(PlaceDto::into_candidate)
        .collect::<Result<Vec<_>, _>>()
        .map_err(GeocoderError::decode)
}

fn parse_reverse(body: &[u8]) -> Result<Option<PlaceCandidate>, GeocoderError> {
    let decoded: ReverseDto = serde_json::from_slice(body).map_err(|error| {
        GeocoderError::decode(format!("invalid Nominatim reverse payload: {error}"))
    })?;
    decoded.into_candidate().map_err(GeocoderError::decode)
}

fn map_transport_error(error: reqwest::Error) -> GeocoderError {
    if error.is_timeout() {
        GeocoderError::timeout(error.to_string())
    } else {
        GeocoderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeocoderError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => GeocoderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GeocoderError::timeout(message)
        }
        _ if status.is_client_error() => GeocoderError::invalid_request(message),
        _ => GeocoderError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Nominatim mapping helpers.

    use super::*;
    use rstest::rstest;

    fn base(raw: &str) -> Url {
        normalise_base(Url::parse(raw).expect("valid URL")).expect("usable base")
    }

    #[rstest]
    #[case::bare_host("https://nominatim.openstreetmap.org", "https://nominatim.openstreetmap.org/search")]
    #[case::sub_path("http://localhost:8080/geo", "http://localhost:8080/geo/search")]
    #[case::trailing_slash("http://localhost:8080/geo/", "http://localhost:8080/geo/search")]
    fn endpoints_hang_off_the_base_path(#[case] raw: &str, #[case] expected: &str) {
        let url = endpoint(&base(raw), "search").expect("endpoint builds");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn search_url_carries_query_and_limits() {
        let search = endpoint(&base(DEFAULT_NOMINATIM_URL), "search").expect("endpoint");
        let url = build_search_url(&search, "  Twisp, WA ").expect("query builds");

        assert_eq!(
            url.query(),
            Some("q=Twisp%2C+WA&format=json&addressdetails=1&limit=5")
        );
    }

    #[test]
    fn blank_search_is_rejected_before_sending() {
        let search = endpoint(&base(DEFAULT_NOMINATIM_URL), "search").expect("endpoint");
        let error = build_search_url(&search, "   ").expect_err("blank query");
        assert!(matches!(error, GeocoderError::InvalidRequest { .. }));
    }

    #[test]
    fn reverse_url_orders_latitude_first() {
        let reverse = endpoint(&base(DEFAULT_NOMINATIM_URL), "reverse").expect("endpoint");
        let coordinates = Coordinates::new(-120.12, 48.36).expect("valid coordinates");

        let url = build_reverse_url(&reverse, coordinates);

        assert_eq!(url.query(), Some("lat=48.36&lon=-120.12&format=json"));
    }

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "RateLimited")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "InvalidRequest")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_expected_domain_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, b"<html>  upstream   busy </html>");
        let matched = match expected {
            "RateLimited" => matches!(error, GeocoderError::RateLimited { .. }),
            "Timeout" => matches!(error, GeocoderError::Timeout { .. }),
            "InvalidRequest" => matches!(error, GeocoderError::InvalidRequest { .. }),
            "Transport" => matches!(error, GeocoderError::Transport { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} should map to {expected}, got {error:?}");
        assert!(error.to_string().contains("<html> upstream busy </html>"));
    }

    #[test]
    fn parses_search_results_with_string_coordinates() {
        let body = r#"[
            {
                "place_id": 1,
                "display_name": "Twisp, Okanogan County, Washington, United States",
                "lat": "48.3637",
                "lon": "-120.1217",
                "address": { "town": "Twisp" }
            }
        ]"#;

        let places = parse_search(body.as_bytes()).expect("JSON should decode");

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].coordinates.latitude(), 48.3637);
        assert_eq!(places[0].coordinates.longitude(), -120.1217);
    }

    #[test]
    fn rejects_unparsable_coordinates() {
        let body = r#"[{ "display_name": "Nowhere", "lat": "north", "lon": "0" }]"#;
        let error = parse_search(body.as_bytes()).expect_err("decode should fail");
        assert!(matches!(error, GeocoderError::Decode { .. }));
    }

    #[test]
    fn reverse_error_payload_means_no_place() {
        let body = br#"{ "error": "Unable to geocode" }"#;
        assert_eq!(parse_reverse(body).expect("JSON should decode"), None);
    }

    #[test]
    fn reverse_place_is_decoded() {
        let body = br#"{ "display_name": "Methow Valley", "lat": "48.4", "lon": "-120.2" }"#;
        let place = parse_reverse(body).expect("JSON should decode");
        assert_eq!(place.map(|found| found.display_name), Some("Methow Valley".to_owned()));
    }
}
