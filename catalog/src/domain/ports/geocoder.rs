//! Driven port for place search and reverse geocoding.

use async_trait::async_trait;

use crate::domain::Coordinates;

use super::define_port_error;

/// One place returned by the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    /// Human-readable address, shown as the suggestion text.
    pub display_name: String,
    /// Position of the place.
    pub coordinates: Coordinates,
}

define_port_error! {
    /// Errors surfaced while calling the geocoder.
    pub enum GeocoderError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "geocoder transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "geocoder timeout: {message}",
        /// The service rate-limited the request.
        RateLimited { message: String } =>
            "geocoder rate limited request: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "geocoder response decode failed: {message}",
        /// The adapter rejected the request before sending it.
        InvalidRequest { message: String } =>
            "geocoder request invalid: {message}",
    }
}

impl GeocoderError {
    /// Return whether retrying this error is expected to help.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port for resolving free text to places and back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Search for places matching `query`, best match first.
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocoderError>;

    /// Look up the place at `coordinates`, if the service knows one.
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<PlaceCandidate>, GeocoderError>;
}

/// Fixture implementation that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureGeocoder;

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn search(&self, _query: &str) -> Result<Vec<PlaceCandidate>, GeocoderError> {
        Ok(Vec::new())
    }

    async fn reverse(&self, _coordinates: Coordinates) -> Result<Option<PlaceCandidate>, GeocoderError> {
        Ok(None)
    }
}
