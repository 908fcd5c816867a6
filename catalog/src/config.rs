//! Catalog configuration loaded via OrthoConfig.
//!
//! Values come from `BREWSKY_*` environment variables or a configuration
//! file; every field is optional and falls back to a built-in default.

use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{
    DEFAULT_MAX_USER_SHOPS, DEFAULT_PROXIMITY_THRESHOLD, InvalidThreshold, ProximityMatcher,
};
use crate::outbound::nominatim::DEFAULT_NOMINATIM_URL;

const DEFAULT_DATA_DIR: &str = ".brewsky";
const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_GEOCODER_USER_AGENT: &str = "brewsky-catalog/0.1";

/// Errors raised while resolving configured values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// The data directory is not valid UTF-8.
    #[error("data directory '{0}' is not valid UTF-8")]
    NonUtf8DataDir(String),
    /// The geocoder URL does not parse.
    #[error("invalid geocoder URL '{url}': {message}")]
    GeocoderUrl {
        /// Configured value.
        url: String,
        /// Parser message.
        message: String,
    },
    /// The proximity threshold is unusable.
    #[error(transparent)]
    Threshold(#[from] InvalidThreshold),
}

/// Configuration values controlling storage, geocoding and catalog limits.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BREWSKY")]
pub struct CatalogSettings {
    /// Profile directory holding the stored session, shops and favorites.
    pub data_dir: Option<PathBuf>,
    /// Base URL of the Nominatim instance.
    pub geocoder_url: Option<String>,
    /// Geocoder request timeout in seconds.
    pub geocoder_timeout_secs: Option<u64>,
    /// User agent sent with geocoder requests.
    pub geocoder_user_agent: Option<String>,
    /// Map-centre match radius in degrees.
    pub proximity_threshold: Option<f64>,
    /// Maximum number of user-added shops.
    pub max_user_shops: Option<usize>,
}

impl CatalogSettings {
    /// Return the configured data directory, falling back to `.brewsky`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NonUtf8DataDir`] for paths that are not
    /// valid UTF-8.
    pub fn data_dir(&self) -> Result<Utf8PathBuf, SettingsError> {
        self.data_dir.clone().map_or_else(
            || Ok(Utf8PathBuf::from(DEFAULT_DATA_DIR)),
            |path| {
                Utf8PathBuf::from_path_buf(path)
                    .map_err(|raw| SettingsError::NonUtf8DataDir(raw.display().to_string()))
            },
        )
    }

    /// Return the configured geocoder base URL, falling back to the public
    /// Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::GeocoderUrl`] when the value does not parse.
    pub fn geocoder_url(&self) -> Result<Url, SettingsError> {
        let raw = self.geocoder_url.as_deref().unwrap_or(DEFAULT_NOMINATIM_URL);
        Url::parse(raw).map_err(|err| SettingsError::GeocoderUrl {
            url: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Return the geocoder request timeout.
    #[must_use]
    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(
            self.geocoder_timeout_secs
                .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECS)
                .max(1),
        )
    }

    /// Return the geocoder user agent.
    #[must_use]
    pub fn geocoder_user_agent(&self) -> &str {
        self.geocoder_user_agent
            .as_deref()
            .unwrap_or(DEFAULT_GEOCODER_USER_AGENT)
    }

    /// Build the proximity matcher for the configured threshold.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Threshold`] for zero, negative or non-finite
    /// thresholds.
    pub fn proximity_matcher(&self) -> Result<ProximityMatcher, SettingsError> {
        Ok(ProximityMatcher::new(
            self.proximity_threshold
                .unwrap_or(DEFAULT_PROXIMITY_THRESHOLD),
        )?)
    }

    /// Return the cap on user-added shops.
    #[must_use]
    pub fn max_user_shops(&self) -> usize {
        self.max_user_shops.unwrap_or(DEFAULT_MAX_USER_SHOPS)
    }
}
