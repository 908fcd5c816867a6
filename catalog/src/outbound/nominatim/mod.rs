//! Nominatim outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! [`Geocoder`](crate::domain::ports::Geocoder) port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_NOMINATIM_URL, NominatimHttpIdentity, NominatimHttpSource};
