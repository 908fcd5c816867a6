//! DTOs for decoding Nominatim JSON responses.
//!
//! Nominatim reports coordinates as decimal strings. The adapter decodes into
//! these transport DTOs first, then maps into domain candidates in one pass.

use serde::Deserialize;

use crate::domain::Coordinates;
use crate::domain::ports::PlaceCandidate;

#[derive(Debug, Deserialize)]
pub(super) struct PlaceDto {
    pub(super) display_name: String,
    pub(super) lat: String,
    pub(super) lon: String,
}

/// Reverse lookups answer `{"error": ...}` with a success status when no
/// place is known.
#[derive(Debug, Deserialize)]
pub(super) struct ReverseDto {
    #[serde(default)]
    pub(super) error: Option<String>,
    #[serde(default)]
    pub(super) display_name: Option<String>,
    #[serde(default)]
    pub(super) lat: Option<String>,
    #[serde(default)]
    pub(super) lon: Option<String>,
}

impl PlaceDto {
    pub(super) fn into_candidate(self) -> Result<PlaceCandidate, String> {
        let coordinates = parse_coordinates(&self.lon, &self.lat)
            .map_err(|reason| format!("place '{}' {reason}", self.display_name))?;
        Ok(PlaceCandidate {
            display_name: self.display_name,
            coordinates,
        })
    }
}

impl ReverseDto {
    pub(super) fn into_candidate(self) -> Result<Option<PlaceCandidate>, String> {
        if self.error.is_some() {
            return Ok(None);
        }
        match (self.display_name, self.lat, self.lon) {
            (Some(display_name), Some(lat), Some(lon)) => PlaceDto {
                display_name,
                lat,
                lon,
            }
            .into_candidate()
            .map(Some),
            _ => Err("reverse response missing display_name or coordinates".to_owned()),
        }
    }
}

fn parse_coordinates(lon: &str, lat: &str) -> Result<Coordinates, String> {
    let longitude = lon
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("has unparsable longitude '{lon}': {err}"))?;
    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("has unparsable latitude '{lat}': {err}"))?;
    Coordinates::new(longitude, latitude).map_err(|err| format!("is out of range: {err}"))
}
