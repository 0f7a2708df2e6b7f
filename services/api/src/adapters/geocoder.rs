//! services/api/src/adapters/geocoder.rs
//!
//! Geocoding adapters implementing the `GeocodingService` port.
//!
//! The trip destination is resolved through Nominatim (OpenStreetMap); the
//! attractions found in an itinerary go through the ArcGIS World Geocoder.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use trip_planner_core::{
    domain::Coordinates,
    ports::{GeocodingService, PortError, PortResult},
};

//=========================================================================================
// Nominatim
//=========================================================================================

#[derive(Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Geocodes free-text place names with a Nominatim search endpoint.
#[derive(Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// `http` should carry a descriptive User-Agent; Nominatim rejects anonymous clients.
    pub fn new(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

/// Reads the first hit of a Nominatim JSON response.
pub fn parse_nominatim(body: &str) -> PortResult<Option<Coordinates>> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| PortError::Unexpected(e.to_string()))?;
    let Some(first) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude = first
        .lat
        .parse::<f64>()
        .map_err(|e| PortError::Unexpected(format!("Bad latitude '{}': {}", first.lat, e)))?;
    let longitude = first
        .lon
        .parse::<f64>()
        .map_err(|e| PortError::Unexpected(format!("Bad longitude '{}': {}", first.lon, e)))?;
    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}

#[async_trait]
impl GeocodingService for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> PortResult<Option<Coordinates>> {
        let body = self
            .http
            .get(&self.base_url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let result = parse_nominatim(&body)?;
        debug!("Nominatim resolved '{}' to {:?}", place, result);
        Ok(result)
    }
}

//=========================================================================================
// ArcGIS
//=========================================================================================

#[derive(Deserialize)]
struct ArcGisResponse {
    #[serde(default)]
    candidates: Vec<ArcGisCandidate>,
}

#[derive(Deserialize)]
struct ArcGisCandidate {
    location: ArcGisPoint,
}

#[derive(Deserialize)]
struct ArcGisPoint {
    x: f64,
    y: f64,
}

/// Geocodes place names with the ArcGIS `findAddressCandidates` operation.
#[derive(Clone)]
pub struct ArcGisGeocoder {
    http: Client,
    base_url: String,
}

impl ArcGisGeocoder {
    pub fn new(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

/// Reads the best candidate of an ArcGIS response. `x` is longitude, `y` latitude.
pub fn parse_arcgis(body: &str) -> PortResult<Option<Coordinates>> {
    let response: ArcGisResponse =
        serde_json::from_str(body).map_err(|e| PortError::Unexpected(e.to_string()))?;
    Ok(response.candidates.into_iter().next().map(|c| Coordinates {
        latitude: c.location.y,
        longitude: c.location.x,
    }))
}

#[async_trait]
impl GeocodingService for ArcGisGeocoder {
    async fn geocode(&self, place: &str) -> PortResult<Option<Coordinates>> {
        let body = self
            .http
            .get(&self.base_url)
            .query(&[("SingleLine", place), ("f", "json"), ("maxLocations", "1")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let result = parse_arcgis(&body)?;
        debug!("ArcGIS resolved '{}' to {:?}", place, result);
        Ok(result)
    }
}
