//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.
//! Domain values are converted into these at the edge; the core stays serialization-free.

use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use trip_planner_core::{
    domain::{MapMarker, MarkerKind, PackingItem, Trip},
    enrichment::{DayView, OverviewMap, PlaceSet},
    itinerary::ParsedItinerary,
};
use utoipa::{IntoParams, ToSchema};

const HERO_IMAGE_BASE: &str = "https://source.unsplash.com/800x500/";

//=========================================================================================
// Messages Sent FROM the Client TO the Server
//=========================================================================================

/// The trip intake form.
#[derive(Deserialize, Debug, ToSchema)]
pub struct PlanTripRequest {
    pub location: String,
    /// One of `Leisure`, `Business`, `Family`, `Solo`.
    pub purpose: String,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
    /// Defaults to five days after today.
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DayQuery {
    /// A value from the itinerary's `options` list.
    pub title: String,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SavedTripsParams {
    /// Column to search: `location`, `purpose`, `start_date` or `end_date`.
    pub filter: Option<String>,
    /// Substring to search for.
    pub q: Option<String>,
    /// Column to sort by.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct NewPackingItemRequest {
    pub item: String,
    /// One of `Clothing`, `Toiletries`, `Electronics`, `Other`.
    pub category: String,
    pub quantity: i64,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdatePackingItemRequest {
    pub packed: bool,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client
//=========================================================================================

#[derive(Serialize, Debug, ToSchema)]
pub struct TripResponse {
    pub id: i64,
    pub heading: String,
    pub location: String,
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub itinerary: String,
    pub saved: bool,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            heading: trip.heading(),
            purpose: trip.purpose.to_string(),
            location: trip.location,
            start_date: trip.start_date,
            end_date: trip.end_date,
            itinerary: trip.itinerary_text,
            saved: trip.saved,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct DaySectionResponse {
    pub title: String,
    pub activities: Vec<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ItineraryResponse {
    pub trip_id: i64,
    /// The day selector: `Overview` followed by every recognized day title.
    pub options: Vec<String>,
    pub sections: Vec<DaySectionResponse>,
}

impl ItineraryResponse {
    pub fn new(trip_id: i64, itinerary: ParsedItinerary) -> Self {
        Self {
            trip_id,
            options: itinerary.options(),
            sections: itinerary
                .sections
                .into_iter()
                .map(|s| DaySectionResponse {
                    title: s.title,
                    activities: s.activities,
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, ToSchema)]
pub struct CoordinatesResponse {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MarkerResponse {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `destination` for the trip's own marker, `attraction` otherwise.
    pub kind: String,
}

impl From<MapMarker> for MarkerResponse {
    fn from(marker: MapMarker) -> Self {
        Self {
            label: marker.label,
            latitude: marker.coordinates.latitude,
            longitude: marker.coordinates.longitude,
            kind: match marker.kind {
                MarkerKind::Destination => "destination",
                MarkerKind::Attraction => "attraction",
            }
            .to_string(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct OverviewResponse {
    pub trip_id: i64,
    pub heading: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub itinerary: String,
    pub center: Option<CoordinatesResponse>,
    pub markers: Vec<MarkerResponse>,
    pub places: Vec<String>,
}

impl OverviewResponse {
    pub fn new(trip: Trip, places: &PlaceSet, map: OverviewMap) -> Self {
        Self {
            trip_id: trip.id,
            heading: trip.heading(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            itinerary: trip.itinerary_text,
            center: map.center.map(|c| CoordinatesResponse {
                latitude: c.latitude,
                longitude: c.longitude,
            }),
            markers: map.markers.into_iter().map(MarkerResponse::from).collect(),
            places: places.places().map(str::to_string).collect(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ActivityResponse {
    pub text: String,
    /// Places recognized on this line.
    pub places: Vec<String>,
    pub image_urls: Vec<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct DayViewResponse {
    pub trip_id: i64,
    pub title: String,
    pub activities: Vec<ActivityResponse>,
}

impl DayViewResponse {
    pub fn new(trip_id: i64, view: DayView) -> Self {
        Self {
            trip_id,
            title: view.title,
            activities: view
                .activities
                .into_iter()
                .map(|a| ActivityResponse {
                    text: a.text,
                    places: a.places,
                    image_urls: a.images.into_iter().map(|i| i.url).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SavedTripResponse {
    pub id: i64,
    pub location: String,
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub itinerary: String,
    pub hero_image_url: Option<String>,
}

impl From<Trip> for SavedTripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            hero_image_url: hero_image_url(&trip.location),
            purpose: trip.purpose.to_string(),
            location: trip.location,
            start_date: trip.start_date,
            end_date: trip.end_date,
            itinerary: trip.itinerary_text,
        }
    }
}

/// A banner photo URL for a destination.
pub fn hero_image_url(location: &str) -> Option<String> {
    let mut url = Url::parse(HERO_IMAGE_BASE).ok()?;
    url.set_query(Some(&urlencoding::encode(location)));
    Some(url.to_string())
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PackingItemResponse {
    pub id: i64,
    pub item: String,
    pub category: String,
    pub quantity: u32,
    pub packed: bool,
}

impl From<PackingItem> for PackingItemResponse {
    fn from(item: PackingItem) -> Self {
        Self {
            id: item.id,
            item: item.item,
            category: item.category.to_string(),
            quantity: item.quantity,
            packed: item.packed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hero_image_url_encodes_location() {
        assert_eq!(
            hero_image_url("New York").as_deref(),
            Some("https://source.unsplash.com/800x500/?New%20York")
        );
    }

    #[test]
    fn hero_image_url_escapes_query_delimiters() {
        assert_eq!(
            hero_image_url("Trinidad & Tobago").as_deref(),
            Some("https://source.unsplash.com/800x500/?Trinidad%20%26%20Tobago")
        );
        let url = hero_image_url("a=b").unwrap();
        assert!(url.ends_with("?a%3Db"));
    }
}
