#![allow(dead_code)]

use api_lib::adapters::DbAdapter;
use api_lib::web::AppState;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use trip_planner_core::domain::{Coordinates, Entity, EntityCategory, ImageRef, TripRequest};
use trip_planner_core::enrichment::LocationEnricher;
use trip_planner_core::ports::{
    EntityRecognitionService, GeocodingService, ImageSearchService, ItineraryGenerationService,
    PortError, PortResult,
};

pub const PARIS_ITINERARY: &str =
    "Day 1: Arrival\nVisit the Eiffel Tower\n\nDay 2: Museums\nVisit the Louvre";

/// Returned for trips to Lisbon: ends with a bolded block that is not a day.
pub const LISBON_ITINERARY: &str = "Day 1: Alfama\nRide tram 28\n\n**Tips**\nCarry cash";

/// A single-connection pool, so every query sees the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}

pub async fn memory_db() -> DbAdapter {
    DbAdapter::new(memory_pool().await, memory_pool().await)
}

pub struct FixedItinerary(pub &'static str);

#[async_trait]
impl ItineraryGenerationService for FixedItinerary {
    async fn generate_itinerary(&self, request: &TripRequest) -> PortResult<String> {
        match request.location.as_str() {
            "" => Err(PortError::Unexpected("model refused".to_string())),
            "Lisbon" => Ok(LISBON_ITINERARY.to_string()),
            _ => Ok(self.0.to_string()),
        }
    }
}

pub struct KeywordRecognizer;

#[async_trait]
impl EntityRecognitionService for KeywordRecognizer {
    async fn recognize_entities(&self, text: &str) -> PortResult<Vec<Entity>> {
        let known = [
            ("Eiffel Tower", "FAC"),
            ("Louvre", "ORG"),
            ("Seine", "LOC"),
            ("Napoleon", "PERSON"),
        ];
        Ok(known
            .iter()
            .filter(|(name, _)| text.contains(name))
            .map(|(name, label)| Entity::new(*name, EntityCategory::from_label(label)))
            .collect())
    }
}

pub struct TableGeocoder;

#[async_trait]
impl GeocodingService for TableGeocoder {
    async fn geocode(&self, place: &str) -> PortResult<Option<Coordinates>> {
        let coords = match place {
            "Paris" => Some((48.8566, 2.3522)),
            "Eiffel Tower" => Some((48.8584, 2.2945)),
            "Tokyo" => Some((35.6762, 139.6503)),
            "Louvre" => return Err(PortError::Unexpected("geocoder timed out".to_string())),
            _ => None,
        };
        Ok(coords.map(|(latitude, longitude)| Coordinates {
            latitude,
            longitude,
        }))
    }
}

pub struct EchoImages;

#[async_trait]
impl ImageSearchService for EchoImages {
    async fn search_images(&self, queries: &[String]) -> PortResult<HashMap<String, ImageRef>> {
        Ok(queries
            .iter()
            .map(|q| {
                (
                    q.clone(),
                    ImageRef {
                        url: format!("https://images.test/{}", q.replace(' ', "+")),
                    },
                )
            })
            .collect())
    }
}

pub fn app_state(db: DbAdapter) -> Arc<AppState> {
    let geocoder = Arc::new(TableGeocoder);
    Arc::new(AppState {
        db: Arc::new(db),
        itinerary_adapter: Arc::new(FixedItinerary(PARIS_ITINERARY)),
        enricher: LocationEnricher::new(
            Arc::new(KeywordRecognizer),
            geocoder.clone(),
            geocoder,
            Arc::new(EchoImages),
        ),
    })
}
