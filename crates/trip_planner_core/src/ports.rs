//! crates/trip_planner_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::{
    Coordinates, Entity, ImageRef, NewPackingItem, NewTrip, PackingItem, Trip, TripRequest,
};
use crate::search::SavedTripQuery;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Trip Plans ---
    async fn insert_trip(&self, trip: &NewTrip) -> PortResult<Trip>;

    /// The most recently planned trip, if any.
    async fn latest_trip(&self) -> PortResult<Option<Trip>>;

    async fn get_trip(&self, trip_id: i64) -> PortResult<Trip>;

    async fn mark_trip_saved(&self, trip_id: i64) -> PortResult<()>;

    /// Saved trips matching the query's filter. Ordering is left to the caller.
    async fn search_saved_trips(&self, query: &SavedTripQuery) -> PortResult<Vec<Trip>>;

    // --- Packing List ---
    async fn add_packing_item(&self, item: &NewPackingItem) -> PortResult<PackingItem>;

    async fn list_packing_items(&self) -> PortResult<Vec<PackingItem>>;

    async fn set_item_packed(&self, item_id: i64, packed: bool) -> PortResult<PackingItem>;

    async fn delete_packing_item(&self, item_id: i64) -> PortResult<()>;
}

#[async_trait]
pub trait ItineraryGenerationService: Send + Sync {
    /// Produces a free-text, day-by-day itinerary for the request.
    async fn generate_itinerary(&self, request: &TripRequest) -> PortResult<String>;
}

#[async_trait]
pub trait EntityRecognitionService: Send + Sync {
    /// Tags the named entities found in a single line of text.
    async fn recognize_entities(&self, text: &str) -> PortResult<Vec<Entity>>;
}

#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Resolves a place name to coordinates. `Ok(None)` means the provider found no match.
    async fn geocode(&self, place: &str) -> PortResult<Option<Coordinates>>;
}

#[async_trait]
pub trait ImageSearchService: Send + Sync {
    /// Looks up one image per query. Queries with no result are absent from the map.
    async fn search_images(&self, queries: &[String]) -> PortResult<HashMap<String, ImageRef>>;
}
