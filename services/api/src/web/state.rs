//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every request handler.

use std::sync::Arc;
use trip_planner_core::{
    enrichment::LocationEnricher,
    ports::{DatabaseService, ItineraryGenerationService},
};

/// The shared application state, created once at startup and passed to all handlers.
///
/// It is never mutated after construction; each request works on its own values.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub itinerary_adapter: Arc<dyn ItineraryGenerationService>,
    pub enricher: LocationEnricher,
}
