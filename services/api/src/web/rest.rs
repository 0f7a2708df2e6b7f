//! services/api/src/web/rest.rs
//!
//! Assembles the REST router, maps port errors onto HTTP responses, and holds
//! the master definition for the OpenAPI specification.

use crate::web::{packing, protocol, state::AppState, trips};
use axum::{
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tracing::error;
use trip_planner_core::ports::PortError;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        trips::plan_trip_handler,
        trips::latest_trip_handler,
        trips::get_trip_handler,
        trips::itinerary_handler,
        trips::overview_handler,
        trips::day_view_handler,
        trips::save_trip_handler,
        trips::saved_trips_handler,
        packing::list_packing_items_handler,
        packing::add_packing_item_handler,
        packing::update_packing_item_handler,
        packing::delete_packing_item_handler,
    ),
    components(
        schemas(
            protocol::PlanTripRequest,
            protocol::TripResponse,
            protocol::ItineraryResponse,
            protocol::DaySectionResponse,
            protocol::OverviewResponse,
            protocol::CoordinatesResponse,
            protocol::MarkerResponse,
            protocol::DayViewResponse,
            protocol::ActivityResponse,
            protocol::SavedTripResponse,
            protocol::NewPackingItemRequest,
            protocol::UpdatePackingItemRequest,
            protocol::PackingItemResponse,
        )
    ),
    tags(
        (name = "Trip Planner API", description = "Trip planning, itinerary views, saved trips and the packing list.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router
//=========================================================================================

/// Builds the API routes over the shared state. CORS and docs are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/trips", post(trips::plan_trip_handler))
        .route("/trips/latest", get(trips::latest_trip_handler))
        .route("/trips/saved", get(trips::saved_trips_handler))
        .route("/trips/{id}", get(trips::get_trip_handler))
        .route("/trips/{id}/itinerary", get(trips::itinerary_handler))
        .route("/trips/{id}/overview", get(trips::overview_handler))
        .route("/trips/{id}/day", get(trips::day_view_handler))
        .route("/trips/{id}/save", post(trips::save_trip_handler))
        .route(
            "/packing-items",
            get(packing::list_packing_items_handler).post(packing::add_packing_item_handler),
        )
        .route(
            "/packing-items/{id}",
            patch(packing::update_packing_item_handler)
                .delete(packing::delete_packing_item_handler),
        )
        .with_state(app_state)
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Logs a port error and turns it into a status code and message for the client.
pub fn port_error(context: &str, e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        PortError::Unexpected(_) => {
            error!("{}: {:?}", context, e);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}
