//! services/api/src/web/trips.rs
//!
//! Trip endpoints: planning a trip, viewing its itinerary (overview map and
//! per-day views), saving it, and searching saved trips.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Local};
use std::sync::Arc;
use tracing::{error, info};
use trip_planner_core::{
    domain::{NewTrip, Trip, TripPurpose, TripRequest},
    itinerary::parse_itinerary,
    ports::PortError,
    search::{sort_trips, SavedTripQuery},
};

use crate::web::{
    protocol::{
        DayQuery, DayViewResponse, ItineraryResponse, OverviewResponse, PlanTripRequest,
        SavedTripResponse, SavedTripsParams, TripResponse,
    },
    rest::port_error,
    state::AppState,
};

/// Length of the default date range when the form leaves the dates empty.
const DEFAULT_TRIP_DAYS: i64 = 5;

/// POST /trips - Generate an itinerary and store the new trip
#[utoipa::path(
    post,
    path = "/trips",
    request_body = PlanTripRequest,
    responses(
        (status = 201, description = "Trip planned", body = TripResponse),
        (status = 400, description = "Unknown purpose"),
        (status = 502, description = "Itinerary generation failed"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn plan_trip_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlanTripRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let purpose = req
        .purpose
        .parse::<TripPurpose>()
        .map_err(|e| port_error("Invalid trip request", e))?;

    let today = Local::now().date_naive();
    let start_date = req.start_date.unwrap_or(today);
    let end_date = req
        .end_date
        .unwrap_or(today + Duration::days(DEFAULT_TRIP_DAYS));

    let request = TripRequest {
        location: req.location,
        purpose,
        start_date,
        end_date,
    };

    info!(
        "Planning {} trip to '{}' ({} to {})",
        request.purpose, request.location, request.start_date, request.end_date
    );
    let itinerary_text = state
        .itinerary_adapter
        .generate_itinerary(&request)
        .await
        .map_err(|e| {
            error!("Failed to generate itinerary: {:?}", e);
            (
                StatusCode::BAD_GATEWAY,
                "Failed to generate itinerary".to_string(),
            )
        })?;

    let trip = state
        .db
        .insert_trip(&NewTrip {
            request,
            itinerary_text,
        })
        .await
        .map_err(|e| port_error("Failed to store trip", e))?;

    Ok((StatusCode::CREATED, Json(TripResponse::from(trip))))
}

/// GET /trips/latest - The most recently planned trip
#[utoipa::path(
    get,
    path = "/trips/latest",
    responses(
        (status = 200, description = "Latest trip", body = TripResponse),
        (status = 404, description = "No trip plans found")
    )
)]
pub async fn latest_trip_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TripResponse>, (StatusCode, String)> {
    match state.db.latest_trip().await {
        Ok(Some(trip)) => Ok(Json(trip.into())),
        Ok(None) => Err((StatusCode::NOT_FOUND, "No trip plans found.".to_string())),
        Err(e) => Err(port_error("Failed to load latest trip", e)),
    }
}

/// GET /trips/{id} - A single trip
#[utoipa::path(
    get,
    path = "/trips/{id}",
    params(("id" = i64, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Trip", body = TripResponse),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn get_trip_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TripResponse>, (StatusCode, String)> {
    let trip = load_trip(&state, id).await?;
    Ok(Json(trip.into()))
}

/// GET /trips/{id}/itinerary - Day-sections and the day selector
#[utoipa::path(
    get,
    path = "/trips/{id}/itinerary",
    params(("id" = i64, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Parsed itinerary", body = ItineraryResponse),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn itinerary_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ItineraryResponse>, (StatusCode, String)> {
    let trip = load_trip(&state, id).await?;
    let parsed = parse_itinerary(&trip.itinerary_text);
    Ok(Json(ItineraryResponse::new(trip.id, parsed)))
}

/// GET /trips/{id}/overview - Map markers for the destination and every place in the itinerary
#[utoipa::path(
    get,
    path = "/trips/{id}/overview",
    params(("id" = i64, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Overview", body = OverviewResponse),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn overview_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<OverviewResponse>, (StatusCode, String)> {
    let trip = load_trip(&state, id).await?;
    let context = trip.context();
    let parsed = parse_itinerary(&trip.itinerary_text);

    let places = state.enricher.extract_places(&parsed).await;
    let map = state.enricher.overview_map(&context, &places).await;
    info!(
        "Overview for trip {}: {} places, {} markers",
        trip.id,
        places.len(),
        map.markers.len()
    );

    Ok(Json(OverviewResponse::new(trip, &places, map)))
}

/// GET /trips/{id}/day?title= - One day's activities with imagery
#[utoipa::path(
    get,
    path = "/trips/{id}/day",
    params(("id" = i64, Path, description = "Trip id"), DayQuery),
    responses(
        (status = 200, description = "Day view", body = DayViewResponse),
        (status = 404, description = "Trip or day not found")
    )
)]
pub async fn day_view_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayViewResponse>, (StatusCode, String)> {
    let trip = load_trip(&state, id).await?;
    let parsed = parse_itinerary(&trip.itinerary_text);

    let view = state
        .enricher
        .day_view(&parsed, &query.title)
        .await
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("No day titled '{}' in trip {}", query.title, trip.id),
            )
        })?;

    Ok(Json(DayViewResponse::new(trip.id, view)))
}

/// POST /trips/{id}/save - Mark a trip as saved
#[utoipa::path(
    post,
    path = "/trips/{id}/save",
    params(("id" = i64, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Trip saved", body = TripResponse),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn save_trip_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TripResponse>, (StatusCode, String)> {
    state
        .db
        .mark_trip_saved(id)
        .await
        .map_err(|e| port_error("Failed to save trip", e))?;
    info!("Trip {} saved", id);

    let trip = load_trip(&state, id).await?;
    Ok(Json(trip.into()))
}

/// GET /trips/saved - Search, filter and sort saved trips
#[utoipa::path(
    get,
    path = "/trips/saved",
    params(SavedTripsParams),
    responses(
        (status = 200, description = "Saved trips", body = [SavedTripResponse]),
        (status = 400, description = "Unknown filter, sort column or order")
    )
)]
pub async fn saved_trips_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SavedTripsParams>,
) -> Result<Json<Vec<SavedTripResponse>>, (StatusCode, String)> {
    let query = saved_trip_query(params).map_err(|e| port_error("Invalid search", e))?;

    let mut trips = state
        .db
        .search_saved_trips(&query)
        .await
        .map_err(|e| port_error("Failed to search saved trips", e))?;
    sort_trips(&mut trips, query.sort_by, query.order);

    Ok(Json(trips.into_iter().map(SavedTripResponse::from).collect()))
}

fn saved_trip_query(
    params: SavedTripsParams,
) -> Result<SavedTripQuery, PortError> {
    let mut query = SavedTripQuery {
        text: params.q,
        ..Default::default()
    };
    if let Some(filter) = params.filter {
        query.filter = filter.parse()?;
    }
    if let Some(sort_by) = params.sort_by {
        query.sort_by = sort_by.parse()?;
    }
    if let Some(order) = params.order {
        query.order = order.parse()?;
    }
    Ok(query)
}

async fn load_trip(state: &AppState, id: i64) -> Result<Trip, (StatusCode, String)> {
    state
        .db
        .get_trip(id)
        .await
        .map_err(|e| port_error("Failed to load trip", e))
}
