//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        ArcGisGeocoder, DbAdapter, NominatimGeocoder, OpenAiEntityAdapter,
        OpenAiItineraryAdapter, ScrapedImageSearch,
    },
    config::Config,
    error::ApiError,
    web::{router, ApiDoc, AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trip_planner_core::enrichment::LocationEnricher;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to the Stores & Create Tables ---
    info!("Opening trip and packing databases...");
    let trip_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.trip_database_url)
        .await?;
    let packing_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.packing_database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(trip_pool, packing_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(config.require_openai_api_key()?);
    let openai_client = Client::with_config(openai_config);

    let itinerary_adapter = Arc::new(OpenAiItineraryAdapter::new(
        openai_client.clone(),
        config.itinerary_model.clone(),
    ));
    let entity_adapter = Arc::new(OpenAiEntityAdapter::new(
        openai_client.clone(),
        config.entity_model.clone(),
    ));

    let http = reqwest::Client::builder()
        .user_agent(config.geocoder_user_agent.clone())
        .timeout(config.http_timeout)
        .build()?;
    let destination_geocoder = Arc::new(NominatimGeocoder::new(
        http.clone(),
        config.nominatim_url.clone(),
    ));
    let place_geocoder = Arc::new(ArcGisGeocoder::new(http.clone(), config.arcgis_url.clone()));
    let image_search = Arc::new(
        ScrapedImageSearch::new(http, config.image_search_url.clone())
            .map_err(|e| ApiError::Internal(format!("Invalid image pattern: {}", e)))?,
    );

    let enricher = LocationEnricher::new(
        entity_adapter,
        destination_geocoder,
        place_geocoder,
        image_search,
    );

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        itinerary_adapter,
        enricher,
    });

    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
