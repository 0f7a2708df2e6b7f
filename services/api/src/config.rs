//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub trip_database_url: String,
    pub packing_database_url: String,
    pub log_level: Level,
    pub cors_origin: String,
    pub openai_api_key: Option<String>,
    pub itinerary_model: String,
    pub entity_model: String,
    pub nominatim_url: String,
    pub arcgis_url: String,
    pub image_search_url: String,
    pub geocoder_user_agent: String,
    pub http_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let trip_database_url = var_or("TRIP_DATABASE_URL", "sqlite://trip_plans.db?mode=rwc");
        let packing_database_url =
            var_or("PACKING_DATABASE_URL", "sqlite://packing_list.sqlite?mode=rwc");

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3000");

        // --- Load API Keys (as optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        // --- Load Adapter-specific Settings ---
        let itinerary_model = var_or("ITINERARY_MODEL", "gpt-3.5-turbo");
        let entity_model = var_or("ENTITY_MODEL", "gpt-4o-mini");
        let nominatim_url = var_or(
            "NOMINATIM_URL",
            "https://nominatim.openstreetmap.org/search",
        );
        let arcgis_url = var_or(
            "ARCGIS_URL",
            "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates",
        );
        let image_search_url = var_or("IMAGE_SEARCH_URL", "https://www.google.com/search");
        let geocoder_user_agent = var_or("GEOCODER_USER_AGENT", "trip_planner");

        let timeout_str = var_or("HTTP_TIMEOUT_SECS", "10");
        let http_timeout = timeout_str
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue("HTTP_TIMEOUT_SECS".to_string(), e.to_string()))?;

        Ok(Self {
            bind_address,
            trip_database_url,
            packing_database_url,
            log_level,
            cors_origin,
            openai_api_key,
            itinerary_model,
            entity_model,
            nominatim_url,
            arcgis_url,
            image_search_url,
            geocoder_user_agent,
            http_timeout,
        })
    }

    /// The OpenAI key, which the server cannot start without.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
