//! Weather lookup HTTP endpoints.
//!
//! - GET /weather?city=NAME
//! - GET /weather?lat=LAT&lon=LON
//! - OPTIONS /weather

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::AppConfig;
use crate::errors::{AppError, ErrorResponse, MISSING_API_KEY_MESSAGE, MISSING_LOCATION_MESSAGE};
use crate::helpers::{cors_headers, json_response};
use crate::models::NormalizedWeather;
use crate::services::openweather::OpenWeatherClient;
use crate::services::query::resolve_query;

/// Shared application state for the weather endpoints.
#[derive(Debug, Clone)]
pub struct AppState {
    pub api_key: Option<String>,
    pub openweather: OpenWeatherClient,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.weather_api_key.clone(),
            openweather: OpenWeatherClient::new(&config.openweather_base_url),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeatherParams {
    /// City name (e.g. "London"); ignored when `lat` and `lon` are given
    pub city: Option<String>,
    /// Latitude in decimal degrees
    pub lat: Option<String>,
    /// Longitude in decimal degrees
    pub lon: Option<String>,
}

/// Get the current weather for a city or a coordinate pair.
///
/// Coordinates take precedence over the city name. Provider failures are
/// reported with the provider's own status code and message.
#[utoipa::path(
    get,
    path = "/weather",
    tag = "Weather",
    params(WeatherParams),
    responses(
        (status = 200, description = "Normalized current weather", body = NormalizedWeather),
        (status = 400, description = "Neither city nor valid lat/lon given", body = ErrorResponse),
        (status = 404, description = "Provider could not find the location", body = ErrorResponse),
        (status = 500, description = "Missing API key or internal failure", body = ErrorResponse),
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Response {
    match lookup(&state, params).await {
        Ok(weather) => json_response(StatusCode::OK, &weather),
        Err(err) => err.into_response(),
    }
}

async fn lookup(
    state: &AppState,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<NormalizedWeather, AppError> {
    let api_key = state
        .api_key
        .as_deref()
        .ok_or_else(|| AppError::Configuration(MISSING_API_KEY_MESSAGE.to_string()))?;

    let Query(params) = params.map_err(|e| {
        tracing::debug!("Rejected query string: {}", e);
        AppError::Validation(MISSING_LOCATION_MESSAGE.to_string())
    })?;

    let query = resolve_query(
        params.city.as_deref(),
        params.lat.as_deref(),
        params.lon.as_deref(),
    )?;

    state.openweather.fetch_current(&query, api_key).await
}

/// Answer a bare `OPTIONS /weather` with the CORS policy.
pub async fn preflight() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, cors_headers())
}
