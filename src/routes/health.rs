use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;
use utoipa::ToSchema;

use crate::helpers::json_response;
use crate::routes::weather::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when the API key is configured, "degraded" otherwise)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether WEATHER_API_KEY is set
    pub api_key_configured: bool,
}

/// Health check endpoint.
///
/// Never calls the provider. Returns "degraded" (still 200) when the API key
/// is missing, since every weather lookup would fail with a 500.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let key_ok = state.api_key.is_some();

    json_response(
        StatusCode::OK,
        &HealthResponse {
            status: if key_ok {
                "ok".to_string()
            } else {
                "degraded".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_key_configured: key_ok,
        },
    )
}
