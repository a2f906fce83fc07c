use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::helpers::json_response;

pub const MISSING_LOCATION_MESSAGE: &str = "Please provide either city name or lat/lon.";
pub const INVALID_COORDINATES_MESSAGE: &str =
    "lat must be between -90 and 90 and lon between -180 and 180.";
pub const MISSING_API_KEY_MESSAGE: &str = "Server error: WEATHER_API_KEY is not set";
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "Failed to fetch weather data";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Standard error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `true`
    pub error: bool,
    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Validation(msg) | AppError::Configuration(msg) => msg,
            AppError::Upstream { message, .. } => message,
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        json_response(
            status,
            &ErrorResponse {
                error: true,
                message,
            },
        )
    }
}
