//! Response helpers shared by every endpoint.
//!
//! All responses carry the same CORS policy so the browser page (served from
//! a different origin) can read both successful and error bodies.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET,OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

/// The CORS headers attached to every response.
pub(crate) fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    headers
}

/// Serialize `body` as JSON with the given status and the CORS headers.
pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, cors_headers(), Json(body)).into_response()
}

/// Layer answering browser preflight requests with the same policy as
/// [`cors_headers`].
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
