pub mod health;
pub mod weather;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::helpers::cors_layer;
use weather::AppState;

/// Build the API router (without the Swagger UI).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/weather",
            get(weather::get_weather).options(weather::preflight),
        )
        .route("/api/v1/health", get(health::health_check))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
