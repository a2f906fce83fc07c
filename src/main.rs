// Weather Lookup API v0.1
use std::net::SocketAddr;
use std::process::ExitCode;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use weather_lookup::config::AppConfig;
use weather_lookup::logging::init_tracing;
use weather_lookup::routes::{self, health, weather};

/// OpenAPI document for the Weather Lookup API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Lookup API",
        version = "0.1.0",
        description = "Current weather for a city name or a coordinate pair, \
            proxied from OpenWeatherMap and normalized into a stable shape.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Weather", description = "Current weather lookup"),
    ),
    paths(
        health::health_check,
        weather::get_weather,
    ),
    components(
        schemas(
            health::HealthResponse,
            weather_lookup::models::NormalizedWeather,
            weather_lookup::errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format, "weather_lookup=debug,tower_http=debug");

    if config.weather_api_key.is_none() {
        tracing::warn!("WEATHER_API_KEY is not set; weather lookups will fail with HTTP 500");
    }

    let state = weather::AppState::from_config(&config);

    let app = routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server terminated unexpectedly: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
