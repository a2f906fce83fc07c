//! Types shared by the handler and the client.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use utoipa::ToSchema;

/// What the caller asked for: a place name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl WeatherQuery {
    /// Query parameters as sent to the handler (`city`, or `lat` and `lon`).
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        match self {
            WeatherQuery::City(city) => vec![("city", city.clone())],
            WeatherQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

/// Normalized current weather returned by `GET /weather`.
///
/// Every field is `null` when the provider omitted it. Numbers are passed
/// through exactly as the provider sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NormalizedWeather {
    /// Location name (e.g. "London")
    pub city: Option<String>,
    /// ISO 3166 country code (e.g. "GB")
    pub country: Option<String>,
    /// Air temperature in Celsius
    #[schema(value_type = Option<f64>)]
    pub temperature: Option<Number>,
    /// Feels-like temperature in Celsius
    #[schema(value_type = Option<f64>)]
    pub feels_like: Option<Number>,
    /// Provider weather description (e.g. "clear sky")
    pub description: Option<String>,
    /// Relative humidity in percent
    #[schema(value_type = Option<f64>)]
    pub humidity: Option<Number>,
    /// Wind speed in metres per second
    #[schema(value_type = Option<f64>)]
    pub wind_speed: Option<Number>,
}
