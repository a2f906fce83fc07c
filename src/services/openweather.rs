//! OpenWeatherMap current-weather client.
//!
//! Issues a single metric-unit request per lookup and remaps the response
//! into [`NormalizedWeather`].
//! See: https://openweathermap.org/current

use serde::Deserialize;
use serde_json::Number;

use crate::errors::{AppError, UPSTREAM_FALLBACK_MESSAGE};
use crate::models::{NormalizedWeather, WeatherQuery};

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Client for the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
}

// --- OpenWeatherMap JSON response types ---
//
// Every field is optional: the provider omits blocks it has no data for.

#[derive(Debug, Default, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    sys: Option<OwSys>,
    main: Option<OwMain>,
    weather: Option<Vec<Option<OwWeather>>>,
    wind: Option<OwWind>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<Number>,
    feels_like: Option<Number>,
    humidity: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<Number>,
}

/// Error body, e.g. `{"cod": "404", "message": "city not found"}`.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<serde_json::Value>,
}

impl OwCurrentResponse {
    fn country(&self) -> Option<String> {
        self.sys.as_ref().and_then(|s| s.country.clone())
    }

    fn main_field(&self, pick: fn(&OwMain) -> &Option<Number>) -> Option<Number> {
        self.main.as_ref().and_then(|m| pick(m).clone())
    }

    fn description(&self) -> Option<String> {
        self.weather
            .as_ref()
            .and_then(|w| w.first())
            .and_then(|w| w.as_ref())
            .and_then(|w| w.description.clone())
    }

    fn wind_speed(&self) -> Option<Number> {
        self.wind.as_ref().and_then(|w| w.speed.clone())
    }

    fn normalize(self) -> NormalizedWeather {
        NormalizedWeather {
            country: self.country(),
            temperature: self.main_field(|m| &m.temp),
            feels_like: self.main_field(|m| &m.feels_like),
            description: self.description(),
            humidity: self.main_field(|m| &m.humidity),
            wind_speed: self.wind_speed(),
            city: self.name,
        }
    }
}

/// Normalize a successful provider body.
pub fn normalize_current(body: &str) -> Result<NormalizedWeather, AppError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|e| {
        AppError::Internal(format!("OpenWeatherMap response structure error: {}", e))
    })?;
    Ok(parsed.normalize())
}

/// Pick the message to show for a failed provider call.
///
/// Uses the provider's `message` string when it has one, otherwise the
/// generic fallback. A non-JSON body is not an error here.
pub fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .and_then(|m| m.as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string())
}

impl OpenWeatherClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch and normalize the current weather for `query`.
    pub async fn fetch_current(
        &self,
        query: &WeatherQuery,
        api_key: &str,
    ) -> Result<NormalizedWeather, AppError> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);

        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::City(city) => vec![("q", city.clone())],
            WeatherQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        params.push(("appid", api_key.to_string()));
        params.push(("units", "metric".to_string()));

        tracing::debug!("Requesting current weather for {:?}", query);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("OpenWeatherMap request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::Internal(format!("OpenWeatherMap body read failed: {}", e))
        })?;

        if !status.is_success() {
            let message = upstream_error_message(&body);
            tracing::warn!("OpenWeatherMap returned HTTP {}: {}", status, message);
            return Err(AppError::Upstream { status, message });
        }

        normalize_current(&body)
    }
}
