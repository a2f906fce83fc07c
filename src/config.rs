/// Default OpenWeatherMap API root; overridable for staging or tests.
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider credential. Absence is reported per request, not at startup.
    pub weather_api_key: Option<String>,
    pub openweather_base_url: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            weather_api_key: var("WEATHER_API_KEY").filter(|k| !k.is_empty()),
            openweather_base_url: var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_string()),
            port,
            log_format,
        })
    }
}
