//! Client-side controller for the weather page.
//!
//! Reacts to the two user triggers (search by name, search by location),
//! calls the weather handler and renders exactly one [`ViewState`] at a time.
//! All collaborators are injected, so tests can swap in fakes.
//!
//! A second trigger while a flow is in flight is not cancelled; whichever
//! flow finishes last wins the view.

pub mod geolocation;
pub mod transport;
pub mod view;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use crate::models::{NormalizedWeather, WeatherQuery};
use geolocation::{GeolocationError, Geolocator, PositionOptions};
use transport::WeatherTransport;
use view::{ViewState, WeatherView};

pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name.";
pub const GEOLOCATION_UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported in this browser.";
pub const DETECTING_LOCATION_MESSAGE: &str = "Detecting your location...";
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Location permission was denied. Please allow it or enter a city manually.";
pub const LOCATION_UNAVAILABLE_MESSAGE: &str =
    "Unable to get your location. Please try again or enter city manually.";
pub const FETCHING_MESSAGE: &str = "Fetching weather data...";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data.";
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Position request used by the location trigger.
pub const LOCATE_OPTIONS: PositionOptions = PositionOptions {
    high_accuracy: true,
    timeout: Duration::from_secs(10),
    maximum_age: Duration::from_secs(5 * 60),
};

pub struct WeatherController {
    api_base_url: Url,
    transport: Arc<dyn WeatherTransport>,
    geolocator: Arc<dyn Geolocator>,
    view: Arc<dyn WeatherView>,
}

/// Why a query flow produced no result.
enum FlowError {
    /// Shown to the user as-is.
    Reported(String),
    /// Logged; the user sees the generic message.
    Unexpected(String),
}

impl WeatherController {
    pub fn new(
        api_base_url: Url,
        transport: Arc<dyn WeatherTransport>,
        geolocator: Arc<dyn Geolocator>,
        view: Arc<dyn WeatherView>,
    ) -> Self {
        Self {
            api_base_url,
            transport,
            geolocator,
            view,
        }
    }

    fn show(&self, state: ViewState) -> ViewState {
        self.view.render(&state);
        state
    }

    /// Search by a typed city name.
    pub async fn search_by_city(&self, input: &str) -> ViewState {
        let city = input.trim();
        if city.is_empty() {
            return self.show(ViewState::Error(EMPTY_CITY_MESSAGE.to_string()));
        }
        self.fetch_weather(&WeatherQuery::City(city.to_string()))
            .await
    }

    /// Search by the device's current position.
    pub async fn search_by_location(&self) -> ViewState {
        if !self.geolocator.is_supported() {
            return self.show(ViewState::Error(
                GEOLOCATION_UNSUPPORTED_MESSAGE.to_string(),
            ));
        }

        self.show(ViewState::Loading(DETECTING_LOCATION_MESSAGE.to_string()));

        match self.geolocator.current_position(LOCATE_OPTIONS).await {
            Ok(coords) => {
                self.fetch_weather(&WeatherQuery::Coordinates {
                    lat: coords.latitude,
                    lon: coords.longitude,
                })
                .await
            }
            Err(err) => {
                tracing::error!("Geolocation failed: {}", err);
                let message = match err {
                    GeolocationError::PermissionDenied => PERMISSION_DENIED_MESSAGE,
                    _ => LOCATION_UNAVAILABLE_MESSAGE,
                };
                self.show(ViewState::Error(message.to_string()))
            }
        }
    }

    /// Query the handler and render the outcome.
    pub async fn fetch_weather(&self, query: &WeatherQuery) -> ViewState {
        self.show(ViewState::Loading(FETCHING_MESSAGE.to_string()));

        match self.request(query).await {
            Ok(weather) => self.show(ViewState::Result(weather)),
            Err(FlowError::Reported(message)) => self.show(ViewState::Error(message)),
            Err(FlowError::Unexpected(detail)) => {
                tracing::error!("Weather lookup failed: {}", detail);
                self.show(ViewState::Error(UNEXPECTED_FAILURE_MESSAGE.to_string()))
            }
        }
    }

    fn url_for(&self, query: &WeatherQuery) -> Url {
        let mut url = self.api_base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.to_params() {
                pairs.append_pair(key, &value);
            }
        }
        url
    }

    async fn request(&self, query: &WeatherQuery) -> Result<NormalizedWeather, FlowError> {
        let url = self.url_for(query);

        let reply = match self.transport.get(&url).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!("Weather request failed: {}", err);
                return Err(FlowError::Reported(FETCH_FAILED_MESSAGE.to_string()));
            }
        };

        let body: serde_json::Value = serde_json::from_str(&reply.body)
            .map_err(|e| FlowError::Unexpected(format!("unreadable response body: {}", e)))?;

        if !reply.is_success() || body.get("error").is_some_and(is_truthy) {
            let message = body
                .get("message")
                .and_then(serde_json::Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(FETCH_FAILED_MESSAGE);
            return Err(FlowError::Reported(message.to_string()));
        }

        serde_json::from_value(body)
            .map_err(|e| FlowError::Unexpected(format!("unexpected response shape: {}", e)))
    }
}

/// Loose truthiness of a JSON value, as a browser would judge `data.error`.
fn is_truthy(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use super::geolocation::Coordinates;
    use std::sync::Mutex;
    use super::transport::{HttpReply, TransportError};

    struct FakeTransport {
        reply: Result<HttpReply, String>,
        requests: Mutex<Vec<Url>>,
    }

    impl FakeTransport {
        fn with_reply(reply: Result<HttpReply, String>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn replying(status: u16, body: serde_json::Value) -> Arc<Self> {
            Self::replying_raw(status, &body.to_string())
        }

        fn replying_raw(status: u16, body: &str) -> Arc<Self> {
            Self::with_reply(Ok(HttpReply {
                status,
                body: body.to_string(),
            }))
        }

        fn failing() -> Arc<Self> {
            Self::with_reply(Err("connection reset".to_string()))
        }

        fn requests(&self) -> Vec<Url> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherTransport for FakeTransport {
        async fn get(&self, url: &Url) -> Result<HttpReply, TransportError> {
            self.requests.lock().unwrap().push(url.clone());
            self.reply
                .clone()
                .map_err(|message| TransportError::Request {
                    url: url.to_string(),
                    message,
                })
        }
    }

    enum FakePosition {
        Unsupported,
        At(f64, f64),
        Denied,
        Unavailable,
    }

    struct FakeGeolocator {
        position: FakePosition,
        requested: Mutex<Option<PositionOptions>>,
    }

    impl FakeGeolocator {
        fn new(position: FakePosition) -> Arc<Self> {
            Arc::new(Self {
                position,
                requested: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Geolocator for FakeGeolocator {
        fn is_supported(&self) -> bool {
            !matches!(self.position, FakePosition::Unsupported)
        }

        async fn current_position(
            &self,
            options: PositionOptions,
        ) -> Result<Coordinates, GeolocationError> {
            *self.requested.lock().unwrap() = Some(options);
            match self.position {
                FakePosition::At(latitude, longitude) => Ok(Coordinates {
                    latitude,
                    longitude,
                }),
                FakePosition::Denied => Err(GeolocationError::PermissionDenied),
                FakePosition::Unavailable => {
                    Err(GeolocationError::Timeout(Duration::from_secs(10)))
                }
                FakePosition::Unsupported => unreachable!("unsupported geolocator was queried"),
            }
        }
    }

    #[derive(Default)]
    struct RecordingView {
        states: Mutex<Vec<ViewState>>,
    }

    impl RecordingView {
        fn states(&self) -> Vec<ViewState> {
            self.states.lock().unwrap().clone()
        }
    }

    impl WeatherView for RecordingView {
        fn render(&self, state: &ViewState) {
            self.states.lock().unwrap().push(state.clone());
        }
    }

    fn controller(
        transport: Arc<FakeTransport>,
        geolocator: Arc<FakeGeolocator>,
    ) -> (WeatherController, Arc<RecordingView>) {
        let view = Arc::new(RecordingView::default());
        let controller = WeatherController::new(
            Url::parse("https://api.example.com/weather").unwrap(),
            transport,
            geolocator,
            view.clone(),
        );
        (controller, view)
    }

    fn london() -> serde_json::Value {
        serde_json::json!({
            "city": "London",
            "country": "GB",
            "temperature": 15.2,
            "feels_like": 14.8,
            "description": "clear sky",
            "humidity": 70,
            "wind_speed": 3.1
        })
    }

    fn loading(msg: &str) -> ViewState {
        ViewState::Loading(msg.to_string())
    }

    fn error(msg: &str) -> ViewState {
        ViewState::Error(msg.to_string())
    }

    #[tokio::test]
    async fn test_empty_city_makes_no_request() {
        let transport = FakeTransport::replying(200, london());
        let (c, view) = controller(transport.clone(), FakeGeolocator::new(FakePosition::Unsupported));

        let state = c.search_by_city("   ").await;

        assert_eq!(state, error(EMPTY_CITY_MESSAGE));
        assert!(transport.requests().is_empty());
        assert_eq!(view.states(), vec![error(EMPTY_CITY_MESSAGE)]);
    }

    #[tokio::test]
    async fn test_city_search_renders_result() {
        let transport = FakeTransport::replying(200, london());
        let (c, view) = controller(transport.clone(), FakeGeolocator::new(FakePosition::Unsupported));

        let state = c.search_by_city("  New York ").await;

        let expected: NormalizedWeather = serde_json::from_value(london()).unwrap();
        assert_eq!(state, ViewState::Result(expected.clone()));
        assert_eq!(
            view.states(),
            vec![loading(FETCHING_MESSAGE), ViewState::Result(expected)]
        );
        assert_eq!(
            transport.requests()[0].as_str(),
            "https://api.example.com/weather?city=New+York"
        );
    }

    #[tokio::test]
    async fn test_error_body_message_is_shown() {
        let transport = FakeTransport::replying(
            404,
            serde_json::json!({ "error": true, "message": "city not found" }),
        );
        let (c, _) = controller(transport, FakeGeolocator::new(FakePosition::Unsupported));

        assert_eq!(c.search_by_city("Atlantis").await, error("city not found"));
    }

    #[tokio::test]
    async fn test_error_flag_with_success_status() {
        let transport = FakeTransport::replying(200, serde_json::json!({ "error": true }));
        let (c, _) = controller(transport, FakeGeolocator::new(FakePosition::Unsupported));

        assert_eq!(c.search_by_city("Paris").await, error(FETCH_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_failure_status_without_message() {
        let transport = FakeTransport::replying(502, serde_json::json!({}));
        let (c, _) = controller(transport, FakeGeolocator::new(FakePosition::Unsupported));

        assert_eq!(c.search_by_city("Paris").await, error(FETCH_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let transport = FakeTransport::failing();
        let (c, view) = controller(transport, FakeGeolocator::new(FakePosition::Unsupported));

        assert_eq!(c.search_by_city("Paris").await, error(FETCH_FAILED_MESSAGE));
        assert_eq!(
            view.states(),
            vec![loading(FETCHING_MESSAGE), error(FETCH_FAILED_MESSAGE)]
        );
    }

    #[tokio::test]
    async fn test_unparseable_body_is_unexpected() {
        let transport = FakeTransport::replying_raw(200, "<html>oops</html>");
        let (c, _) = controller(transport, FakeGeolocator::new(FakePosition::Unsupported));

        assert_eq!(
            c.search_by_city("Paris").await,
            error(UNEXPECTED_FAILURE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_non_object_success_body_is_unexpected() {
        let transport = FakeTransport::replying(200, serde_json::json!([1, 2, 3]));
        let (c, _) = controller(transport, FakeGeolocator::new(FakePosition::Unsupported));

        assert_eq!(
            c.search_by_city("Paris").await,
            error(UNEXPECTED_FAILURE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_geolocation_unsupported() {
        let transport = FakeTransport::replying(200, london());
        let (c, view) = controller(transport.clone(), FakeGeolocator::new(FakePosition::Unsupported));

        let state = c.search_by_location().await;

        assert_eq!(state, error(GEOLOCATION_UNSUPPORTED_MESSAGE));
        assert_eq!(view.states().len(), 1);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_location_search_uses_coordinates() {
        let transport = FakeTransport::replying(200, london());
        let geo = FakeGeolocator::new(FakePosition::At(51.5, -0.12));
        let (c, view) = controller(transport.clone(), geo.clone());

        let state = c.search_by_location().await;

        assert!(matches!(state, ViewState::Result(_)));
        assert_eq!(
            view.states()[..2],
            [loading(DETECTING_LOCATION_MESSAGE), loading(FETCHING_MESSAGE)]
        );
        assert_eq!(*geo.requested.lock().unwrap(), Some(LOCATE_OPTIONS));

        let url = &transport.requests()[0];
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("lat".to_string(), "51.5".to_string()),
                ("lon".to_string(), "-0.12".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_location_permission_denied() {
        let transport = FakeTransport::replying(200, london());
        let (c, view) = controller(transport.clone(), FakeGeolocator::new(FakePosition::Denied));

        let state = c.search_by_location().await;

        assert_eq!(state, error(PERMISSION_DENIED_MESSAGE));
        assert_eq!(
            view.states(),
            vec![loading(DETECTING_LOCATION_MESSAGE), error(PERMISSION_DENIED_MESSAGE)]
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_location_unavailable() {
        let transport = FakeTransport::replying(200, london());
        let (c, _) = controller(transport, FakeGeolocator::new(FakePosition::Unavailable));

        assert_eq!(
            c.search_by_location().await,
            error(LOCATION_UNAVAILABLE_MESSAGE)
        );
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(&serde_json::json!(true)));
        assert!(is_truthy(&serde_json::json!("yes")));
        assert!(is_truthy(&serde_json::json!(1)));
        assert!(!is_truthy(&serde_json::json!(false)));
        assert!(!is_truthy(&serde_json::json!(null)));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!("")));
    }
}
