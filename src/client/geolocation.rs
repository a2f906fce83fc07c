//! Current-position lookup for the "use my location" flow.
//!
//! The controller only sees the [`Geolocator`] trait. [`IpGeolocator`]
//! resolves the position from the caller's public IP address.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

const DEFAULT_IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

/// Options for a position request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Accept a previously resolved position no older than this.
    pub maximum_age: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("position lookup timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Whether this environment can resolve a position at all.
    fn is_supported(&self) -> bool;

    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Coordinates, GeolocationError>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// [`Geolocator`] backed by an IP geolocation service.
///
/// IP lookups are coarse, so `high_accuracy` has no effect.
#[derive(Debug)]
pub struct IpGeolocator {
    client: reqwest::Client,
    lookup_url: String,
    last_fix: Mutex<Option<(Instant, Coordinates)>>,
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(DEFAULT_IP_LOOKUP_URL)
    }
}

impl IpGeolocator {
    pub fn new(lookup_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            lookup_url: lookup_url.to_string(),
            last_fix: Mutex::new(None),
        }
    }

    async fn lookup(&self) -> Result<Coordinates, GeolocationError> {
        let unavailable = |e: reqwest::Error| GeolocationError::PositionUnavailable(e.to_string());

        let response = self
            .client
            .get(&self.lookup_url)
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(GeolocationError::PositionUnavailable(format!(
                "IP lookup returned HTTP {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(unavailable)?;

        match (data.latitude, data.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(GeolocationError::PositionUnavailable(
                "IP lookup returned no coordinates".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        let mut last_fix = self.last_fix.lock().await;

        if let Some((at, coords)) = *last_fix {
            if at.elapsed() <= options.maximum_age {
                tracing::debug!("Reusing position resolved {:?} ago", at.elapsed());
                return Ok(coords);
            }
        }

        let coords = tokio::time::timeout(options.timeout, self.lookup())
            .await
            .map_err(|_| GeolocationError::Timeout(options.timeout))??;

        *last_fix = Some((Instant::now(), coords));
        Ok(coords)
    }
}
