//! Turns raw `city` / `lat` / `lon` query strings into a [`WeatherQuery`].
//!
//! Once both `lat` and `lon` are non-empty the coordinate form is used, even
//! when a city is also given. Coordinates that do not parse as in-range
//! numbers are rejected rather than swapped for the city. Empty strings count
//! as absent.

use crate::errors::{AppError, INVALID_COORDINATES_MESSAGE, MISSING_LOCATION_MESSAGE};
use crate::models::WeatherQuery;

const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
const LON_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

pub fn resolve_query(
    city: Option<&str>,
    lat: Option<&str>,
    lon: Option<&str>,
) -> Result<WeatherQuery, AppError> {
    if let (Some(lat), Some(lon)) = (non_empty(lat), non_empty(lon)) {
        return match (parse_coord(lat, &LAT_RANGE), parse_coord(lon, &LON_RANGE)) {
            (Some(lat), Some(lon)) => Ok(WeatherQuery::Coordinates { lat, lon }),
            _ => {
                tracing::debug!("Rejecting coordinates lat={:?} lon={:?}", lat, lon);
                Err(AppError::Validation(INVALID_COORDINATES_MESSAGE.to_string()))
            }
        };
    }

    match non_empty(city) {
        Some(city) => Ok(WeatherQuery::City(city.to_string())),
        None => Err(AppError::Validation(MISSING_LOCATION_MESSAGE.to_string())),
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

fn parse_coord(raw: &str, range: &std::ops::RangeInclusive<f64>) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && range.contains(v))
}
