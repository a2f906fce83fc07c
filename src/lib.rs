//! Weather lookup: an HTTP handler proxying OpenWeatherMap current weather,
//! and the client controller that drives it.

pub mod client;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
