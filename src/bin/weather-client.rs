//! Command-line front end for the weather lookup handler.
//!
//!   weather-client --city "London"
//!   weather-client --locate

use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgGroup, Parser};
use reqwest::Url;

use weather_lookup::client::geolocation::IpGeolocator;
use weather_lookup::client::transport::ReqwestTransport;
use weather_lookup::client::view::{TerminalView, ViewState};
use weather_lookup::client::WeatherController;
use weather_lookup::config::LogFormat;
use weather_lookup::logging::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "weather-client", version, about = "Look up the current weather")]
#[command(group(ArgGroup::new("target").required(true).args(["city", "locate"])))]
struct Cli {
    /// City name to look up
    #[arg(long)]
    city: Option<String>,

    /// Use the current location (resolved from the public IP address)
    #[arg(long)]
    locate: bool,

    /// Address of the weather handler
    #[arg(
        long,
        env = "WEATHER_API_BASE_URL",
        default_value = "http://localhost:8080/weather"
    )]
    api_base_url: Url,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(LogFormat::Pretty, "weather_lookup=warn");

    let controller = WeatherController::new(
        cli.api_base_url,
        Arc::new(ReqwestTransport::new()),
        Arc::new(IpGeolocator::default()),
        Arc::new(TerminalView),
    );

    let state = match cli.city {
        Some(city) => controller.search_by_city(&city).await,
        None => controller.search_by_location().await,
    };

    match state {
        ViewState::Result(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
