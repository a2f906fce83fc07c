//! What the user sees, and how it is drawn.

use std::io::Write;

use serde_json::Number;

use crate::models::NormalizedWeather;

/// The single visible state of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Hidden,
    Loading(String),
    Error(String),
    Result(NormalizedWeather),
}

pub trait WeatherView: Send + Sync {
    /// Replace whatever is currently shown with `state`.
    fn render(&self, state: &ViewState);
}

/// Round half toward positive infinity (so -2.5 becomes -2).
pub fn round_half_up(v: f64) -> i64 {
    let floor = v.floor();
    if v - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

fn rounded(n: &Option<Number>) -> String {
    n.as_ref()
        .and_then(Number::as_f64)
        .map(|v| round_half_up(v).to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

fn raw(n: &Option<Number>) -> String {
    n.as_ref()
        .map(Number::to_string)
        .unwrap_or_else(|| "n/a".to_string())
}

fn text(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("n/a")
}

/// Multi-line result card.
pub fn format_result(w: &NormalizedWeather) -> String {
    format!(
        "{}, {}\n{}°C  {}\nFeels like: {}°C\nHumidity: {}%\nWind speed: {} m/s",
        text(&w.city),
        text(&w.country),
        rounded(&w.temperature),
        text(&w.description),
        rounded(&w.feels_like),
        raw(&w.humidity),
        raw(&w.wind_speed),
    )
}

/// [`WeatherView`] for a terminal: progress and errors on stderr, the result
/// card on stdout.
#[derive(Debug, Default)]
pub struct TerminalView;

impl WeatherView for TerminalView {
    fn render(&self, state: &ViewState) {
        match state {
            ViewState::Hidden => {}
            ViewState::Loading(msg) => eprintln!("{}", msg),
            ViewState::Error(msg) => eprintln!("error: {}", msg),
            ViewState::Result(weather) => {
                let mut out = std::io::stdout().lock();
                if let Err(e) = writeln!(out, "{}", format_result(weather)) {
                    tracing::warn!("Failed to write result: {}", e);
                }
            }
        }
    }
}
