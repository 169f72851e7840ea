use crate::{Coordinates, RadarFrameRef, SearchError, WeatherSnapshot};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

pub mod openweather;
pub mod rainviewer;

pub use openweather::OpenWeatherClient;
pub use rainviewer::RainViewerClient;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("raincheck/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    RainViewer,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::RainViewer => "rainviewer",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a free-text place name to its best match.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn locate(&self, query: &str) -> Result<Coordinates, SearchError>;
}

/// Current conditions for a resolved location.
#[async_trait]
pub trait CurrentConditions: Send + Sync + Debug {
    async fn current(&self, coordinates: &Coordinates) -> Result<WeatherSnapshot, SearchError>;
}

/// Latest precipitation radar tile near a location.
#[async_trait]
pub trait RadarSource: Send + Sync + Debug {
    async fn latest_tile(&self, coordinates: &Coordinates) -> Result<RadarFrameRef, SearchError>;
}

pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build tuned HTTP client, using defaults: {}", e);
            Client::new()
        })
}

/// Nearest whole number, ties toward positive infinity (-3.5 becomes -3).
pub(crate) fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
