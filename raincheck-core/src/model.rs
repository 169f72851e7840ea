use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best geocoding match for a free-text city query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub resolved_name: String,
    pub country_code: String,
}

/// Current conditions at a pair of coordinates, already normalised for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Short condition label, e.g. "Rain" or "Clouds".
    pub condition_main: String,
    pub description: String,
    /// Precipitation over the last hour; 0.0 when the provider omits it.
    pub rainfall_mm_per_hour: f64,
    pub temperature_celsius: i32,
    pub humidity_percent: u8,
    pub observed_at: Option<DateTime<Utc>>,
}

/// URL of a rendered radar tile. Empty when no frame could be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RadarFrameRef(String);

impl RadarFrameRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RadarFrameRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the presentation layer shows after a successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub condition_main: String,
    pub description: String,
    pub rainfall_mm_per_hour: f64,
    pub temperature_celsius: i32,
    pub humidity_percent: u8,
    pub observed_at: Option<DateTime<Utc>>,
}

impl SearchResult {
    pub fn merge(coordinates: Coordinates, weather: WeatherSnapshot) -> Self {
        Self {
            city: coordinates.resolved_name,
            country: coordinates.country_code,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            condition_main: weather.condition_main,
            description: weather.description,
            rainfall_mm_per_hour: weather.rainfall_mm_per_hour,
            temperature_celsius: weather.temperature_celsius,
            humidity_percent: weather.humidity_percent,
            observed_at: weather.observed_at,
        }
    }

    pub fn rainfall_status(&self) -> crate::classify::RainfallStatus {
        crate::classify::rainfall_status(self.rainfall_mm_per_hour, &self.condition_main)
    }
}
