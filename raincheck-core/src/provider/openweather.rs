use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{Coordinates, SearchError, WeatherSnapshot};

use super::{CurrentConditions, Geocoder, ProviderId, http_client, round_half_up, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const GEOCODING_PATH: &str = "/geo/1.0/direct";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// OpenWeather geocoding and current-conditions client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: http_client() }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, SearchError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                provider_error(None, format!("failed to send {what} request: {}", e.without_url()))
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| {
                provider_error(Some(status), format!("failed to read {what} body: {}", e.without_url()))
            })?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            provider_error(Some(status), format!("unexpected {what} response: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn locate(&self, query: &str) -> Result<Coordinates, SearchError> {
        let matches: Vec<OwGeoMatch> = self
            .get_json(GEOCODING_PATH, &[("q", query), ("limit", "1")], "geocoding")
            .await?;

        let best = matches
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::NotFound { query: query.to_string() })?;

        Ok(Coordinates {
            latitude: best.lat,
            longitude: best.lon,
            resolved_name: best.name,
            country_code: best.country.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl CurrentConditions for OpenWeatherClient {
    async fn current(&self, coordinates: &Coordinates) -> Result<WeatherSnapshot, SearchError> {
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();

        let parsed: OwCurrentResponse = self
            .get_json(
                CURRENT_WEATHER_PATH,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")],
                "current weather",
            )
            .await?;

        Ok(snapshot_from(parsed))
    }
}

fn snapshot_from(parsed: OwCurrentResponse) -> WeatherSnapshot {
    let (condition_main, description) = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

    let rainfall_mm_per_hour = parsed
        .rain
        .and_then(|r| r.one_hour)
        .filter(|mm| mm.is_finite() && *mm > 0.0)
        .unwrap_or(0.0);

    WeatherSnapshot {
        condition_main,
        description,
        rainfall_mm_per_hour,
        temperature_celsius: round_half_up(parsed.main.temp) as i32,
        humidity_percent: parsed.main.humidity.min(100),
        observed_at: parsed.dt.and_then(unix_to_utc),
    }
}

fn status_error(status: StatusCode, body: &str) -> SearchError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return SearchError::Auth { provider: ProviderId::OpenWeather };
    }

    let message = serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| truncate_body(body));

    provider_error(Some(status), message)
}

fn provider_error(status: Option<StatusCode>, message: String) -> SearchError {
    SearchError::Provider {
        provider: ProviderId::OpenWeather,
        status: status.map(|s| s.as_u16()),
        message,
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
