//! Presentation: a pure rendering of `SearchState`.

use chrono::Local;
use raincheck_core::{DisplayMode, IconKind, RainfallStatus, SearchResult, SearchState, StyleHint};
use serde::Serialize;

const LOADING_TEXT: &str = "Checking the skies...";
const IDLE_TEXT: &str = "Enter a city name to check for rain.";
const NO_RADAR_TEXT: &str = "Radar map unavailable";

pub fn render(state: &SearchState) -> String {
    match state.mode() {
        DisplayMode::Idle => IDLE_TEXT.to_string(),
        DisplayMode::Loading => format!("{LOADING_TEXT} ({})", state.query().trim()),
        DisplayMode::Error => format!("! {}", state.error_message().unwrap_or_default()),
        DisplayMode::Success => match state.result() {
            Some(result) => render_result(result, state.radar_url().as_str()),
            None => IDLE_TEXT.to_string(),
        },
    }
}

fn render_result(result: &SearchResult, radar_url: &str) -> String {
    let status = result.rainfall_status();
    let mut lines = vec![
        format!("{}, {}  {}°C", result.city, result.country, result.temperature_celsius),
        format!("{} {}{}", icon(status.icon), status.text, gauge(status.style)),
        format!("Weather:  {}", result.description),
        format!("Humidity: {}%", result.humidity_percent),
        format!("Location: {:.2}, {:.2}", result.latitude, result.longitude),
    ];

    if let Some(observed) = result.observed_at {
        lines.push(format!("Observed: {}", observed.with_timezone(&Local).format("%H:%M")));
    }

    if radar_url.is_empty() {
        lines.push(format!("Radar:    {NO_RADAR_TEXT}"));
    } else {
        lines.push(format!("Radar:    {radar_url}"));
    }

    lines.join("\n")
}

fn icon(kind: IconKind) -> &'static str {
    match kind {
        IconKind::CloudRain => "🌧",
        IconKind::Cloud => "☁",
        IconKind::Sun => "☀",
    }
}

fn gauge(style: StyleHint) -> &'static str {
    match style {
        StyleHint::Drizzle => "  [▁]",
        StyleHint::LightRain => "  [▂]",
        StyleHint::ModerateRain => "  [▄]",
        StyleHint::HeavyRain => "  [█]",
        StyleHint::Cloudy | StyleHint::Dry => "",
    }
}

#[derive(Debug, Serialize)]
struct JsonView<'a> {
    mode: DisplayMode,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rainfall: Option<RainfallStatus>,
    radar_url: Option<&'a str>,
    error: Option<&'a str>,
}

pub fn render_json(state: &SearchState) -> serde_json::Result<String> {
    let radar = state.radar_url();

    serde_json::to_string_pretty(&JsonView {
        mode: state.mode(),
        query: state.query(),
        result: state.result(),
        rainfall: state.result().map(SearchResult::rainfall_status),
        radar_url: radar.is_available().then_some(radar.as_str()),
        error: state.error_message(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use raincheck_core::{
        Coordinates, CurrentConditions, Geocoder, RadarFrameRef, RadarSource, SearchClients,
        SearchError, SearchSession, WeatherSnapshot,
    };
    use std::sync::Arc;

    #[derive(Debug)]
    struct Fixed {
        rainfall: f64,
        condition: &'static str,
        radar: bool,
    }

    #[async_trait]
    impl Geocoder for Fixed {
        async fn locate(&self, query: &str) -> Result<Coordinates, SearchError> {
            if query == "Atlantis" {
                return Err(SearchError::NotFound { query: query.into() });
            }
            Ok(Coordinates {
                latitude: 51.5074,
                longitude: -0.1278,
                resolved_name: "London".into(),
                country_code: "GB".into(),
            })
        }
    }

    #[async_trait]
    impl CurrentConditions for Fixed {
        async fn current(&self, _: &Coordinates) -> Result<WeatherSnapshot, SearchError> {
            Ok(WeatherSnapshot {
                condition_main: self.condition.into(),
                description: "light rain".into(),
                rainfall_mm_per_hour: self.rainfall,
                temperature_celsius: 15,
                humidity_percent: 80,
                observed_at: None,
            })
        }
    }

    #[async_trait]
    impl RadarSource for Fixed {
        async fn latest_tile(&self, _: &Coordinates) -> Result<RadarFrameRef, SearchError> {
            if self.radar {
                Ok(RadarFrameRef::new("https://tiles/r.png"))
            } else {
                Err(SearchError::RadarUnavailable("no frames".into()))
            }
        }
    }

    fn session(rainfall: f64, condition: &'static str, radar: bool) -> SearchSession {
        let fixed = Arc::new(Fixed { rainfall, condition, radar });
        SearchSession::new(SearchClients {
            geocoder: fixed.clone(),
            weather: fixed.clone(),
            radar: fixed,
        })
    }

    #[test]
    fn idle_prompt() {
        assert_eq!(render(&SearchState::default()), IDLE_TEXT);
    }

    #[test]
    fn loading_shows_query() {
        let mut s = session(0.0, "Clear", true);
        s.submit(" London ");
        assert_eq!(render(s.state()), "Checking the skies... (London)");
    }

    #[tokio::test]
    async fn success_card() {
        let mut s = session(0.3, "Rain", true);
        let text = render(s.search("London").await);

        assert_eq!(
            text,
            "London, GB  15°C\n\
             🌧 Light rain: 0.3 mm/h  [▂]\n\
             Weather:  light rain\n\
             Humidity: 80%\n\
             Location: 51.51, -0.13\n\
             Radar:    https://tiles/r.png"
        );
    }

    #[tokio::test]
    async fn success_without_radar() {
        let mut s = session(0.0, "Clouds", false);
        let text = render(s.search("London").await);

        assert!(text.contains("☁ No rain - Cloudy"));
        assert!(text.ends_with("Radar:    Radar map unavailable"));
    }

    #[tokio::test]
    async fn error_message_area() {
        let mut s = session(0.0, "Clear", true);
        let text = render(s.search("Atlantis").await);

        assert_eq!(text, "! City not found. Please check the spelling and try again.");
    }

    #[tokio::test]
    async fn json_success_includes_classification() {
        let mut s = session(2.5, "Rain", false);
        let json = render_json(s.search("London").await).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["mode"], "success");
        assert_eq!(value["result"]["city"], "London");
        assert_eq!(value["rainfall"]["text"], "Heavy rain: 2.5 mm/h");
        assert_eq!(value["rainfall"]["style"], "heavy_rain");
        assert!(value["radar_url"].is_null());
        assert!(value["error"].is_null());
    }

    #[test]
    fn json_empty_query_error() {
        let mut s = session(0.0, "Clear", true);
        s.submit("   ");
        let value: serde_json::Value = serde_json::from_str(&render_json(s.state()).unwrap()).unwrap();

        assert_eq!(value["mode"], "error");
        assert_eq!(value["error"], "Please enter a city name");
        assert!(value.get("result").is_none());
    }
}
