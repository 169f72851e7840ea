use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::{Coordinates, RadarFrameRef, SearchError};

use super::{RadarSource, http_client, round_half_up};

pub const DEFAULT_INDEX_URL: &str = "https://api.rainviewer.com/public/weather-maps.json";
pub const DEFAULT_TILE_BASE: &str = "https://tilecache.rainviewer.com";

const TILE_SIZE: u32 = 256;
const ZOOM: u8 = 6;
const COLOR_SCHEME: u8 = 2;
/// Smoothed, snow mask on.
const TILE_OPTIONS: &str = "1_1";

/// RainViewer radar frame index client.
#[derive(Debug, Clone)]
pub struct RainViewerClient {
    index_url: String,
    tile_base: String,
    http: Client,
}

impl Default for RainViewerClient {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_URL, DEFAULT_TILE_BASE)
    }
}

impl RainViewerClient {
    pub fn new(index_url: impl Into<String>, tile_base: impl Into<String>) -> Self {
        Self {
            index_url: index_url.into(),
            tile_base: tile_base.into().trim_end_matches('/').to_string(),
            http: http_client(),
        }
    }

    async fn fetch_index(&self) -> Result<RvMaps, SearchError> {
        let res = self
            .http
            .get(&self.index_url)
            .send()
            .await
            .map_err(|e| unavailable(format!("index request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(unavailable(format!("index request returned status {status}")));
        }

        res.json::<RvMaps>()
            .await
            .map_err(|e| unavailable(format!("malformed index: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct RvMaps {
    radar: Option<RvRadar>,
}

#[derive(Debug, Deserialize)]
struct RvRadar {
    #[serde(default)]
    past: Vec<RvFrame>,
}

#[derive(Debug, Deserialize)]
struct RvFrame {
    time: i64,
    path: String,
}

#[async_trait]
impl RadarSource for RainViewerClient {
    async fn latest_tile(&self, coordinates: &Coordinates) -> Result<RadarFrameRef, SearchError> {
        let maps = self.fetch_index().await?;

        let frame = latest_past_frame(&maps)
            .ok_or_else(|| unavailable("index has no past frames".to_string()))?;

        tracing::debug!(
            frame_time = ?DateTime::from_timestamp(frame.time, 0),
            path = %frame.path,
            "Selected radar frame"
        );

        Ok(RadarFrameRef::new(tile_url(&self.tile_base, &frame.path, coordinates)))
    }
}

fn latest_past_frame(maps: &RvMaps) -> Option<&RvFrame> {
    maps.radar.as_ref().and_then(|radar| radar.past.last())
}

/// Tile URL centred on the nearest whole-degree coordinates.
pub fn tile_url(tile_base: &str, frame_path: &str, coordinates: &Coordinates) -> String {
    let lat = round_half_up(coordinates.latitude) as i64;
    let lon = round_half_up(coordinates.longitude) as i64;

    format!("{tile_base}{frame_path}/{TILE_SIZE}/{ZOOM}/{lat}/{lon}/{COLOR_SCHEME}/{TILE_OPTIONS}.png")
}

fn unavailable(reason: String) -> SearchError {
    SearchError::RadarUnavailable(reason)
}
