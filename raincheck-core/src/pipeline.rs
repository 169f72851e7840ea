//! Ordered search stages.
//!
//! A search is a fixed list of stages run one after another. Each stage
//! declares whether its failure ends the search or is absorbed; absorbed
//! failures are logged and the stage's output keeps its empty value.

use std::sync::Arc;

use crate::{
    Coordinates, RadarFrameRef, SearchError, SearchResult, WeatherSnapshot,
    provider::{CurrentConditions, Geocoder, RadarSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocode,
    Weather,
    Radar,
}

/// Stages of one search, in execution order.
pub const SEARCH_STAGES: [Stage; 3] = [Stage::Geocode, Stage::Weather, Stage::Radar];

impl Stage {
    pub const fn name(self) -> &'static str {
        match self {
            Stage::Geocode => "geocode",
            Stage::Weather => "weather",
            Stage::Radar => "radar",
        }
    }

    /// Whether a failure of this stage aborts the whole search.
    pub const fn is_fatal(self) -> bool {
        match self {
            Stage::Geocode | Stage::Weather => true,
            Stage::Radar => false,
        }
    }
}

/// The three provider clients a search composes.
#[derive(Debug, Clone)]
pub struct SearchClients {
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn CurrentConditions>,
    pub radar: Arc<dyn RadarSource>,
}

#[derive(Debug, Default)]
struct StageContext {
    coordinates: Option<Coordinates>,
    weather: Option<WeatherSnapshot>,
    radar: RadarFrameRef,
}

impl SearchClients {
    /// Run every stage for `query` and merge their outputs.
    pub async fn run_stages(
        &self,
        query: &str,
    ) -> Result<(SearchResult, RadarFrameRef), SearchError> {
        let mut ctx = StageContext::default();

        for stage in SEARCH_STAGES {
            tracing::debug!(stage = stage.name(), query, "Running search stage");

            match self.run_stage(stage, query, &mut ctx).await {
                Ok(()) => {}
                Err(e) if stage.is_fatal() => {
                    tracing::debug!(stage = stage.name(), error = %e, "Search stage failed");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(stage = stage.name(), error = %e, "Ignoring search stage failure");
                }
            }
        }

        let coordinates = ctx.coordinates.ok_or(SearchError::Pipeline(Stage::Geocode.name()))?;
        let weather = ctx.weather.ok_or(SearchError::Pipeline(Stage::Weather.name()))?;

        Ok((SearchResult::merge(coordinates, weather), ctx.radar))
    }

    async fn run_stage(
        &self,
        stage: Stage,
        query: &str,
        ctx: &mut StageContext,
    ) -> Result<(), SearchError> {
        match stage {
            Stage::Geocode => {
                let coordinates = self.geocoder.locate(query).await?;
                tracing::debug!(?coordinates, "Coordinates found");
                ctx.coordinates = Some(coordinates);
            }
            Stage::Weather => {
                let coordinates = ctx.coordinates.as_ref().ok_or(SearchError::Pipeline(stage.name()))?;
                let weather = self.weather.current(coordinates).await?;
                tracing::debug!(?weather, "Weather data");
                ctx.weather = Some(weather);
            }
            Stage::Radar => {
                let coordinates = ctx.coordinates.as_ref().ok_or(SearchError::Pipeline(stage.name()))?;
                let radar = self.radar.latest_tile(coordinates).await?;
                tracing::debug!(%radar, "Radar URL");
                ctx.radar = radar;
            }
        }

        Ok(())
    }
}
