//! Search session: owns the `SearchState` and drives the stage pipeline.
//!
//! Every submit is tagged with a sequence number. An outcome is only applied
//! when its ticket is still the latest one, so a slow search can never
//! overwrite a newer search or a reset.

use std::sync::Arc;

use crate::{
    Config, RadarFrameRef, SearchError, SearchResult, SearchState,
    pipeline::SearchClients,
    provider::{OpenWeatherClient, RainViewerClient},
};

/// Handle for one submitted search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Result of running a ticket's stages, not yet applied to the state.
#[derive(Debug)]
pub struct SearchOutcome {
    ticket: SearchTicket,
    result: Result<(SearchResult, RadarFrameRef), SearchError>,
}

impl SearchOutcome {
    pub fn ticket(&self) -> &SearchTicket {
        &self.ticket
    }
}

#[derive(Debug)]
pub struct SearchSession {
    clients: SearchClients,
    state: SearchState,
    latest_seq: u64,
}

impl SearchSession {
    pub fn new(clients: SearchClients) -> Self {
        Self { clients, state: SearchState::default(), latest_seq: 0 }
    }

    /// Wire the OpenWeather and RainViewer clients from configuration.
    pub fn from_config(config: &Config, api_key_override: Option<&str>) -> anyhow::Result<Self> {
        let api_key = config.resolve_api_key(api_key_override)?;
        let endpoints = &config.endpoints;

        let openweather = Arc::new(OpenWeatherClient::with_base_url(
            api_key,
            endpoints.openweather_base_url.as_str(),
        ));
        let radar = RainViewerClient::new(
            endpoints.radar_index_url.as_str(),
            endpoints.radar_tile_base.as_str(),
        );

        Ok(Self::new(SearchClients {
            geocoder: openweather.clone(),
            weather: openweather,
            radar: Arc::new(radar),
        }))
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn clients(&self) -> &SearchClients {
        &self.clients
    }

    /// Record what the user is typing without starting a search.
    pub fn set_query(&mut self, query: &str) {
        self.state.set_query(query);
    }

    /// Start a search. Returns `None` when the query is blank, in which case
    /// the state already shows the empty-query error.
    pub fn submit(&mut self, query: &str) -> Option<SearchTicket> {
        self.latest_seq += 1;

        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.state.set_query(query);
            self.state.fail(SearchError::EmptyQuery.user_message());
            return None;
        }

        self.state.begin(query);
        tracing::info!(seq = self.latest_seq, query = trimmed, "Search started");

        Some(SearchTicket { seq: self.latest_seq, query: trimmed.to_string() })
    }

    /// Run a ticket's stages. Does not touch the session state.
    pub async fn run(clients: &SearchClients, ticket: SearchTicket) -> SearchOutcome {
        let result = clients.run_stages(&ticket.query).await;
        SearchOutcome { ticket, result }
    }

    /// Apply an outcome. Returns `false` when it was superseded and dropped.
    pub fn complete(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.ticket.seq != self.latest_seq {
            tracing::debug!(
                seq = outcome.ticket.seq,
                latest = self.latest_seq,
                "Discarding superseded search outcome"
            );
            return false;
        }

        match outcome.result {
            Ok((result, radar_url)) => {
                tracing::info!(city = %result.city, radar = radar_url.is_available(), "Search succeeded");
                self.state.succeed(result, radar_url);
            }
            Err(e) => {
                tracing::info!(error = %e, "Search failed");
                self.state.fail(e.user_message());
            }
        }

        true
    }

    /// Submit, run and apply a search in one go.
    pub async fn search(&mut self, query: &str) -> &SearchState {
        if let Some(ticket) = self.submit(query) {
            let outcome = Self::run(&self.clients, ticket).await;
            self.complete(outcome);
        }

        &self.state
    }

    /// Back to idle; any search still in flight is invalidated.
    pub fn reset(&mut self) {
        self.latest_seq += 1;
        self.state.reset();
    }
}
