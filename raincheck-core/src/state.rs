use serde::Serialize;

use crate::{RadarFrameRef, SearchResult};

/// Which of the mutually exclusive views is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Idle,
    Loading,
    Success,
    Error,
}

/// Everything the presentation layer reads. Only the search session mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    query: String,
    is_loading: bool,
    result: Option<SearchResult>,
    radar_url: RadarFrameRef,
    error_message: Option<String>,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    pub fn radar_url(&self) -> &RadarFrameRef {
        &self.radar_url
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn mode(&self) -> DisplayMode {
        if self.is_loading {
            DisplayMode::Loading
        } else if self.error_message.is_some() {
            DisplayMode::Error
        } else if self.result.is_some() {
            DisplayMode::Success
        } else {
            DisplayMode::Idle
        }
    }

    pub(crate) fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub(crate) fn begin(&mut self, query: &str) {
        self.query = query.to_string();
        self.is_loading = true;
        self.result = None;
        self.radar_url = RadarFrameRef::unavailable();
        self.error_message = None;
    }

    pub(crate) fn succeed(&mut self, result: SearchResult, radar_url: RadarFrameRef) {
        self.is_loading = false;
        self.result = Some(result);
        self.radar_url = radar_url;
        self.error_message = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.is_loading = false;
        self.result = None;
        self.radar_url = RadarFrameRef::unavailable();
        self.error_message = Some(message);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
