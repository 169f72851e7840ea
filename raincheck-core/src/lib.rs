//! Core library for `raincheck`.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Provider clients (geocoding, current weather, radar index)
//! - Rainfall classification
//! - The staged search pipeline and the session that owns `SearchState`
//!
//! It is used by `raincheck-cli`, but can also be reused by other front ends.

pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod search;
pub mod state;

pub use classify::{IconKind, RainfallStatus, StyleHint, rainfall_status};
pub use config::{Config, Endpoints, ProviderConfig};
pub use error::SearchError;
pub use model::{Coordinates, RadarFrameRef, SearchResult, WeatherSnapshot};
pub use pipeline::{SEARCH_STAGES, SearchClients, Stage};
pub use provider::{CurrentConditions, Geocoder, ProviderId, RadarSource};
pub use search::{SearchOutcome, SearchSession, SearchTicket};
pub use state::{DisplayMode, SearchState};
