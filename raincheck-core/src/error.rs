use thiserror::Error;

use crate::provider::ProviderId;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a city name";
pub const NOT_FOUND_MESSAGE: &str = "City not found. Please check the spelling and try again.";
pub const AUTH_MESSAGE: &str =
    "The weather service rejected the API key. Check your configuration.";
pub const UNAVAILABLE_MESSAGE: &str = "Weather data unavailable. Please try again later.";

/// Every way a single search attempt can fail.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("empty query")]
    EmptyQuery,

    #[error("no location matches '{query}'")]
    NotFound { query: String },

    #[error("{provider} rejected the configured credential")]
    Auth { provider: ProviderId },

    #[error("{provider} request failed{}: {message}", status_suffix(.status))]
    Provider {
        provider: ProviderId,
        status: Option<u16>,
        message: String,
    },

    /// Only raised inside the radar stage, which absorbs it.
    #[error("radar unavailable: {0}")]
    RadarUnavailable(String),

    #[error("search stage '{0}' ran without its inputs")]
    Pipeline(&'static str),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

impl SearchError {
    /// The message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            SearchError::EmptyQuery => EMPTY_QUERY_MESSAGE.to_string(),
            SearchError::NotFound { .. } => NOT_FOUND_MESSAGE.to_string(),
            SearchError::Auth { .. } => AUTH_MESSAGE.to_string(),
            SearchError::Provider { message, .. } if !message.is_empty() => {
                format!("{UNAVAILABLE_MESSAGE} ({message})")
            }
            SearchError::Provider { .. }
            | SearchError::RadarUnavailable(_)
            | SearchError::Pipeline(_) => {
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_selects_its_message() {
        assert_eq!(SearchError::EmptyQuery.user_message(), EMPTY_QUERY_MESSAGE);
        assert_eq!(
            SearchError::NotFound { query: "Atlantis".into() }.user_message(),
            NOT_FOUND_MESSAGE
        );
        assert_eq!(
            SearchError::Auth { provider: ProviderId::OpenWeather }.user_message(),
            AUTH_MESSAGE
        );
    }

    #[test]
    fn provider_message_carries_detail() {
        let err = SearchError::Provider {
            provider: ProviderId::OpenWeather,
            status: Some(500),
            message: "internal error".into(),
        };

        assert_eq!(
            err.user_message(),
            "Weather data unavailable. Please try again later. (internal error)"
        );
        assert_eq!(
            err.to_string(),
            "openweather request failed with status 500: internal error"
        );
    }

    #[test]
    fn provider_without_status_omits_it() {
        let err = SearchError::Provider {
            provider: ProviderId::RainViewer,
            status: None,
            message: "connection refused".into(),
        };

        assert_eq!(err.to_string(), "rainviewer request failed: connection refused");
    }
}
