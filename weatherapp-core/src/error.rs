//! Error taxonomy for the weather pipeline.
//!
//! `ConfigError` is raised before any request is issued. `NetworkError` and
//! `ParseError` are returned from a fetch; neither touches the store.

use std::fmt;

use thiserror::Error;

/// Invalid or missing configuration. Fatal at initialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(
        "No API key configured.\n\
         Hint: run `weatherapp configure` and enter your API key."
    )]
    MissingApiKey,

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Language must not be empty")]
    InvalidLanguage,

    #[error("Request timeout must be at least one second")]
    InvalidTimeout,

    #[error(
        "Concurrent request limit must be between 1 and {}",
        tokio::sync::Semaphore::MAX_PERMITS
    )]
    InvalidConcurrency,

    #[error("Failed to initialize HTTP client: {0}")]
    HttpClient(String),

    #[error(
        "Invalid coordinates ({latitude}, {longitude}): \
         latitude must be -90 to 90, longitude must be -180 to 180"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// A document that could not be turned into a `WeatherInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    pub reason: String,
    /// Dotted path of the offending field, e.g. `hourly[3].temp`.
    pub field: Option<String>,
}

impl ParseError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            field: None,
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            reason: format!("missing {field}"),
            field: Some(field),
        }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &str) -> Self {
        Self {
            reason: format!("expected {expected}"),
            field: Some(field.into()),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "Parse error at '{field}': {}", self.reason),
            None => write!(f, "Parse error: {}", self.reason),
        }
    }
}

/// Transport-level failure of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Weather API responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest includes the full URL in its message, which carries the API key.
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Outcome of a failed `fetch_weather`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Request cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    NetworkError,
    ParseError,
    ConfigError,
    Cancelled,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::NetworkError,
            FetchError::Parse(_) => FetchErrorKind::ParseError,
            FetchError::Config(_) => FetchErrorKind::ConfigError,
            FetchError::Cancelled => FetchErrorKind::Cancelled,
        }
    }
}

/// Keeps error bodies short enough to log.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
