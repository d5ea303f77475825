//! Error types for the library layer.

use thiserror::Error;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding range, input, configuration and availability failures.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The upstream API call failed or timed out.
    #[error("API error: {0}")]
    Fetch(#[from] defituna_api::Error),
    /// A time-range token outside the recognized vocabulary.
    #[error(
        "Invalid time range '{0}'. Valid options: day, week, month, year, all, 7d, 30d, 90d"
    )]
    InvalidRange(String),
    /// User-provided input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Live data could not be fetched and no fallback is allowed.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

impl AnalyticsError {
    /// Whether this error came from the ingestion boundary.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, AnalyticsError::Fetch(_))
    }
}
