//! Error types for the fx_forecast crate

use fx_math::MathError;
use thiserror::Error;

pub(crate) const NO_VALID_DATA: &str = "Could not find valid data for this currency pair.";
pub(crate) const INSUFFICIENT_HISTORY: &str =
    "Not enough historical data available to make a reliable forecast.";
pub(crate) const NOT_IN_FUTURE: &str = "Travel date is not in the future.";
pub(crate) const SAME_CURRENCY: &str = "'From' and 'To' currencies cannot be the same.";

/// Why a prediction could not be produced.
///
/// The `Display` output is the human-readable reason shown to the caller as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// Fetch returned nothing usable, or too little history survived cleaning
    #[error("{0}")]
    DataUnavailable(String),

    /// The request itself cannot be served
    #[error("{0}")]
    InvalidRequest(String),

    /// Model fitting or prediction failed
    #[error("An unexpected error occurred: {0}")]
    Forecast(String),

    /// The forecast had no points inside the requested window
    #[error("Could not generate a forecast for the selected period.")]
    EmptyWindow,
}

/// Failure taxonomy, without the attached message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataUnavailable,
    InvalidRequest,
    Forecast,
    EmptyWindow,
}

impl PredictionError {
    pub fn no_valid_data() -> Self {
        Self::DataUnavailable(NO_VALID_DATA.to_string())
    }

    pub fn insufficient_history() -> Self {
        Self::DataUnavailable(INSUFFICIENT_HISTORY.to_string())
    }

    pub fn not_in_future() -> Self {
        Self::InvalidRequest(NOT_IN_FUTURE.to_string())
    }

    pub fn same_currency() -> Self {
        Self::InvalidRequest(SAME_CURRENCY.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DataUnavailable(_) => ErrorKind::DataUnavailable,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Forecast(_) => ErrorKind::Forecast,
            Self::EmptyWindow => ErrorKind::EmptyWindow,
        }
    }
}

impl From<MathError> for PredictionError {
    fn from(err: MathError) -> Self {
        PredictionError::Forecast(err.to_string())
    }
}

/// Result type for pipeline stages
pub type Result<T> = std::result::Result<T, PredictionError>;

/// Errors raised by market-data providers
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the provider payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Provider answered without any observations
    #[error("No data returned")]
    NoData,

    /// Error reported by the provider itself
    #[error("API error [{code}]: {description}")]
    ApiError { code: String, description: String },

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV decoding
    #[error("CSV error: {0}")]
    CsvError(String),
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        SourceError::CsvError(err.to_string())
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::RequestFailed(err.to_string())
    }
}

/// Errors from the reminder mail collaborator
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("SMTP error: {0}")]
    Smtp(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Nothing to send: no candidate days")]
    Empty,
}

/// Errors from the feedback collaborator
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Review text must not be empty")]
    EmptyReview,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(String),
}

impl From<csv::Error> for FeedbackError {
    fn from(err: csv::Error) -> Self {
        FeedbackError::CsvError(err.to_string())
    }
}

/// Errors from reading process configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("Missing required setting {0}")]
    Missing(String),
}
