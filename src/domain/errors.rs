// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Decomposition error: {0}")]
    Decomposition(#[from] DecompositionError),

    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Unknown(s)
    }
}

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Data parse error: {0}")]
    Parse(String),

    #[error("No data available for: {0}")]
    NoData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<hyper::Error> for MarketDataError {
    fn from(err: hyper::Error) -> Self {
        MarketDataError::Request(err.to_string())
    }
}

impl From<csv::Error> for MarketDataError {
    fn from(err: csv::Error) -> Self {
        MarketDataError::Parse(err.to_string())
    }
}

/// Failures of the decomposition engine. All are deterministic input
/// violations; none is worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecompositionError {
    #[error("Invalid period {period}: must be at least 2")]
    InvalidPeriod { period: usize },

    #[error("Insufficient length: {length} observations, need at least {required}")]
    InsufficientLength { length: usize, required: usize },

    #[error("Invalid model '{tag}': expected 'additive' or 'multiplicative'")]
    InvalidModel { tag: String },

    #[error("Multiplicative model requires positive values, got {value} at index {index}")]
    NonPositiveValue { index: usize, value: f64 },

    #[error("Seasonal phase {phase} has no observations with a defined trend")]
    InsufficientData { phase: usize },

    #[error("Series index is not regularly spaced: {reason}")]
    IrregularIndex { reason: String },

    #[error("Missing or non-finite value at index {index}")]
    MissingValue { index: usize },
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type MarketDataResult<T> = Result<T, MarketDataError>;
pub type EngineResult<T> = Result<T, DecompositionError>;
