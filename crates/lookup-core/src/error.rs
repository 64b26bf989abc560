//! Error types for the address lookup pipeline

use thiserror::Error;

/// Main error type for all lookup operations
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<config::ConfigError> for LookupError {
    fn from(err: config::ConfigError) -> Self {
        LookupError::Config(err.to_string())
    }
}

/// Result type for lookup operations
pub type Result<T> = std::result::Result<T, LookupError>;
