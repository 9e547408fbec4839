//! Error types for DailyFetch
//!
//! This module defines all error types used throughout the client core,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for DailyFetch operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, remote API calls, schedule reconciliation,
/// transcript storage, and input validation.
#[derive(Error, Debug)]
pub enum DailyFetchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote API errors carrying the HTTP status and response body
    #[error("API error: status={status}, {message}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Response body or additional context
        message: String,
    },

    /// Input validation errors (empty message, malformed topic name, bad time)
    #[error("Validation error: {0}")]
    Validation(String),

    /// More than one scheduled-summary record exists server-side
    #[error("Schedule conflict: {0}")]
    ScheduleConflict(String),

    /// Transcript storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// An in-flight operation was cancelled (session closed)
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for DailyFetch operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
