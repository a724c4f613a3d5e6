//! Error types for data sources.

use thiserror::Error;

/// Errors that can occur while loading a catalog collection.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed (connection, timeout, protocol).
    #[error("request failed: {0}")]
    Http(String),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The payload was not a valid JSON array of records.
    #[error("failed to parse payload: {0}")]
    Parse(String),

    /// Reading a local file failed.
    #[error("read failed: {0}")]
    Read(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Read(err.to_string())
    }
}
