//! Error types shared between the monitor components.
//!
//! The `MonitorError` enum unifies remote fetch failures, local database
//! problems, notification failures and plain I/O, allowing every component to
//! propagate a single error type. Remote failures are retryable; local
//! database corruption is not.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type shared by the monitor components.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Transport-level failure talking to the listing API (DNS, refused, reset, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The listing API answered with a non-2xx status.
    #[error("Server responded with status code {code}: {body}")]
    ServerStatus {
        /// HTTP status code.
        code: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The listing API answered 2xx but the body is not a snapshot.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// The local database file does not exist.
    #[error("Local database not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The local database file exists but cannot be parsed.
    #[error("Local database {} is corrupt: {reason}", .path.display())]
    Corrupt {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Sending a notification failed.
    #[error("Notification failed: {0}")]
    Notify(String),

    /// Shutdown was requested while waiting.
    #[error("Interrupted by shutdown request")]
    Interrupted,

    /// I/O error originating from the standard library or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl MonitorError {
    /// Returns `true` for failures of the remote API that the loop recovers
    /// from by sleeping and fetching again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MonitorError::Network(_)
                | MonitorError::ServerStatus { .. }
                | MonitorError::MalformedSnapshot(_)
        )
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Network(err.to_string())
    }
}
