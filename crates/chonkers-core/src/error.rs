//! Error types for chonkers.
//!
//! Every failure in a pipeline run is fatal: nothing here is retried, and the
//! binary turns any of these into a non-zero exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the chonkers library.
#[derive(Debug, Error)]
pub enum ChonkersError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request timed out: {url}")]
    Timeout { url: String },

    // GitHub API errors
    #[error("{status}: {reason}: {body}")]
    GitHubApi {
        status: u16,
        reason: String,
        /// Response body, re-encoded compactly when it parsed as JSON.
        body: String,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: Option<serde_yaml::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },
}

/// Result type alias for chonkers operations.
pub type Result<T> = std::result::Result<T, ChonkersError>;

impl From<std::io::Error> for ChonkersError {
    fn from(err: std::io::Error) -> Self {
        ChonkersError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for ChonkersError {
    fn from(err: serde_json::Error) -> Self {
        ChonkersError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for ChonkersError {
    fn from(err: serde_yaml::Error) -> Self {
        ChonkersError::Yaml {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for ChonkersError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChonkersError::Timeout {
                url: err
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            }
        } else {
            ChonkersError::Network {
                message: err.to_string(),
                source: Some(err),
            }
        }
    }
}

impl ChonkersError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ChonkersError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// HTTP status code for API failures, if this error came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ChonkersError::GitHubApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}
