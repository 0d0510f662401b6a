//! Error types for the cardgen batch client.
//!
//! `ApiError` covers conditions that abort the whole run. `RecordFailure` covers
//! conditions that fail a single record; the batch driver logs them and moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Run-level errors. Any of these stops the batch before (or instead of) processing records.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("Manifest not found at: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Failed to parse manifest {}: {message}", path.display())]
    ManifestParseError { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Per-record failures. Never escape the driver's per-record scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordFailure {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("No image data found in response parts")]
    NoImageReturned,

    #[error("Failed to write {}: {message}", path.display())]
    WriteError { path: PathBuf, message: String },
}

impl RecordFailure {
    /// Short machine-friendly label, used in structured log fields and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordFailure::RequestFailed(_) => "request_failed",
            RecordFailure::NoImageReturned => "no_image_returned",
            RecordFailure::WriteError { .. } => "write_error",
        }
    }
}
