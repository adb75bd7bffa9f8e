//! Error types for the csvprofiler library.
//!
//! Only fatal conditions live here. Field-level test failures are never
//! errors; they travel as [`TestOutcome`](crate::reporter::TestOutcome)s.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for csvprofiler operations.
#[derive(Debug, Error)]
pub enum ProfilerError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid column specification or run configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A lookup list, pattern or rule table could not be loaded.
    #[error("External resource '{name}': {message}")]
    ExternalResource { name: String, message: String },

    /// A user pattern failed to compile.
    #[error("Invalid pattern for '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The input header does not line up with the column specification.
    #[error("Header has {found} columns but the column specification declares {expected}")]
    HeaderMismatch { expected: usize, found: usize },

    /// Too many rows had the wrong number of fields.
    #[error("Malformed row limit exceeded: {malformed} malformed rows (threshold {threshold})")]
    MalformedRowLimit { malformed: u64, threshold: u64 },

    /// An error sink refused a record.
    #[error("Error sink failure: {0}")]
    Sink(String),
}

impl ProfilerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an external resource error.
    pub fn resource(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalResource {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Wraps an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised before any row was streamed.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::ExternalResource { .. }
                | Self::InvalidPattern { .. }
                | Self::HeaderMismatch { .. }
        )
    }
}

/// Result type alias for csvprofiler operations.
pub type Result<T> = std::result::Result<T, ProfilerError>;
