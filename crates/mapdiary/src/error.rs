//! Error types for mapdiary.
//!
//! Clustering itself cannot fail; errors come from the boundaries around it:
//! coordinate and span validation, configuration loading, entry fixtures and
//! the viewport task.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for mapdiary operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Geometry Errors ===
    /// A latitude/longitude pair was non-finite or out of range.
    #[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        /// Latitude in degrees as supplied.
        latitude: f64,
        /// Longitude in degrees as supplied.
        longitude: f64,
        /// Which bound was violated.
        reason: &'static str,
    },

    /// A map span was non-finite, non-positive or wider than the globe.
    #[error("invalid span ({latitude_delta} x {longitude_delta}): {reason}")]
    InvalidSpan {
        /// Latitude delta in degrees as supplied.
        latitude_delta: f64,
        /// Longitude delta in degrees as supplied.
        longitude_delta: f64,
        /// Which bound was violated.
        reason: &'static str,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Entry Store Errors ===
    /// Failed to read an entry fixture file.
    #[error("failed to read entries from {path}: {source}")]
    EntryLoad {
        /// Path to the entry file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Viewport Errors ===
    /// The viewport task is no longer running.
    #[error("viewport task has shut down")]
    ViewportClosed,

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for mapdiary operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error came from coordinate or span validation.
    #[must_use]
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate { .. } | Self::InvalidSpan { .. }
        )
    }

    /// Check if this error indicates the viewport task is gone.
    #[must_use]
    pub fn is_viewport_closed(&self) -> bool {
        matches!(self, Self::ViewportClosed)
    }
}
