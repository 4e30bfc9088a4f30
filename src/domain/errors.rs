//! Domain error types
//!
//! This module defines the error hierarchy for logsync. Every fatal condition of a
//! run maps onto one variant; none of them expose third-party types.

use thiserror::Error;

/// Main logsync error type
///
/// The run-level variants (`MissingSettings` through `ExportWrite`) correspond to the
/// stages of a sync run. The remaining variants cover ambient failures (files, JSON,
/// Azure logging) outside the pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// One or more required settings were absent or blank
    #[error("Missing settings: {}", .0.join(", "))]
    MissingSettings(Vec<String>),

    /// The upstream identity provider rejected the client credentials
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The storage container could not be created or reached
    #[error("Storage initialization error: {0}")]
    StorageInit(String),

    /// A log page request failed mid-pagination
    #[error("Upstream fetch error: {0}")]
    UpstreamFetch(String),

    /// A single object write failed
    #[error("Export write error for {key}: {message}")]
    ExportWrite {
        /// Storage key of the object that failed
        key: String,
        /// Failure detail
        message: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Azure logging errors
    #[error("Azure logging error: {0}")]
    AzureLogging(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl SyncError {
    /// Taxonomy name reported in a failed run's output
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Configuration(_) | SyncError::MissingSettings(_) => "ConfigurationError",
            SyncError::Authentication(_) => "AuthenticationError",
            SyncError::StorageInit(_) => "StorageInitError",
            SyncError::UpstreamFetch(_) => "UpstreamFetchError",
            SyncError::ExportWrite { .. } => "ExportWriteError",
            SyncError::Serialization(_) => "SerializationError",
            SyncError::Io(_) => "IoError",
            SyncError::AzureLogging(_) => "AzureLoggingError",
            SyncError::Other(_) => "Error",
        }
    }

    /// Creates an export write error for the given storage key
    pub fn export_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::ExportWrite {
            key: key.into(),
            message: message.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
