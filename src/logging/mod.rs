//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with `RUST_LOG`-style filtering
//! - Local JSON log files with rotation
//! - Per-run reports shipped to Azure Log Analytics
//!
//! # Example
//!
//! ```no_run
//! use logsync::logging::init_logging;
//! use logsync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod azure;
pub mod structured;

pub use azure::AzureLogger;
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a sync run
///
/// An absent checkpoint is logged as `Start`.
///
/// # Example
///
/// ```no_run
/// use logsync::log_sync_start;
/// use logsync::domain::CheckpointId;
///
/// let checkpoint = CheckpointId::new("90020231016").ok();
/// log_sync_start!(checkpoint.as_ref());
/// ```
#[macro_export]
macro_rules! log_sync_start {
    ($checkpoint:expr) => {
        tracing::info!(
            checkpoint = %$checkpoint
                .map(|c| c.to_string())
                .unwrap_or_else(|| "Start".to_string()),
            "Downloading logs"
        );
    };
}

/// Log one fetched page
///
/// # Example
///
/// ```no_run
/// use logsync::log_page_fetched;
///
/// log_page_fetched!(3, 200, 600);
/// ```
#[macro_export]
macro_rules! log_page_fetched {
    ($page:expr, $count:expr, $total:expr) => {
        tracing::debug!(
            page = $page,
            count = $count,
            total = $total,
            "Fetched log page"
        );
    };
}

/// Log the completion of a sync run
///
/// # Example
///
/// ```no_run
/// use logsync::log_run_complete;
/// use std::time::Duration;
///
/// log_run_complete!(42, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_run_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Job complete"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use logsync::log_error_with_context;
/// use logsync::domain::SyncError;
///
/// let error = SyncError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
