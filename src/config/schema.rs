//! Configuration schema types
//!
//! Every section is optional in the file; absent sections and keys take the
//! defaults below.

use crate::adapters::auth0::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::adapters::storage::DEFAULT_API_VERSION;
use crate::config::SecretString;
use crate::core::export::DEFAULT_MAX_CONCURRENCY;
use crate::core::state::DEFAULT_HISTORY_PATH;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_CONCURRENCY_LIMIT: usize = 64;

/// Root of `logsync.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Run tunables
    #[serde(default)]
    pub job: JobConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Local run history
    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings-bag values; process environment variables override them
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl SyncConfig {
    /// Validates the configuration
    ///
    /// The `[settings]` table is not checked here; missing settings fail the run
    /// itself so the failure is reported like any other.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.job.validate()?;
        self.storage.validate()?;
        self.state.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Run tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Records requested per upstream page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Concurrent storage writes
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Enrich and key records without touching storage
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_concurrency: default_max_concurrency(),
            request_timeout_seconds: default_request_timeout_seconds(),
            dry_run: false,
        }
    }
}

impl JobConfig {
    fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!(
                "job.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            ));
        }

        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY_LIMIT {
            return Err(format!(
                "job.max_concurrency must be between 1 and {MAX_CONCURRENCY_LIMIT}, got {}",
                self.max_concurrency
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err("job.request_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Blob storage endpoint options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides `https://<account>.blob.core.windows.net`, e.g. for Azurite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// `x-ms-version` sent with every request
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_version: default_api_version(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                return Err(format!(
                    "storage.endpoint must start with http:// or https://, got '{endpoint}'"
                ));
            }
        }

        if self.api_version.trim().is_empty() {
            return Err("storage.api_version cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Local run history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    /// JSON lines file of past runs
    #[serde(default = "default_history_path")]
    pub history_path: String,

    /// Append each run's outcome to `history_path`
    #[serde(default = "default_true")]
    pub record_history: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            history_path: default_history_path(),
            record_history: true,
        }
    }
}

impl StateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.history_path.trim().is_empty() {
            return Err("state.history_path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Enable Azure Log Analytics run reports
    #[serde(default)]
    pub azure_enabled: bool,

    /// Azure AD tenant ID
    #[serde(default)]
    pub azure_tenant_id: Option<String>,

    /// Azure AD client ID (from App Registration)
    #[serde(default)]
    pub azure_client_id: Option<String>,

    /// Azure AD client secret (from App Registration)
    #[serde(default)]
    pub azure_client_secret: Option<SecretString>,

    /// Data Collection Rule (DCR) immutable ID
    #[serde(default)]
    pub azure_dcr_immutable_id: Option<String>,

    /// Data Collection Endpoint (DCE) URL
    #[serde(default)]
    pub azure_dce_endpoint: Option<String>,

    /// Stream name for custom logs (e.g., "Custom-LogsyncRun_CL")
    #[serde(default)]
    pub azure_stream_name: Option<String>,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.azure_enabled {
            let required = [
                ("azure_tenant_id", self.azure_tenant_id.is_some()),
                ("azure_client_id", self.azure_client_id.is_some()),
                ("azure_client_secret", self.azure_client_secret.is_some()),
                ("azure_dcr_immutable_id", self.azure_dcr_immutable_id.is_some()),
                ("azure_dce_endpoint", self.azure_dce_endpoint.is_some()),
                ("azure_stream_name", self.azure_stream_name.is_some()),
            ];
            if let Some((name, _)) = required.iter().find(|(_, present)| !present) {
                return Err(format!("Azure logging enabled but {name} not provided"));
            }
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            azure_enabled: false,
            azure_tenant_id: None,
            azure_client_id: None,
            azure_client_secret: None,
            azure_dcr_immutable_id: None,
            azure_dce_endpoint: None,
            azure_stream_name: None,
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_history_path() -> String {
    DEFAULT_HISTORY_PATH.to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
