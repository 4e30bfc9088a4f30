//! Azure Log Analytics run reports
//!
//! Ships one record per sync run to a Log Analytics workspace through the Logs
//! Ingestion API, authenticating with an Azure AD client secret credential. Records
//! go to a Data Collection Endpoint (DCE) under a Data Collection Rule (DCR) stream.
//!
//! Shipping is best effort: callers log a failure and carry on, the run's outcome
//! is never changed by it.
//!
//! # Example
//!
//! ```no_run
//! use logsync::logging::azure::AzureLogger;
//! use logsync::config::LoggingConfig;
//! use logsync::domain::RunOutcome;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LoggingConfig::default();
//! if config.azure_enabled {
//!     let logger = AzureLogger::new(&config).await?;
//!     let outcome = RunOutcome::success(None, 0);
//!     logger.log_sync_run("run-1", &outcome, 1250).await?;
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::{LoggingConfig, SecretString};
use crate::domain::{Result, RunOutcome, SyncError};
use azure_core::credentials::TokenCredential;
use azure_identity::ClientSecretCredential;
use chrono::Utc;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

const MONITOR_SCOPE: &str = "https://monitor.azure.com/.default";
const INGESTION_API_VERSION: &str = "2023-01-01";

/// Logs Ingestion API client for run reports
pub struct AzureLogger {
    credential: Arc<ClientSecretCredential>,
    /// Data Collection Rule immutable ID
    dcr_immutable_id: String,
    /// Data Collection Endpoint URL
    dce_endpoint: String,
    /// Stream name, e.g. `Custom-LogsyncRun_CL`
    stream_name: String,
    http_client: reqwest::Client,
}

fn required<'a, T>(value: &'a Option<T>, name: &str) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| {
        SyncError::Configuration(format!("{name} is required when Azure logging is enabled"))
    })
}

impl AzureLogger {
    /// Creates a logger from the `[logging]` section
    ///
    /// # Errors
    ///
    /// Returns a configuration error if Azure logging is disabled or any Azure
    /// setting is missing, and an Azure logging error if the credential cannot be
    /// created.
    pub async fn new(config: &LoggingConfig) -> Result<Self> {
        if !config.azure_enabled {
            return Err(SyncError::Configuration(
                "Azure logging is not enabled".to_string(),
            ));
        }

        let tenant_id = required(&config.azure_tenant_id, "azure_tenant_id")?;
        let client_id = required(&config.azure_client_id, "azure_client_id")?;
        let client_secret: &SecretString =
            required(&config.azure_client_secret, "azure_client_secret")?;
        let dcr_immutable_id = required(&config.azure_dcr_immutable_id, "azure_dcr_immutable_id")?;
        let dce_endpoint = required(&config.azure_dce_endpoint, "azure_dce_endpoint")?;
        let stream_name = required(&config.azure_stream_name, "azure_stream_name")?;

        let secret = azure_core::credentials::Secret::new(
            client_secret.expose_secret().to_string(),
        );
        let credential = ClientSecretCredential::new(tenant_id, client_id.clone(), secret, None)
            .map_err(|e| {
                SyncError::AzureLogging(format!("Failed to create Azure AD credential: {e}"))
            })?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        info!(
            dcr_id = %dcr_immutable_id,
            stream = %stream_name,
            "Azure Log Analytics logger initialized"
        );

        Ok(Self {
            credential,
            dcr_immutable_id: dcr_immutable_id.clone(),
            dce_endpoint: dce_endpoint.clone(),
            stream_name: stream_name.clone(),
            http_client,
        })
    }

    /// Ingestion URL for the configured stream
    pub fn ingestion_url(&self) -> String {
        format!(
            "{}/dataCollectionRules/{}/streams/{}?api-version={INGESTION_API_VERSION}",
            self.dce_endpoint.trim_end_matches('/'),
            self.dcr_immutable_id,
            self.stream_name
        )
    }

    async fn get_access_token(&self) -> Result<String> {
        let token = TokenCredential::get_token(&*self.credential, &[MONITOR_SCOPE], None)
            .await
            .map_err(|e| SyncError::AzureLogging(format!("Failed to acquire Azure AD token: {e}")))?;

        Ok(token.token.secret().to_string())
    }

    async fn send_logs(&self, records: Value) -> Result<()> {
        let token = self.get_access_token().await?;
        let url = self.ingestion_url();
        let record_count = records.as_array().map_or(0, Vec::len);

        debug!(url = %url, record_count, "Sending logs to Azure Log Analytics");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(&records)
            .send()
            .await
            .map_err(|e| SyncError::AzureLogging(format!("Failed to send logs to Azure: {e}")))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, record_count, "Sent logs to Azure Log Analytics");
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(SyncError::AzureLogging(format!(
                "Azure Log Analytics API returned status {status}: {body}"
            )))
        }
    }

    /// Ships the report for one finished run
    pub async fn log_sync_run(
        &self,
        run_id: &str,
        outcome: &RunOutcome,
        duration_ms: u64,
    ) -> Result<()> {
        self.send_logs(json!([run_report(run_id, outcome, duration_ms)]))
            .await
    }

    /// Ships an error that happened outside a run, e.g. while loading configuration
    pub async fn log_error(&self, error: &SyncError, context: &str) -> Result<()> {
        let record = json!([{
            "TimeGenerated": Utc::now().to_rfc3339(),
            "RunId": "",
            "Status": "error",
            "Stage": "",
            "CheckpointId": "",
            "RecordCount": 0,
            "ErrorKind": error.kind(),
            "ErrorMessage": format!("{context}: {error}"),
            "DurationMs": 0,
        }]);
        self.send_logs(record).await
    }
}

/// Log Analytics record describing one run
pub fn run_report(run_id: &str, outcome: &RunOutcome, duration_ms: u64) -> Value {
    let (status, error_kind, error_message) = match outcome.error() {
        None => ("succeeded", "", String::new()),
        Some(error) => ("failed", error.kind(), error.to_string()),
    };

    json!({
        "TimeGenerated": Utc::now().to_rfc3339(),
        "RunId": run_id,
        "Status": status,
        "Stage": outcome.stage().to_string(),
        "CheckpointId": outcome.checkpoint().map(|c| c.to_string()).unwrap_or_default(),
        "RecordCount": outcome.record_count(),
        "ErrorKind": error_kind,
        "ErrorMessage": error_message,
        "DurationMs": duration_ms,
    })
}
