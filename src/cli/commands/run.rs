//! Run command implementation
//!
//! Executes one sync run and prints its output document to stdout. Logs go to
//! stderr, so stdout carries nothing but the JSON.

use super::{EXIT_CONFIG_ERROR, EXIT_RUN_FAILED, EXIT_SUCCESS};
use crate::config::{load_config_or_default, SettingsBag, SyncConfig};
use crate::core::export::{execute, RunReport};
use crate::core::state::{read_history_document, HistoryStore};
use crate::domain::{RunHistoryEntry, RunOutcome, SyncError};
use crate::logging::AzureLogger;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scheduler-provided history (JSON array, or object with `results`)
    ///
    /// Without it, history is read from the local history file.
    #[arg(long, value_name = "FILE")]
    pub history: Option<String>,

    /// Invocation type recorded in the local history
    #[arg(long, default_value = "manual")]
    pub run_type: String,

    /// Fetch and enrich, but do not touch storage or record history
    #[arg(long)]
    pub dry_run: bool,

    /// Do not append this run to the local history
    #[arg(long)]
    pub no_record: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.job.dry_run = true;
        }

        let history = self.load_history(&config)?;
        let bag = SettingsBag::from_config_and_env(&config.settings);

        let report = execute(&bag, Some(history.as_slice()), &config).await;

        println!("{}", serde_json::to_string(&report.outcome)?);

        self.record(&config, &report);
        ship_report(&config, &report).await;

        Ok(exit_code(&report.outcome))
    }

    fn load_history(&self, config: &SyncConfig) -> anyhow::Result<Vec<RunHistoryEntry>> {
        let entries = match &self.history {
            Some(path) => {
                tracing::info!(path = %path, "Reading scheduler-provided history");
                read_history_document(path)?
            }
            None => HistoryStore::new(&config.state.history_path).load()?,
        };
        tracing::debug!(entries = entries.len(), "Loaded run history");
        Ok(entries)
    }

    /// Appends the run to the local history; failures are logged only
    fn record(&self, config: &SyncConfig, report: &RunReport) {
        if self.no_record || !config.state.record_history || config.job.dry_run {
            tracing::debug!("Not recording run history");
            return;
        }

        let store = HistoryStore::new(&config.state.history_path);
        let recorded = report
            .to_history_entry(&self.run_type)
            .and_then(|entry| store.append(&entry));

        if let Err(e) = recorded {
            tracing::warn!(
                error = %e,
                path = %store.path().display(),
                "Failed to record run history"
            );
        }
    }
}

async fn ship_report(config: &SyncConfig, report: &RunReport) {
    if !config.logging.azure_enabled {
        return;
    }

    let duration_ms = u64::try_from(report.duration.as_millis()).unwrap_or(u64::MAX);
    let shipped = match AzureLogger::new(&config.logging).await {
        Ok(logger) => {
            logger
                .log_sync_run(&report.run_id, &report.outcome, duration_ms)
                .await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = shipped {
        tracing::warn!(error = %e, "Failed to ship run report to Azure Log Analytics");
    }
}

/// Maps a run outcome to the process exit code
pub fn exit_code(outcome: &RunOutcome) -> i32 {
    match outcome.error() {
        None => EXIT_SUCCESS,
        Some(SyncError::Configuration(_) | SyncError::MissingSettings(_)) => EXIT_CONFIG_ERROR,
        Some(_) => EXIT_RUN_FAILED,
    }
}
