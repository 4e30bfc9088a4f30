//! Run coordinator
//!
//! Drives one sync run through its stages:
//!
//! ```text
//! Validating -> Authenticating -> EnsuringStorageReady -> Paginating -> Enriching -> Exporting
//! ```
//!
//! Stages run strictly in sequence. The first failing stage ends the run as a
//! [`RunOutcome::Failure`] carrying the checkpoint the run started from; nothing
//! fetched or written by the failed run moves the checkpoint.

use super::sink::{ExportSink, DEFAULT_MAX_CONCURRENCY};
use crate::adapters::auth0::{Auth0Client, LogSource, DEFAULT_PAGE_SIZE};
use crate::adapters::storage::{AzureBlobStore, ObjectStore};
use crate::config::{JobConfig, Settings, SettingsBag, SyncConfig};
use crate::core::enrich::enrich_all;
use crate::core::paginate::Paginator;
use crate::core::state::resolve_checkpoint;
use crate::domain::{CheckpointId, Result, RunHistoryEntry, RunOutcome, RunStage, SyncError};
use crate::log_run_complete;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Tunables for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Records requested per upstream page
    pub page_size: usize,
    /// Concurrent storage writes
    pub max_concurrency: usize,
    /// Skip container creation and uploads
    pub dry_run: bool,
    /// Per-request timeout for both collaborators
    pub request_timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            dry_run: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&JobConfig> for SyncOptions {
    fn from(job: &JobConfig) -> Self {
        Self {
            page_size: job.page_size,
            max_concurrency: job.max_concurrency,
            dry_run: job.dry_run,
            request_timeout: Duration::from_secs(job.request_timeout_seconds),
        }
    }
}

/// A finished run
#[derive(Debug)]
pub struct RunReport {
    /// Correlates log lines of one run
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub outcome: RunOutcome,
}

impl RunReport {
    /// History entry describing this run
    pub fn to_history_entry(&self, run_type: &str) -> Result<RunHistoryEntry> {
        self.outcome
            .to_history_entry(self.started_at.to_rfc3339(), run_type)
    }
}

/// Pipeline over one log source and one storage container
pub struct SyncJob {
    source: Arc<dyn LogSource>,
    store: Arc<dyn ObjectStore>,
    container: String,
    options: SyncOptions,
}

impl SyncJob {
    pub fn new(
        source: Arc<dyn LogSource>,
        store: Arc<dyn ObjectStore>,
        container: impl Into<String>,
        options: SyncOptions,
    ) -> Self {
        Self {
            source,
            store,
            container: container.into(),
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Runs every stage from `start`
    ///
    /// Never returns an error: every failure is folded into the outcome.
    pub async fn run(&self, start: Option<CheckpointId>) -> RunReport {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let timer = Instant::now();

        let span = tracing::info_span!("sync_run", run_id = %run_id);
        let outcome = self.run_stages(start).instrument(span).await;

        RunReport {
            run_id,
            started_at,
            duration: timer.elapsed(),
            outcome,
        }
    }

    async fn run_stages(&self, start: Option<CheckpointId>) -> RunOutcome {
        let timer = Instant::now();
        let fail = |error: SyncError, stage: RunStage| {
            crate::log_error_with_context!(&error, stage_context(stage));
            tracing::info!(stage = %RunStage::Failed, "Job failed");
            RunOutcome::failure(error, start.clone(), stage)
        };

        enter(RunStage::Authenticating);
        if let Err(e) = self.source.authenticate().await {
            return fail(e, RunStage::Authenticating);
        }

        enter(RunStage::EnsuringStorageReady);
        if self.options.dry_run {
            tracing::info!(container = %self.container, "Dry run, not touching storage");
        } else if let Err(e) = self.store.ensure_container(&self.container).await {
            return fail(e, RunStage::EnsuringStorageReady);
        }

        enter(RunStage::Paginating);
        let fetched = match Paginator::new(self.source.as_ref())
            .with_page_size(self.options.page_size)
            .fetch_all(start.as_ref())
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => return fail(e, RunStage::Paginating),
        };

        enter(RunStage::Enriching);
        let records = enrich_all(fetched.records);

        enter(RunStage::Exporting);
        let outcome = ExportSink::new(Arc::clone(&self.store), self.container.clone())
            .with_max_concurrency(self.options.max_concurrency)
            .with_dry_run(self.options.dry_run)
            .export(&records, start.clone(), fetched.cursor)
            .await;

        match outcome.error() {
            Some(error) => {
                crate::log_error_with_context!(error, stage_context(outcome.stage()));
                tracing::info!(stage = %RunStage::Failed, "Job failed");
            }
            None => {
                tracing::info!(
                    stage = %RunStage::Succeeded,
                    checkpoint = outcome.checkpoint().map(|c| c.as_str()).unwrap_or("Start"),
                    "Checkpoint advanced"
                );
                log_run_complete!(outcome.record_count(), timer.elapsed());
            }
        }
        outcome
    }
}

fn enter(stage: RunStage) {
    tracing::info!(stage = %stage, "Entering stage");
}

fn stage_context(stage: RunStage) -> &'static str {
    match stage {
        RunStage::Validating => "Settings validation failed",
        RunStage::Authenticating => "Error authenticating",
        RunStage::EnsuringStorageReady => "Error preparing storage container",
        RunStage::Paginating => "Error downloading logs",
        RunStage::Enriching => "Error enriching logs",
        RunStage::Exporting => "Error uploading logs",
        RunStage::Succeeded | RunStage::Failed => "Run finished",
    }
}

/// Collaborators for one run, built from validated settings
pub type Collaborators = (Arc<dyn LogSource>, Arc<dyn ObjectStore>);

/// Executes one invocation with caller-supplied collaborators
///
/// The resume position is resolved from `history` first. Settings are validated
/// before `build` is called, so a missing setting fails the run without any
/// external call; the failure still reports the resolved checkpoint.
pub async fn execute_with<F>(
    bag: &SettingsBag,
    history: Option<&[RunHistoryEntry]>,
    options: SyncOptions,
    build: F,
) -> RunReport
where
    F: FnOnce(&Settings, &SyncOptions) -> Result<Collaborators>,
{
    let started_at = Utc::now();
    let timer = Instant::now();
    let start = resolve_checkpoint(history);

    enter(RunStage::Validating);
    let prepared = Settings::from_bag(bag)
        .and_then(|settings| build(&settings, &options).map(|c| (settings, c)));

    match prepared {
        Ok((settings, (source, store))) => {
            SyncJob::new(source, store, settings.storage_container_name, options)
                .run(start)
                .await
        }
        Err(error) => {
            crate::log_error_with_context!(&error, stage_context(RunStage::Validating));
            RunReport {
                run_id: Uuid::new_v4().to_string(),
                started_at,
                duration: timer.elapsed(),
                outcome: RunOutcome::failure(error, start, RunStage::Validating),
            }
        }
    }
}

/// Executes one invocation against the real management API and blob storage
pub async fn execute(
    bag: &SettingsBag,
    history: Option<&[RunHistoryEntry]>,
    config: &SyncConfig,
) -> RunReport {
    let options = SyncOptions::from(&config.job);
    execute_with(bag, history, options, |settings, options| {
        let source = Auth0Client::from_settings(settings, options.request_timeout)?;
        let store =
            AzureBlobStore::from_settings(settings, &config.storage, options.request_timeout)?;
        Ok((Arc::new(source) as Arc<dyn LogSource>, Arc::new(store) as Arc<dyn ObjectStore>))
    })
    .await
}
