//! Export sink
//!
//! Writes enriched records to object storage, one object per record, through a
//! fixed pool of workers pulling from a shared task list. The first failed write
//! raises an abort flag so no worker starts another write, and in-flight tasks are
//! cancelled. Writes are unconditional overwrites, so repeating an export after a
//! failure is safe.

use super::key::storage_key;
use crate::adapters::storage::ObjectStore;
use crate::domain::{CheckpointId, EnrichedLogRecord, Result, RunOutcome, RunStage, SyncError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Default number of concurrent writes
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// One serialized record waiting to be written
#[derive(Debug, Clone)]
pub struct WriteTask {
    pub key: String,
    pub body: Vec<u8>,
}

impl WriteTask {
    /// Serializes a record under its storage key
    pub fn from_record(record: &EnrichedLogRecord) -> Result<Self> {
        let key = storage_key(record);
        let body = serde_json::to_vec(record)
            .map_err(|e| SyncError::export_write(&key, format!("serialization failed: {e}")))?;
        Ok(Self { key, body })
    }
}

/// Bounded-concurrency writer for one container
pub struct ExportSink {
    store: Arc<dyn ObjectStore>,
    container: String,
    max_concurrency: usize,
    dry_run: bool,
}

impl ExportSink {
    pub fn new(store: Arc<dyn ObjectStore>, container: impl Into<String>) -> Self {
        Self {
            store,
            container: container.into(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            dry_run: false,
        }
    }

    /// Sets the worker count (at least 1)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Derives keys and serializes records without writing them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Writes every record, stopping at the first failure
    ///
    /// Returns the number of records exported. On failure, any subset of the other
    /// records may already have been written.
    ///
    /// # Errors
    ///
    /// Returns the first [`SyncError::ExportWrite`] raised by a worker.
    pub async fn write_all(&self, records: &[EnrichedLogRecord]) -> Result<usize> {
        let tasks = records
            .iter()
            .map(WriteTask::from_record)
            .collect::<Result<Vec<_>>>()?;

        if self.dry_run {
            for task in &tasks {
                tracing::debug!(key = %task.key, bytes = task.body.len(), "Dry run, skipping upload");
            }
            tracing::info!(count = tasks.len(), "Dry run complete, nothing uploaded");
            return Ok(tasks.len());
        }

        if tasks.is_empty() {
            return Ok(0);
        }

        tracing::info!(
            count = tasks.len(),
            container = %self.container,
            workers = self.max_concurrency.min(tasks.len()),
            "Uploading blobs"
        );

        let tasks = Arc::new(tasks);
        let next = Arc::new(AtomicUsize::new(0));
        let abort = Arc::new(AtomicBool::new(false));
        let mut join_set: JoinSet<Result<usize>> = JoinSet::new();

        for _ in 0..self.max_concurrency.min(tasks.len()) {
            let tasks = Arc::clone(&tasks);
            let next = Arc::clone(&next);
            let abort = Arc::clone(&abort);
            let store = Arc::clone(&self.store);
            let container = self.container.clone();

            join_set.spawn(async move {
                let mut written = 0usize;
                while !abort.load(Ordering::Acquire) {
                    let index = next.fetch_add(1, Ordering::AcqRel);
                    let Some(task) = tasks.get(index) else {
                        break;
                    };

                    tracing::trace!(key = %task.key, "Uploading");
                    if let Err(e) = store
                        .put_object(&container, &task.key, task.body.clone())
                        .await
                    {
                        abort.store(true, Ordering::Release);
                        return Err(e);
                    }
                    written += 1;
                }
                Ok(written)
            });
        }

        let mut written = 0usize;
        let mut first_error: Option<SyncError> = None;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(count)) => written += count,
                Ok(Err(error)) => {
                    if first_error.is_none() {
                        tracing::error!(error = %error, "Upload failed, aborting remaining writes");
                        first_error = Some(error);
                        join_set.abort_all();
                    }
                }
                Err(join_err) if join_err.is_cancelled() && first_error.is_some() => {}
                Err(join_err) => {
                    abort.store(true, Ordering::Release);
                    join_set.abort_all();
                    first_error.get_or_insert(SyncError::Other(format!(
                        "Upload worker panicked: {join_err}"
                    )));
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => {
                tracing::info!(count = written, "Upload complete");
                Ok(written)
            }
        }
    }

    /// Exports `records` and reports the run outcome
    ///
    /// Success carries `final_checkpoint`; failure carries `pre_run`, never a
    /// position reached part-way through.
    pub async fn export(
        &self,
        records: &[EnrichedLogRecord],
        pre_run: Option<CheckpointId>,
        final_checkpoint: Option<CheckpointId>,
    ) -> RunOutcome {
        match self.write_all(records).await {
            Ok(count) => RunOutcome::success(final_checkpoint, count),
            Err(error) => RunOutcome::failure(error, pre_run, RunStage::Exporting),
        }
    }
}
