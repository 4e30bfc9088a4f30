//! Run outcome and stage tracking
//!
//! A run walks the stages
//! `Validating -> Authenticating -> EnsuringStorageReady -> Paginating -> Enriching -> Exporting`
//! and ends in [`RunStage::Succeeded`] or [`RunStage::Failed`]. Whatever happens, the
//! run produces exactly one [`RunOutcome`].

use super::errors::SyncError;
use super::history::{RunHistoryEntry, STATUS_FAILURE, STATUS_SUCCESS};
use super::ids::CheckpointId;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Stage of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    /// Checking the settings bag
    Validating,
    /// Acquiring upstream credentials
    Authenticating,
    /// Creating the storage container if needed
    EnsuringStorageReady,
    /// Fetching pages until the upstream is exhausted
    Paginating,
    /// Enriching fetched records
    Enriching,
    /// Writing records to storage
    Exporting,
    /// Every fetched record was enriched and written
    Succeeded,
    /// A stage failed; nothing from this run is carried over
    Failed,
}

impl RunStage {
    /// Whether the stage is terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStage::Succeeded | RunStage::Failed)
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Validating => "validating",
            RunStage::Authenticating => "authenticating",
            RunStage::EnsuringStorageReady => "ensuring_storage_ready",
            RunStage::Paginating => "paginating",
            RunStage::Enriching => "enriching",
            RunStage::Exporting => "exporting",
            RunStage::Succeeded => "succeeded",
            RunStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of one run
///
/// A failure always carries the checkpoint the run started from, never a position
/// reached part-way through, so the next run re-fetches from a known-good point.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every fetched record was exported
    Success {
        /// Position to resume from next time
        final_checkpoint: Option<CheckpointId>,
        /// Number of records processed
        record_count: usize,
    },
    /// The run aborted
    Failure {
        /// What went wrong
        error: SyncError,
        /// The pre-run checkpoint
        checkpoint_to_retry_from: Option<CheckpointId>,
        /// Stage that failed
        stage: RunStage,
    },
}

impl RunOutcome {
    /// Creates a successful outcome
    pub fn success(final_checkpoint: Option<CheckpointId>, record_count: usize) -> Self {
        RunOutcome::Success {
            final_checkpoint,
            record_count,
        }
    }

    /// Creates a failed outcome
    pub fn failure(
        error: SyncError,
        checkpoint_to_retry_from: Option<CheckpointId>,
        stage: RunStage,
    ) -> Self {
        RunOutcome::Failure {
            error,
            checkpoint_to_retry_from,
            stage,
        }
    }

    /// Whether the run succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success { .. })
    }

    /// Checkpoint the next run should resume from
    pub fn checkpoint(&self) -> Option<&CheckpointId> {
        match self {
            RunOutcome::Success {
                final_checkpoint, ..
            } => final_checkpoint.as_ref(),
            RunOutcome::Failure {
                checkpoint_to_retry_from,
                ..
            } => checkpoint_to_retry_from.as_ref(),
        }
    }

    /// Records processed (zero for failures)
    pub fn record_count(&self) -> usize {
        match self {
            RunOutcome::Success { record_count, .. } => *record_count,
            RunOutcome::Failure { .. } => 0,
        }
    }

    /// Error of a failed run
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            RunOutcome::Success { .. } => None,
            RunOutcome::Failure { error, .. } => Some(error),
        }
    }

    /// Terminal stage of the run, or the stage that failed
    pub fn stage(&self) -> RunStage {
        match self {
            RunOutcome::Success { .. } => RunStage::Succeeded,
            RunOutcome::Failure { stage, .. } => *stage,
        }
    }

    /// Status code a scheduler would record for this outcome
    pub fn status_code(&self) -> u16 {
        if self.is_success() {
            STATUS_SUCCESS
        } else {
            STATUS_FAILURE
        }
    }

    /// Builds the history entry describing this run
    pub fn to_history_entry(
        &self,
        started_at: impl Into<String>,
        run_type: impl Into<String>,
    ) -> Result<RunHistoryEntry, SyncError> {
        let body = serde_json::to_string(self)?;
        Ok(RunHistoryEntry::new(self.status_code(), body)
            .with_started_at(started_at)
            .with_run_type(run_type))
    }
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    kind: &'a str,
    message: String,
    stage: RunStage,
}

impl Serialize for RunOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RunOutcome::Success {
                final_checkpoint,
                record_count,
            } => {
                let mut state = serializer.serialize_struct("RunOutcome", 2)?;
                state.serialize_field("checkpointId", final_checkpoint)?;
                state.serialize_field("totalLogsProcessed", record_count)?;
                state.end()
            }
            RunOutcome::Failure {
                error,
                checkpoint_to_retry_from,
                stage,
            } => {
                let mut state = serializer.serialize_struct("RunOutcome", 2)?;
                state.serialize_field(
                    "error",
                    &ErrorPayload {
                        kind: error.kind(),
                        message: error.to_string(),
                        stage: *stage,
                    },
                )?;
                state.serialize_field("checkpointId", checkpoint_to_retry_from)?;
                state.end()
            }
        }
    }
}
