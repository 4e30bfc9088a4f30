//! Domain models and types for logsync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`LogId`], [`CheckpointId`])
//! - **Records** ([`RawLogRecord`], [`EnrichedLogRecord`], [`EventLevel`])
//! - **Run history and outcome** ([`RunHistoryEntry`], [`RunOutcome`], [`RunStage`])
//! - **Error types** ([`SyncError`]) and the [`Result`] alias
//!
//! # Type Safety
//!
//! Log ids and checkpoints are distinct newtypes, converted explicitly:
//!
//! ```rust
//! use logsync::domain::{CheckpointId, LogId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let last = LogId::new("90020231016")?;
//! let checkpoint = CheckpointId::from(&last);
//! assert_eq!(checkpoint.as_str(), "90020231016");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod history;
pub mod ids;
pub mod outcome;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::SyncError;
pub use history::{HistoryDocument, RunHistoryEntry, STATUS_FAILURE, STATUS_SUCCESS};
pub use ids::{CheckpointId, LogId};
pub use outcome::{RunOutcome, RunStage};
pub use record::{EnrichedLogRecord, EventLevel, RawLogRecord, ENRICHMENT_FIELDS};
pub use result::Result;
