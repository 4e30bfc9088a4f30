//! Prior run history
//!
//! History is supplied by whatever schedules the job (or by the local
//! [`HistoryStore`](crate::core::state::HistoryStore)). It is read-only input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status code recorded for a successful run
pub const STATUS_SUCCESS: u16 = 200;

/// Status code recorded for a failed run
pub const STATUS_FAILURE: u16 = 500;

/// Outcome of one prior invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHistoryEntry {
    /// When the run started, as reported by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,

    /// Invocation type (e.g. `scheduled`, `manual`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub run_type: Option<String>,

    /// Numeric status of the run; 200 means success
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    /// Serialized result payload
    ///
    /// Usually a JSON document encoded as a string; some schedulers hand over the
    /// decoded object instead, so both shapes are accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RunHistoryEntry {
    /// Creates an entry with a string body
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            started_at: None,
            run_type: None,
            status_code,
            body: Some(Value::String(body.into())),
        }
    }

    /// Sets the start timestamp
    pub fn with_started_at(mut self, started_at: impl Into<String>) -> Self {
        self.started_at = Some(started_at.into());
        self
    }

    /// Sets the invocation type
    pub fn with_run_type(mut self, run_type: impl Into<String>) -> Self {
        self.run_type = Some(run_type.into());
        self
    }

    /// Whether the run reported success
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_SUCCESS
    }

    /// Decodes the result payload
    ///
    /// Returns `None` when there is no body or it is not valid JSON.
    pub fn payload(&self) -> Option<Value> {
        match self.body.as_ref()? {
            Value::String(s) => serde_json::from_str(s).ok(),
            Value::Null => None,
            other => Some(other.clone()),
        }
    }
}

/// History as handed over by a scheduler
///
/// Accepts either a bare array of entries or an object wrapping them in `results`.
/// Elements are kept undecoded so one malformed entry (say, a run still in
/// progress with a null `statusCode`) cannot reject the whole document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HistoryDocument {
    /// `[ {...}, {...} ]`
    Entries(Vec<Value>),
    /// `{ "results": [ {...} ] }`
    Wrapped {
        /// Prior runs
        results: Vec<Value>,
    },
}

impl HistoryDocument {
    /// Consumes the document and returns the decodable entries in their given order
    ///
    /// Elements that are not valid entries are skipped.
    pub fn into_entries(self) -> Vec<RunHistoryEntry> {
        let raw = match self {
            HistoryDocument::Entries(entries) => entries,
            HistoryDocument::Wrapped { results } => results,
        };

        raw.into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(index, error = %e, "Skipping malformed history entry");
                    None
                }
            })
            .collect()
    }
}
