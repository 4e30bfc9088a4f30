//! Domain identifier types
//!
//! Newtype wrappers keep upstream log ids and resume checkpoints from being mixed
//! up with other strings. Both are opaque: the upstream defines their format and
//! ordering, logsync only stores and echoes them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a single upstream log record
///
/// # Examples
///
/// ```
/// use logsync::domain::ids::LogId;
/// use std::str::FromStr;
///
/// let id = LogId::from_str("90020231016153010123456789").unwrap();
/// assert_eq!(id.as_str(), "90020231016153010123456789");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(String);

impl LogId {
    /// Creates a new LogId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Log ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the log ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for LogId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resume position: the id of the last log record that was fully processed
///
/// Feeding a checkpoint back to the upstream fetch yields only records after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointId(String);

impl CheckpointId {
    /// Creates a new CheckpointId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Checkpoint ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the checkpoint as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&LogId> for CheckpointId {
    fn from(id: &LogId) -> Self {
        Self(id.as_str().to_string())
    }
}

impl fmt::Display for CheckpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CheckpointId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CheckpointId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
