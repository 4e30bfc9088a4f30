//! Local run history
//!
//! When no scheduler supplies history, each run's entry is appended to a JSON Lines
//! file. Reading tolerates damage: blank and malformed lines are skipped.

use crate::domain::Result;
use crate::domain::{HistoryDocument, RunHistoryEntry, SyncError};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Default location of the history file
pub const DEFAULT_HISTORY_PATH: &str = ".logsync/history.jsonl";

/// Append-only JSONL store of run history entries
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry as a single line
    pub fn append(&self, entry: &RunHistoryEntry) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SyncError::Io(format!(
                    "create history directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SyncError::Io(format!("open history file {}: {e}", self.path.display())))?;

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        file.write_all(&line)
            .map_err(|e| SyncError::Io(format!("write history entry: {e}")))?;

        tracing::debug!(
            path = %self.path.display(),
            status_code = entry.status_code,
            "Recorded run history entry"
        );
        Ok(())
    }

    /// Loads all entries, oldest first
    ///
    /// A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<RunHistoryEntry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(SyncError::Io(format!(
                    "open history file {}: {err}",
                    self.path.display()
                )))
            }
        };

        let mut entries = Vec::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let Ok(line) = line else {
                continue;
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<RunHistoryEntry>(trimmed) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = number + 1,
                    error = %e,
                    "Skipping malformed history line"
                ),
            }
        }

        Ok(entries)
    }

    /// Most recent entries first, at most `limit`
    pub fn recent(&self, limit: usize) -> Result<Vec<RunHistoryEntry>> {
        let mut entries = self.load()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }
}

/// Reads history handed over by a scheduler
///
/// The file holds one JSON document: an array of entries or an object with a
/// `results` array. Entries that do not decode are skipped like malformed lines
/// of the local store; a file that is not such a document at all is an error.
pub fn read_history_document(path: impl AsRef<Path>) -> Result<Vec<RunHistoryEntry>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| SyncError::Io(format!("read history document {}: {e}", path.display())))?;
    let document: HistoryDocument = serde_json::from_str(&contents)?;
    Ok(document.into_entries())
}
