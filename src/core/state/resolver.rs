//! Checkpoint resolution from prior run history

use crate::domain::{CheckpointId, RunHistoryEntry};

/// Field of a run payload holding the resume position
pub const CHECKPOINT_FIELD: &str = "checkpointId";

/// Determines where the next run resumes
///
/// Scans `history` in the given order and returns the checkpoint of the last
/// successful entry whose payload carries a non-empty `checkpointId`. The scan does
/// not stop at the first hit and does not reorder by timestamp: the last qualifying
/// entry in the list wins. Entries with malformed payloads are skipped.
///
/// `None` means "start from the beginning of the log".
///
/// # Examples
///
/// ```
/// use logsync::core::state::resolve_checkpoint;
/// use logsync::domain::RunHistoryEntry;
///
/// let history = vec![
///     RunHistoryEntry::new(200, r#"{"checkpointId":"A"}"#),
///     RunHistoryEntry::new(500, r#"{"checkpointId":"A"}"#),
///     RunHistoryEntry::new(200, "not json"),
/// ];
/// let checkpoint = resolve_checkpoint(Some(history.as_slice())).unwrap();
/// assert_eq!(checkpoint.as_str(), "A");
/// assert!(resolve_checkpoint(None).is_none());
/// ```
pub fn resolve_checkpoint(history: Option<&[RunHistoryEntry]>) -> Option<CheckpointId> {
    let mut resolved = None;

    for (index, entry) in history.unwrap_or_default().iter().enumerate() {
        if !entry.is_success() {
            continue;
        }

        let Some(payload) = entry.payload() else {
            tracing::debug!(index, "Skipping history entry with unreadable payload");
            continue;
        };

        let candidate = payload
            .get(CHECKPOINT_FIELD)
            .and_then(|v| v.as_str())
            .and_then(|s| CheckpointId::new(s).ok());

        if let Some(checkpoint) = candidate {
            resolved = Some(checkpoint);
        }
    }

    resolved
}
