//! Checkpoint resolution over realistic history

use logsync::core::state::{resolve_checkpoint, HistoryStore};
use logsync::domain::{CheckpointId, RunHistoryEntry, RunOutcome, RunStage, SyncError};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_last_qualifying_entry_wins_regardless_of_timestamps() {
    let history = vec![
        RunHistoryEntry::new(200, r#"{"checkpointId":"NEWER"}"#)
            .with_started_at("2024-03-02T00:00:00Z"),
        RunHistoryEntry::new(200, r#"{"checkpointId":"OLDER"}"#)
            .with_started_at("2024-03-01T00:00:00Z"),
    ];

    let resolved = resolve_checkpoint(Some(history.as_slice())).unwrap();
    assert_eq!(resolved.as_str(), "OLDER");
}

#[test]
fn test_failures_and_damaged_entries_are_skipped() {
    let history: Vec<RunHistoryEntry> = serde_json::from_value(json!([
        { "statusCode": 200, "body": "{\"checkpointId\":\"A\"}" },
        { "statusCode": 200, "body": "{not json" },
        { "statusCode": 200, "body": "{\"checkpointId\":\"\"}" },
        { "statusCode": 200, "body": "{\"totalLogsProcessed\":0}" },
        { "statusCode": 500, "body": "{\"checkpointId\":\"Z\"}" },
        { "statusCode": 200 }
    ]))
    .unwrap();

    assert_eq!(
        resolve_checkpoint(Some(history.as_slice())).unwrap().as_str(),
        "A"
    );
}

#[test]
fn test_empty_and_absent_history_start_from_beginning() {
    assert!(resolve_checkpoint(None).is_none());
    assert!(resolve_checkpoint(Some(&[][..])).is_none());
}

#[test]
fn test_recorded_outcomes_feed_the_next_run() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("history.jsonl"));

    let success = RunOutcome::success(CheckpointId::new("B").ok(), 3);
    store
        .append(&success.to_history_entry("2024-03-01T00:00:00Z", "scheduled").unwrap())
        .unwrap();

    let failure = RunOutcome::failure(
        SyncError::UpstreamFetch("502 Bad Gateway".into()),
        CheckpointId::new("B").ok(),
        RunStage::Paginating,
    );
    store
        .append(&failure.to_history_entry("2024-03-02T00:00:00Z", "scheduled").unwrap())
        .unwrap();

    let entries = store.load().unwrap();
    assert_eq!(entries[0].status_code, 200);
    assert_eq!(entries[1].status_code, 500);
    assert_eq!(
        resolve_checkpoint(Some(entries.as_slice())).unwrap().as_str(),
        "B"
    );
}
