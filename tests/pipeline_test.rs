//! End-to-end runs over in-memory collaborators

mod common;

use common::{complete_settings, raw_record, MemoryStore, ScriptedSource};
use logsync::adapters::auth0::LogSource;
use logsync::adapters::storage::ObjectStore;
use logsync::config::SettingsBag;
use logsync::core::export::{execute_with, Collaborators, RunReport, SyncOptions};
use logsync::domain::{RunHistoryEntry, RunStage, SyncError};
use serde_json::json;
use std::sync::Arc;

async fn run(
    bag: &SettingsBag,
    history: &[RunHistoryEntry],
    source: &Arc<ScriptedSource>,
    store: &Arc<MemoryStore>,
) -> RunReport {
    let collaborators: Collaborators = (
        Arc::clone(source) as Arc<dyn LogSource>,
        Arc::clone(store) as Arc<dyn ObjectStore>,
    );
    execute_with(bag, Some(history), SyncOptions::default(), move |_, _| {
        Ok(collaborators)
    })
    .await
}

fn history_at(checkpoint: &str) -> Vec<RunHistoryEntry> {
    vec![RunHistoryEntry::new(
        200,
        json!({ "checkpointId": checkpoint }).to_string(),
    )]
}

#[tokio::test]
async fn test_one_page_run_reports_last_record() {
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(vec![
            raw_record("90001", "s", None),
            raw_record("90002", "f", None),
            raw_record("90003", "fp", None),
        ]),
        Ok(vec![]),
    ]));
    let store = Arc::new(MemoryStore::new());

    let report = run(&complete_settings(), &history_at("A"), &source, &store).await;

    assert_eq!(
        serde_json::to_value(&report.outcome).unwrap(),
        json!({ "checkpointId": "90003", "totalLogsProcessed": 3 })
    );
    assert_eq!(
        source.requests(),
        vec![(200, Some("A".to_string())), (200, Some("90003".to_string()))]
    );
    assert_eq!(store.containers(), vec!["auth0-logs"]);
    assert_eq!(store.object_count(), 3);
}

#[tokio::test]
async fn test_missing_storage_key_fails_before_any_call() {
    let mut bag = SettingsBag::new();
    for (key, value) in complete_settings().redacted() {
        if key != "STORAGE_ACCOUNT_KEY" {
            bag.insert(key, value);
        }
    }
    let source = Arc::new(ScriptedSource::new(vec![]));
    let store = Arc::new(MemoryStore::new());

    let report = run(&bag, &history_at("A"), &source, &store).await;

    match report.outcome.error() {
        Some(SyncError::MissingSettings(keys)) => assert_eq!(keys, &vec!["STORAGE_ACCOUNT_KEY"]),
        other => panic!("unexpected outcome error: {other:?}"),
    }
    assert_eq!(report.outcome.stage(), RunStage::Validating);
    assert_eq!(source.calls(), 0);
    assert!(store.containers().is_empty());
    assert_eq!(store.write_attempts(), 0);
}

#[tokio::test]
async fn test_authentication_failure_keeps_checkpoint() {
    let source = Arc::new(ScriptedSource::failing_auth("access_denied"));
    let store = Arc::new(MemoryStore::new());

    let report = run(&complete_settings(), &history_at("A"), &source, &store).await;

    let output = serde_json::to_value(&report.outcome).unwrap();
    assert_eq!(output["checkpointId"], "A");
    assert_eq!(output["error"]["kind"], "AuthenticationError");
    assert_eq!(output["error"]["stage"], "authenticating");
    assert!(source.requests().is_empty());
    assert!(store.containers().is_empty());
}

#[tokio::test]
async fn test_container_failure_stops_before_pagination() {
    let source = Arc::new(ScriptedSource::new(vec![Ok(vec![raw_record("1", "s", None)])]));
    let store = Arc::new(MemoryStore::failing_container("403 AuthorizationFailure"));

    let report = run(&complete_settings(), &history_at("A"), &source, &store).await;

    assert_eq!(report.outcome.stage(), RunStage::EnsuringStorageReady);
    assert_eq!(report.outcome.error().unwrap().kind(), "StorageInitError");
    assert_eq!(report.outcome.checkpoint().unwrap().as_str(), "A");
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_discards_fetched_pages() {
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(vec![raw_record("B1", "s", None), raw_record("B2", "s", None)]),
        Err(SyncError::UpstreamFetch("429 Too Many Requests".into())),
    ]));
    let store = Arc::new(MemoryStore::new());

    let report = run(&complete_settings(), &history_at("A"), &source, &store).await;

    assert_eq!(report.outcome.stage(), RunStage::Paginating);
    assert_eq!(report.outcome.checkpoint().unwrap().as_str(), "A");
    assert_eq!(store.write_attempts(), 0);
}

#[tokio::test]
async fn test_stored_objects_are_enriched() {
    let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_5 like Mac OS X) AppleWebKit/605.1.15";
    let source = Arc::new(ScriptedSource::new(vec![Ok(vec![raw_record(
        "90042",
        "fp",
        Some(ua),
    )])]));
    let store = Arc::new(MemoryStore::new());

    let report = run(&complete_settings(), &[], &source, &store).await;
    assert!(report.outcome.is_success());

    assert_eq!(store.keys(), vec!["2023/10/16/15/90042.json"]);
    let object = store.object("2023/10/16/15/90042.json").unwrap();
    assert_eq!(object["_id"], "90042");
    assert_eq!(object["type"], "Failed Login (wrong password)");
    assert_eq!(object["type_code"], "fp");
    assert_eq!(object["level"], 3);
    assert_eq!(object["os"], "iOS 16.5");
    assert_eq!(object["device"], "iPhone");
    assert_eq!(object["ip"], "203.0.113.7");
}

#[tokio::test]
async fn test_no_history_starts_from_beginning() {
    let source = Arc::new(ScriptedSource::new(vec![]));
    let store = Arc::new(MemoryStore::new());

    let report = run(&complete_settings(), &[], &source, &store).await;

    assert!(report.outcome.is_success());
    assert_eq!(source.requests(), vec![(200, None)]);
    assert_eq!(
        serde_json::to_value(&report.outcome).unwrap(),
        json!({ "checkpointId": null, "totalLogsProcessed": 0 })
    );
}
