//! Enrichment of realistic records

mod common;

use common::raw_record;
use logsync::core::classify::known_code_count;
use logsync::core::enrich::{enrich, enrich_all};
use logsync::domain::{EventLevel, RawLogRecord};

const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 13; SM-S901B Build/TP1A.220624.014) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Mobile Safari/537.36";

#[test]
fn test_known_code_table_size() {
    assert_eq!(known_code_count(), 39);
}

#[test]
fn test_enriched_document_layout() {
    let enriched = enrich(raw_record("90001", "s", Some(ANDROID_UA)));
    let value = serde_json::to_value(&enriched).unwrap();

    assert_eq!(value["_id"], "90001");
    assert_eq!(value["type"], "Success Login");
    assert_eq!(value["type_code"], "s");
    assert_eq!(value["level"], 1);
    assert_eq!(value["os"], "Android 13");
    assert_eq!(value["os_version"], "13");
    assert_eq!(value["device"], "SM-S901B");
    assert_eq!(value["device_version"], "0.0.0");
    assert_eq!(value["client_id"], "abc123");
    assert_eq!(value["user_agent"], ANDROID_UA);
}

#[test]
fn test_unknown_and_unleveled_codes_have_no_level() {
    let records = enrich_all(vec![
        raw_record("1", "zz_new_code", None),
        raw_record("2", "sapi", None),
    ]);

    assert_eq!(records[0].event_name, "zz_new_code");
    assert_eq!(records[0].level, None);
    assert_eq!(records[1].level, None);

    let value = serde_json::to_value(&records[0]).unwrap();
    assert!(value.get("level").is_none());
}

#[test]
fn test_missing_client_string_degrades_to_defaults() {
    let enriched = enrich(raw_record("1", "f", None));
    assert_eq!(enriched.level, Some(EventLevel::Error));
    assert_eq!(enriched.os, "Other");
    assert_eq!(enriched.os_version, "0.0.0");
    assert_eq!(enriched.device, "Other");
}

#[test]
fn test_enriching_stored_output_again_is_stable() {
    let once = enrich(raw_record("1", "fp", Some(ANDROID_UA)));
    let stored = serde_json::to_value(&once).unwrap();

    let reread: RawLogRecord = serde_json::from_value(stored.clone()).unwrap();
    let twice = enrich(reread);

    assert_eq!(serde_json::to_value(&twice).unwrap(), stored);
}
