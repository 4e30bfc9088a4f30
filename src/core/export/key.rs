//! Storage key derivation
//!
//! Objects are laid out as `YYYY/MM/DD/HH/<id>.json`, partitioned by the record's
//! own event time in UTC. Consumers of the container rely on this layout.

use crate::domain::EnrichedLogRecord;

/// Storage key for a record
///
/// # Examples
///
/// ```
/// use logsync::core::enrich::enrich;
/// use logsync::core::export::storage_key;
/// use logsync::domain::RawLogRecord;
///
/// let raw: RawLogRecord = serde_json::from_value(serde_json::json!({
///     "_id": "90020231016",
///     "type": "s",
///     "date": "2023-10-16T15:30:10.123Z"
/// }))
/// .unwrap();
///
/// assert_eq!(storage_key(&enrich(raw)), "2023/10/16/15/90020231016.json");
/// ```
pub fn storage_key(record: &EnrichedLogRecord) -> String {
    format!("{}/{}.json", record.date.format("%Y/%m/%d/%H"), record.id)
}
