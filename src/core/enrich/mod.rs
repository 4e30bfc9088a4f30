//! Record enrichment
//!
//! Turns a [`RawLogRecord`] into an [`EnrichedLogRecord`]: the event code is decoded
//! through the classifier and the client string is parsed into operating system and
//! device fields. Enrichment is pure and cannot fail; unknown inputs degrade to
//! defaults.
//!
//! Enriching the raw-equivalent of an enriched record reproduces it exactly. The
//! original code is read back from `type_code` when a record already carries one, so
//! a display name is never mistaken for a code.

pub mod user_agent;

use crate::core::classify::classify;
use crate::domain::{EnrichedLogRecord, RawLogRecord, ENRICHMENT_FIELDS};
use serde_json::Value;
use user_agent::parse_client;

/// Enriches one record
///
/// # Examples
///
/// ```
/// use logsync::core::enrich::enrich;
/// use logsync::domain::{EventLevel, RawLogRecord};
///
/// let raw: RawLogRecord = serde_json::from_value(serde_json::json!({
///     "_id": "90020231016",
///     "type": "fp",
///     "date": "2023-10-16T15:30:10Z"
/// }))
/// .unwrap();
///
/// let enriched = enrich(raw);
/// assert_eq!(enriched.event_name, "Failed Login (wrong password)");
/// assert_eq!(enriched.type_code, "fp");
/// assert_eq!(enriched.level, Some(EventLevel::Error));
/// ```
pub fn enrich(raw: RawLogRecord) -> EnrichedLogRecord {
    let RawLogRecord {
        id,
        event_type,
        date,
        user_agent,
        mut extra,
    } = raw;

    let type_code = match extra.get("type_code") {
        Some(Value::String(code)) => code.clone(),
        _ => event_type,
    };
    for field in ENRICHMENT_FIELDS {
        extra.remove(field);
    }

    let (event_name, level) = match classify(&type_code) {
        Some(class) => (class.name.to_string(), class.level),
        None => (type_code.clone(), None),
    };

    let client = parse_client(user_agent.as_deref());

    EnrichedLogRecord {
        id,
        event_name,
        type_code,
        level,
        date,
        user_agent,
        os: client.os.display(),
        os_version: client.os.version(),
        device: client.device.display(),
        device_version: client.device.version(),
        extra,
    }
}

/// Enriches every record, preserving order
pub fn enrich_all(records: Vec<RawLogRecord>) -> Vec<EnrichedLogRecord> {
    records.into_iter().map(enrich).collect()
}
