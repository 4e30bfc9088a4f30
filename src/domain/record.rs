//! Log record models
//!
//! A [`RawLogRecord`] is one upstream log entry exactly as fetched. An
//! [`EnrichedLogRecord`] is the same record with decoded event name, severity and
//! parsed client fields, ready to be written to storage.

use super::ids::LogId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field names added by enrichment
///
/// These never survive in [`EnrichedLogRecord::extra`], so a record that is enriched
/// twice does not carry duplicate keys.
pub const ENRICHMENT_FIELDS: [&str; 6] = [
    "type_code",
    "level",
    "os",
    "os_version",
    "device",
    "device_version",
];

/// One upstream log entry
///
/// Only the fields the pipeline needs are typed; everything else the upstream sends
/// is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLogRecord {
    /// Unique record id, also the pagination cursor
    #[serde(rename = "_id")]
    pub id: LogId,

    /// Short event-type code (e.g. `s`, `fp`); empty when absent or not a string
    #[serde(rename = "type", default, deserialize_with = "string_or_empty")]
    pub event_type: String,

    /// Event timestamp
    pub date: DateTime<Utc>,

    /// Free-form client identification string; `None` unless a string
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_agent: Option<String>,

    /// Any other upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// One odd field must not make the whole page undecodable.
fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    string_or_none(deserializer).map(Option::unwrap_or_default)
}

/// Severity of a classified event
///
/// Serialized as its ordinal (0-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EventLevel {
    /// 0
    Debug,
    /// 1
    Info,
    /// 2
    Warning,
    /// 3
    Error,
    /// 4
    Critical,
}

impl EventLevel {
    /// Numeric ordinal of the level
    pub fn ordinal(self) -> u8 {
        match self {
            EventLevel::Debug => 0,
            EventLevel::Info => 1,
            EventLevel::Warning => 2,
            EventLevel::Error => 3,
            EventLevel::Critical => 4,
        }
    }
}

impl From<EventLevel> for u8 {
    fn from(level: EventLevel) -> Self {
        level.ordinal()
    }
}

impl TryFrom<u8> for EventLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, <EventLevel as TryFrom<u8>>::Error> {
        match value {
            0 => Ok(EventLevel::Debug),
            1 => Ok(EventLevel::Info),
            2 => Ok(EventLevel::Warning),
            3 => Ok(EventLevel::Error),
            4 => Ok(EventLevel::Critical),
            other => Err(format!("Invalid event level {other}, expected 0-4")),
        }
    }
}

/// A log record after enrichment
///
/// Serializes to the raw record's layout with `type` replaced by the display name and
/// the enrichment fields added alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedLogRecord {
    /// Unique record id
    #[serde(rename = "_id")]
    pub id: LogId,

    /// Decoded event name (raw code when unknown)
    #[serde(rename = "type")]
    pub event_name: String,

    /// Original event-type code
    pub type_code: String,

    /// Severity; absent means unclassified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<EventLevel>,

    /// Event timestamp
    pub date: DateTime<Utc>,

    /// Original client identification string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Operating system display string (family and version)
    pub os: String,

    /// Operating system version
    pub os_version: String,

    /// Device display string (family and version)
    pub device: String,

    /// Device version
    pub device_version: String,

    /// Any other upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnrichedLogRecord {
    /// Reconstructs the raw-equivalent record
    ///
    /// The original code goes back into `type`; enrichment fields are dropped.
    pub fn to_raw(&self) -> RawLogRecord {
        RawLogRecord {
            id: self.id.clone(),
            event_type: self.type_code.clone(),
            date: self.date,
            user_agent: self.user_agent.clone(),
            extra: self.extra.clone(),
        }
    }
}
