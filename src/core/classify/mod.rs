//! Event classification
//!
//! Maps a short upstream event-type code to a display name and severity. The table
//! is fixed data, built once into an immutable map on first use.

use crate::domain::EventLevel;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Display name and severity for one event-type code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventClass {
    /// Human-readable event name
    pub name: &'static str,
    /// Severity; `None` for codes the table knows but does not grade
    pub level: Option<EventLevel>,
}

const EVENT_TYPES: &[(&str, &str, Option<EventLevel>)] = &[
    ("s", "Success Login", Some(EventLevel::Info)),
    ("seacft", "Success Exchange", Some(EventLevel::Info)),
    ("feacft", "Failed Exchange", Some(EventLevel::Error)),
    ("f", "Failed Login", Some(EventLevel::Error)),
    ("w", "Warnings During Login", Some(EventLevel::Warning)),
    ("du", "Deleted User", Some(EventLevel::Info)),
    ("fu", "Failed Login (invalid email/username)", Some(EventLevel::Error)),
    ("fp", "Failed Login (wrong password)", Some(EventLevel::Error)),
    ("fc", "Failed by Connector", Some(EventLevel::Error)),
    ("fco", "Failed by CORS", Some(EventLevel::Error)),
    ("con", "Connector Online", Some(EventLevel::Info)),
    ("coff", "Connector Offline", Some(EventLevel::Error)),
    ("fcpro", "Failed Connector Provisioning", Some(EventLevel::Critical)),
    ("ss", "Success Signup", Some(EventLevel::Info)),
    ("fs", "Failed Signup", Some(EventLevel::Error)),
    ("cs", "Code Sent", Some(EventLevel::Debug)),
    ("cls", "Code/Link Sent", Some(EventLevel::Debug)),
    ("sv", "Success Verification Email", Some(EventLevel::Debug)),
    ("fv", "Failed Verification Email", Some(EventLevel::Debug)),
    ("scp", "Success Change Password", Some(EventLevel::Info)),
    ("fcp", "Failed Change Password", Some(EventLevel::Error)),
    ("sce", "Success Change Email", Some(EventLevel::Info)),
    ("fce", "Failed Change Email", Some(EventLevel::Error)),
    ("scu", "Success Change Username", Some(EventLevel::Info)),
    ("fcu", "Failed Change Username", Some(EventLevel::Error)),
    ("scpn", "Success Change Phone Number", Some(EventLevel::Info)),
    ("fcpn", "Failed Change Phone Number", Some(EventLevel::Error)),
    ("svr", "Success Verification Email Request", Some(EventLevel::Debug)),
    ("fvr", "Failed Verification Email Request", Some(EventLevel::Error)),
    ("scpr", "Success Change Password Request", Some(EventLevel::Debug)),
    ("fcpr", "Failed Change Password Request", Some(EventLevel::Error)),
    ("fn", "Failed Sending Notification", Some(EventLevel::Error)),
    ("sapi", "API Operation", None),
    ("fapi", "Failed API Operation", None),
    ("limit_wc", "Blocked Account", Some(EventLevel::Critical)),
    ("limit_ui", "Too Many Calls to /userinfo", Some(EventLevel::Critical)),
    ("api_limit", "Rate Limit On API", Some(EventLevel::Critical)),
    ("sdu", "Successful User Deletion", Some(EventLevel::Info)),
    ("fdu", "Failed User Deletion", Some(EventLevel::Error)),
];

static EVENT_TABLE: LazyLock<HashMap<&'static str, EventClass>> = LazyLock::new(|| {
    EVENT_TYPES
        .iter()
        .map(|&(code, name, level)| (code, EventClass { name, level }))
        .collect()
});

/// Looks up an event-type code
///
/// Returns `None` for codes outside the table.
///
/// # Example
///
/// ```
/// use logsync::core::classify::classify;
/// use logsync::domain::EventLevel;
///
/// let class = classify("fp").unwrap();
/// assert_eq!(class.name, "Failed Login (wrong password)");
/// assert_eq!(class.level, Some(EventLevel::Error));
/// assert!(classify("nope").is_none());
/// ```
pub fn classify(code: &str) -> Option<EventClass> {
    EVENT_TABLE.get(code).copied()
}

/// Number of codes the table knows
pub fn known_code_count() -> usize {
    EVENT_TABLE.len()
}
