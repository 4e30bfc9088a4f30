//! Best-effort client string parsing
//!
//! Recognizes the common operating systems and device families found in browser
//! and mobile SDK user agents. Anything unrecognized falls back to `Other` with an
//! unknown version; parsing never fails.

use regex::Regex;
use std::sync::LazyLock;

/// Family reported for anything the parser does not recognize
pub const UNKNOWN_FAMILY: &str = "Other";

/// Version reported when no version could be extracted
pub const UNKNOWN_VERSION: &str = "0.0.0";

static IOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:CPU (?:iPhone )?OS|iPhone OS) (\d+)(?:_(\d+))?(?:_(\d+))?")
        .expect("valid iOS regex")
});
static ANDROID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Android[ /]?(\d+)?(?:\.(\d+))?(?:\.(\d+))?").expect("valid Android regex")
});
static ANDROID_MODEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r";\s*([^;()]+?)\s+Build/").expect("valid Android model regex")
});
static WINDOWS_NT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Windows NT (\d+)\.(\d+)").expect("valid Windows regex"));
static MAC_OS_X: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Mac OS X(?: (\d+)(?:[_.](\d+))?(?:[_.](\d+))?)?").expect("valid macOS regex")
});
static CHROME_OS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"CrOS \S+ (\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("valid Chrome OS regex")
});

/// A parsed family with an optional dotted version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    family: String,
    version: Vec<String>,
}

impl Component {
    fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            version: Vec::new(),
        }
    }

    fn unknown() -> Self {
        Self::new(UNKNOWN_FAMILY)
    }

    fn with_version<'a>(mut self, parts: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        self.version = parts
            .into_iter()
            .map_while(|p| p.map(str::to_string))
            .collect();
        self
    }

    fn from_captures(family: &str, caps: &regex::Captures<'_>) -> Self {
        Self::new(family).with_version((1..=3).map(|i| caps.get(i).map(|m| m.as_str())))
    }

    /// Family name
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Dotted version, or `0.0.0` when none was found
    pub fn version(&self) -> String {
        if self.version.is_empty() {
            UNKNOWN_VERSION.to_string()
        } else {
            self.version.join(".")
        }
    }

    /// Family followed by the version when one is known
    pub fn display(&self) -> String {
        if self.version.is_empty() {
            self.family.clone()
        } else {
            format!("{} {}", self.family, self.version.join("."))
        }
    }
}

/// Operating system and device extracted from a client string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Operating system
    pub os: Component,
    /// Hardware device
    pub device: Component,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            os: Component::unknown(),
            device: Component::unknown(),
        }
    }
}

/// Parses a client identification string
///
/// # Examples
///
/// ```
/// use logsync::core::enrich::user_agent::parse_client;
///
/// let info = parse_client(Some(
///     "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36",
/// ));
/// assert_eq!(info.os.display(), "Windows 10");
/// assert_eq!(info.device.display(), "Other");
/// ```
pub fn parse_client(user_agent: Option<&str>) -> ClientInfo {
    let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
        return ClientInfo::default();
    };

    ClientInfo {
        os: parse_os(ua),
        device: parse_device(ua),
    }
}

fn parse_os(ua: &str) -> Component {
    // iOS agents also contain "like Mac OS X", so they go first
    if let Some(caps) = IOS.captures(ua) {
        return Component::from_captures("iOS", &caps);
    }
    if let Some(caps) = ANDROID.captures(ua) {
        return Component::from_captures("Android", &caps);
    }
    if let Some(caps) = WINDOWS_NT.captures(ua) {
        return windows_release(&caps[1], &caps[2]);
    }
    if let Some(caps) = CHROME_OS.captures(ua) {
        return Component::from_captures("Chrome OS", &caps);
    }
    if let Some(caps) = MAC_OS_X.captures(ua) {
        return Component::from_captures("Mac OS X", &caps);
    }
    if ua.contains("Windows") {
        return Component::new("Windows");
    }
    if ua.contains("Ubuntu") {
        return Component::new("Ubuntu");
    }
    if ua.contains("Linux") {
        return Component::new("Linux");
    }
    Component::unknown()
}

/// Maps an NT kernel version onto the marketing release name
fn windows_release(major: &str, minor: &str) -> Component {
    let release = match (major, minor) {
        ("10", _) => "10",
        ("6", "3") => "8.1",
        ("6", "2") => "8",
        ("6", "1") => "7",
        ("6", "0") => "Vista",
        ("5", "1") | ("5", "2") => "XP",
        _ => return Component::new("Windows").with_version([Some(major), Some(minor)]),
    };
    Component::new("Windows").with_version([Some(release)])
}

fn parse_device(ua: &str) -> Component {
    for family in ["iPad", "iPod", "iPhone"] {
        if ua.contains(family) {
            return Component::new(family);
        }
    }
    if ua.contains("Android") {
        return match ANDROID_MODEL.captures(ua) {
            Some(caps) => Component::new(caps[1].trim()),
            None => Component::new("Generic Smartphone"),
        };
    }
    if ua.contains("Macintosh") {
        return Component::new("Mac");
    }
    Component::unknown()
}
