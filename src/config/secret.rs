//! Secret strings
//!
//! Credentials (the upstream client secret, the storage account key, the Azure
//! logging client secret and the cached bearer token) are held as [`SecretString`].
//! The value is zeroed on drop and shows as `[REDACTED]` in `Debug` output; reading
//! it takes an explicit `expose_secret()`.
//!
//! ```rust
//! use logsync::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("c3RvcmFnZS1rZXk=".to_string());
//! assert_eq!(key.expose_secret(), "c3RvcmFnZS1rZXk=");
//! assert!(!format!("{key:?}").contains("c3RvcmFnZS1rZXk="));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroize;

/// String payload of a [`SecretString`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

// Needed by `bearer_auth`; only reachable through `expose_secret()`.
impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string, e.g. a settings-bag value
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
