//! Invocation settings
//!
//! A run is parameterized by a flat string map. [`SettingsBag`] is that map as
//! supplied; [`Settings`] is the validated form the adapters are built from.
//! Validation is pure, so a bag with gaps is rejected before any external call.

use super::secret::{secret_string, SecretString};
use crate::domain::{Result, SyncError};
use std::collections::BTreeMap;
use std::fmt;

/// Keys every run needs, in the order they are reported when missing
pub const REQUIRED_SETTINGS: [&str; 6] = [
    "DOMAIN",
    "CLIENT_ID",
    "CLIENT_SECRET",
    "STORAGE_ACCOUNT_NAME",
    "STORAGE_ACCOUNT_KEY",
    "STORAGE_CONTAINER_NAME",
];

const SECRET_SETTINGS: [&str; 2] = ["CLIENT_SECRET", "STORAGE_ACCOUNT_KEY"];

/// Raw settings as supplied by the caller
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SettingsBag {
    values: BTreeMap<String, String>,
}

impl SettingsBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag from the `[settings]` table, then lets process environment
    /// variables named after the required keys override it
    pub fn from_config_and_env(file_settings: &BTreeMap<String, String>) -> Self {
        let mut bag = Self::from(file_settings.clone());
        bag.merge_from_env();
        bag
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Copies set environment variables for every required key into the bag
    pub fn merge_from_env(&mut self) {
        for key in REQUIRED_SETTINGS {
            if let Ok(value) = std::env::var(key) {
                self.values.insert(key.to_string(), value);
            }
        }
    }

    /// Required keys that are absent or blank, in canonical order
    pub fn missing(&self) -> Vec<String> {
        REQUIRED_SETTINGS
            .iter()
            .filter(|key| self.present(key).is_none())
            .map(|key| key.to_string())
            .collect()
    }

    fn present(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Key/value pairs with secret values masked
    pub fn redacted(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(key, value)| {
                let shown = if SECRET_SETTINGS.contains(&key.as_str()) {
                    "[REDACTED]".to_string()
                } else {
                    value.clone()
                };
                (key.clone(), shown)
            })
            .collect()
    }
}

impl From<BTreeMap<String, String>> for SettingsBag {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl fmt::Debug for SettingsBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.redacted()).finish()
    }
}

/// Validated settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Identity provider tenant domain, e.g. `example.eu.auth0.com`
    pub domain: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub storage_account_name: String,
    /// Base64 storage account key
    pub storage_account_key: SecretString,
    pub storage_container_name: String,
}

impl Settings {
    /// Validates a bag
    ///
    /// Values are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingSettings`] listing every absent or blank
    /// required key.
    pub fn from_bag(bag: &SettingsBag) -> Result<Self> {
        let missing = bag.missing();
        if !missing.is_empty() {
            return Err(SyncError::MissingSettings(missing));
        }

        let value = |key: &str| bag.present(key).unwrap_or_default().to_string();

        Ok(Self {
            domain: value("DOMAIN"),
            client_id: value("CLIENT_ID"),
            client_secret: secret_string(value("CLIENT_SECRET")),
            storage_account_name: value("STORAGE_ACCOUNT_NAME"),
            storage_account_key: secret_string(value("STORAGE_ACCOUNT_KEY")),
            storage_container_name: value("STORAGE_CONTAINER_NAME"),
        })
    }
}
