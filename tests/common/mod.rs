//! Shared fakes for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use logsync::adapters::auth0::LogSource;
use logsync::adapters::storage::ObjectStore;
use logsync::config::SettingsBag;
use logsync::domain::{CheckpointId, RawLogRecord, Result, SyncError};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A record with the given id, event code and client string
pub fn raw_record(id: &str, code: &str, user_agent: Option<&str>) -> RawLogRecord {
    let mut value = json!({
        "_id": id,
        "type": code,
        "date": "2023-10-16T15:30:10.123Z",
        "client_id": "abc123",
        "ip": "203.0.113.7"
    });
    if let Some(ua) = user_agent {
        value["user_agent"] = json!(ua);
    }
    serde_json::from_value(value).expect("valid record")
}

/// Zero-padded ids sort the same way as numbers
pub fn log_id(n: usize) -> String {
    format!("900{n:08}")
}

/// A settings bag with every required key
pub fn complete_settings() -> SettingsBag {
    SettingsBag::new()
        .with("DOMAIN", "tenant.eu.auth0.com")
        .with("CLIENT_ID", "client-id")
        .with("CLIENT_SECRET", "client-secret")
        .with("STORAGE_ACCOUNT_NAME", "devstoreaccount1")
        .with("STORAGE_ACCOUNT_KEY", "c2VjcmV0LWtleQ==")
        .with("STORAGE_CONTAINER_NAME", "auth0-logs")
}

/// Replays canned pages in order, then empty pages
#[derive(Default)]
pub struct ScriptedSource {
    pages: Mutex<VecDeque<Result<Vec<RawLogRecord>>>>,
    auth_error: Option<String>,
    requests: Mutex<Vec<(usize, Option<String>)>>,
    auth_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Result<Vec<RawLogRecord>>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    pub fn failing_auth(message: &str) -> Self {
        Self {
            auth_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// `(take, from)` of every page request, in order
    pub fn requests(&self) -> Vec<(usize, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of upstream calls of any kind
    pub fn calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst) + self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LogSource for ScriptedSource {
    async fn authenticate(&self) -> Result<()> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        match &self.auth_error {
            Some(message) => Err(SyncError::Authentication(message.clone())),
            None => Ok(()),
        }
    }

    async fn fetch_log_page(
        &self,
        take: usize,
        from: Option<&CheckpointId>,
    ) -> Result<Vec<RawLogRecord>> {
        self.requests
            .lock()
            .unwrap()
            .push((take, from.map(|c| c.to_string())));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn source_name(&self) -> &str {
        "scripted"
    }
}

/// An append-only log served the way the management API serves it: records with
/// an id strictly greater than `from`, oldest first, at most `take`
pub struct OrderedLog {
    records: Mutex<Vec<RawLogRecord>>,
}

impl OrderedLog {
    pub fn with_records(count: usize) -> Self {
        let log = Self {
            records: Mutex::new(Vec::new()),
        };
        log.append(count);
        log
    }

    /// Appends `count` new records after the existing ones
    pub fn append(&self, count: usize) {
        let mut records = self.records.lock().unwrap();
        let start = records.len();
        for n in start..start + count {
            records.push(raw_record(&log_id(n), "s", None));
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl LogSource for OrderedLog {
    async fn authenticate(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch_log_page(
        &self,
        take: usize,
        from: Option<&CheckpointId>,
    ) -> Result<Vec<RawLogRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| from.map_or(true, |f| r.id.as_str() > f.as_str()))
            .take(take)
            .cloned()
            .collect())
    }

    fn source_name(&self) -> &str {
        "ordered"
    }
}

/// In-memory object store with failure injection
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    containers: Mutex<Vec<String>>,
    writes: AtomicUsize,
    /// 1-based write attempt that fails
    fail_on_write: Option<usize>,
    container_error: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_write(n: usize) -> Self {
        Self {
            fail_on_write: Some(n),
            ..Self::default()
        }
    }

    pub fn failing_container(message: &str) -> Self {
        Self {
            container_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn object(&self, key: &str) -> Option<serde_json::Value> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|bytes| serde_json::from_slice(bytes).expect("stored JSON"))
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Write attempts, including the failed one
    pub fn write_attempts(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn containers(&self) -> Vec<String> {
        self.containers.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn ensure_container(&self, name: &str) -> Result<()> {
        if let Some(message) = &self.container_error {
            return Err(SyncError::StorageInit(message.clone()));
        }
        self.containers.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn put_object(&self, _container: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        let attempt = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_write == Some(attempt) {
            return Err(SyncError::export_write(key, "injected write failure"));
        }
        tokio::task::yield_now().await;
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    fn store_name(&self) -> &str {
        "memory"
    }
}
