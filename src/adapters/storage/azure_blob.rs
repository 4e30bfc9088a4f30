//! Azure Blob Storage over the REST API
//!
//! Containers are created with `PUT ?restype=container` and each object is written
//! as a JSON block blob with a single `PUT`, which replaces any existing blob.
//! Requests are authorized with Shared Key signatures.

use super::signing::SharedKeySigner;
use super::traits::ObjectStore;
use crate::config::{SecretString, Settings, StorageConfig};
use crate::domain::{Result, SyncError};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Service version sent with every request
pub const DEFAULT_API_VERSION: &str = "2021-08-06";

const X_MS_DATE: &str = "x-ms-date";
const X_MS_VERSION: &str = "x-ms-version";
const X_MS_BLOB_TYPE: &str = "x-ms-blob-type";
const X_MS_ERROR_CODE: &str = "x-ms-error-code";
const CONTAINER_ALREADY_EXISTS: &str = "ContainerAlreadyExists";

/// Blob service client for one storage account
#[derive(Debug)]
pub struct AzureBlobStore {
    endpoint: Url,
    signer: SharedKeySigner,
    api_version: String,
    http: Client,
}

impl AzureBlobStore {
    /// Creates a store for `account`
    ///
    /// `endpoint` overrides the public `https://<account>.blob.core.windows.net`
    /// endpoint, e.g. for a local emulator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is not base64, the endpoint is not a
    /// valid URL, or the HTTP client cannot be built.
    pub fn new(
        account: &str,
        account_key: &SecretString,
        endpoint: Option<&str>,
        api_version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = match endpoint {
            Some(endpoint) => endpoint.to_string(),
            None => format!("https://{account}.blob.core.windows.net"),
        };
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            SyncError::Configuration(format!("Invalid storage endpoint '{endpoint}': {e}"))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(SyncError::Configuration(format!(
                "Invalid storage endpoint '{endpoint}'"
            )));
        }

        let http = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            signer: SharedKeySigner::new(account, account_key)?,
            api_version: api_version.into(),
            http,
        })
    }

    /// Creates a store from validated settings and the `[storage]` section
    pub fn from_settings(
        settings: &Settings,
        storage: &StorageConfig,
        timeout: Duration,
    ) -> Result<Self> {
        Self::new(
            &settings.storage_account_name,
            &settings.storage_account_key,
            storage.endpoint.as_deref(),
            storage.api_version.clone(),
            timeout,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// URL of `container`, or of `key` within it
    ///
    /// Each `/`-separated part of the key becomes one percent-encoded path segment.
    pub fn object_url(&self, container: &str, key: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(container);
            if let Some(key) = key {
                segments.extend(key.split('/'));
            }
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        mut headers: HeaderMap,
        body: Vec<u8>,
    ) -> std::result::Result<Response, String> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        headers.insert(
            HeaderName::from_static(X_MS_DATE),
            HeaderValue::from_str(&date).map_err(|e| e.to_string())?,
        );
        headers.insert(
            HeaderName::from_static(X_MS_VERSION),
            HeaderValue::from_str(&self.api_version).map_err(|e| e.to_string())?,
        );

        let authorization = self
            .signer
            .authorization(&method, &url, &headers, body.len())
            .map_err(|e| e.to_string())?;
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&authorization).map_err(|e| e.to_string())?,
        );

        self.http
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| e.to_string())
    }
}

fn error_code(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(X_MS_ERROR_CODE)
        .and_then(|v| v.to_str().ok())
}

fn failure_detail(response: &Response) -> String {
    let status = response.status();
    match error_code(response) {
        Some(code) => format!("status {status} ({code})"),
        None => format!("status {status}"),
    }
}

#[async_trait]
impl ObjectStore for AzureBlobStore {
    async fn ensure_container(&self, name: &str) -> Result<()> {
        let mut url = self.object_url(name, None);
        url.query_pairs_mut().append_pair("restype", "container");

        let response = self
            .send(Method::PUT, url, HeaderMap::new(), Vec::new())
            .await
            .map_err(|e| SyncError::StorageInit(format!("Container request failed: {e}")))?;

        match response.status() {
            StatusCode::CREATED => {
                tracing::info!(container = %name, "Created storage container");
                Ok(())
            }
            // 409 is also returned while a container of the same name is being deleted
            StatusCode::CONFLICT if error_code(&response) == Some(CONTAINER_ALREADY_EXISTS) => {
                tracing::debug!(container = %name, "Storage container already exists");
                Ok(())
            }
            _ => {
                let detail = failure_detail(&response);
                Err(SyncError::StorageInit(format!(
                    "Creating container '{name}' failed with {detail}"
                )))
            }
        }
    }

    async fn put_object(&self, container: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        let url = self.object_url(container, Some(key));

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(X_MS_BLOB_TYPE),
            HeaderValue::from_static("BlockBlob"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .send(Method::PUT, url, headers, bytes)
            .await
            .map_err(|e| SyncError::export_write(key, e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let detail = failure_detail(&response);
            Err(SyncError::export_write(key, detail))
        }
    }

    fn store_name(&self) -> &str {
        self.signer.account()
    }
}
