//! Management API client
//!
//! Implements [`LogSource`] over the identity provider's HTTP API: a
//! client-credentials token from `/oauth/token`, then log pages from
//! `/api/v2/logs?take=N&from=<id>`. Requests are not retried; a failed run resumes
//! from its checkpoint on the next invocation.

use super::models::{ApiErrorBody, TokenRequest, TokenResponse};
use super::source::LogSource;
use crate::config::{secret_string, SecretString, Settings};
use crate::domain::{CheckpointId, RawLogRecord, Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio::sync::RwLock;

/// HTTP client for the management API
pub struct Auth0Client {
    /// Scheme and host, without trailing slash
    base_url: String,

    client_id: String,

    client_secret: SecretString,

    http: Client,

    /// Set by a successful `authenticate`
    access_token: RwLock<Option<SecretString>>,
}

impl Auth0Client {
    /// Creates a client for `domain`
    ///
    /// `domain` is a bare tenant host (`tenant.eu.auth0.com`) or a full base URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(
        domain: &str,
        client_id: impl Into<String>,
        client_secret: SecretString,
        timeout: Duration,
    ) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url_for(domain),
            client_id: client_id.into(),
            client_secret,
            http,
            access_token: RwLock::new(None),
        })
    }

    /// Creates a client from validated settings
    pub fn from_settings(settings: &Settings, timeout: Duration) -> Result<Self> {
        Self::new(
            &settings.domain,
            settings.client_id.clone(),
            settings.client_secret.clone(),
            timeout,
        )
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Normalizes a tenant domain into a base URL
pub fn base_url_for(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}

/// Reads a failed response into a short description
async fn describe_failure(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.describe().map(str::to_string))
        .unwrap_or(body);

    if detail.is_empty() {
        format!("status {status}")
    } else {
        format!("status {status}: {detail}")
    }
}

#[async_trait]
impl LogSource for Auth0Client {
    async fn authenticate(&self) -> Result<()> {
        let url = format!("{}/oauth/token", self.base_url);
        let request = TokenRequest::client_credentials(
            &self.client_id,
            self.client_secret.expose_secret().as_ref(),
            &self.base_url,
        );

        tracing::debug!(url = %url, client_id = %self.client_id, "Requesting access token");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SyncError::Authentication(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let detail = describe_failure(response).await;
            return Err(SyncError::Authentication(format!(
                "Token request rejected with {detail}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Authentication(format!("Invalid token response: {e}")))?;

        tracing::info!(
            domain = %self.base_url,
            expires_in = token.expires_in,
            "Authenticated with management API"
        );

        *self.access_token.write().await = Some(secret_string(token.access_token));
        Ok(())
    }

    async fn fetch_log_page(
        &self,
        take: usize,
        from: Option<&CheckpointId>,
    ) -> Result<Vec<RawLogRecord>> {
        let token = self.access_token.read().await.clone().ok_or_else(|| {
            SyncError::UpstreamFetch("No access token; authenticate before fetching".to_string())
        })?;

        let url = format!("{}/api/v2/logs", self.base_url);
        let mut query = vec![("take", take.to_string())];
        if let Some(from) = from {
            query.push(("from", from.to_string()));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| SyncError::UpstreamFetch(format!("Log request failed: {e}")))?;

        if !response.status().is_success() {
            let detail = describe_failure(response).await;
            return Err(SyncError::UpstreamFetch(format!(
                "Log request failed with {detail}"
            )));
        }

        response
            .json::<Vec<RawLogRecord>>()
            .await
            .map_err(|e| SyncError::UpstreamFetch(format!("Invalid log page: {e}")))
    }

    fn source_name(&self) -> &str {
        &self.base_url
    }
}
