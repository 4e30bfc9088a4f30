//! Shared Key request signing for Azure Storage
//!
//! Builds the canonical string-to-sign for the Blob service and signs it with
//! HMAC-SHA256 under the account key. The canonical form is:
//!
//! ```text
//! VERB
//! Content-Encoding
//! Content-Language
//! Content-Length      (empty when zero)
//! Content-MD5
//! Content-Type
//! Date
//! If-Modified-Since
//! If-Match
//! If-None-Match
//! If-Unmodified-Since
//! Range
//! x-ms-* headers, lowercased and sorted, one `name:value` per line
//! /account/path plus sorted `\nname:value` query parameters
//! ```

use crate::config::SecretString;
use crate::domain::{Result, SyncError};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretVec};
use sha2::Sha256;
use std::collections::BTreeMap;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

const STANDARD_HEADERS: [&str; 10] = [
    "content-encoding",
    "content-language",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "if-modified-since",
    "if-match",
    "if-none-match",
    "if-unmodified-since",
];

/// Signs requests for one storage account
pub struct SharedKeySigner {
    account: String,
    key: SecretVec<u8>,
}

impl std::fmt::Debug for SharedKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedKeySigner")
            .field("account", &self.account)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl SharedKeySigner {
    /// Creates a signer from the base64 account key
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is not valid base64.
    pub fn new(account: impl Into<String>, account_key: &SecretString) -> Result<Self> {
        let encoded: &str = account_key.expose_secret().as_ref();
        let key = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| {
                SyncError::Configuration(format!("STORAGE_ACCOUNT_KEY is not valid base64: {e}"))
            })?;

        Ok(Self {
            account: account.into(),
            key: SecretVec::new(key),
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Value for the `Authorization` header
    pub fn authorization(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        content_length: usize,
    ) -> Result<String> {
        let string_to_sign = string_to_sign(&self.account, method, url, headers, content_length);

        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret())
            .map_err(|e| SyncError::Configuration(format!("Invalid storage account key: {e}")))?;
        mac.update(string_to_sign.as_bytes());
        let signature = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        Ok(format!("SharedKey {}:{}", self.account, signature))
    }
}

/// Builds the canonical string-to-sign
pub fn string_to_sign(
    account: &str,
    method: &Method,
    url: &Url,
    headers: &HeaderMap,
    content_length: usize,
) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    let mut lines = vec![method.as_str().to_string()];
    for name in STANDARD_HEADERS {
        if name == "content-length" {
            lines.push(if content_length == 0 {
                String::new()
            } else {
                content_length.to_string()
            });
        } else {
            lines.push(header(name));
        }
    }
    lines.push(header("range"));

    let mut out = lines.join("\n");
    out.push('\n');
    out.push_str(&canonicalized_headers(headers));
    out.push_str(&canonicalized_resource(account, url));
    out
}

fn canonicalized_headers(headers: &HeaderMap) -> String {
    let mut ms_headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let name = name.as_str().to_ascii_lowercase();
        if name.starts_with("x-ms-") {
            let value = value.to_str().unwrap_or_default().trim().to_string();
            ms_headers.insert(name, value);
        }
    }

    ms_headers
        .into_iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect()
}

fn canonicalized_resource(account: &str, url: &Url) -> String {
    let mut resource = format!("/{account}{}", url.path());

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in url.query_pairs() {
        params
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into_owned());
    }

    for (name, mut values) in params {
        values.sort();
        resource.push_str(&format!("\n{name}:{}", values.join(",")));
    }
    resource
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use reqwest::header::HeaderValue;

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-ms-version", HeaderValue::from_static("2021-08-06"));
        headers.insert(
            "x-ms-date",
            HeaderValue::from_static("Mon, 16 Oct 2023 15:30:10 GMT"),
        );
        headers.insert("x-ms-blob-type", HeaderValue::from_static("BlockBlob"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_string_to_sign_for_blob_put() {
        let url = Url::parse("https://acct.blob.core.windows.net/logs/2023/10/16/15/abc.json")
            .unwrap();
        let actual = string_to_sign("acct", &Method::PUT, &url, &headers(), 42);

        let expected = "PUT\n\n\n42\n\napplication/json\n\n\n\n\n\n\n\
                        x-ms-blob-type:BlockBlob\n\
                        x-ms-date:Mon, 16 Oct 2023 15:30:10 GMT\n\
                        x-ms-version:2021-08-06\n\
                        /acct/logs/2023/10/16/15/abc.json";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_zero_content_length_is_blank_and_query_is_canonicalized() {
        let url =
            Url::parse("https://acct.blob.core.windows.net/logs?restype=container").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-ms-version", HeaderValue::from_static("2021-08-06"));
        let actual = string_to_sign("acct", &Method::PUT, &url, &headers, 0);

        assert!(actual.starts_with("PUT\n\n\n\n"));
        assert!(actual.ends_with("x-ms-version:2021-08-06\n/acct/logs\nrestype:container"));
    }

    #[test]
    fn test_authorization_header_format() {
        let key = secret_string(general_purpose::STANDARD.encode(b"account-key-bytes"));
        let signer = SharedKeySigner::new("acct", &key).unwrap();
        let url = Url::parse("https://acct.blob.core.windows.net/logs/a.json").unwrap();

        let auth = signer
            .authorization(&Method::PUT, &url, &headers(), 2)
            .unwrap();
        assert!(auth.starts_with("SharedKey acct:"));

        let again = signer
            .authorization(&Method::PUT, &url, &headers(), 2)
            .unwrap();
        assert_eq!(auth, again);

        let other = signer
            .authorization(&Method::PUT, &url, &headers(), 3)
            .unwrap();
        assert_ne!(auth, other);
    }

    #[test]
    fn test_invalid_key_is_configuration_error() {
        let err = SharedKeySigner::new("acct", &secret_string("not base64!!".to_string()))
            .unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(!format!("{:?}", SharedKeySigner::new("a", &secret_string(String::new())).unwrap())
            .contains("key-bytes"));
    }
}
