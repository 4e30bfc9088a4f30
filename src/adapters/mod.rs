//! External system integrations for logsync.
//!
//! Each collaborator of a sync run sits behind a trait so the pipeline can be driven
//! by in-memory fakes in tests:
//!
//! - [`auth0`] - identity provider log source ([`auth0::LogSource`])
//! - [`storage`] - object storage sink ([`storage::ObjectStore`])
//!
//! # Example
//!
//! ```rust,no_run
//! use logsync::adapters::auth0::{Auth0Client, LogSource};
//! use logsync::adapters::storage::{AzureBlobStore, ObjectStore, DEFAULT_API_VERSION};
//! use logsync::config::secret_string;
//! use std::time::Duration;
//!
//! # async fn example() -> logsync::domain::Result<()> {
//! let source = Auth0Client::new(
//!     "tenant.eu.auth0.com",
//!     "client-id",
//!     secret_string("client-secret".to_string()),
//!     Duration::from_secs(30),
//! )?;
//! source.authenticate().await?;
//!
//! let store = AzureBlobStore::new(
//!     "mystorageaccount",
//!     &secret_string("c2VjcmV0LWtleQ==".to_string()),
//!     None,
//!     DEFAULT_API_VERSION,
//!     Duration::from_secs(30),
//! )?;
//! store.ensure_container("auth0-logs").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth0;
pub mod storage;
