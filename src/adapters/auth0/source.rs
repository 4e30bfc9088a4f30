//! Upstream log source abstraction
//!
//! The pipeline only ever talks to the identity provider through [`LogSource`], so
//! tests can substitute scripted in-memory sources.

use crate::domain::{CheckpointId, RawLogRecord, Result};
use async_trait::async_trait;

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Largest page the management API will return
pub const MAX_PAGE_SIZE: usize = 1000;

/// A paged, cursor-addressable log
///
/// # Example
///
/// ```no_run
/// use logsync::adapters::auth0::LogSource;
/// use logsync::domain::CheckpointId;
///
/// # async fn example(source: &dyn LogSource) -> logsync::domain::Result<()> {
/// source.authenticate().await?;
///
/// let from = CheckpointId::new("90020231016").unwrap();
/// let page = source.fetch_log_page(200, Some(&from)).await?;
/// println!("{} records after {}", page.len(), from);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Acquires credentials for subsequent page requests
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Authentication`](crate::domain::SyncError::Authentication)
    /// if the provider rejects the client.
    async fn authenticate(&self) -> Result<()>;

    /// Fetches up to `take` records strictly after `from`
    ///
    /// `None` starts at the beginning of the log. An empty page means the log is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UpstreamFetch`](crate::domain::SyncError::UpstreamFetch)
    /// on any transport, status or decoding failure.
    async fn fetch_log_page(
        &self,
        take: usize,
        from: Option<&CheckpointId>,
    ) -> Result<Vec<RawLogRecord>>;

    /// Name used in logs
    fn source_name(&self) -> &str;
}
