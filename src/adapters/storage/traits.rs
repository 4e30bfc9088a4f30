//! Object storage abstraction
//!
//! The export sink writes through [`ObjectStore`] only. Implementations must give
//! `put_object` unconditional overwrite semantics: writing the same key twice leaves
//! the second payload in place and is not an error.

use crate::domain::Result;
use async_trait::async_trait;

/// Container-scoped key/value object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates the container if it does not exist
    ///
    /// An existing container counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::StorageInit`](crate::domain::SyncError::StorageInit) if the
    /// container cannot be created or reached.
    async fn ensure_container(&self, name: &str) -> Result<()>;

    /// Writes `bytes` under `key`, replacing any previous object
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ExportWrite`](crate::domain::SyncError::ExportWrite) naming
    /// the key that failed.
    async fn put_object(&self, container: &str, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Name used in logs
    fn store_name(&self) -> &str;
}
