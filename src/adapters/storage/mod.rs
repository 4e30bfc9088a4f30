//! Object storage for exported records
//!
//! - [`ObjectStore`]: the collaborator interface the export sink depends on
//! - [`AzureBlobStore`]: Azure Blob Storage REST implementation with Shared Key auth

pub mod azure_blob;
pub mod signing;
pub mod traits;

pub use azure_blob::{AzureBlobStore, DEFAULT_API_VERSION};
pub use signing::SharedKeySigner;
pub use traits::ObjectStore;
