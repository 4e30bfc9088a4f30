//! Export of enriched records to object storage
//!
//! - [`key`]: time-partitioned storage keys
//! - [`sink`]: bounded-concurrency writes with abort-on-first-error
//! - [`coordinator`]: the stage machine of a whole run

pub mod coordinator;
pub mod key;
pub mod sink;

pub use coordinator::{execute, execute_with, Collaborators, RunReport, SyncJob, SyncOptions};
pub use key::storage_key;
pub use sink::{ExportSink, WriteTask, DEFAULT_MAX_CONCURRENCY};
