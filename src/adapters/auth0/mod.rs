//! Identity provider log source
//!
//! - [`LogSource`]: the collaborator interface the pipeline depends on
//! - [`Auth0Client`]: HTTP implementation against the management API

pub mod client;
pub mod models;
pub mod source;

pub use client::{base_url_for, Auth0Client};
pub use source::{LogSource, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
