// logsync - Auth0 log export to Azure Blob Storage
// Copyright (c) 2025 Logsync Contributors
// Licensed under the MIT License

//! # logsync - Auth0 log export to Azure Blob Storage
//!
//! logsync is a batch job that copies an Auth0 tenant's audit log into Azure Blob
//! Storage, one JSON object per log record, resuming each run where the last
//! successful one stopped.
//!
//! ## Overview
//!
//! One run:
//! - **Resolves** the resume checkpoint from prior run history
//! - **Fetches** every log page after the checkpoint from the management API
//! - **Enriches** each record with a readable event name, a severity level and the
//!   operating system and device parsed from its client string
//! - **Writes** each record to `YYYY/MM/DD/HH/<log id>.json` with bounded concurrency
//! - **Reports** the new checkpoint, or the old one when anything failed
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (classify, enrich, state, paginate, export)
//! - [`adapters`] - External integrations (Auth0 management API, Azure Blob Storage)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Settings and configuration file
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logsync::config::{load_config_or_default, SettingsBag};
//! use logsync::core::export::execute;
//! use logsync::core::state::HistoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("logsync.toml")?;
//!     let bag = SettingsBag::from_config_and_env(&config.settings);
//!
//!     let store = HistoryStore::new(&config.state.history_path);
//!     let history = store.load()?;
//!
//!     let report = execute(&bag, Some(history.as_slice()), &config).await;
//!     store.append(&report.to_history_entry("manual")?)?;
//!
//!     println!("{}", serde_json::to_string(&report.outcome)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Resuming
//!
//! The checkpoint is the id of the last record exported. A failed run reports the
//! checkpoint it started from, so the next run repeats the whole window; writes are
//! overwrites, which makes the repetition harmless.
//!
//! ```rust
//! use logsync::core::state::resolve_checkpoint;
//! use logsync::domain::RunHistoryEntry;
//!
//! let history = vec![
//!     RunHistoryEntry::new(200, r#"{"checkpointId":"A"}"#),
//!     RunHistoryEntry::new(500, r#"{"error":{"kind":"UpstreamFetchError"},"checkpointId":"A"}"#),
//! ];
//! assert_eq!(resolve_checkpoint(Some(history.as_slice())).unwrap().as_str(), "A");
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::SyncError`]. A run never returns an error:
//! every failure becomes a [`domain::RunOutcome::Failure`] naming the stage.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
