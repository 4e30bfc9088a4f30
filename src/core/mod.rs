//! Core business logic for logsync.
//!
//! # Modules
//!
//! - [`classify`] - Event-type code to display name and severity
//! - [`enrich`] - Raw record to enriched record, including client string parsing
//! - [`state`] - Resume checkpoint resolution and local run history
//! - [`paginate`] - Fetch-until-empty over the upstream log
//! - [`export`] - Storage keys, the export sink and the run coordinator
//!
//! # Run Workflow
//!
//! 1. **Validate**: Check the settings bag before any external call
//! 2. **Resolve**: Pick the resume checkpoint from prior run history
//! 3. **Authenticate**: Acquire an upstream access token
//! 4. **Prepare storage**: Create the container if needed
//! 5. **Paginate**: Fetch pages from the checkpoint until an empty page
//! 6. **Enrich**: Decode event types and parse client strings
//! 7. **Export**: Write each record to `YYYY/MM/DD/HH/<id>.json`
//!
//! # Example
//!
//! ```rust,no_run
//! use logsync::config::{load_config_or_default, SettingsBag};
//! use logsync::core::export::execute;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("logsync.toml")?;
//! let bag = SettingsBag::from_config_and_env(&config.settings);
//!
//! let report = execute(&bag, None, &config).await;
//! println!("{}", serde_json::to_string(&report.outcome)?);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod enrich;
pub mod export;
pub mod paginate;
pub mod state;
