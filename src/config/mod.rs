//! Configuration management for logsync.
//!
//! Two inputs parameterize a run:
//!
//! - the **settings bag** ([`SettingsBag`]): the six required string settings,
//!   validated into [`Settings`] at the start of every run
//! - the optional **configuration file** ([`SyncConfig`], `logsync.toml`): job
//!   tunables, storage endpoint, local history and logging
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use logsync::config::{load_config_or_default, Settings, SettingsBag};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("logsync.toml")?;
//! let bag = SettingsBag::from_config_and_env(&config.settings);
//!
//! let settings = Settings::from_bag(&bag)?;
//! println!("Exporting to container {}", settings.storage_container_name);
//! println!("Page size: {}", config.job.page_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [job]
//! page_size = 200
//! max_concurrency = 5
//!
//! [state]
//! history_path = ".logsync/history.jsonl"
//!
//! [settings]
//! DOMAIN = "example.eu.auth0.com"
//! CLIENT_ID = "${AUTH0_CLIENT_ID}"
//! CLIENT_SECRET = "${AUTH0_CLIENT_SECRET}"
//! STORAGE_ACCOUNT_NAME = "examplelogs"
//! STORAGE_ACCOUNT_KEY = "${STORAGE_ACCOUNT_KEY}"
//! STORAGE_CONTAINER_NAME = "auth0-logs"
//! ```
//!
//! # Environment Variables
//!
//! `${VAR_NAME}` placeholders are substituted when the file is read. Variables
//! named after a required setting (e.g. `STORAGE_ACCOUNT_KEY`) override the
//! `[settings]` table, and `LOGSYNC_<SECTION>_<KEY>` variables override job,
//! application and state options.

pub mod loader;
pub mod schema;
pub mod secret;
pub mod settings;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, JobConfig, LoggingConfig, StateConfig, StorageConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
pub use settings::{Settings, SettingsBag, REQUIRED_SETTINGS};
