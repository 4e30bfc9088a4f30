//! Validate config command implementation
//!
//! Loads the configuration file and checks the settings bag it produces, the same
//! way a run would, without any external call.

use super::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::{load_config_or_default, Settings, SettingsBag};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let bag = SettingsBag::from_config_and_env(&config.settings);
        let settings = match Settings::from_bag(&bag) {
            Ok(s) => {
                println!("✅ Settings are complete");
                s
            }
            Err(e) => {
                println!("❌ Settings validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Domain: {}", settings.domain);
        println!("  Client ID: {}", settings.client_id);
        println!("  Storage Account: {}", settings.storage_account_name);
        println!("  Container: {}", settings.storage_container_name);
        println!(
            "  Storage Endpoint: {}",
            config.storage.endpoint.as_deref().unwrap_or("(account default)")
        );
        println!("  Page Size: {}", config.job.page_size);
        println!("  Max Concurrency: {}", config.job.max_concurrency);
        println!("  Dry Run: {}", config.job.dry_run);
        println!("  History File: {}", config.state.history_path);
        println!("  Azure Logging: {}", config.logging.azure_enabled);
        println!();
        println!("Settings:");
        for (key, value) in bag.redacted() {
            println!("  {key} = {value}");
        }
        println!();

        Ok(EXIT_SUCCESS)
    }
}
