//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// logsync - incremental Auth0 log export to Azure Blob Storage
#[derive(Parser, Debug)]
#[command(name = "logsync")]
#[command(version, about, long_about = None)]
#[command(author = "Logsync Contributors")]
pub struct Cli {
    /// Path to configuration file (optional; defaults apply when absent)
    #[arg(short, long, default_value = "logsync.toml", env = "LOGSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LOGSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one export from the last checkpoint
    Run(commands::run::RunArgs),

    /// Validate the configuration file and settings
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show recent runs and the next resume checkpoint
    Status(commands::status::StatusArgs),
}
