//! Status command implementation
//!
//! Shows the most recent runs from the local history file and the checkpoint the
//! next run would resume from.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use crate::config::load_config_or_default;
use crate::core::state::{resolve_checkpoint, HistoryStore, CHECKPOINT_FIELD};
use crate::domain::RunHistoryEntry;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Number of recent runs to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking sync status");

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let store = HistoryStore::new(&config.state.history_path);
        let entries = match store.load() {
            Ok(entries) => entries,
            Err(e) => {
                println!("❌ Failed to read run history");
                println!("   Error: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        println!("📊 Sync Status ({})", store.path().display());
        println!();

        let resume = resolve_checkpoint(Some(entries.as_slice()));
        println!(
            "Next run resumes from: {}",
            resume.as_ref().map(|c| c.as_str()).unwrap_or("Start")
        );
        println!();

        if entries.is_empty() {
            println!("No run history found.");
            println!("Run 'logsync run' to start exporting logs.");
            return Ok(EXIT_SUCCESS);
        }

        println!(
            "{:<27} {:<11} {:<12} {:<10} {:<30}",
            "Started", "Type", "Status", "Records", "Checkpoint"
        );
        println!("{}", "-".repeat(92));

        for entry in entries.iter().rev().take(self.limit) {
            println!("{}", format_row(entry));
        }

        println!();
        Ok(EXIT_SUCCESS)
    }
}

fn format_row(entry: &RunHistoryEntry) -> String {
    let payload = entry.payload();
    let field = |name: &str| {
        payload
            .as_ref()
            .and_then(|p| p.get(name))
            .and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| "-".to_string())
    };

    let status = if entry.is_success() {
        "✅ Success"
    } else {
        "❌ Failed"
    };

    format!(
        "{:<27} {:<11} {:<12} {:<10} {:<30}",
        entry.started_at.as_deref().unwrap_or("-"),
        entry.run_type.as_deref().unwrap_or("-"),
        status,
        field("totalLogsProcessed"),
        field(CHECKPOINT_FIELD)
    )
}
