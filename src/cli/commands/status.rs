//! Status command implementation
//!
//! This module implements the `status` command, which reports whether the
//! last export of the configured build completed.

use crate::config::load_config;
use crate::core::state::StatusPersister;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Print the raw status record as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking export status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(2);
            }
        };

        let persister = StatusPersister::new(config.export.dist_path());
        let status = match persister.load().await {
            Ok(s) => s,
            Err(e) => {
                println!("Failed to read export status");
                println!("   Error: {}", e);
                return Ok(5);
            }
        };

        let Some(status) = status else {
            println!("Export status: never run");
            println!("No status record at {}", persister.path().display());
            return Ok(0);
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
        } else {
            let state = if status.success { "completed" } else { "incomplete" };
            println!("Export status: {}", state);
            println!("  Output Directory: {}", status.out_directory);
            println!("  Record Version: {}", status.version);
        }

        Ok(if status.is_incomplete() { 1 } else { 0 })
    }
}
