//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Pagex configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config already runs validate()
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let export = &config.export;
        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Project Directory: {}", export.project_dir().display());
        println!("  Build Directory: {}", export.dist_path().display());
        println!("  Output Directory: {}", export.out_path().display());
        println!("  Worker Threads: {}", export.effective_threads());
        println!("  Subfolders: {}", export.subfolders);
        println!("  Build Export: {}", export.build_export);
        println!("  Serverless: {}", export.serverless);
        if let Some(pages) = &export.pages {
            println!("  Pages Override: {} route(s)", pages.len());
        }
        if let Some(path_map) = &export.path_map {
            println!(
                "  Path Map: {} entr(ies), merge defaults: {}",
                path_map.entries.len(),
                path_map.merge_defaults
            );
        }
        println!(
            "  Worker: {} {}",
            config.worker.command,
            config.worker.args.join(" ")
        );
        println!();
        Ok(0)
    }
}
