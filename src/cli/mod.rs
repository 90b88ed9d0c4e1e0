//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Pagex using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Pagex - static export orchestrator
#[derive(Parser, Debug)]
#[command(name = "pagex")]
#[command(version, about, long_about = None)]
#[command(author = "Pagex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "pagex.toml", env = "PAGEX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PAGEX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every path of a compiled build into the output directory
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show whether the last export completed
    Status(commands::status::StatusArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["pagex", "export"]);
        assert_eq!(cli.config, "pagex.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_export_overrides() {
        let cli = Cli::parse_from([
            "pagex",
            "export",
            "--out-dir",
            "dist",
            "--threads",
            "4",
            "--subfolders",
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.out_dir.as_deref(), Some("dist"));
        assert_eq!(args.threads, Some(4));
        assert!(args.subfolders);
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["pagex", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["pagex", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["pagex", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["pagex", "status", "--json"]);
        assert!(matches!(cli.command, Commands::Status(ref args) if args.json));
    }
}
