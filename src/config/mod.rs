//! Configuration management for Pagex.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Pagex uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PAGEX_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ExportConfig`] - Directories, pool size, output conventions, path map
//! - [`WorkerConfig`] - The renderer worker executable
//! - [`LoggingConfig`] - Optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! dir = "."
//! dist_dir = ".next"
//! out_dir = "out"
//! subfolders = true
//!
//! [export.path_map.entries."/p/hello"]
//! page = "/p/[slug]"
//! query = { slug = "hello" }
//!
//! [worker]
//! command = "node"
//! args = ["${PAGEX_RENDER_WORKER}"]
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ExportConfig, LoggingConfig, PagexConfig, PathMapConfig, WorkerConfig,
};
