//! Configuration schema types
//!
//! This module defines the configuration structure for Pagex.

use crate::domain::path_map::{ExportPathMap, PathMapEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main Pagex configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagexConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Renderer worker process
    pub worker: WorkerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PagexConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.worker.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Configured path-map transform
///
/// When present, `entries` become the export plan. With `merge_defaults`
/// the manifest-derived defaults are kept and `entries` overwrite them by
/// key; without it the defaults are discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathMapConfig {
    /// Keep the default path map underneath the configured entries
    #[serde(default = "default_true")]
    pub merge_defaults: bool,

    /// Output path → `{ page, query }`
    #[serde(default)]
    pub entries: BTreeMap<String, PathMapEntry>,
}

impl PathMapConfig {
    /// Configured entries as a path map
    pub fn to_path_map(&self) -> ExportPathMap {
        self.entries
            .iter()
            .map(|(path, entry)| (path.clone(), entry.clone()))
            .collect()
    }

    fn validate(&self) -> Result<(), String> {
        for (path, entry) in &self.entries {
            if !path.starts_with('/') {
                return Err(format!(
                    "export.path_map entry '{path}' must start with '/'"
                ));
            }
            if !entry.page.starts_with('/') {
                return Err(format!(
                    "export.path_map entry '{}' maps to page '{}' which must start with '/'",
                    path, entry.page
                ));
            }
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Project root directory
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Build output directory, relative to `dir`
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    /// Export output directory, relative to `dir`
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Worker pool size (default: available parallelism minus one)
    #[serde(default)]
    pub threads: Option<usize>,

    /// Write `<route>/index.html` instead of `<route>.html`
    #[serde(default)]
    pub subfolders: bool,

    /// Export runs as part of the build and produces the prerender manifest
    #[serde(default)]
    pub build_export: bool,

    /// Build was produced in serverless mode
    #[serde(default)]
    pub serverless: bool,

    /// Explicit route list; replaces the manifest's route names
    #[serde(default)]
    pub pages: Option<Vec<String>>,

    /// Prefix prepended to asset URLs
    #[serde(default)]
    pub asset_prefix: String,

    /// Canonical base for AMP pages
    #[serde(default)]
    pub canonical_base: String,

    /// Skip AMP validation
    #[serde(default)]
    pub amp_skip_validation: bool,

    /// Custom AMP validator location
    #[serde(default)]
    pub amp_validator_path: Option<String>,

    /// Public runtime configuration forwarded to every worker
    #[serde(default = "default_runtime_config")]
    pub runtime_config: serde_json::Value,

    /// Configured path-map transform
    #[serde(default)]
    pub path_map: Option<PathMapConfig>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            dist_dir: default_dist_dir(),
            out_dir: default_out_dir(),
            threads: None,
            subfolders: false,
            build_export: false,
            serverless: false,
            pages: None,
            asset_prefix: String::new(),
            canonical_base: String::new(),
            amp_skip_validation: false,
            amp_validator_path: None,
            runtime_config: default_runtime_config(),
            path_map: None,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.dir.is_empty() {
            return Err("export.dir cannot be empty".to_string());
        }

        if self.dist_dir.is_empty() {
            return Err("export.dist_dir cannot be empty".to_string());
        }

        if self.out_dir.is_empty() {
            return Err("export.out_dir cannot be empty".to_string());
        }

        if let Some(threads) = self.threads {
            if threads == 0 {
                return Err("export.threads must be >= 1".to_string());
            }
        }

        if let Some(ref pages) = self.pages {
            if let Some(bad) = pages.iter().find(|p| !p.starts_with('/')) {
                return Err(format!("export.pages entry '{bad}' must start with '/'"));
            }
        }

        if !self.runtime_config.is_object() {
            return Err("export.runtime_config must be a table".to_string());
        }

        if let Some(ref path_map) = self.path_map {
            path_map.validate()?;
        }

        Ok(())
    }

    /// Project root
    pub fn project_dir(&self) -> PathBuf {
        PathBuf::from(&self.dir)
    }

    /// Build directory resolved against the project root
    pub fn dist_path(&self) -> PathBuf {
        self.project_dir().join(&self.dist_dir)
    }

    /// Output directory resolved against the project root
    pub fn out_path(&self) -> PathBuf {
        self.project_dir().join(&self.out_dir)
    }

    /// Worker pool size to use for this run
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(default_threads).max(1)
    }
}

/// Renderer worker process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Executable started once per pool slot
    pub command: String,

    /// Arguments passed to the executable
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment variables for the worker
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl WorkerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.command.trim().is_empty() {
            return Err("worker.command cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_dir() -> String {
    ".".to_string()
}

fn default_dist_dir() -> String {
    ".next".to_string()
}

fn default_out_dir() -> String {
    "out".to_string()
}

fn default_runtime_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

/// Available parallelism minus one, at least one
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> PagexConfig {
        toml::from_str(
            r#"
[worker]
command = "node"
args = ["render-worker.js"]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = minimal();
        assert!(config.validate().is_ok());
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.export.dist_dir, ".next");
        assert_eq!(config.export.out_dir, "out");
        assert!(config.export.runtime_config.is_object());
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_paths_resolve_against_project_dir() {
        let mut config = minimal();
        config.export.dir = "/srv/site".to_string();
        assert_eq!(config.export.dist_path(), PathBuf::from("/srv/site/.next"));
        assert_eq!(config.export.out_path(), PathBuf::from("/srv/site/out"));
    }

    #[test]
    fn test_effective_threads() {
        let mut config = minimal();
        assert!(config.export.effective_threads() >= 1);
        config.export.threads = Some(8);
        assert_eq!(config.export.effective_threads(), 8);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let mut config = minimal();
        config.export.threads = Some(0);
        assert!(config.validate().unwrap_err().contains("export.threads"));
    }

    #[test]
    fn test_empty_worker_command_rejected() {
        let mut config = minimal();
        config.worker.command = "  ".to_string();
        assert!(config.validate().unwrap_err().contains("worker.command"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = minimal();
        config.application.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_path_map_entries_parse() {
        let config: PagexConfig = toml::from_str(
            r#"
[export.path_map]
merge_defaults = false

[export.path_map.entries."/p/1"]
page = "/p/[id]"
query = { id = "1" }

[worker]
command = "node"
"#,
        )
        .unwrap();

        let path_map = config.export.path_map.as_ref().unwrap();
        assert!(!path_map.merge_defaults);
        let map = path_map.to_path_map();
        assert_eq!(map.get("/p/1").unwrap().page, "/p/[id]");
        assert_eq!(map.get("/p/1").unwrap().query["id"], "1");
    }

    #[test]
    fn test_path_map_entry_without_leading_slash_rejected() {
        let mut config = minimal();
        let mut entries = BTreeMap::new();
        entries.insert("about".to_string(), PathMapEntry::new("/about"));
        config.export.path_map = Some(PathMapConfig {
            merge_defaults: true,
            entries,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_threads_at_least_one() {
        assert!(default_threads() >= 1);
    }
}
