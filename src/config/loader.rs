//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PagexConfig;
use crate::domain::errors::PagexError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PagexConfig
/// 4. Applies environment variable overrides (PAGEX_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use pagex::config::loader::load_config;
///
/// let config = load_config("pagex.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PagexConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PagexError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PagexError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config = parse_config(&contents)?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PagexError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    tracing::debug!(path = %path.display(), "Configuration loaded");

    Ok(config)
}

/// Parses configuration from a TOML string without validating it
pub fn parse_config(contents: &str) -> Result<PagexConfig> {
    toml::from_str(contents)
        .map_err(|e| PagexError::Configuration(format!("Failed to parse TOML: {}", e)))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced environment variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PagexError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PagexError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using PAGEX_* prefix
///
/// Environment variables follow the pattern: PAGEX_<SECTION>_<KEY>
/// For example: PAGEX_EXPORT_OUT_DIR, PAGEX_EXPORT_THREADS
fn apply_env_overrides(config: &mut PagexConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("PAGEX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("PAGEX_EXPORT_DIR") {
        config.export.dir = val;
    }
    if let Ok(val) = std::env::var("PAGEX_EXPORT_DIST_DIR") {
        config.export.dist_dir = val;
    }
    if let Ok(val) = std::env::var("PAGEX_EXPORT_OUT_DIR") {
        config.export.out_dir = val;
    }
    if let Ok(val) = std::env::var("PAGEX_EXPORT_THREADS") {
        if let Ok(threads) = val.parse() {
            config.export.threads = Some(threads);
        }
    }
    if let Ok(val) = std::env::var("PAGEX_EXPORT_SUBFOLDERS") {
        config.export.subfolders = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PAGEX_EXPORT_SERVERLESS") {
        config.export.serverless = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PAGEX_EXPORT_ASSET_PREFIX") {
        config.export.asset_prefix = val;
    }

    // Worker overrides
    if let Ok(val) = std::env::var("PAGEX_WORKER_COMMAND") {
        config.worker.command = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PAGEX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PAGEX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
