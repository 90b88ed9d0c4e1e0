//! Domain error types
//!
//! This module defines the error hierarchy for Pagex. Task-local render and
//! validation failures are never raised directly; they are accumulated by the
//! aggregator and surface here only as the run-level `Render` and
//! `AmpValidation` variants once every task has resolved.

use thiserror::Error;

/// Main Pagex error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum PagexError {
    /// Configuration-related errors (fatal, raised before dispatch)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A build manifest could not be read or parsed
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// One or more pages failed to render
    #[error("Export encountered errors on {} path(s): {}", .paths.len(), .paths.join(", "))]
    Render {
        /// Output paths whose render reported an error
        paths: Vec<String>,
    },

    /// AMP validation reported errors for one or more pages
    #[error("AMP Validation caused the export to fail ({} page(s) with errors)", .pages.len())]
    AmpValidation {
        /// Pages whose validation carried at least one error
        pages: Vec<String>,
    },

    /// A prerendered artifact could not be copied into the export tree
    #[error("Failed to copy prerendered artifact for route {route}: {message}")]
    ArtifactCopy {
        /// Normalized route being copied
        route: String,
        /// What went wrong
        message: String,
    },

    /// Worker pool startup or protocol errors
    #[error("Worker error: {0}")]
    Worker(String),

    /// Export status persistence errors
    #[error("State management error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl PagexError {
    /// Whether this error was raised before any rendering work started
    pub fn is_configuration(&self) -> bool {
        matches!(self, PagexError::Configuration(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PagexError {
    fn from(err: std::io::Error) -> Self {
        PagexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PagexError {
    fn from(err: serde_json::Error) -> Self {
        PagexError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PagexError {
    fn from(err: toml::de::Error) -> Self {
        PagexError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = PagexError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_render_error_lists_paths() {
        let err = PagexError::Render {
            paths: vec!["/a".to_string(), "/b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Export encountered errors on 2 path(s): /a, /b"
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_amp_validation_error_display() {
        let err = PagexError::AmpValidation {
            pages: vec!["/amp".to_string()],
        };
        assert!(err.to_string().starts_with("AMP Validation caused the export to fail"));
    }

    #[test]
    fn test_artifact_copy_error_display() {
        let err = PagexError::ArtifactCopy {
            route: "/blog/first".to_string(),
            message: "missing first.html".to_string(),
        };
        assert!(err.to_string().contains("/blog/first"));
        assert!(err.to_string().contains("missing first.html"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PagexError = io_err.into();
        assert!(matches!(err, PagexError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PagexError = json_err.into();
        assert!(matches!(err, PagexError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PagexError = toml_err.into();
        assert!(matches!(err, PagexError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_pagex_error_implements_std_error() {
        let err = PagexError::Worker("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
