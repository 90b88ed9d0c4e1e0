// Pagex - Static Export Orchestrator
// Copyright (c) 2025 Pagex Contributors
// Licensed under the MIT License

//! # Pagex - Static Export Orchestrator
//!
//! Pagex turns a compiled web application build into a static site. Given the
//! build's route manifest it works out every output path, renders each one
//! out-of-process through a bounded pool of worker processes, aggregates the
//! per-path results, copies pages that were already prerendered during the
//! build, and durably records whether the export run completed.
//!
//! ## Architecture
//!
//! Pagex follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (routes, export pipeline, status record)
//! - [`worker`] - Renderer trait, worker protocol and process pool
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagex::config::load_config;
//! use pagex::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("pagex.toml")?;
//!     let coordinator = ExportCoordinator::new(config);
//!
//!     let summary = coordinator.execute_export().await?;
//!
//!     println!("Exported {} paths", summary.total_paths);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Renderers
//!
//! Anything implementing [`worker::Renderer`] can stand in for the worker pool:
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use pagex::core::routes::IdentityTransform;
//! use pagex::domain::{RenderResult, RenderTask};
//! use pagex::worker::Renderer;
//! use std::sync::Arc;
//!
//! struct Noop;
//!
//! #[async_trait]
//! impl Renderer for Noop {
//!     async fn render(&self, task: &RenderTask) -> RenderResult {
//!         RenderResult::success(&task.path)
//!     }
//! }
//!
//! # async fn example(config: pagex::config::PagexConfig) -> pagex::domain::Result<()> {
//! let coordinator = pagex::core::export::ExportCoordinator::new(config);
//! let _summary = coordinator
//!     .execute_with(&IdentityTransform, Arc::new(Noop))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Pagex uses the [`domain::PagexError`] type for all errors. Individual page
//! failures never abort a run; they are collected and reported once every
//! task has finished.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod worker;
