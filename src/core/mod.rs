//! Core business logic for Pagex.
//!
//! This module contains the orchestration for static exports.
//!
//! # Modules
//!
//! - [`export`] - Dispatch, aggregation, artifact copying and coordination
//! - [`routes`] - Route classification and the path-map transform seam
//! - [`state`] - The export status record
//!
//! # Export Workflow
//!
//! The typical export workflow:
//!
//! 1. **Validate**: Check the build directory and the output directory
//! 2. **Mark Started**: Write the status record with `success: false`
//! 3. **Prepare Output**: Clean the output tree, copy static and public assets
//! 4. **Classify**: Build the export path map and apply the transform
//! 5. **Render**: Dispatch every path to the worker pool
//! 6. **Copy**: Copy prerendered HTML and JSON artifacts
//! 7. **Mark Succeeded**: Rewrite the status record with `success: true`
//!
//! # Example
//!
//! ```rust,no_run
//! use pagex::config::load_config;
//! use pagex::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pagex.toml")?;
//! let coordinator = ExportCoordinator::new(config);
//!
//! let summary = coordinator.execute_export().await?;
//!
//! println!("Paths: {}", summary.total_paths);
//! println!("Rendered: {}", summary.rendered);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod routes;
pub mod state;
