//! Domain models and types for Pagex.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Build manifests** ([`PageManifest`], [`PrerenderManifest`])
//! - **The export plan** ([`ExportPathMap`], [`PathMapEntry`])
//! - **Render task contract** ([`RenderTask`], [`RenderContext`], [`RenderResult`])
//! - **Error types** ([`PagexError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PagexError>`]:
//!
//! ```rust,no_run
//! use pagex::domain::{PageManifest, Result};
//!
//! fn example() -> Result<usize> {
//!     let manifest = PageManifest::load(".next/server/pages-manifest.json")?;
//!     Ok(manifest.len())
//! }
//! ```

pub mod errors;
pub mod manifest;
pub mod path_map;
pub mod result;
pub mod task;

// Re-export commonly used types for convenience
pub use errors::PagexError;
pub use manifest::{DynamicRoute, PageManifest, PrerenderManifest, PrerenderRoute, Revalidate};
pub use path_map::{ExportPathMap, PathMapEntry};
pub use result::Result;
pub use task::{
    AmpMessage, AmpPageResult, AmpValidation, RenderContext, RenderOptions, RenderResult,
    RenderTask,
};
