//! Export orchestration
//!
//! This module provides the core export logic for Pagex, including:
//! - Task dispatch with bounded concurrency
//! - Result aggregation and the AMP report
//! - Output preparation and prerendered artifact copying
//! - Export coordination and the run summary

pub mod aggregate;
pub mod amp;
pub mod assets;
pub mod coordinator;
pub mod dispatch;
pub mod prerender;
pub mod summary;

pub use aggregate::ResultAggregator;
pub use amp::format_amp_report;
pub use assets::{AssetSync, FsAssetSync};
pub use coordinator::{ExportCoordinator, ExportPlan};
pub use dispatch::Dispatcher;
pub use prerender::{normalize_page_path, PrerenderCopier};
pub use summary::ExportSummary;
