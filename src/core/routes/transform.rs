//! Path-map transform seam
//!
//! The default export plan derived from the manifest is handed to a
//! transform exactly once per run; whatever it returns is the final plan.

use crate::config::PathMapConfig;
use crate::domain::path_map::ExportPathMap;
use crate::domain::Result;
use std::path::PathBuf;

/// Context passed to a path-map transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformContext {
    /// Always false for exports
    pub dev: bool,
    /// Project root
    pub dir: PathBuf,
    /// Export output directory
    pub out_dir: PathBuf,
    /// Build directory
    pub dist_dir: PathBuf,
    /// Build identifier
    pub build_id: String,
}

/// User-supplied transformation of the default export plan
pub trait PathMapTransform: Send + Sync {
    /// Produce the final path map from the manifest-derived defaults
    fn transform(&self, defaults: ExportPathMap, ctx: &TransformContext) -> Result<ExportPathMap>;
}

impl<F> PathMapTransform for F
where
    F: Fn(ExportPathMap, &TransformContext) -> Result<ExportPathMap> + Send + Sync,
{
    fn transform(&self, defaults: ExportPathMap, ctx: &TransformContext) -> Result<ExportPathMap> {
        self(defaults, ctx)
    }
}

/// Returns the defaults unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl PathMapTransform for IdentityTransform {
    fn transform(&self, defaults: ExportPathMap, _ctx: &TransformContext) -> Result<ExportPathMap> {
        Ok(defaults)
    }
}

/// Path map declared in the configuration file
#[derive(Debug, Clone)]
pub struct ConfiguredPathMap {
    entries: ExportPathMap,
    merge_defaults: bool,
}

impl ConfiguredPathMap {
    /// Build from configuration
    pub fn from_config(config: &PathMapConfig) -> Self {
        Self {
            entries: config.to_path_map(),
            merge_defaults: config.merge_defaults,
        }
    }
}

impl PathMapTransform for ConfiguredPathMap {
    fn transform(&self, defaults: ExportPathMap, _ctx: &TransformContext) -> Result<ExportPathMap> {
        if !self.merge_defaults {
            return Ok(self.entries.clone());
        }

        let mut merged = defaults;
        merged.merge(self.entries.clone());
        Ok(merged)
    }
}
