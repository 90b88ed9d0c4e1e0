//! Build manifests
//!
//! Read-only inputs produced by the upstream build step: the page manifest
//! (route → compiled entry point) and the optional prerender manifest
//! (routes rendered ahead of time, plus the set of dynamic routes).

use crate::domain::errors::PagexError;
use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the page manifest inside the server output directory
pub const PAGES_MANIFEST: &str = "pages-manifest.json";

/// File name of the prerender manifest inside the build directory
pub const PRERENDER_MANIFEST: &str = "prerender-manifest.json";

/// Mapping from logical route name to its compiled entry point
///
/// Entry point identifiers are kept as opaque JSON values; the orchestrator
/// only ever looks at the keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageManifest {
    pages: BTreeMap<String, serde_json::Value>,
}

impl PageManifest {
    /// Build a manifest from `(route, entry)` pairs
    pub fn from_routes<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = routes
            .into_iter()
            .map(|route| {
                let route = route.into();
                let entry = serde_json::Value::String(format!("pages{route}.js"));
                (route, entry)
            })
            .collect();
        Self { pages }
    }

    /// Load the manifest from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `PagexError::Manifest` if the file is missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PagexError::Manifest(format!(
                "Failed to read page manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            PagexError::Manifest(format!(
                "Failed to parse page manifest {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Route names in manifest order (sorted)
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Whether the manifest knows the route
    pub fn contains(&self, route: &str) -> bool {
        self.pages.contains_key(route)
    }

    /// Number of routes
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the manifest is empty
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Revalidation hint for a prerendered page
///
/// Serialized as either a number of seconds or `false` (never revalidate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Revalidate {
    /// Revalidate after this many seconds
    Seconds(u64),
    /// `false`: the page never becomes stale
    Never(bool),
}

impl Revalidate {
    /// Seconds until revalidation, if any
    pub fn seconds(&self) -> Option<u64> {
        match self {
            Revalidate::Seconds(s) => Some(*s),
            Revalidate::Never(_) => None,
        }
    }
}

/// Prerender metadata for a single route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderRoute {
    /// Revalidation interval recorded at build time
    #[serde(default)]
    pub initial_revalidate_seconds: Option<Revalidate>,

    /// Dynamic route this page was generated from
    #[serde(default)]
    pub src_route: Option<String>,

    /// Data route serving the page's JSON payload
    #[serde(default)]
    pub data_route: Option<String>,
}

/// Metadata for a dynamic (parameterized) route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRoute {
    /// Regex matching concrete instantiations
    #[serde(default)]
    pub route_regex: Option<String>,

    /// Data route template
    #[serde(default)]
    pub data_route: Option<String>,
}

/// Prerender manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderManifest {
    /// Routes already rendered ahead of time by the build step
    #[serde(default)]
    pub routes: BTreeMap<String, PrerenderRoute>,

    /// Routes flagged as dynamic
    #[serde(default)]
    pub dynamic_routes: BTreeMap<String, DynamicRoute>,
}

impl PrerenderManifest {
    /// Load the manifest if the file exists
    ///
    /// # Errors
    ///
    /// Returns `PagexError::Manifest` if the file exists but cannot be read or parsed.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No prerender manifest found");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            PagexError::Manifest(format!(
                "Failed to read prerender manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        let manifest = serde_json::from_str(&contents).map_err(|e| {
            PagexError::Manifest(format!(
                "Failed to parse prerender manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Some(manifest))
    }

    /// Whether the route is flagged as dynamic
    pub fn is_dynamic(&self, route: &str) -> bool {
        self.dynamic_routes.contains_key(route)
    }
}
