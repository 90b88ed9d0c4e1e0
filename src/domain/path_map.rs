//! Export path map
//!
//! Mapping from a concrete output path to the route that renders it and the
//! query parameters it is rendered with. Merging is by key: a later write
//! for the same output path replaces the earlier one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Route and query that produce one output path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapEntry {
    /// Route name from the page manifest (e.g. `/blog/[slug]`)
    pub page: String,

    /// Query parameters passed to the renderer
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,
}

impl PathMapEntry {
    /// Entry rendering `page` with no query
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            query: BTreeMap::new(),
        }
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// Output path → `{ page, query }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportPathMap {
    entries: BTreeMap<String, PathMapEntry>,
}

impl ExportPathMap {
    /// Create an empty path map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any entry already stored for `path`
    ///
    /// Returns the replaced entry, if any.
    pub fn insert(&mut self, path: impl Into<String>, entry: PathMapEntry) -> Option<PathMapEntry> {
        let path = path.into();
        let previous = self.entries.insert(path.clone(), entry);
        if let Some(ref prev) = previous {
            tracing::debug!(path = %path, replaced_page = %prev.page, "Path map entry replaced");
        }
        previous
    }

    /// Merge `other` into this map; entries from `other` win on conflict
    pub fn merge(&mut self, other: ExportPathMap) {
        for (path, entry) in other.entries {
            self.insert(path, entry);
        }
    }

    /// Look up an output path
    pub fn get(&self, path: &str) -> Option<&PathMapEntry> {
        self.entries.get(path)
    }

    /// Whether an output path is present
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Remove an output path
    pub fn remove(&mut self, path: &str) -> Option<PathMapEntry> {
        self.entries.remove(path)
    }

    /// Iterate entries in output-path order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PathMapEntry)> {
        self.entries.iter()
    }

    /// Output paths in order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, PathMapEntry)> for ExportPathMap {
    fn from_iter<T: IntoIterator<Item = (String, PathMapEntry)>>(iter: T) -> Self {
        let mut map = ExportPathMap::new();
        for (path, entry) in iter {
            map.insert(path, entry);
        }
        map
    }
}

impl IntoIterator for ExportPathMap {
    type Item = (String, PathMapEntry);
    type IntoIter = std::collections::btree_map::IntoIter<String, PathMapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
