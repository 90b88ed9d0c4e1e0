//! Prerendered artifact copying
//!
//! Routes listed in the prerender manifest were already rendered during the
//! build. Their HTML and JSON artifacts are copied from the build's pages
//! directory into the export output instead of being rendered again.

use crate::domain::errors::PagexError;
use crate::domain::manifest::PrerenderManifest;
use crate::domain::Result;
use std::path::{Path, PathBuf};

/// Normalize a route into a page path, rejecting traversal
///
/// `/` becomes `/index`, a missing leading slash is added, and any empty,
/// `.` or `..` segment is an error.
///
/// # Examples
///
/// ```
/// use pagex::core::export::prerender::normalize_page_path;
///
/// assert_eq!(normalize_page_path("/").unwrap(), "/index");
/// assert_eq!(normalize_page_path("blog/post").unwrap(), "/blog/post");
/// assert!(normalize_page_path("/blog/../secret").is_err());
/// ```
pub fn normalize_page_path(route: &str) -> Result<String> {
    let page = match route {
        "/" | "" => return Ok("/index".to_string()),
        r if r.starts_with('/') => r.to_string(),
        r => format!("/{}", r),
    };

    let invalid = page[1..]
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(PagexError::ArtifactCopy {
            route: route.to_string(),
            message: format!("requested and resolved page mismatch for {}", page),
        });
    }
    Ok(page)
}

/// Build pages directory holding prerendered artifacts
pub fn dist_pages_dir(dist_dir: &Path, build_id: &str, serverless: bool) -> PathBuf {
    if serverless {
        dist_dir.join("serverless").join("pages")
    } else {
        dist_dir
            .join("server")
            .join("static")
            .join(build_id)
            .join("pages")
    }
}

/// Copies prerendered HTML and JSON into the export output
#[derive(Debug, Clone)]
pub struct PrerenderCopier {
    pages_dir: PathBuf,
    out_dir: PathBuf,
    pages_data_dir: PathBuf,
    subfolders: bool,
}

impl PrerenderCopier {
    /// Copier reading from `pages_dir`
    pub fn new(
        pages_dir: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
        pages_data_dir: impl Into<PathBuf>,
        subfolders: bool,
    ) -> Self {
        Self {
            pages_dir: pages_dir.into(),
            out_dir: out_dir.into(),
            pages_data_dir: pages_data_dir.into(),
            subfolders,
        }
    }

    /// Where the HTML for a normalized page path goes
    pub fn html_destination(&self, page: &str) -> PathBuf {
        let relative = &page[1..];
        if self.subfolders && page != "/index" {
            self.out_dir.join(relative).join("index.html")
        } else {
            self.out_dir.join(format!("{}.html", relative))
        }
    }

    /// Where the JSON payload for a normalized page path goes
    pub fn json_destination(&self, page: &str) -> PathBuf {
        self.pages_data_dir.join(format!("{}.json", &page[1..]))
    }

    /// Copy both artifacts of one route
    ///
    /// # Errors
    ///
    /// Returns `PagexError::ArtifactCopy` if the route is invalid, an artifact
    /// is missing or a copy fails.
    pub async fn copy_route(&self, route: &str) -> Result<()> {
        let page = normalize_page_path(route)?;
        let relative = &page[1..];

        let html_src = self.pages_dir.join(format!("{}.html", relative));
        let json_src = self.pages_dir.join(format!("{}.json", relative));

        copy_artifact(route, &html_src, &self.html_destination(&page)).await?;
        copy_artifact(route, &json_src, &self.json_destination(&page)).await?;

        tracing::debug!(route, "Copied prerendered route");
        Ok(())
    }

    /// Copy every route in `manifest`, aborting on the first failure
    ///
    /// # Errors
    ///
    /// Returns the first `PagexError::ArtifactCopy` encountered.
    pub async fn copy_all(&self, manifest: &PrerenderManifest) -> Result<usize> {
        let copies = manifest.routes.keys().map(|route| self.copy_route(route));
        let copied = futures::future::try_join_all(copies).await?.len();

        tracing::info!(routes = copied, "Copied prerendered routes");
        Ok(copied)
    }
}

async fn copy_artifact(route: &str, from: &Path, to: &Path) -> Result<()> {
    let fail = |message: String| PagexError::ArtifactCopy {
        route: route.to_string(),
        message,
    };

    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| fail(format!("failed to create {}: {}", parent.display(), e)))?;
    }

    tokio::fs::copy(from, to).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            fail(format!("missing prerendered artifact {}", from.display()))
        } else {
            fail(format!(
                "failed to copy {} to {}: {}",
                from.display(),
                to.display(),
                e
            ))
        }
    })?;
    Ok(())
}
