//! Route classification
//!
//! Filters the page manifest down to exportable routes, runs the path-map
//! transform, guarantees a not-found artifact and splits off entries that
//! point at API routes. Classification never fails on questionable input:
//! unsupported routes are excluded (and, for API mappings, warned about).

use crate::core::routes::transform::{PathMapTransform, TransformContext};
use crate::domain::manifest::{PageManifest, PrerenderManifest};
use crate::domain::path_map::{ExportPathMap, PathMapEntry};
use crate::domain::Result;

/// Document shell
pub const DOCUMENT_PAGE: &str = "/_document";

/// App shell
pub const APP_PAGE: &str = "/_app";

/// Error shell, also used to render the not-found pages
pub const ERROR_PAGE: &str = "/_error";

/// Pseudo-pages that never produce standalone artifacts
pub const INTERNAL_PAGES: [&str; 3] = [DOCUMENT_PAGE, APP_PAGE, ERROR_PAGE];

/// Whether `page` is one of the internal shells
pub fn is_internal_page(page: &str) -> bool {
    INTERNAL_PAGES.contains(&page)
}

/// Whether `page` follows the API route convention (`/api` or `/api/...`)
pub fn is_api_route(page: &str) -> bool {
    match page.strip_prefix("/api") {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// A path-map entry that was excluded because it targets an API route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRouteMapping {
    /// Output path from the final path map
    pub path: String,
    /// API page it maps to
    pub page: String,
}

/// Outcome of classification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedRoutes {
    /// Entries to dispatch
    pub exportable: ExportPathMap,

    /// Entries excluded because they map to API routes
    pub api_routes: Vec<ApiRouteMapping>,
}

impl ClassifiedRoutes {
    /// Whether the user's plan mapped any path to an API route
    pub fn has_api_routes(&self) -> bool {
        !self.api_routes.is_empty()
    }

    /// Human-readable warning for the API mappings, if any
    pub fn api_route_warning(&self) -> Option<String> {
        if self.api_routes.is_empty() {
            return None;
        }
        let paths: Vec<&str> = self.api_routes.iter().map(|m| m.path.as_str()).collect();
        Some(format!(
            "Statically exporting a page that uses API routes is not supported; \
             skipping {} path(s): {}",
            paths.len(),
            paths.join(", ")
        ))
    }
}

/// Derives the export plan from the build manifests
#[derive(Debug, Clone)]
pub struct RouteClassifier<'a> {
    manifest: &'a PageManifest,
    prerender: Option<&'a PrerenderManifest>,
    pages: Option<&'a [String]>,
    build_export: bool,
}

impl<'a> RouteClassifier<'a> {
    /// Classifier over every route in `manifest`
    pub fn new(manifest: &'a PageManifest) -> Self {
        Self {
            manifest,
            prerender: None,
            pages: None,
            build_export: false,
        }
    }

    /// Consult the prerender manifest for dynamic routes
    pub fn with_prerender_manifest(mut self, prerender: Option<&'a PrerenderManifest>) -> Self {
        self.prerender = prerender;
        self
    }

    /// Replace the manifest's route names with an explicit list
    pub fn with_pages(mut self, pages: Option<&'a [String]>) -> Self {
        self.pages = pages;
        self
    }

    /// Build-export mode keeps dynamic routes in the default map
    pub fn build_export(mut self, build_export: bool) -> Self {
        self.build_export = build_export;
        self
    }

    /// Manifest-derived default path map
    ///
    /// Every surviving route maps to itself with no query.
    pub fn default_path_map(&self) -> ExportPathMap {
        let candidates: Vec<&str> = match self.pages {
            Some(pages) => pages.iter().map(String::as_str).collect(),
            None => self.manifest.routes().collect(),
        };

        let mut map = ExportPathMap::new();
        for route in candidates {
            if is_internal_page(route) || is_api_route(route) {
                continue;
            }

            if !self.build_export {
                if let Some(prerender) = self.prerender {
                    if prerender.is_dynamic(route) {
                        tracing::debug!(route = %route, "Skipping dynamic route in default path map");
                        continue;
                    }
                }
            }

            map.insert(route, PathMapEntry::new(route));
        }

        map
    }

    /// Full classification
    ///
    /// The transform is invoked exactly once with the default map.
    ///
    /// # Errors
    ///
    /// Only errors returned by the transform itself are propagated.
    pub fn classify(
        &self,
        transform: &dyn PathMapTransform,
        ctx: &TransformContext,
    ) -> Result<ClassifiedRoutes> {
        let defaults = self.default_path_map();
        tracing::debug!(default_paths = defaults.len(), "Built default path map");

        let mut path_map = transform.transform(defaults, ctx)?;

        if !path_map.contains("/404") && !path_map.contains("/404.html") {
            path_map.insert("/404", PathMapEntry::new(ERROR_PAGE));
            path_map.insert("/404.html", PathMapEntry::new(ERROR_PAGE));
        }

        let mut classified = ClassifiedRoutes::default();
        for (path, entry) in path_map {
            if is_api_route(&entry.page) {
                classified.api_routes.push(ApiRouteMapping {
                    path,
                    page: entry.page,
                });
            } else {
                classified.exportable.insert(path, entry);
            }
        }

        if let Some(warning) = classified.api_route_warning() {
            tracing::warn!(count = classified.api_routes.len(), "{warning}");
        }

        tracing::info!(
            exportable = classified.exportable.len(),
            api_routes = classified.api_routes.len(),
            "Classified export paths"
        );

        Ok(classified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::routes::transform::IdentityTransform;
    use std::path::PathBuf;
    use test_case::test_case;

    fn ctx() -> TransformContext {
        TransformContext {
            dev: false,
            dir: PathBuf::from("."),
            out_dir: PathBuf::from("out"),
            dist_dir: PathBuf::from(".next"),
            build_id: "b1".to_string(),
        }
    }

    #[test_case("/api", true ; "bare api")]
    #[test_case("/api/users", true ; "nested api")]
    #[test_case("/apis", false ; "prefix only")]
    #[test_case("/blog/api", false ; "api segment elsewhere")]
    #[test_case("/", false ; "index")]
    fn test_is_api_route(page: &str, expected: bool) {
        assert_eq!(is_api_route(page), expected);
    }

    #[test]
    fn test_internal_pages_and_api_routes_excluded() {
        let manifest = PageManifest::from_routes(["/a", "/_app", "/_document", "/_error", "/api/x"]);
        let classified = RouteClassifier::new(&manifest)
            .classify(&IdentityTransform, &ctx())
            .unwrap();

        let paths: Vec<&str> = classified.exportable.paths().collect();
        assert_eq!(paths, vec!["/404", "/404.html", "/a"]);
        assert!(!classified.has_api_routes());
        assert!(classified.api_route_warning().is_none());
    }

    #[test]
    fn test_not_found_entries_render_error_page() {
        let manifest = PageManifest::from_routes(["/"]);
        let classified = RouteClassifier::new(&manifest)
            .classify(&IdentityTransform, &ctx())
            .unwrap();

        assert_eq!(classified.exportable.get("/404").unwrap().page, ERROR_PAGE);
        assert_eq!(classified.exportable.get("/404.html").unwrap().page, ERROR_PAGE);
    }

    #[test]
    fn test_user_supplied_404_is_kept() {
        let manifest = PageManifest::from_routes(["/", "/missing"]);
        let transform = |mut map: ExportPathMap, _: &TransformContext| -> Result<ExportPathMap> {
            map.insert("/404.html", PathMapEntry::new("/missing"));
            Ok(map)
        };

        let classified = RouteClassifier::new(&manifest)
            .classify(&transform, &ctx())
            .unwrap();

        assert_eq!(classified.exportable.get("/404.html").unwrap().page, "/missing");
        assert!(!classified.exportable.contains("/404"));
    }

    #[test]
    fn test_dynamic_routes_excluded_from_defaults() {
        let manifest = PageManifest::from_routes(["/blog/[slug]", "/about"]);
        let prerender: PrerenderManifest =
            serde_json::from_str(r#"{"routes": {}, "dynamicRoutes": {"/blog/[slug]": {}}}"#)
                .unwrap();

        let defaults = RouteClassifier::new(&manifest)
            .with_prerender_manifest(Some(&prerender))
            .default_path_map();

        assert!(!defaults.contains("/blog/[slug]"));
        assert!(defaults.contains("/about"));
    }

    #[test]
    fn test_dynamic_routes_kept_in_build_export_mode() {
        let manifest = PageManifest::from_routes(["/blog/[slug]"]);
        let prerender: PrerenderManifest =
            serde_json::from_str(r#"{"dynamicRoutes": {"/blog/[slug]": {}}}"#).unwrap();

        let defaults = RouteClassifier::new(&manifest)
            .with_prerender_manifest(Some(&prerender))
            .build_export(true)
            .default_path_map();

        assert!(defaults.contains("/blog/[slug]"));
    }

    #[test]
    fn test_dynamic_route_reintroduced_by_transform() {
        let manifest = PageManifest::from_routes(["/blog/[slug]"]);
        let prerender: PrerenderManifest =
            serde_json::from_str(r#"{"dynamicRoutes": {"/blog/[slug]": {}}}"#).unwrap();
        let transform = |mut map: ExportPathMap, _: &TransformContext| -> Result<ExportPathMap> {
            map.insert(
                "/blog/hello",
                PathMapEntry::new("/blog/[slug]").with_query("slug", "hello"),
            );
            Ok(map)
        };

        let classified = RouteClassifier::new(&manifest)
            .with_prerender_manifest(Some(&prerender))
            .classify(&transform, &ctx())
            .unwrap();

        assert_eq!(
            classified.exportable.get("/blog/hello").unwrap().query["slug"],
            "hello"
        );
        assert!(!classified.exportable.contains("/blog/[slug]"));
    }

    #[test]
    fn test_explicit_pages_override_manifest() {
        let manifest = PageManifest::from_routes(["/a", "/b", "/c"]);
        let pages = vec!["/b".to_string(), "/_app".to_string()];

        let defaults = RouteClassifier::new(&manifest)
            .with_pages(Some(&pages))
            .default_path_map();

        assert_eq!(defaults.paths().collect::<Vec<_>>(), vec!["/b"]);
    }

    #[test]
    fn test_api_mappings_from_transform_are_split_off() {
        let manifest = PageManifest::from_routes(["/", "/api/x"]);
        let transform = |mut map: ExportPathMap, _: &TransformContext| -> Result<ExportPathMap> {
            map.insert("/data.json", PathMapEntry::new("/api/x"));
            Ok(map)
        };

        let classified = RouteClassifier::new(&manifest)
            .classify(&transform, &ctx())
            .unwrap();

        assert!(!classified.exportable.contains("/data.json"));
        assert_eq!(
            classified.api_routes,
            vec![ApiRouteMapping {
                path: "/data.json".to_string(),
                page: "/api/x".to_string(),
            }]
        );
        assert!(classified.api_route_warning().unwrap().contains("/data.json"));
    }
}
