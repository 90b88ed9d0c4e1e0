//! Export coordinator - main orchestrator for the export process
//!
//! This module drives one export run end to end: validation, status
//! marking, output preparation, route classification, dispatch through the
//! renderer, aggregation, prerendered artifact copying and the final status
//! write.

use crate::config::PagexConfig;
use crate::core::export::aggregate::ResultAggregator;
use crate::core::export::amp::format_amp_report;
use crate::core::export::assets::{AssetSync, FsAssetSync};
use crate::core::export::dispatch::Dispatcher;
use crate::core::export::prerender::{dist_pages_dir, PrerenderCopier};
use crate::core::export::summary::ExportSummary;
use crate::core::routes::{
    ConfiguredPathMap, IdentityTransform, PathMapTransform, RouteClassifier, TransformContext,
};
use crate::core::state::StatusPersister;
use crate::domain::errors::PagexError;
use crate::domain::manifest::{PageManifest, PrerenderManifest, PAGES_MANIFEST, PRERENDER_MANIFEST};
use crate::domain::task::{RenderContext, RenderOptions, RenderTask};
use crate::domain::Result;
use crate::worker::{Renderer, WorkerCommand, WorkerPool};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// File holding the build identifier inside the build directory
pub const BUILD_ID_FILE: &str = "BUILD_ID";

/// Directories under the project root that cannot be the export output
pub const RESERVED_OUT_DIRS: [&str; 2] = ["public", "static"];

/// Everything resolved before dispatch
#[derive(Debug)]
pub struct ExportPlan {
    /// Build identifier
    pub build_id: String,
    /// Tasks to dispatch, one per exportable path
    pub tasks: Vec<RenderTask>,
    /// Shared run context
    pub context: Arc<RenderContext>,
    /// API routes left out of the export
    pub skipped_api_routes: Vec<String>,
    /// Prerender manifest, when the build produced one
    pub prerender: Option<PrerenderManifest>,
    /// Worker pool size
    pub concurrency: usize,
    started: Instant,
}

/// Export coordinator
pub struct ExportCoordinator {
    config: PagexConfig,
    assets: Arc<dyn AssetSync>,
    persister: StatusPersister,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(config: PagexConfig) -> Self {
        let persister = StatusPersister::new(config.export.dist_path());
        Self {
            config,
            assets: Arc::new(FsAssetSync),
            persister,
        }
    }

    /// Replace the filesystem asset sync
    pub fn with_asset_sync(mut self, assets: Arc<dyn AssetSync>) -> Self {
        self.assets = assets;
        self
    }

    /// Configuration this coordinator runs with
    pub fn config(&self) -> &PagexConfig {
        &self.config
    }

    /// Status persister for this build directory
    pub fn persister(&self) -> &StatusPersister {
        &self.persister
    }

    /// Path-map transform described by the configuration
    pub fn configured_transform(&self) -> Box<dyn PathMapTransform> {
        match &self.config.export.path_map {
            Some(path_map) => Box::new(ConfiguredPathMap::from_config(path_map)),
            None => Box::new(IdentityTransform),
        }
    }

    /// Execute the export with the configured worker pool
    ///
    /// This is the main entry point for the export process. It:
    /// 1. Validates the build and output directories
    /// 2. Marks the export as started
    /// 3. Prepares the output tree and copies static assets
    /// 4. Classifies routes into the final export plan
    /// 5. Starts the worker pool and renders every path
    /// 6. Copies prerendered artifacts
    /// 7. Reports AMP findings and marks the export successful
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let transform = self.configured_transform();
        let plan = self.prepare(transform.as_ref()).await?;

        let command = WorkerCommand::from_config(&self.config.worker);
        let pool: Arc<dyn Renderer> = Arc::new(WorkerPool::start(command, plan.concurrency)?);

        self.run(plan, pool).await
    }

    /// Execute the export with a caller-provided transform and renderer
    pub async fn execute_with(
        &self,
        transform: &dyn PathMapTransform,
        renderer: Arc<dyn Renderer>,
    ) -> Result<ExportSummary> {
        let plan = self.prepare(transform).await?;
        self.run(plan, renderer).await
    }

    /// Resolve the export plan; writes the started marker and prepares output
    ///
    /// # Errors
    ///
    /// Returns `PagexError::Configuration` for an absent build directory or a
    /// reserved output directory, before anything is written.
    pub async fn prepare(&self, transform: &dyn PathMapTransform) -> Result<ExportPlan> {
        let started = Instant::now();
        let export = &self.config.export;
        let project_dir = export.project_dir();
        let dist_dir = export.dist_path();
        let out_dir = export.out_path();

        self.validate_dirs(&project_dir, &dist_dir, &out_dir)?;
        let build_id = read_build_id(&dist_dir).await?;

        tracing::info!(
            build_id = %build_id,
            dist_dir = %dist_dir.display(),
            out_dir = %out_dir.display(),
            build_export = export.build_export,
            "Starting export"
        );

        let manifest_dir = dist_dir.join(if export.serverless { "serverless" } else { "server" });
        let pages = PageManifest::load(manifest_dir.join(PAGES_MANIFEST))?;
        let prerender = PrerenderManifest::load_optional(dist_dir.join(PRERENDER_MANIFEST))?;

        self.persister.mark_started(&out_dir).await?;

        if !export.build_export {
            self.assets.clean_dir(&out_dir).await?;
            tokio::fs::create_dir_all(out_dir.join("_next").join(&build_id)).await?;

            let static_dir = dist_dir.join("static");
            if static_dir.exists() {
                tracing::info!("Copying \"static build\" directory");
                self.assets
                    .copy_tree(&static_dir, &out_dir.join("_next").join("static"), &BTreeSet::new())
                    .await?;
            }
        }

        let ctx = TransformContext {
            dev: false,
            dir: project_dir.clone(),
            out_dir: out_dir.clone(),
            dist_dir: dist_dir.clone(),
            build_id: build_id.clone(),
        };
        let classified = RouteClassifier::new(&pages)
            .with_prerender_manifest(prerender.as_ref())
            .with_pages(export.pages.as_deref())
            .build_export(export.build_export)
            .classify(transform, &ctx)?;

        let pages_data_dir = if export.build_export {
            out_dir.clone()
        } else {
            out_dir.join("_next").join("data").join(&build_id)
        };

        if !export.build_export {
            let public_dir = project_dir.join("public");
            if public_dir.exists() {
                tracing::info!("Copying \"public\" directory");
                let exclude: BTreeSet<String> =
                    classified.exportable.paths().map(str::to_string).collect();
                self.assets.copy_tree(&public_dir, &out_dir, &exclude).await?;
            }
            tokio::fs::create_dir_all(&pages_data_dir).await?;
        }

        let context = Arc::new(RenderContext {
            build_id: build_id.clone(),
            out_dir,
            pages_data_dir,
            render_opts: self.render_options(&build_id),
            runtime_config: export.runtime_config.clone(),
            subfolders: export.subfolders,
            build_export: export.build_export,
            serverless: export.serverless,
        });

        let tasks = classified
            .exportable
            .into_iter()
            .map(|(path, entry)| RenderTask {
                path,
                page: entry.page,
                query: entry.query,
                context: Arc::clone(&context),
            })
            .collect();

        Ok(ExportPlan {
            build_id,
            tasks,
            context,
            skipped_api_routes: classified.api_routes.into_iter().map(|m| m.path).collect(),
            prerender,
            concurrency: export.effective_threads(),
            started,
        })
    }

    /// Dispatch the plan, aggregate, copy artifacts and record the outcome
    ///
    /// # Errors
    ///
    /// Returns `PagexError::ArtifactCopy` on a missing prerendered artifact,
    /// `PagexError::AmpValidation` if any page carries AMP errors, otherwise
    /// `PagexError::Render` if any render failed. The success marker is only
    /// written when none of these occur.
    pub async fn run(&self, plan: ExportPlan, renderer: Arc<dyn Renderer>) -> Result<ExportSummary> {
        let ExportPlan {
            build_id,
            tasks,
            context,
            skipped_api_routes,
            prerender,
            concurrency,
            started,
        } = plan;

        let total_paths = tasks.len();
        let mut aggregator = ResultAggregator::new(total_paths).track_revalidations(context.build_export);

        let dispatcher = Dispatcher::new(Arc::clone(&renderer), concurrency);
        dispatcher.dispatch(tasks, |result| aggregator.record(result)).await;
        renderer.shutdown().await;

        if !aggregator.is_complete() {
            return Err(PagexError::Worker(format!(
                "Received {} of {} render results",
                aggregator.received(),
                total_paths
            )));
        }

        let mut prerendered_copied = 0;
        if !context.build_export {
            if let Some(manifest) = &prerender {
                let pages_dir = dist_pages_dir(
                    &self.config.export.dist_path(),
                    &build_id,
                    context.serverless,
                );
                let copier = PrerenderCopier::new(
                    pages_dir,
                    &context.out_dir,
                    &context.pages_data_dir,
                    context.subfolders,
                );
                prerendered_copied = copier.copy_all(manifest).await?;
            }
        }

        if !aggregator.amp_validations().is_empty() {
            println!("{}", format_amp_report(aggregator.amp_validations()));
        }

        aggregator.verdict()?;

        self.persister.mark_succeeded(&context.out_dir).await?;

        let failed_paths: Vec<String> = aggregator.failed_paths().map(str::to_string).collect();
        let summary = ExportSummary {
            build_id,
            total_paths,
            rendered: total_paths - failed_paths.len(),
            failed_paths,
            skipped_api_routes,
            amp_validations: aggregator.amp_validations().clone(),
            revalidations: aggregator.revalidations().clone(),
            prerendered_copied,
            duration: started.elapsed(),
        };
        summary.log_summary();
        Ok(summary)
    }

    fn validate_dirs(&self, project_dir: &Path, dist_dir: &Path, out_dir: &Path) -> Result<()> {
        if !dist_dir.is_dir() {
            return Err(PagexError::Configuration(format!(
                "Build directory {} does not exist. Run the build before exporting",
                dist_dir.display()
            )));
        }

        for reserved in RESERVED_OUT_DIRS {
            if out_dir == project_dir.join(reserved) {
                return Err(PagexError::Configuration(format!(
                    "The '{}' directory is reserved and cannot be used as the export output directory",
                    reserved
                )));
            }
        }
        Ok(())
    }

    fn render_options(&self, build_id: &str) -> RenderOptions {
        let export = &self.config.export;
        RenderOptions {
            asset_prefix: export.asset_prefix.clone(),
            canonical_base: export.canonical_base.clone(),
            amp_validator_path: export.amp_validator_path.clone(),
            amp_skip_validation: export.amp_skip_validation,
            ..RenderOptions::new(build_id)
        }
    }
}

async fn read_build_id(dist_dir: &Path) -> Result<String> {
    let path: PathBuf = dist_dir.join(BUILD_ID_FILE);
    let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
        PagexError::Configuration(format!(
            "Could not read build id from {}: {}",
            path.display(),
            e
        ))
    })?;

    let build_id = contents.trim();
    if build_id.is_empty() {
        return Err(PagexError::Configuration(format!(
            "Build id file {} is empty",
            path.display()
        )));
    }
    Ok(build_id.to_string())
}
