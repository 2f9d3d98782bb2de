//! Two-stage discovery pipeline
//!
//! ```text
//! scan ─▶ probe (bounded fan-out) ─▶ barrier ─▶ locate dotnet
//!      ─▶ resolve + normalize (bounded fan-out) ─▶ barrier ─▶ VersionSet
//! ```
//!
//! Per-candidate failures in either stage are reported as
//! [`ProgressEvent::Diagnostic`] and drop only that candidate. The run fails
//! only when the root cannot be traversed or `dotnet` cannot be located.

use super::error::{DiscoveryError, ProbeError};
use super::locator::ToolLocator;
use super::normalize::normalize;
use super::probe::probe;
use super::resolver::{ProcessRunner, PropertyResolver};
use super::scanner::ProjectScanner;
use super::version::VersionSet;
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Concurrency settings for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    parallelism: usize,
}

impl Default for PipelineConfig {
    /// One concurrent operation per available CPU
    fn default() -> Self {
        Self::with_parallelism(num_cpus::get())
    }
}

impl PipelineConfig {
    /// Values below 1 are clamped to 1.
    pub fn with_parallelism(parallelism: usize) -> Self {
        Self {
            parallelism: parallelism.max(1),
        }
    }

    /// Strictly one operation at a time, for step-through debugging
    pub fn sequential() -> Self {
        Self::with_parallelism(1)
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }
}

/// Discovers the distinct .NET major versions targeted under a directory
pub struct DiscoveryPipeline {
    config: PipelineConfig,
    locator: Arc<dyn ToolLocator>,
    runner: Arc<dyn ProcessRunner>,
    progress: Arc<dyn ProgressHandler>,
}

impl DiscoveryPipeline {
    pub fn new(
        config: PipelineConfig,
        locator: Arc<dyn ToolLocator>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            config,
            locator,
            runner,
            progress: Arc::new(LoggingHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs scan, probe and resolve over `root`.
    ///
    /// An empty result is a successful run.
    pub async fn run(&self, root: &Path) -> Result<VersionSet, DiscoveryError> {
        let start = Instant::now();
        self.progress.on_progress(&ProgressEvent::Started {
            root: root.to_path_buf(),
        });

        let candidates = ProjectScanner::new(root)?.scan()?;
        self.progress
            .on_progress(&ProgressEvent::CandidatesFound { count: candidates.len() });

        let projects = self.discover_projects(candidates).await;
        self.progress
            .on_progress(&ProgressEvent::ProjectsDiscovered { count: projects.len() });

        let tool = self.locator.locate().ok_or(DiscoveryError::ToolNotFound)?;
        let versions = self.collect_versions(projects, tool).await;

        self.progress.on_progress(&ProgressEvent::Completed {
            versions: versions.len(),
            elapsed: start.elapsed(),
        });

        Ok(versions)
    }

    /// Probe stage: keeps the candidates that are SDK-style projects.
    ///
    /// Returned paths are sorted so later stages see a stable input.
    pub async fn discover_projects(&self, candidates: Vec<PathBuf>) -> Vec<PathBuf> {
        let total = candidates.len();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));
        let processed = Arc::new(AtomicUsize::new(0));
        let mut join_set = JoinSet::new();

        for candidate in candidates {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let processed = Arc::clone(&processed);
            let progress = Arc::clone(&self.progress);

            join_set.spawn(async move {
                let _permit = permit;
                let path = candidate.clone();
                let outcome = tokio::task::spawn_blocking(move || probe(&path))
                    .await
                    .unwrap_or_else(|e| Err(ProbeError::Join(e.to_string())));

                let retained = match outcome {
                    Ok(retained) => retained,
                    Err(e) => {
                        progress.on_progress(&ProgressEvent::Diagnostic {
                            path: candidate.clone(),
                            message: e.to_string(),
                        });
                        false
                    }
                };

                progress.on_progress(&ProgressEvent::Probed {
                    processed: processed.fetch_add(1, Ordering::SeqCst) + 1,
                    total,
                    retained,
                });

                retained.then_some(candidate)
            });
        }

        let mut projects = HashSet::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Some(project)) => {
                    projects.insert(project);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Probe task failed"),
            }
        }

        let mut projects: Vec<PathBuf> = projects.into_iter().collect();
        projects.sort();
        debug!(projects = projects.len(), candidates = total, "Probe stage complete");
        projects
    }

    /// Resolve stage: evaluates every project with `tool` and aggregates
    /// the normalized version keys.
    pub async fn collect_versions(&self, projects: Vec<PathBuf>, tool: PathBuf) -> VersionSet {
        let total = projects.len();
        let resolver = PropertyResolver::new(tool, Arc::clone(&self.runner));
        let versions = Arc::new(VersionSet::new());
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));
        let processed = Arc::new(AtomicUsize::new(0));
        let mut join_set = JoinSet::new();

        for project in projects {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let resolver = resolver.clone();
            let versions = Arc::clone(&versions);
            let processed = Arc::clone(&processed);
            let progress = Arc::clone(&self.progress);

            join_set.spawn(async move {
                let _permit = permit;

                match resolver.resolve(&project).await {
                    Ok(Some(raw)) => {
                        let keys = normalize(&raw);
                        if keys.is_empty() {
                            debug!(
                                project = %project.display(),
                                value = %raw,
                                "No .NET version in target frameworks"
                            );
                        }
                        versions.extend(keys);
                    }
                    Ok(None) => progress.on_progress(&ProgressEvent::Diagnostic {
                        path: project.clone(),
                        message: "No target framework could be resolved".to_string(),
                    }),
                    Err(e) => progress.on_progress(&ProgressEvent::Diagnostic {
                        path: project.clone(),
                        message: e.to_string(),
                    }),
                }

                progress.on_progress(&ProgressEvent::Resolved {
                    processed: processed.fetch_add(1, Ordering::SeqCst) + 1,
                    total,
                    versions: versions.len(),
                });
            });
        }

        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Resolve task failed");
            }
        }

        // Every task has joined, so this is the only remaining reference.
        Arc::try_unwrap(versions).unwrap_or_else(|shared| shared.sorted().into_iter().collect())
    }
}
