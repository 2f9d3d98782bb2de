//! Command handlers; each returns the process exit code

use super::commands::{DiscoveryArgs, InitArgs, WhichArgs, WorkflowArgs};
use super::output::{format_summary, format_versions, write_versions_file};
use super::workflow::{write_workflow, WorkflowOutcome, WORKFLOW_PATH};
use crate::config::WhichConfig;
use crate::discovery::{
    DiscoveryError, DiscoveryPipeline, DotNetMuxer, FixedLocator, ToolLocator, TokioProcessRunner,
    VersionKey,
};
use crate::progress::{LoggingHandler, NoOpHandler, ProgressHandler};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Applies command-line overrides on top of the environment configuration.
pub fn effective_config(base: &WhichConfig, args: &DiscoveryArgs) -> WhichConfig {
    let mut config = base.clone();
    if let Some(parallelism) = args.parallelism {
        config.parallelism = parallelism;
    }
    if let Some(timeout) = args.timeout {
        config.tool_timeout_secs = timeout;
    }
    config.sequential |= args.sequential;
    config
}

fn resolve_root(args: &DiscoveryArgs) -> Result<PathBuf> {
    match &args.directory {
        Some(dir) => Ok(dir.clone()),
        None => env::current_dir().context("Failed to get current directory"),
    }
}

fn build_pipeline(
    config: &WhichConfig,
    args: &DiscoveryArgs,
    progress: Arc<dyn ProgressHandler>,
) -> DiscoveryPipeline {
    let locator: Arc<dyn ToolLocator> = match &args.dotnet {
        Some(path) => Arc::new(FixedLocator::new(path.clone())),
        None => Arc::new(DotNetMuxer),
    };

    DiscoveryPipeline::new(
        config.pipeline_config(),
        locator,
        Arc::new(TokioProcessRunner::new(config.tool_timeout())),
    )
    .with_progress(progress)
}

/// Runs discovery and returns the sorted keys, logging any fatal error.
async fn discover(
    base: &WhichConfig,
    args: &DiscoveryArgs,
    progress: Arc<dyn ProgressHandler>,
) -> Option<Vec<VersionKey>> {
    let config = effective_config(base, args);
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your environment variables and command-line arguments.");
        return None;
    }
    debug!("{}", config);

    let root = match resolve_root(args) {
        Ok(root) => root,
        Err(e) => {
            error!("{:#}", e);
            return None;
        }
    };

    let pipeline = build_pipeline(&config, args, progress);
    match pipeline.run(&root).await {
        Ok(versions) => Some(versions.sorted()),
        Err(DiscoveryError::ToolNotFound) => {
            error!("No .NET SDK found.");
            eprintln!("\nPossible solutions:");
            eprintln!("  - Install the .NET SDK: https://dot.net/download");
            eprintln!("  - Set DOTNET_HOST_PATH or DOTNET_ROOT to an existing installation");
            eprintln!("  - Pass the executable explicitly: --dotnet /path/to/dotnet");
            None
        }
        Err(e) => {
            error!("Discovery failed: {}", e);
            None
        }
    }
}

/// Default command: JSON to stdout, or to a file with `-o`.
pub async fn handle_which(config: &WhichConfig, args: &WhichArgs, quiet: bool) -> i32 {
    // Nothing but the JSON document may reach stdout in this mode.
    let to_stdout = args.output.is_none();
    let progress: Arc<dyn ProgressHandler> = if to_stdout {
        Arc::new(NoOpHandler)
    } else {
        Arc::new(LoggingHandler)
    };

    let Some(versions) = discover(config, &args.discovery, progress).await else {
        return 1;
    };

    if versions.is_empty() {
        warn!("No .NET major versions found.");
    } else {
        info!("Discovered .NET versions: {}", format_summary(&versions));
    }

    let json = match format_versions(&versions) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            return 1;
        }
    };

    match &args.output {
        None => {
            println!("{}", json);
            0
        }
        Some(path) => write_output(path, &json, quiet),
    }
}

/// `init`: writes the versions file when at least one version was found.
pub async fn handle_init(config: &WhichConfig, args: &InitArgs, quiet: bool) -> i32 {
    let Some(versions) = discover(config, &args.discovery, Arc::new(LoggingHandler)).await else {
        return 1;
    };

    if versions.is_empty() {
        warn!("No .NET major versions found.");
        if !quiet {
            println!("No .NET major versions found.");
        }
        return 0;
    }

    if !quiet {
        println!("Discovered .NET versions: {}", format_summary(&versions));
    }

    match format_versions(&versions) {
        Ok(json) => write_output(&args.versions_file, &json, quiet),
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}

/// `workflow`: writes the GitHub Actions workflow, refusing to overwrite.
pub fn handle_workflow(args: &WorkflowArgs) -> i32 {
    match write_workflow(Path::new(WORKFLOW_PATH), &args.versions_file) {
        Ok(WorkflowOutcome::Created(path)) => {
            info!("Workflow written to: {}", path.display());
            println!("Workflow written to: {}", path.display());
            0
        }
        Ok(WorkflowOutcome::AlreadyExists(path)) => {
            eprintln!("Workflow file already exists at {}", path.display());
            1
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

fn write_output(path: &Path, json: &str, quiet: bool) -> i32 {
    match write_versions_file(path, json) {
        Ok(written) => {
            info!("Output written to: {}", written.display());
            if !quiet {
                println!("Output written to: {}", written.display());
            }
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}
