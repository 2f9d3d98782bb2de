//! GitHub Actions workflow that keeps the versions file current

use super::commands::DEFAULT_VERSIONS_PATH;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the workflow is written, relative to the working directory
pub const WORKFLOW_PATH: &str = "./.github/workflows/dotnet-env.yml";

const TEMPLATE: &str = include_str!("templates/dotnet-env.yml");

/// Outcome of [`write_workflow`]
#[derive(Debug, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Renders the template, pointing it at `versions_file`.
pub fn render_workflow(versions_file: &Path) -> String {
    let versions_file = versions_file.to_string_lossy();
    if versions_file == DEFAULT_VERSIONS_PATH {
        TEMPLATE.to_string()
    } else {
        TEMPLATE.replace(DEFAULT_VERSIONS_PATH, &versions_file)
    }
}

/// Writes the workflow to `target` unless a file is already there.
pub fn write_workflow(target: &Path, versions_file: &Path) -> Result<WorkflowOutcome> {
    if target.exists() {
        return Ok(WorkflowOutcome::AlreadyExists(target.to_path_buf()));
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(target, render_workflow(versions_file))
        .with_context(|| format!("Failed to write workflow to {}", target.display()))?;

    Ok(WorkflowOutcome::Created(target.to_path_buf()))
}
