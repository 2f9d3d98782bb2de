//! Property evaluation through `dotnet msbuild -getProperty`
//!
//! Each candidate is evaluated for `TargetFramework` first. When that query
//! fails or prints nothing (multi-targeting projects leave it empty), the
//! plural `TargetFrameworks` is queried instead. At most two processes are
//! spawned per candidate and there are no retries.

use super::error::ResolveError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace};

pub const PRIMARY_PROPERTY: &str = "TargetFramework";
pub const FALLBACK_PROPERTY: &str = "TargetFrameworks";

/// Captured result of one external process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
}

impl ProcessOutput {
    /// Trimmed stdout, if the process exited zero and printed something.
    pub fn value(&self) -> Option<String> {
        let trimmed = self.stdout.trim();
        if self.success && !trimmed.is_empty() {
            Some(trimmed.to_string())
        } else {
            None
        }
    }
}

/// Spawns external processes; swapped for a fake in tests
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput, ResolveError>;
}

/// Runs processes with `tokio::process`, killing any child that outlives
/// the configured timeout.
#[derive(Debug, Clone)]
pub struct TokioProcessRunner {
    timeout: Duration,
}

impl TokioProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput, ResolveError> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ResolveError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ResolveError::Timeout {
                seconds: self.timeout.as_secs(),
            })??;

        Ok(ProcessOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

enum ResolveState {
    TryPrimary,
    TryFallback,
    Done(Option<String>),
}

/// Resolves the raw target framework value of a project file
#[derive(Clone)]
pub struct PropertyResolver {
    tool: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl PropertyResolver {
    pub fn new(tool: impl Into<PathBuf>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            tool: tool.into(),
            runner,
        }
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }

    /// Returns the trimmed property value, `Ok(None)` when neither property
    /// produced output, or the first invocation error encountered.
    pub async fn resolve(&self, candidate: &Path) -> Result<Option<String>, ResolveError> {
        let mut state = ResolveState::TryPrimary;

        loop {
            state = match state {
                ResolveState::TryPrimary => match self.query(candidate, PRIMARY_PROPERTY).await? {
                    Some(value) => ResolveState::Done(Some(value)),
                    None => ResolveState::TryFallback,
                },
                ResolveState::TryFallback => {
                    ResolveState::Done(self.query(candidate, FALLBACK_PROPERTY).await?)
                }
                ResolveState::Done(value) => return Ok(value),
            };
        }
    }

    async fn query(&self, candidate: &Path, property: &str) -> Result<Option<String>, ResolveError> {
        let args = [
            OsString::from("msbuild"),
            candidate.as_os_str().to_os_string(),
            OsString::from(format!("-getProperty:{}", property)),
        ];

        trace!(candidate = %candidate.display(), property, "Querying property");
        let output = self.runner.run(&self.tool, &args).await?;
        let value = output.value();

        debug!(
            candidate = %candidate.display(),
            property,
            exit_code = ?output.exit_code,
            found = value.is_some(),
            "Property query finished"
        );

        Ok(value)
    }
}
