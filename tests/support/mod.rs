use async_trait::async_trait;
use dotnet_which::discovery::{ProcessOutput, ProcessRunner, ResolveError};
use dotnet_which::{ProgressEvent, ProgressHandler};
use regex::Regex;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[allow(dead_code)]
pub fn get_dotnet_which_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.join("dotnet-which")
}

/// Writes an SDK-style project whose only property group holds `properties`.
#[allow(dead_code)]
pub fn write_sdk_project(path: &Path, properties: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(
        path,
        format!(
            "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    {}\n  </PropertyGroup>\n</Project>\n",
            properties
        ),
    )
    .unwrap();
}

/// Stands in for `dotnet msbuild <project> -getProperty:<name>`.
///
/// The property is read straight out of the project file, which is enough
/// to model single and multi-targeting projects without an SDK installed.
/// Projects whose file name contains `broken` make the evaluation exit 1.
#[allow(dead_code)]
pub struct FakeMsbuild {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[allow(dead_code)]
impl FakeMsbuild {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn evaluate(project: &Path, property: &str) -> ProcessOutput {
        let broken = project
            .file_name()
            .map(|name| name.to_string_lossy().contains("broken"))
            .unwrap_or(false);
        if broken {
            return ProcessOutput {
                success: false,
                exit_code: Some(1),
                stdout: "error MSB4025: The project file could not be loaded.".to_string(),
            };
        }

        let content = fs::read_to_string(project).unwrap_or_default();
        let pattern = Regex::new(&format!(r"<{0}>([^<]*)</{0}>", property)).unwrap();
        let value = pattern
            .captures(&content)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        ProcessOutput {
            success: true,
            exit_code: Some(0),
            stdout: format!("{}\n", value),
        }
    }
}

#[async_trait]
impl ProcessRunner for FakeMsbuild {
    async fn run(&self, _program: &Path, args: &[OsString]) -> Result<ProcessOutput, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let project = PathBuf::from(&args[1]);
        let property = args[2]
            .to_string_lossy()
            .trim_start_matches("-getProperty:")
            .to_string();
        let output = Self::evaluate(&project, &property);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(output)
    }
}

/// Collects every event for later assertions.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<ProgressEvent>>,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn diagnostics(&self) -> Vec<(PathBuf, String)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Diagnostic { path, message } => {
                    Some((path.clone(), message.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn discovered_projects(&self) -> Option<usize> {
        self.events.lock().unwrap().iter().find_map(|event| match event {
            ProgressEvent::ProjectsDiscovered { count } => Some(*count),
            _ => None,
        })
    }
}

impl ProgressHandler for RecordingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
