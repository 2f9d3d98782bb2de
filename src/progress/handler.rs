//! Progress handler trait and events

use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while a discovery run progresses
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started for the given root directory
    Started { root: PathBuf },

    /// Scanner finished enumerating candidate files
    CandidatesFound { count: usize },

    /// One candidate finished probing
    Probed {
        processed: usize,
        total: usize,
        retained: bool,
    },

    /// Probe stage barrier reached
    ProjectsDiscovered { count: usize },

    /// One project finished property resolution
    Resolved {
        processed: usize,
        total: usize,
        versions: usize,
    },

    /// Low-severity, per-candidate problem; the candidate was dropped
    Diagnostic { path: PathBuf, message: String },

    /// Run finished successfully
    Completed { versions: usize, elapsed: Duration },
}

/// Receives progress events; implementations must tolerate concurrent calls
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// Handler that ignores all events, for pure JSON output on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
