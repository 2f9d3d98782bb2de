//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, trace, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { root } => {
                info!(root = %root.display(), "Discovering .NET SDK projects");
            }
            ProgressEvent::CandidatesFound { count } => {
                debug!(candidates = count, "Scan found project candidates");
            }
            ProgressEvent::Probed {
                processed,
                total,
                retained,
            } => {
                trace!(
                    progress = %format!("{}/{}", processed, total),
                    retained,
                    "Probed candidate"
                );
            }
            ProgressEvent::ProjectsDiscovered { count } => {
                info!(projects = count, "Discovered .NET SDK projects");
            }
            ProgressEvent::Resolved {
                processed,
                total,
                versions,
            } => {
                debug!(
                    progress = %format!("{}/{}", processed, total),
                    versions,
                    "Discovering .NET versions"
                );
            }
            ProgressEvent::Diagnostic { path, message } => {
                warn!(path = %path.display(), "{}", message);
            }
            ProgressEvent::Completed { versions, elapsed } => {
                info!(
                    versions,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Discovery complete"
                );
            }
        }
    }
}
