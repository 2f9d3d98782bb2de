//! Error types for the discovery pipeline
//!
//! Only [`DiscoveryError`] ever reaches a caller of the pipeline. Probe and
//! resolve errors are per-candidate and are converted into diagnostics at the
//! stage that produced them.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a whole discovery run
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The root directory is missing or is not a directory
    #[error("Invalid root directory {path:?}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// Walking the directory tree failed
    #[error("Failed to traverse {path:?}: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// No `dotnet` executable could be located on this host
    #[error("No .NET SDK found")]
    ToolNotFound,
}

/// Reasons a candidate could not be probed
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Content is not valid {0}")]
    Encoding(&'static str),

    #[error("probe task failed: {0}")]
    Join(String),
}

/// Reasons a single external tool invocation failed
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to start {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
