use super::error::DiscoveryError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Returns true for file names shaped like `*.*proj` (`.csproj`, `.fsproj`,
/// `.vbproj`, `.proj`, ...).
pub fn is_project_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, extension)) => extension.to_ascii_lowercase().ends_with("proj"),
        None => false,
    }
}

/// Enumerates project file candidates under a root directory.
///
/// Every subdirectory is visited, including hidden and VCS-ignored ones.
/// Symlinks are not followed. Validity of each candidate is left to the
/// prober.
pub struct ProjectScanner {
    root: PathBuf,
}

impl ProjectScanner {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, DiscoveryError> {
        let root = root.into();
        if !root.exists() {
            return Err(DiscoveryError::InvalidRoot {
                path: root,
                reason: "path does not exist".to_string(),
            });
        }
        if !root.is_dir() {
            return Err(DiscoveryError::InvalidRoot {
                path: root,
                reason: "path is not a directory".to_string(),
            });
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the tree and collects candidates. Any traversal error is fatal.
    pub fn scan(&self) -> Result<Vec<PathBuf>, DiscoveryError> {
        let start = Instant::now();
        let mut candidates = Vec::new();
        let mut files_scanned = 0usize;

        for result in WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .build()
        {
            let entry = result.map_err(|source| DiscoveryError::Traversal {
                path: self.root.clone(),
                source,
            })?;

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            files_scanned += 1;

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if is_project_file(name) {
                debug!(path = %entry.path().display(), "Found project candidate");
                candidates.push(entry.into_path());
            }
        }

        info!(
            root = %self.root.display(),
            candidates = candidates.len(),
            files_scanned,
            scan_time_ms = start.elapsed().as_millis() as u64,
            "Scan completed"
        );

        Ok(candidates)
    }
}
