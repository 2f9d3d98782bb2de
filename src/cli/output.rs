//! Rendering and writing the versions document
//!
//! The document is a pretty-printed JSON array of version keys in ascending
//! order, e.g.
//!
//! ```json
//! [
//!   "8.x",
//!   "9.x"
//! ]
//! ```

use crate::discovery::VersionKey;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Serializes already-sorted version keys as pretty JSON.
pub fn format_versions(versions: &[VersionKey]) -> Result<String> {
    serde_json::to_string_pretty(versions).context("Failed to serialize versions to JSON")
}

/// Comma-separated keys for human-readable status lines
pub fn format_summary(versions: &[VersionKey]) -> String {
    versions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes `json` to `path`, creating parent directories as needed.
///
/// Returns the absolute path that was written.
pub fn write_versions_file(path: &Path, json: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, format!("{}\n", json))
        .with_context(|| format!("Failed to write versions to {}", path.display()))?;

    Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_versions_pretty_json() {
        let json = format_versions(&[VersionKey::new(8), VersionKey::new(9)]).unwrap();
        assert_eq!(json, "[\n  \"8.x\",\n  \"9.x\"\n]");
    }

    #[test]
    fn test_format_empty_versions() {
        assert_eq!(format_versions(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_format_summary() {
        assert_eq!(
            format_summary(&[VersionKey::new(3), VersionKey::new(17)]),
            "3.x, 17.x"
        );
        assert_eq!(format_summary(&[]), "");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".github/workflows/dotnet.json");

        let written = write_versions_file(&path, "[\n  \"8.x\"\n]").unwrap();

        assert!(written.is_absolute());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[\n  \"8.x\"\n]\n");
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dotnet.json");
        fs::write(&path, "stale").unwrap();

        write_versions_file(&path, "[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }
}
