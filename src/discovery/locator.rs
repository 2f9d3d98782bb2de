//! Locating the `dotnet` muxer

use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(windows)]
const MUXER_NAME: &str = "dotnet.exe";
#[cfg(not(windows))]
const MUXER_NAME: &str = "dotnet";

/// Finds the external build tool, or reports that none is installed
pub trait ToolLocator: Send + Sync {
    fn locate(&self) -> Option<PathBuf>;
}

/// Resolves the `dotnet` executable the same way the SDK's own tooling does:
/// `DOTNET_HOST_PATH`, then `$DOTNET_ROOT/dotnet`, then a `PATH` search.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotNetMuxer;

impl DotNetMuxer {
    fn from_host_path() -> Option<PathBuf> {
        env::var_os("DOTNET_HOST_PATH")
            .map(PathBuf::from)
            .filter(|p| p.is_file())
    }

    fn from_dotnet_root() -> Option<PathBuf> {
        env::var_os("DOTNET_ROOT")
            .map(|root| Path::new(&root).join(MUXER_NAME))
            .filter(|p| p.is_file())
    }

    fn from_path() -> Option<PathBuf> {
        which::which("dotnet").ok()
    }
}

impl ToolLocator for DotNetMuxer {
    fn locate(&self) -> Option<PathBuf> {
        let found = Self::from_host_path()
            .or_else(Self::from_dotnet_root)
            .or_else(Self::from_path);

        match &found {
            Some(path) => debug!(path = %path.display(), "Located dotnet muxer"),
            None => debug!("dotnet muxer not found"),
        }
        found
    }
}

/// Locator with a predetermined answer
#[derive(Debug, Default, Clone)]
pub struct FixedLocator(Option<PathBuf>);

impl FixedLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl ToolLocator for FixedLocator {
    fn locate(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}
