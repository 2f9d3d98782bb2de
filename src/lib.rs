//! dotnet-which - discovers the .NET major versions a repository targets
//!
//! The library walks a directory tree for project files, keeps the SDK-style
//! ones, asks `dotnet msbuild` for each project's effective target frameworks
//! and folds the results into a sorted set of major versions such as
//! `["8.x", "9.x"]`.
//!
//! # Example Usage
//!
//! ```no_run
//! use dotnet_which::discovery::{DotNetMuxer, TokioProcessRunner};
//! use dotnet_which::{DiscoveryPipeline, WhichConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WhichConfig::from_env()?;
//! let pipeline = DiscoveryPipeline::new(
//!     config.pipeline_config(),
//!     Arc::new(DotNetMuxer),
//!     Arc::new(TokioProcessRunner::new(config.tool_timeout())),
//! );
//! let versions = pipeline.run(Path::new(".")).await?;
//!
//! for key in versions.sorted() {
//!     println!("{}", key);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`discovery`]: scanning, probing, property resolution and aggregation
//! - [`progress`]: run events and diagnostics
//! - [`cli`]: command-line surface of the `dotnet-which` binary

pub mod cli;
pub mod config;
pub mod discovery;
pub mod progress;
pub mod util;

pub use config::{ConfigError, WhichConfig};
pub use discovery::{
    normalize, DiscoveryError, DiscoveryPipeline, PipelineConfig, ProcessRunner, PropertyResolver,
    VersionKey, VersionSet,
};
pub use progress::{ProgressEvent, ProgressHandler};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
