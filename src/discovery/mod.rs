//! .NET target version discovery
//!
//! - [`scanner`]: enumerates `*.*proj` candidates under a root directory
//! - [`probe`]: keeps only SDK-style project files
//! - [`resolver`]: asks `dotnet msbuild` for the effective target frameworks
//! - [`normalize`]: maps monikers such as `net8.0` to version keys (`8.x`)
//! - [`pipeline`]: runs the above as bounded-parallel stages and aggregates

pub mod error;
pub mod locator;
pub mod normalize;
pub mod pipeline;
pub mod probe;
pub mod resolver;
pub mod scanner;
pub mod version;

pub use error::{DiscoveryError, ProbeError, ResolveError};
pub use locator::{DotNetMuxer, FixedLocator, ToolLocator};
pub use normalize::{normalize, normalize_moniker};
pub use pipeline::{DiscoveryPipeline, PipelineConfig};
pub use probe::probe;
pub use resolver::{ProcessOutput, ProcessRunner, PropertyResolver, TokioProcessRunner};
pub use scanner::{is_project_file, ProjectScanner};
pub use version::{VersionKey, VersionSet};
