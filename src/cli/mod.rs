pub mod commands;
pub mod handlers;
pub mod output;
pub mod workflow;

pub use commands::{CliArgs, Commands, DiscoveryArgs, InitArgs, WhichArgs, WorkflowArgs};
pub use output::{format_summary, format_versions, write_versions_file};
