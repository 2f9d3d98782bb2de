use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default location of the versions file consumed by the bundled workflow
pub const DEFAULT_VERSIONS_PATH: &str = "./.github/workflows/dotnet.json";

/// Discovers .NET versions used in a directory tree recursively
#[derive(Parser, Debug)]
#[command(
    name = "dotnet-which",
    about = "Discovers .NET versions used in the current directory recursively",
    version,
    author,
    args_conflicts_with_subcommands = true,
    long_about = "dotnet-which finds every SDK-style project (*.csproj, *.fsproj, *.vbproj, ...) \
                  below a directory, asks `dotnet msbuild` for each project's target frameworks \
                  and prints the distinct .NET major versions as a JSON array, e.g. [\"8.x\", \"9.x\"].\n\n\
                  Examples:\n  \
                  dotnet-which\n  \
                  dotnet-which -C src | jq -r '.[]'\n  \
                  dotnet-which -o\n  \
                  dotnet-which -o versions.json --sequential\n  \
                  dotnet-which workflow"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub which: WhichArgs,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// True when the JSON result goes to stdout, which must then carry
    /// nothing else.
    pub fn writes_json_to_stdout(&self) -> bool {
        self.command.is_none() && self.which.output.is_none()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Discovers .NET versions and writes them to a versions file",
        long_about = "Discovers .NET versions like the default command, but always writes the \
                      result to a versions file. Nothing is written when no versions are found.\n\n\
                      Examples:\n  \
                      dotnet-which init\n  \
                      dotnet-which init ./build/dotnet.json"
    )]
    Init(InitArgs),

    #[command(
        about = "Creates a GitHub Actions workflow that keeps the versions file up to date",
        long_about = "Writes .github/workflows/dotnet-env.yml. Fails if the file already exists.\n\n\
                      Examples:\n  \
                      dotnet-which workflow\n  \
                      dotnet-which workflow ./build/dotnet.json"
    )]
    Workflow(WorkflowArgs),
}

/// Options shared by every command that runs discovery
#[derive(Args, Debug, Clone, Default)]
pub struct DiscoveryArgs {
    #[arg(
        short = 'C',
        long = "directory",
        value_name = "DIR",
        help = "Directory to scan (defaults to current directory)"
    )]
    pub directory: Option<PathBuf>,

    #[arg(
        short = 'j',
        long,
        value_name = "N",
        help = "Maximum concurrent operations (defaults to CPU count)"
    )]
    pub parallelism: Option<usize>,

    #[arg(long, help = "Process one project at a time")]
    pub sequential: bool,

    #[arg(long, value_name = "PATH", help = "Path to the dotnet executable")]
    pub dotnet: Option<PathBuf>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Timeout for each dotnet msbuild invocation"
    )]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WhichArgs {
    #[command(flatten)]
    pub discovery: DiscoveryArgs,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_VERSIONS_PATH,
        help = "Write versions to a file instead of stdout (defaults to ./.github/workflows/dotnet.json)"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[command(flatten)]
    pub discovery: DiscoveryArgs,

    #[arg(
        value_name = "FILE",
        default_value = DEFAULT_VERSIONS_PATH,
        help = "Path of the versions file to write"
    )]
    pub versions_file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct WorkflowArgs {
    #[arg(
        value_name = "FILE",
        default_value = DEFAULT_VERSIONS_PATH,
        help = "Path of the versions file the workflow maintains"
    )]
    pub versions_file: PathBuf,
}
