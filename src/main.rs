use dotnet_which::cli::commands::{CliArgs, Commands};
use dotnet_which::cli::handlers::{handle_init, handle_which, handle_workflow};
use dotnet_which::util::{init_logging, parse_level, LoggingConfig};
use dotnet_which::{WhichConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let config = match WhichConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging_from_args(&args, &config);

    debug!("dotnet-which v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        None => handle_which(&config, &args.which, args.quiet).await,
        Some(Commands::Init(init_args)) => handle_init(&config, init_args, args.quiet).await,
        Some(Commands::Workflow(workflow_args)) => handle_workflow(workflow_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &WhichConfig) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet || args.writes_json_to_stdout() {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig {
        use_json: config.log_json,
        ..LoggingConfig::with_level(level)
    });
}
