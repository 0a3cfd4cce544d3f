use nuget_inspector::cli::commands::{CliArgs, Commands};
use nuget_inspector::cli::handlers::handle_inspect;
use nuget_inspector::util::logging::{self, config_from_env, parse_level};
use nuget_inspector::VERSION;

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("nuget-inspector v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Inspect(inspect_args) => handle_inspect(inspect_args, args.verbose),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        Some(parse_level(level_str))
    } else if args.quiet {
        Some(Level::ERROR)
    } else {
        None
    };

    logging::init_logging(config_from_env(level));
}
