use super::commands::InspectArgs;
use super::output::OutputFormatter;
use crate::config::InspectionOptions;
use crate::inspection::{dispatch_target, InspectionContext};
use crate::model::InspectionResult;
use std::io::Write;
use tracing::{debug, error, info};

/// Runs `inspect` and prints the results to stdout. Returns the exit code:
/// 0 when every result is a Success, 1 otherwise.
pub fn handle_inspect(args: &InspectArgs, verbose: bool) -> i32 {
    let base = match InspectionOptions::from_env() {
        Ok(base) => base,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return 1;
        }
    };
    let options = args.to_options(base, verbose);
    debug!(?options, "Resolved command-line options");

    let context = InspectionContext::for_options(&options);

    let results = match dispatch_target(&options, &context) {
        Ok(results) => results,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    let output = match formatter.format(&results) {
        Ok(output) => output,
        Err(e) => {
            error!("Failed to format results: {:#}", e);
            return 1;
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", output) {
        error!("Failed to write results: {}", e);
        return 1;
    }

    exit_code(&results)
}

fn exit_code(results: &[InspectionResult]) -> i32 {
    let failed = results.iter().filter(|r| !r.is_success()).count();
    info!("Inspected {} units, {} failed", results.len(), failed);
    if failed == 0 {
        0
    } else {
        1
    }
}
