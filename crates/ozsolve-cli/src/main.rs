mod cli;
mod commands;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};

/// Exit status for errors raised before or outside the solver; solver return
/// codes 0 to 2 pass through unchanged.
const ERROR_EXIT_CODE: u8 = 3;

fn main() -> ExitCode {
    match run_app() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(ERROR_EXIT_CODE)),
        Err(e) => {
            eprintln!("\nError: {}", e);
            ExitCode::from(ERROR_EXIT_CODE)
        }
    }
}

fn run_app() -> Result<i32> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("oz v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        if num_threads == 0 {
            return Err(CliError::Argument(
                "--threads must be at least 1".to_string(),
            ));
        }
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let show_progress = !cli.quiet;
    let result = match cli.command {
        Commands::Hs(args) => {
            info!("Dispatching to 'hs' command.");
            commands::hs::run(args, show_progress)
        }
        Commands::Urpm(args) => {
            info!("Dispatching to 'urpm' command.");
            commands::urpm::run(args, show_progress)
        }
        Commands::Run(args) => {
            info!("Dispatching to 'run' command.");
            commands::run::run(args, show_progress)
        }
    };

    match &result {
        Ok(0) => info!("Command completed successfully."),
        Ok(code) => error!(return_code = code, "Solver did not converge."),
        Err(e) => error!("Command failed: {}", e),
    }
    result
}
