pub mod hs;
pub mod run;
pub mod urpm;

use crate::cli::SolverArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ozsolve::analysis::report;
use ozsolve::core::params::{IterationParams, RunParams};
use ozsolve::engine::progress::ProgressReporter;
use ozsolve::workflows::run::{self as workflow, RunOutcome};
use tracing::{info, warn};

impl From<&SolverArgs> for IterationParams {
    fn from(args: &SolverArgs) -> Self {
        Self {
            alpha: Some(args.alpha),
            npic: Some(args.npic),
            nps: Some(args.nps),
            maxsteps: Some(args.maxsteps),
            tolerance: args.tolerance,
            divergence_limit: None,
        }
    }
}

/// Solves one run, prints the reports and returns the solver's return code.
pub(crate) fn execute(params: &RunParams, show_progress: bool) -> Result<i32> {
    let handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let outcome = workflow::run(params, reporter)?;
    print!("{}", outcome.params_report);
    print_outcome(&outcome);
    Ok(outcome.return_code())
}

fn print_outcome(outcome: &RunOutcome) {
    let solution = &outcome.solution;
    match outcome.thermodynamics_report() {
        Some(text) => {
            info!(closure = %solution.closure_name(), "Solution converged.");
            print!("{text}");
            if solution.z().iter().any(|&z| z != 0.0) {
                println!("{}", report::structure_at_origin(solution));
            }
        }
        None => {
            warn!(
                closure = %solution.closure_name(),
                status = %solution.status,
                return_code = solution.return_code(),
                "No thermodynamics for an unconverged solution."
            );
            println!(
                "{}: {} after {} steps, error = {:.3e}, return code = {}",
                solution.closure_name(),
                solution.status,
                solution.steps,
                solution.error,
                solution.return_code()
            );
        }
    }
}
