use super::session::Session;
use crate::analysis::report;
use crate::analysis::thermodynamics::Thermodynamics;
use crate::core::params::RunParams;
use crate::engine::config::{ConfigError, OzConfig, OzConfigBuilder};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::state::OzSolution;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Everything a front end prints after a run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub params_report: String,
    pub solution: OzSolution,
    /// Present only when the final solution converged.
    pub thermodynamics: Option<Thermodynamics>,
}

impl RunOutcome {
    pub fn return_code(&self) -> i32 {
        self.solution.return_code()
    }

    pub fn thermodynamics_report(&self) -> Option<String> {
        self.thermodynamics
            .as_ref()
            .map(|thermo| report::write_thermodynamics(&self.solution, thermo))
    }
}

impl RunParams {
    /// Solver configuration implied by the run file; iteration keys left out
    /// fall back to the builder defaults.
    pub fn to_config(&self) -> Result<OzConfig, ConfigError> {
        let it = &self.iteration;
        let mut builder = OzConfigBuilder::new()
            .ncomp(self.species.rho.len())
            .ng(self.grid.ng)
            .deltar(self.grid.deltar)
            .rho(self.species.rho.clone());
        if let Some(alpha) = it.alpha {
            builder = builder.alpha(alpha);
        }
        if let Some(npic) = it.npic {
            builder = builder.npic(npic);
        }
        if let Some(nps) = it.nps {
            builder = builder.nps(nps);
        }
        if let Some(maxsteps) = it.maxsteps {
            builder = builder.maxsteps(maxsteps);
        }
        if let Some(tolerance) = it.tolerance {
            builder = builder.tolerance(tolerance);
        }
        if let Some(limit) = it.divergence_limit {
            builder = builder.divergence_limit(limit);
        }
        builder.build()
    }
}

/// Sets up, solves and (optionally) refines one system end to end.
#[instrument(skip_all, name = "run_workflow", fields(closure = %params.closure))]
pub fn run<'a>(
    params: &RunParams,
    reporter: ProgressReporter<'a>,
) -> Result<RunOutcome, EngineError> {
    let config = params.to_config()?;
    let mut session = Session::initialise(config)?.with_reporter(reporter);
    session.set_potential(params.model)?;
    let params_report = session.write_params();

    let mut solution = session.solve(params.closure)?;
    if params.exp_refine {
        if solution.is_converged() {
            solution = session.exp_refine(&solution)?;
        } else {
            warn!(
                status = %solution.status,
                "Skipping EXP refinement of an unconverged solution."
            );
            session.report_message(format!(
                "EXP refinement skipped: primary solve {}",
                solution.status
            ));
        }
    }

    let thermodynamics = if solution.is_converged() {
        Some(session.thermodynamics(&solution)?)
    } else {
        None
    };
    info!(
        closure = %solution.closure_name(),
        return_code = solution.return_code(),
        "Run finished."
    );

    Ok(RunOutcome {
        params_report,
        solution,
        thermodynamics,
    })
}

/// Loads a TOML run file and runs it.
pub fn run_file<'a>(path: &Path, reporter: ProgressReporter<'a>) -> Result<RunOutcome, EngineError> {
    let params = RunParams::load(path)?;
    run(&params, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::closure::Closure;
    use crate::core::params::{GridParams, IterationParams, SpeciesParams};
    use crate::core::potentials::PotentialModel;
    use crate::engine::progress::Progress;
    use crate::engine::state::SolverStatus;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn urpm_params(exp_refine: bool, maxsteps: Option<usize>) -> RunParams {
        RunParams {
            closure: if exp_refine { Closure::Rpa } else { Closure::Hnc },
            exp_refine,
            grid: GridParams {
                ng: 4096,
                deltar: 0.01,
            },
            iteration: IterationParams {
                maxsteps,
                ..IterationParams::default()
            },
            model: PotentialModel::Urpm {
                lb: 1.0,
                sigma: 1.0,
                sigmap: 1.5,
                use_short: true,
            },
            species: SpeciesParams {
                rho: vec![0.05, 0.05],
            },
        }
    }

    #[test]
    fn to_config_applies_overrides_and_defaults() {
        let mut params = urpm_params(false, Some(250));
        params.iteration.alpha = Some(0.35);
        let config = params.to_config().unwrap();
        assert_eq!(config.ncomp, 2);
        assert_eq!(config.iteration.alpha, 0.35);
        assert_eq!(config.iteration.maxsteps, 250);
        assert_eq!(config.iteration.nps, 6);
    }

    #[test]
    fn rpa_exp_run_reports_refined_closure() {
        let outcome = run(&urpm_params(true, None), ProgressReporter::new()).unwrap();
        assert_eq!(outcome.return_code(), 0);
        assert_eq!(outcome.solution.closure_name(), "RPA+EXP");
        assert!(outcome.thermodynamics.is_some());
        assert!(outcome.params_report.contains("URPM"));
        assert!(outcome.thermodynamics_report().unwrap().contains("RPA+EXP"));
    }

    #[test]
    fn unconverged_run_has_no_thermodynamics() {
        let outcome = run(&urpm_params(false, Some(1)), ProgressReporter::new()).unwrap();
        assert_eq!(outcome.solution.status, SolverStatus::MaxStepsExceeded);
        assert_eq!(outcome.return_code(), 1);
        assert!(outcome.thermodynamics.is_none());
        assert!(outcome.thermodynamics_report().is_none());
    }

    #[test]
    fn skipped_refinement_is_reported() {
        let mut params = urpm_params(true, Some(1));
        params.closure = Closure::Hnc;
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(msg) = event {
                messages.lock().unwrap().push(msg);
            }
        }));
        let outcome = run(&params, reporter).unwrap();
        assert_eq!(outcome.solution.closure_name(), "HNC");
        assert_eq!(outcome.return_code(), 1);
        let messages = messages.into_inner().unwrap();
        assert_eq!(
            messages,
            vec!["EXP refinement skipped: primary solve maximum steps exceeded".to_string()]
        );
    }

    #[test]
    fn run_file_loads_and_solves() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hs.toml");
        fs::write(
            &path,
            r#"
            closure = "msa"
            [grid]
            ng = 2048
            deltar = 0.01
            [model]
            type = "hard-sphere"
            sigma = 1.0
            [species]
            rho = [0.3]
            "#,
        )
        .unwrap();
        let outcome = run_file(&path, ProgressReporter::new()).unwrap();
        assert!(outcome.solution.is_converged());
        assert_eq!(outcome.solution.closure_name(), "MSA");
    }

    #[test]
    fn run_file_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = run_file(&dir.path().join("missing.toml"), ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::Params { .. })));
    }

    #[test]
    fn invalid_densities_are_rejected_before_solving() {
        let mut params = urpm_params(false, None);
        params.species.rho = vec![0.05, -0.05];
        let result = run(&params, ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }
}
