use super::config::IterationConfig;
use super::error::EngineError;
use super::mixing::{Mixer, MixingStep};
use super::oz;
use super::progress::{Progress, ProgressReporter};
use super::state::{OzSolution, SolverStatus};
use crate::core::closure::Closure;
use crate::core::grid::Grid;
use crate::core::pair::PairFunction;
use crate::core::potentials::PairPotential;
use crate::core::species::Species;
use tracing::{debug, info, instrument, warn};

/// One pass through the OZ relation and the closure for a given `c`.
struct Evaluation {
    ck: PairFunction,
    hk: PairFunction,
    ek: PairFunction,
    e: PairFunction,
    trial: PairFunction,
}

/// Iterates `c -> closure(OZ(c))` to self-consistency for one closure.
pub struct OzSolver<'a> {
    grid: &'a Grid,
    potential: &'a PairPotential,
    species: Species,
    closure: Closure,
    config: &'a IterationConfig,
}

impl<'a> OzSolver<'a> {
    pub fn new(
        grid: &'a Grid,
        potential: &'a PairPotential,
        species: &Species,
        closure: Closure,
        config: &'a IterationConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if potential.u.len() != grid.len() {
            return Err(EngineError::GridMismatch {
                expected: grid.len(),
                found: potential.u.len(),
            });
        }
        let species = species.with_valences(&potential.valences)?;
        Ok(Self {
            grid,
            potential,
            species,
            closure,
            config,
        })
    }

    fn evaluate(&self, c: &PairFunction) -> Option<Evaluation> {
        let ck = self.grid.forward_pairs(c);
        let hk = oz::total_from_direct(&ck, &self.potential.u_long_k, &self.species)?;
        let ek = hk.difference(&ck);
        let e = self.grid.inverse_pairs(&ek);
        let trial = self.closure.evaluate(self.potential, &e);
        Some(Evaluation {
            ck,
            hk,
            ek,
            e,
            trial,
        })
    }

    /// Error norm `sqrt(deltar sum f^2)` of a residual.
    fn error_norm(&self, residual: &PairFunction) -> f64 {
        (self.grid.deltar() * residual.sum_of_squares()).sqrt()
    }

    #[instrument(skip_all, name = "oz_solve", fields(closure = %self.closure))]
    pub fn solve(&self, reporter: &ProgressReporter) -> OzSolution {
        let iteration = self.config;
        info!(
            ncomp = self.species.ncomp(),
            ng = self.grid.ng(),
            alpha = iteration.alpha,
            "Starting OZ iteration."
        );

        // Initial guess: the RPA direct correlation.
        let zero = PairFunction::zeros(self.grid.len(), self.species.ncomp());
        let mut c = Closure::Rpa.evaluate(self.potential, &zero);

        if iteration.alpha > 1.0 {
            warn!(
                alpha = iteration.alpha,
                "Refusing to iterate with a mixing fraction above 1."
            );
            reporter.report(Progress::Message(format!(
                "run refused: mixing fraction {} is above 1",
                iteration.alpha
            )));
            return self.finish(c, SolverStatus::Diverged, 0, f64::INFINITY, reporter);
        }

        reporter.report(Progress::IterationStart {
            maxsteps: iteration.maxsteps as u64,
        });

        let mut mixer = Mixer::new(iteration);
        let mut error = f64::INFINITY;

        for step in 1..=iteration.maxsteps {
            let Some(evaluation) = self.evaluate(&c) else {
                warn!(step, "OZ relation became singular.");
                reporter.report(Progress::Message(format!(
                    "OZ relation singular at step {step}"
                )));
                return self.finish(c, SolverStatus::Diverged, step, f64::INFINITY, reporter);
            };

            let residual = evaluation.trial.difference(&c);
            error = self.error_norm(&residual);
            reporter.report(Progress::Iteration { step, error });

            if !error.is_finite() || error > iteration.divergence_limit {
                warn!(step, error, "Iteration diverged.");
                reporter.report(Progress::Message(format!(
                    "diverged at step {step}, error = {error:.3e}"
                )));
                return self.finish(c, SolverStatus::Diverged, step, error, reporter);
            }

            if error < iteration.tolerance {
                info!(step, error, "Converged.");
                return self.finish(
                    evaluation.trial,
                    SolverStatus::Converged,
                    step,
                    error,
                    reporter,
                );
            }

            let restarts = mixer.restarts();
            let (next, kind) = mixer.next(&c, &residual, error);
            if mixer.restarts() > restarts {
                reporter.report(Progress::Message(format!(
                    "mixing history restarted at step {step}"
                )));
            }
            match kind {
                MixingStep::Picard => debug!(step, error, "Picard step."),
                MixingStep::Anderson { depth } => debug!(step, error, depth, "Anderson step."),
            }
            c = next;
        }

        warn!(
            maxsteps = iteration.maxsteps,
            error,
            restarts = mixer.restarts(),
            "Maximum number of steps reached without convergence."
        );
        self.finish(
            c,
            SolverStatus::MaxStepsExceeded,
            iteration.maxsteps,
            error,
            reporter,
        )
    }

    /// Builds the reported functions from the final `c`, so that the OZ
    /// relation holds exactly between them.
    fn finish(
        &self,
        c: PairFunction,
        status: SolverStatus,
        steps: usize,
        error: f64,
        reporter: &ProgressReporter,
    ) -> OzSolution {
        reporter.report(Progress::IterationFinish { status });

        let len = self.grid.len();
        let ncomp = self.species.ncomp();
        let (status, ck, hk, ek, e) = match self.evaluate(&c) {
            Some(ev) => (status, ev.ck, ev.hk, ev.ek, ev.e),
            None => {
                let nan = PairFunction::filled(len, ncomp, f64::NAN);
                (
                    SolverStatus::Diverged,
                    self.grid.forward_pairs(&c),
                    nan.clone(),
                    nan.clone(),
                    nan,
                )
            }
        };

        let hr = self.closure.total_correlation(self.potential, &c, &e);
        let sk = oz::structure_factor(&hk, &self.species);

        OzSolution {
            grid: self.grid.clone(),
            closure: self.closure,
            species: self.species.clone(),
            h_base: hr.clone(),
            c,
            e,
            hr,
            ck,
            ek,
            hk,
            sk,
            error,
            steps,
            status,
            exp_refined: false,
        }
    }
}
