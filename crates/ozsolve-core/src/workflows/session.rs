use crate::analysis::report;
use crate::analysis::thermodynamics::Thermodynamics;
use crate::core::closure::Closure;
use crate::core::grid::Grid;
use crate::core::potentials::{PairPotential, PotentialModel};
use crate::core::species::Species;
use crate::engine::config::{IterationConfig, OzConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::refine;
use crate::engine::solver::OzSolver;
use crate::engine::state::OzSolution;
use tracing::info;

/// An explicit solver session: configuration, grid and potential are owned
/// here and every solve returns its own [`OzSolution`].
///
/// The usual sequence is [`Session::initialise`], one potential setup
/// ([`Session::hs_potential`] or [`Session::urpm_potential`]), one closure
/// solve, and optionally [`Session::exp_refine`].
pub struct Session<'a> {
    config: OzConfig,
    grid: Grid,
    potential: Option<PairPotential>,
    reporter: ProgressReporter<'a>,
}

impl<'a> Session<'a> {
    /// Validates the configuration and allocates the grid.
    pub fn initialise(config: OzConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = Grid::new(config.ng, config.deltar)?;
        info!(
            ncomp = config.ncomp,
            ng = grid.ng(),
            deltar = grid.deltar(),
            deltak = grid.deltak(),
            "Initialised solver grid."
        );
        Ok(Self {
            config,
            grid,
            potential: None,
            reporter: ProgressReporter::new(),
        })
    }

    pub fn with_reporter(mut self, reporter: ProgressReporter<'a>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &OzConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn potential(&self) -> Option<&PairPotential> {
        self.potential.as_ref()
    }

    pub fn set_densities(&mut self, rho: Vec<f64>) -> Result<(), EngineError> {
        let mut config = self.config.clone();
        config.rho = rho;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_iteration(&mut self, iteration: IterationConfig) -> Result<(), EngineError> {
        iteration.validate()?;
        self.config.iteration = iteration;
        Ok(())
    }

    pub fn set_potential(&mut self, model: PotentialModel) -> Result<&PairPotential, EngineError> {
        let potential = model.build(&self.grid, self.config.ncomp)?;
        info!(model = model.name(), "Potential tabulated.");
        let potential: &PairPotential = self.potential.insert(potential);
        Ok(potential)
    }

    pub fn hs_potential(&mut self, sigma: f64) -> Result<&PairPotential, EngineError> {
        self.set_potential(PotentialModel::HardSphere { sigma })
    }

    pub fn urpm_potential(
        &mut self,
        lb: f64,
        sigma: f64,
        sigmap: f64,
        use_short: bool,
    ) -> Result<&PairPotential, EngineError> {
        self.set_potential(PotentialModel::Urpm {
            lb,
            sigma,
            sigmap,
            use_short,
        })
    }

    fn require_potential(&self) -> Result<&PairPotential, EngineError> {
        self.potential.as_ref().ok_or(EngineError::MissingPotential)
    }

    /// Solves with the configured densities. Valences are not configurable:
    /// they are imposed by the potential model (`[+1, -1]` for URPM, zero for
    /// hard spheres).
    pub fn solve(&self, closure: Closure) -> Result<OzSolution, EngineError> {
        let potential = self.require_potential()?;
        let species = Species::neutral(self.config.rho.clone())?;
        let solver = OzSolver::new(
            &self.grid,
            potential,
            &species,
            closure,
            &self.config.iteration,
        )?;

        self.reporter.report(Progress::PhaseStart {
            name: closure.name(),
        });
        let solution = solver.solve(&self.reporter);
        self.reporter.report(Progress::PhaseFinish);
        Ok(solution)
    }

    pub fn hnc_solve(&self) -> Result<OzSolution, EngineError> {
        self.solve(Closure::Hnc)
    }

    pub fn msa_solve(&self) -> Result<OzSolution, EngineError> {
        self.solve(Closure::Msa)
    }

    pub fn rpa_solve(&self) -> Result<OzSolution, EngineError> {
        self.solve(Closure::Rpa)
    }

    pub fn exp_refine(&self, solution: &OzSolution) -> Result<OzSolution, EngineError> {
        let potential = self.require_potential()?;
        self.reporter.report(Progress::PhaseStart { name: "EXP" });
        let refined = refine::exp_refine(solution, potential);
        self.reporter.report(Progress::PhaseFinish);
        refined
    }

    /// Forwards a free-form note to the progress reporter.
    pub fn report_message(&self, message: impl Into<String>) {
        self.reporter.report(Progress::Message(message.into()));
    }

    pub fn thermodynamics(&self, solution: &OzSolution) -> Result<Thermodynamics, EngineError> {
        Thermodynamics::compute(solution, self.require_potential()?)
    }

    pub fn write_params(&self) -> String {
        report::write_params(&self.config, &self.grid, self.potential.as_ref())
    }

    pub fn write_thermodynamics(&self, solution: &OzSolution) -> Result<String, EngineError> {
        let thermodynamics = self.thermodynamics(solution)?;
        Ok(report::write_thermodynamics(solution, &thermodynamics))
    }
}
