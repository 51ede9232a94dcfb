use super::structure::{s_nn, s_zz};
use super::thermodynamics::Thermodynamics;
use crate::core::grid::Grid;
use crate::core::potentials::{PairPotential, PotentialModel};
use crate::engine::config::OzConfig;
use crate::engine::state::OzSolution;
use std::fmt;

/// Human-readable description of a configured (possibly not yet solved) system.
pub struct ParamsReport<'a> {
    pub config: &'a OzConfig,
    pub grid: &'a Grid,
    pub potential: Option<&'a PairPotential>,
}

impl fmt::Display for ParamsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let it = &self.config.iteration;
        writeln!(f, "ncomp = {}", self.config.ncomp)?;
        writeln!(
            f,
            "ng = {}, deltar = {}, deltak = {:.6e}, r_max = {}",
            self.grid.ng(),
            self.grid.deltar(),
            self.grid.deltak(),
            self.grid.r_max()
        )?;
        writeln!(
            f,
            "alpha = {}, npic = {}, nps = {}, maxsteps = {}, tolerance = {:e}",
            it.alpha, it.npic, it.nps, it.maxsteps, it.tolerance
        )?;
        match self.potential.map(|pot| pot.model) {
            Some(PotentialModel::HardSphere { sigma }) => {
                writeln!(f, "model = hard spheres, sigma = {sigma}")?;
            }
            Some(PotentialModel::Urpm {
                lb,
                sigma,
                sigmap,
                use_short,
            }) => {
                writeln!(
                    f,
                    "model = URPM, lb = {lb}, sigma = {sigma}, sigmap = {sigmap}, use_short = {use_short}"
                )?;
            }
            None => writeln!(f, "model = (not set)")?,
        }
        for (i, rho) in self.config.rho.iter().enumerate() {
            let z = self
                .potential
                .and_then(|pot| pot.valences.get(i).copied())
                .unwrap_or(0.0);
            writeln!(f, "species {i}: rho = {rho:.6}, z = {z}")?;
        }
        Ok(())
    }
}

/// Human-readable summary of a solve and its thermodynamics.
pub struct ThermodynamicsReport<'a> {
    pub solution: &'a OzSolution,
    pub thermodynamics: &'a Thermodynamics,
}

impl fmt::Display for ThermodynamicsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sol = self.solution;
        let th = self.thermodynamics;
        writeln!(
            f,
            "{}: {} after {} steps, error = {:.3e}, return code = {}",
            sol.closure_name(),
            sol.status,
            sol.steps,
            sol.error,
            sol.return_code()
        )?;
        writeln!(f, "total density           = {:.8}", th.total_density)?;
        writeln!(f, "energy density          = {:.8}", th.energy_density)?;
        writeln!(f, "virial pressure         = {:.8}", th.virial_pressure)?;
        writeln!(f, "compressibility factor  = {:.8}", th.compressibility_factor)?;
        writeln!(f, "inverse compressibility = {:.8}", th.inverse_compressibility)?;
        writeln!(f, "S_NN(k0)                = {:.8}", th.s_nn_at_origin)?;
        for cv in &th.contact_values {
            writeln!(
                f,
                "g_{}{}(sigma = {}) = {:.6}",
                cv.i, cv.j, cv.diameter, cv.g
            )?;
        }
        Ok(())
    }
}

pub fn write_params(config: &OzConfig, grid: &Grid, potential: Option<&PairPotential>) -> String {
    ParamsReport {
        config,
        grid,
        potential,
    }
    .to_string()
}

pub fn write_thermodynamics(solution: &OzSolution, thermodynamics: &Thermodynamics) -> String {
    ThermodynamicsReport {
        solution,
        thermodynamics,
    }
    .to_string()
}

/// One-line structure factors at the smallest wavevector, as printed by the
/// drivers for charged systems.
pub fn structure_at_origin(solution: &OzSolution) -> String {
    let k0 = solution.k().first().copied().unwrap_or(f64::NAN);
    let nn = s_nn(solution).first().copied().unwrap_or(f64::NAN);
    let zz = s_zz(solution).first().copied().unwrap_or(f64::NAN);
    format!("k = {k0:.6}: S_NN = {nn:.6}, S_ZZ = {zz:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::closure::Closure;
    use crate::core::species::Species;
    use crate::engine::config::OzConfigBuilder;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::solver::OzSolver;

    fn setup() -> (OzConfig, Grid, PairPotential) {
        let config = OzConfigBuilder::new()
            .ncomp(2)
            .ng(1024)
            .deltar(0.01)
            .rho(vec![0.05, 0.05])
            .build()
            .unwrap();
        let grid = Grid::new(config.ng, config.deltar).unwrap();
        let potential = PotentialModel::Urpm {
            lb: 1.0,
            sigma: 1.0,
            sigmap: 1.5,
            use_short: true,
        }
        .build(&grid, 2)
        .unwrap();
        (config, grid, potential)
    }

    #[test]
    fn params_report_lists_model_and_species() {
        let (config, grid, potential) = setup();
        let text = write_params(&config, &grid, Some(&potential));
        assert!(text.contains("ncomp = 2"));
        assert!(text.contains("model = URPM"));
        assert!(text.contains("sigmap = 1.5"));
        assert!(text.contains("species 1: rho = 0.050000, z = -1"));
    }

    #[test]
    fn params_report_without_potential() {
        let (config, grid, _) = setup();
        let text = write_params(&config, &grid, None);
        assert!(text.contains("model = (not set)"));
    }

    #[test]
    fn thermodynamics_report_names_closure_and_status() {
        let (config, grid, potential) = setup();
        let species = Species::neutral(config.rho.clone()).unwrap();
        let sol = OzSolver::new(&grid, &potential, &species, Closure::Rpa, &config.iteration)
            .unwrap()
            .solve(&ProgressReporter::new());
        let thermo = Thermodynamics::compute(&sol, &potential).unwrap();
        let text = write_thermodynamics(&sol, &thermo);
        assert!(text.starts_with("RPA: converged"));
        assert!(text.contains("return code = 0"));
        assert!(text.contains("g_01(sigma = 1.5)"));
        assert!(structure_at_origin(&sol).contains("S_ZZ"));
    }
}
