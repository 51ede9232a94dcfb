use crate::core::closure::log_tail;
use crate::engine::state::OzSolution;

/// Density-density structure factor `S_NN(k) = sum_ij S_ij(k) / sum_i rho_i`.
pub fn s_nn(solution: &OzSolution) -> Vec<f64> {
    let total = solution.species.total_density();
    (0..solution.sk.len())
        .map(|p| solution.sk.block(p).iter().sum::<f64>() / total)
        .collect()
}

/// Charge-charge structure factor `S_ZZ(k) = z.S(k).z / sum_i rho_i`.
/// Identically zero for uncharged systems.
pub fn s_zz(solution: &OzSolution) -> Vec<f64> {
    let ncomp = solution.ncomp();
    let z = solution.z();
    let total = solution.species.total_density();
    (0..solution.sk.len())
        .map(|p| {
            let mut sum = 0.0;
            for i in 0..ncomp {
                for j in 0..ncomp {
                    sum += z[i] * z[j] * solution.sk.get(p, i, j);
                }
            }
            sum / total
        })
        .collect()
}

/// `log10(eps + |r h_ij(r)|)` along the grid, for plotting asymptotic decay.
pub fn h_log_tail(solution: &OzSolution, i: usize, j: usize, eps: f64) -> Vec<f64> {
    solution
        .r()
        .iter()
        .zip(solution.hr.column(i, j))
        .map(|(&r, h)| log_tail(r, h, eps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::closure::{Closure, DEFAULT_LOG_FLOOR};
    use crate::core::grid::Grid;
    use crate::core::potentials::PotentialModel;
    use crate::core::species::Species;
    use crate::engine::config::IterationConfig;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::solver::OzSolver;

    fn urpm(closure: Closure, use_short: bool) -> OzSolution {
        let grid = Grid::new(4096, 0.01).unwrap();
        let potential = PotentialModel::Urpm {
            lb: 1.0,
            sigma: 1.0,
            sigmap: 1.5,
            use_short,
        }
        .build(&grid, 2)
        .unwrap();
        let species = Species::neutral(vec![0.05, 0.05]).unwrap();
        let config = IterationConfig::default();
        OzSolver::new(&grid, &potential, &species, closure, &config)
            .unwrap()
            .solve(&ProgressReporter::new())
    }

    #[test]
    fn charge_structure_factor_obeys_stillinger_lovett() {
        for closure in [Closure::Rpa, Closure::Msa, Closure::Hnc] {
            let sol = urpm(closure, true);
            assert!(sol.is_converged(), "{closure} did not converge");
            let szz = s_zz(&sol);
            assert!(szz[0] < 0.02, "{closure}: S_ZZ(k0) = {}", szz[0]);
            assert!(szz[0] < szz[10]);
            assert!(szz[0] >= 0.0);
            // charge fluctuations are uncorrelated at large k
            let last = *szz.last().unwrap();
            assert!((last - 1.0).abs() < 0.05);
        }
    }

    #[test]
    fn full_potential_in_closure_keeps_stillinger_lovett() {
        for closure in [Closure::Hnc, Closure::Msa, Closure::Rpa] {
            let sol = urpm(closure, false);
            assert!(sol.is_converged(), "{closure}: {} after {} steps", sol.status, sol.steps);
            let szz = s_zz(&sol);
            assert!(szz[0] >= 0.0 && szz[0] < 0.02, "{closure}: S_ZZ(k0) = {}", szz[0]);
            assert!(szz[0] < szz[10]);
        }
    }

    #[test]
    fn hnc_solution_does_not_depend_on_closure_potential_form() {
        let full = urpm(Closure::Hnc, false);
        let short = urpm(Closure::Hnc, true);
        assert!(full.hr.max_abs_diff(&short.hr) < 1e-6);
    }

    #[test]
    fn density_structure_factor_tends_to_one_at_large_k() {
        let sol = urpm(Closure::Hnc, true);
        let snn = s_nn(&sol);
        assert!((snn.last().unwrap() - 1.0).abs() < 0.05);
        assert!(snn.iter().all(|s| s.is_finite() && *s > 0.0));
    }

    #[test]
    fn uncharged_fluid_has_no_charge_structure() {
        let grid = Grid::new(1024, 0.01).unwrap();
        let potential = PotentialModel::HardSphere { sigma: 1.0 }
            .build(&grid, 1)
            .unwrap();
        let species = Species::neutral(vec![0.3]).unwrap();
        let config = IterationConfig::default();
        let sol = OzSolver::new(&grid, &potential, &species, Closure::Msa, &config)
            .unwrap()
            .solve(&ProgressReporter::new());
        assert!(s_zz(&sol).iter().all(|&s| s == 0.0));
        let snn = s_nn(&sol);
        let sk = sol.sk.column(0, 0);
        for (a, b) in snn.iter().zip(sk) {
            assert!((a - b / 0.3).abs() < 1e-12);
        }
    }

    #[test]
    fn log_tail_pins_core_region_to_log_r() {
        let grid = Grid::new(1024, 0.01).unwrap();
        let potential = PotentialModel::HardSphere { sigma: 1.0 }
            .build(&grid, 1)
            .unwrap();
        let species = Species::neutral(vec![0.1]).unwrap();
        let config = IterationConfig::default();
        let sol = OzSolver::new(&grid, &potential, &species, Closure::Hnc, &config)
            .unwrap()
            .solve(&ProgressReporter::new());
        let tail = h_log_tail(&sol, 0, 0, DEFAULT_LOG_FLOOR);
        // h = -1 inside the core, so the tail is log10(r) there
        assert!((tail[49] - 0.5f64.log10()).abs() < 1e-12);
    }
}
