use super::error::EngineError;
use super::oz;
use super::state::OzSolution;
use crate::core::closure::exp_resummation;
use crate::core::potentials::PairPotential;
use tracing::{info, instrument};

/// EXP refinement of a converged solution: `h = exp(h0) - 1` where `h0` is
/// the unrefined total correlation, followed by the inverse OZ relation to
/// recover a consistent `c`.
///
/// Refinement always starts from the unrefined `h0`, so refining an already
/// refined solution reproduces it.
#[instrument(skip_all, name = "exp_refine", fields(closure = %solution.closure))]
pub fn exp_refine(
    solution: &OzSolution,
    potential: &PairPotential,
) -> Result<OzSolution, EngineError> {
    solution.require_converged("EXP refinement")?;
    if potential.u.len() != solution.grid.len() {
        return Err(EngineError::GridMismatch {
            expected: solution.grid.len(),
            found: potential.u.len(),
        });
    }

    let grid = &solution.grid;
    let species = &solution.species;
    let keep_core = solution.closure.enforces_core();

    let hr = exp_resummation(potential, &solution.h_base, keep_core);
    let hk = grid.forward_pairs(&hr);
    let mut ck = oz::direct_from_total(&hk, species).ok_or(EngineError::SingularOz {
        operation: "EXP refinement",
    })?;
    // back to the short-ranged representation
    ck.add_scaled(1.0, &potential.u_long_k);
    let ek = hk.difference(&ck);
    let c = grid.inverse_pairs(&ck);
    let e = grid.inverse_pairs(&ek);
    let sk = oz::structure_factor(&hk, species);

    info!("Applied EXP refinement.");

    Ok(OzSolution {
        grid: grid.clone(),
        closure: solution.closure,
        species: species.clone(),
        c,
        e,
        hr,
        ck,
        ek,
        hk,
        sk,
        error: solution.error,
        steps: solution.steps,
        status: solution.status,
        exp_refined: true,
        h_base: solution.h_base.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::closure::Closure;
    use crate::core::grid::Grid;
    use crate::core::potentials::PotentialModel;
    use crate::core::species::Species;
    use crate::engine::config::IterationConfig;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::solver::OzSolver;
    use crate::engine::state::SolverStatus;

    fn urpm(closure: Closure, maxsteps: usize) -> (OzSolution, PairPotential) {
        let grid = Grid::new(2048, 0.01).unwrap();
        let potential = PotentialModel::Urpm {
            lb: 1.0,
            sigma: 1.0,
            sigmap: 1.5,
            use_short: true,
        }
        .build(&grid, 2)
        .unwrap();
        let species = Species::neutral(vec![0.05, 0.05]).unwrap();
        let config = IterationConfig {
            maxsteps,
            ..IterationConfig::default()
        };
        let sol = OzSolver::new(&grid, &potential, &species, closure, &config)
            .unwrap()
            .solve(&ProgressReporter::new());
        (sol, potential)
    }

    #[test]
    fn refinement_renames_closure_and_keeps_status() {
        let (sol, potential) = urpm(Closure::Rpa, 100);
        assert!(sol.is_converged());
        let refined = exp_refine(&sol, &potential).unwrap();
        assert_eq!(refined.closure_name(), "RPA+EXP");
        assert_eq!(refined.status, SolverStatus::Converged);
        assert!(refined.hr.is_finite());
        assert!(refined.hr.is_symmetric());
        // h = exp(h0) - 1 pointwise
        let p = 400;
        let expected = sol.hr.get(p, 0, 1).exp() - 1.0;
        assert!((refined.hr.get(p, 0, 1) - expected).abs() < 1e-12);
    }

    #[test]
    fn refinement_is_idempotent() {
        let (sol, potential) = urpm(Closure::Rpa, 100);
        let once = exp_refine(&sol, &potential).unwrap();
        let twice = exp_refine(&once, &potential).unwrap();
        assert_eq!(once.hr.max_abs_diff(&twice.hr), 0.0);
        assert_eq!(once.c.max_abs_diff(&twice.c), 0.0);
        assert_eq!(twice.closure_name(), "RPA+EXP");
    }

    #[test]
    fn refined_functions_satisfy_oz_relation() {
        let (sol, potential) = urpm(Closure::Rpa, 100);
        let refined = exp_refine(&sol, &potential).unwrap();
        let hk = oz::total_from_direct(&refined.ck, &potential.u_long_k, &refined.species).unwrap();
        assert!(hk.max_abs_diff(&refined.hk) < 1e-8);
    }

    #[test]
    fn refinement_requires_converged_solution() {
        let (sol, potential) = urpm(Closure::Hnc, 1);
        assert_eq!(sol.status, SolverStatus::MaxStepsExceeded);
        let result = exp_refine(&sol, &potential);
        assert!(matches!(
            result,
            Err(EngineError::Precondition {
                status: SolverStatus::MaxStepsExceeded,
                ..
            })
        ));
    }
}
