//! The Ornstein-Zernike relation, solved independently at every wavevector.

use crate::core::pair::PairFunction;
use crate::core::species::Species;
use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Applies `solve` to every k-point block of `out`, stopping at the first
/// block it cannot solve. Returns `false` if any block failed.
fn for_each_block<F>(out: &mut PairFunction, solve: F) -> bool
where
    F: Fn(usize, &mut [f64]) -> bool + Sync + Send,
{
    let width = out.ncomp() * out.ncomp();

    #[cfg(not(feature = "parallel"))]
    let iterator = out.as_mut_slice().chunks_mut(width);

    #[cfg(feature = "parallel")]
    let iterator = out.as_mut_slice().par_chunks_mut(width);

    iterator
        .enumerate()
        .map(|(p, block)| solve(p, block))
        .all(|ok| ok)
}

fn write_symmetrised(block: &mut [f64], m: &DMatrix<f64>) {
    let ncomp = m.nrows();
    for i in 0..ncomp {
        for j in 0..ncomp {
            block[i * ncomp + j] = 0.5 * (m[(i, j)] + m[(j, i)]);
        }
    }
}

/// Total correlation `H = (I - C rho)^-1 C` from the short-ranged direct
/// correlation, with `C = ck - u_long_k` restoring the Coulomb tail.
///
/// Returns `None` when `I - C rho` is singular at any wavevector.
pub(crate) fn total_from_direct(
    ck: &PairFunction,
    u_long_k: &PairFunction,
    species: &Species,
) -> Option<PairFunction> {
    let ncomp = ck.ncomp();
    let rho = species.density_matrix();
    let identity = DMatrix::<f64>::identity(ncomp, ncomp);
    let mut hk = PairFunction::zeros(ck.len(), ncomp);

    let solved = for_each_block(&mut hk, |p, block| {
        let c = DMatrix::from_fn(ncomp, ncomp, |i, j| ck.get(p, i, j) - u_long_k.get(p, i, j));
        let a = &identity - &c * &rho;
        match a.lu().solve(&c) {
            Some(h) => {
                write_symmetrised(block, &h);
                true
            }
            None => false,
        }
    });
    solved.then_some(hk)
}

/// Inverse relation: the full direct correlation `C = (I + H rho)^-1 H`.
pub(crate) fn direct_from_total(hk: &PairFunction, species: &Species) -> Option<PairFunction> {
    let ncomp = hk.ncomp();
    let rho = species.density_matrix();
    let identity = DMatrix::<f64>::identity(ncomp, ncomp);
    let mut ck = PairFunction::zeros(hk.len(), ncomp);

    let solved = for_each_block(&mut ck, |p, block| {
        let h = DMatrix::from_row_slice(ncomp, ncomp, hk.block(p));
        let a = &identity + &h * &rho;
        match a.lu().solve(&h) {
            Some(c) => {
                write_symmetrised(block, &c);
                true
            }
            None => false,
        }
    });
    solved.then_some(ck)
}

/// Partial structure factors `S_ij = rho_i delta_ij + rho_i rho_j H_ij`.
pub(crate) fn structure_factor(hk: &PairFunction, species: &Species) -> PairFunction {
    let rho = species.rho();
    PairFunction::from_fn(hk.len(), hk.ncomp(), |p, i, j| {
        let diagonal = if i == j { rho[i] } else { 0.0 };
        diagonal + rho[i] * rho[j] * hk.get(p, i, j)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn single_component_matches_scalar_formula() {
        let species = Species::neutral(vec![0.4]).unwrap();
        let ck = PairFunction::from_fn(5, 1, |p, _, _| -0.5 * (p as f64 + 1.0));
        let zero = PairFunction::zeros(5, 1);
        let hk = total_from_direct(&ck, &zero, &species).unwrap();
        for p in 0..5 {
            let c = ck.get(p, 0, 0);
            let expected = c / (1.0 - 0.4 * c);
            assert!((hk.get(p, 0, 0) - expected).abs() < TOLERANCE);
        }
    }

    #[test]
    fn long_range_part_is_subtracted_before_solving() {
        let species = Species::neutral(vec![0.2]).unwrap();
        let ck = PairFunction::filled(3, 1, 0.5);
        let ulk = PairFunction::filled(3, 1, 1.0);
        let hk = total_from_direct(&ck, &ulk, &species).unwrap();
        let c = -0.5;
        assert!((hk.get(0, 0, 0) - c / (1.0 - 0.2 * c)).abs() < TOLERANCE);
    }

    #[test]
    fn inverse_relation_recovers_direct_correlation() {
        let species = Species::charged(vec![0.1, 0.3], vec![1.0, -1.0]).unwrap();
        let ck = PairFunction::from_fn(8, 2, |p, i, j| {
            -0.3 / (1.0 + p as f64) + 0.05 * (i + 2 * j) as f64
        });
        let zero = PairFunction::zeros(8, 2);
        let hk = total_from_direct(&ck, &zero, &species).unwrap();
        assert!(hk.is_symmetric());
        let back = direct_from_total(&hk, &species).unwrap();
        assert!(back.max_abs_diff(&ck) < 1e-12);
    }

    #[test]
    fn singular_relation_is_reported() {
        let species = Species::neutral(vec![0.5]).unwrap();
        // 1 - rho c = 0
        let ck = PairFunction::filled(4, 1, 2.0);
        let zero = PairFunction::zeros(4, 1);
        assert!(total_from_direct(&ck, &zero, &species).is_none());
    }

    #[test]
    fn structure_factor_of_uncorrelated_fluid_is_density() {
        let species = Species::neutral(vec![0.2, 0.3]).unwrap();
        let sk = structure_factor(&PairFunction::zeros(4, 2), &species);
        assert_eq!(sk.get(2, 0, 0), 0.2);
        assert_eq!(sk.get(2, 1, 1), 0.3);
        assert_eq!(sk.get(2, 0, 1), 0.0);
    }
}
