use super::structure::s_nn;
use crate::core::pair::pair_indices;
use crate::core::potentials::PairPotential;
use crate::engine::error::EngineError;
use crate::engine::state::OzSolution;
use std::f64::consts::PI;
use tracing::instrument;

/// Contact value `g_ij(sigma_ij+)` for one core-bearing pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactValue {
    pub i: usize,
    pub j: usize,
    pub diameter: f64,
    pub g: f64,
}

/// Scalar thermodynamics derived from a converged solution, in units of `kT`.
#[derive(Debug, Clone, PartialEq)]
pub struct Thermodynamics {
    pub total_density: f64,
    /// Excess internal energy per volume, `beta U_ex / V`.
    pub energy_density: f64,
    /// `beta P` by the virial route.
    pub virial_pressure: f64,
    pub compressibility_factor: f64,
    /// `beta dP/drho` from the k = 0 direct correlation.
    pub inverse_compressibility: f64,
    pub s_nn_at_origin: f64,
    pub contact_values: Vec<ContactValue>,
}

impl Thermodynamics {
    #[instrument(skip_all, name = "thermodynamics")]
    pub fn compute(solution: &OzSolution, potential: &PairPotential) -> Result<Self, EngineError> {
        solution.require_converged("thermodynamics")?;
        if potential.u.len() != solution.grid.len() {
            return Err(EngineError::GridMismatch {
                expected: solution.grid.len(),
                found: potential.u.len(),
            });
        }

        let rho = solution.rho();
        let ncomp = solution.ncomp();
        let total_density = solution.species.total_density();
        let r = solution.r();
        let deltar = solution.grid.deltar();

        // point-outer so that opposite-sign Coulomb contributions cancel locally
        let mut energy = 0.0;
        let mut smooth_virial = 0.0;
        for (p, &rp) in r.iter().enumerate() {
            for i in 0..ncomp {
                for j in 0..ncomp {
                    if potential.in_core(p, i, j) {
                        continue;
                    }
                    let weight = rho[i] * rho[j] * (1.0 + solution.hr.get(p, i, j));
                    energy += weight * rp * rp * potential.total(p, i, j);
                    smooth_virial += weight * rp * rp * rp * potential.du.get(p, i, j);
                }
            }
        }
        let energy_density = 2.0 * PI * deltar * energy;

        let contact_values = contact_values(solution, potential);
        let contact_virial: f64 = contact_values
            .iter()
            .map(|cv| {
                let multiplicity = if cv.i == cv.j { 1.0 } else { 2.0 };
                multiplicity * rho[cv.i] * rho[cv.j] * cv.diameter.powi(3) * cv.g
            })
            .sum();

        let virial_pressure = total_density + (2.0 * PI / 3.0) * contact_virial
            - (2.0 * PI / 3.0) * deltar * smooth_virial;

        let mut c0 = 0.0;
        for i in 0..ncomp {
            for j in 0..ncomp {
                c0 += rho[i] * rho[j] * solution.grid.volume_integral(&solution.c.column(i, j));
            }
        }
        let inverse_compressibility = 1.0 - c0 / total_density;

        Ok(Self {
            total_density,
            energy_density,
            virial_pressure,
            compressibility_factor: virial_pressure / total_density,
            inverse_compressibility,
            s_nn_at_origin: s_nn(solution).first().copied().unwrap_or(f64::NAN),
            contact_values,
        })
    }
}

/// Contact values, linearly extrapolated back to the core diameter from the
/// first two grid points outside it.
fn contact_values(solution: &OzSolution, potential: &PairPotential) -> Vec<ContactValue> {
    let r = solution.r();
    pair_indices(solution.ncomp())
        .filter_map(|(i, j)| {
            let diameter = potential.core_diameter(i, j);
            if diameter <= 0.0 {
                return None;
            }
            let p = (0..r.len()).find(|&p| !potential.in_core(p, i, j))?;
            if p + 1 >= r.len() {
                return None;
            }
            let g1 = 1.0 + solution.hr.get(p, i, j);
            let g2 = 1.0 + solution.hr.get(p + 1, i, j);
            let slope = (g2 - g1) / (r[p + 1] - r[p]);
            Some(ContactValue {
                i,
                j,
                diameter,
                g: g1 + slope * (diameter - r[p]),
            })
        })
        .collect()
}
