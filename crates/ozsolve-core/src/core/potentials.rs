use super::grid::Grid;
use super::pair::{PairFunction, pair_indices};
use super::validation::{ConfigError, require_positive};
use serde::Deserialize;
use statrs::function::erf::{erf, erfc};
use std::f64::consts::PI;

const URPM_VALENCES: [f64; 2] = [1.0, -1.0];

/// The physical interaction model, selected once per solve.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", rename_all_fields = "kebab-case", tag = "type")]
pub enum PotentialModel {
    /// Equal-diameter hard spheres, any number of species.
    HardSphere { sigma: f64 },
    /// Two oppositely charged species with like/unlike hard cores and a
    /// Coulomb tail of strength `lb` (the Bjerrum length).
    Urpm {
        lb: f64,
        sigma: f64,
        sigmap: f64,
        #[serde(default)]
        use_short: bool,
    },
}

impl PotentialModel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HardSphere { .. } => "hard spheres",
            Self::Urpm { .. } => "URPM",
        }
    }

    pub fn validate(&self, ncomp: usize) -> Result<(), ConfigError> {
        match *self {
            Self::HardSphere { sigma } => {
                require_positive("sigma", sigma)?;
                if ncomp == 0 {
                    return Err(ConfigError::ComponentMismatch {
                        model: self.name(),
                        expected: "at least 1".to_string(),
                        found: ncomp,
                    });
                }
            }
            Self::Urpm {
                lb, sigma, sigmap, ..
            } => {
                require_positive("lb", lb)?;
                require_positive("sigma", sigma)?;
                require_positive("sigmap", sigmap)?;
                if ncomp != 2 {
                    return Err(ConfigError::ComponentMismatch {
                        model: self.name(),
                        expected: "exactly 2".to_string(),
                        found: ncomp,
                    });
                }
            }
        }
        Ok(())
    }

    /// Valences imposed by the model; zero for uncharged models.
    pub fn valences(&self, ncomp: usize) -> Vec<f64> {
        match self {
            Self::HardSphere { .. } => vec![0.0; ncomp],
            Self::Urpm { .. } => URPM_VALENCES.to_vec(),
        }
    }

    pub fn build(&self, grid: &Grid, ncomp: usize) -> Result<PairPotential, ConfigError> {
        self.validate(ncomp)?;
        Ok(match *self {
            Self::HardSphere { sigma } => hard_sphere(grid, ncomp, sigma),
            Self::Urpm {
                lb,
                sigma,
                sigmap,
                use_short,
            } => urpm(grid, lb, sigma, sigmap, use_short),
        })
    }
}

/// A pairwise potential tabulated on a grid, in units of `kT`.
///
/// Any Coulomb tail is always carried as the smooth `u_long` with its
/// analytic transform `u_long_k`, and the solver iterates on the direct
/// correlation with that tail removed. `u` is the potential the closure
/// sees: `U_short = u_full - u_long` when [`PairPotential::uses_short`], the
/// full potential otherwise, in which case the closure works in the shifted
/// variables given by [`PairPotential::closure_offset`].
/// Inside a hard core `u` is `+inf` and the exclusion mask takes over.
#[derive(Debug, Clone)]
pub struct PairPotential {
    pub model: PotentialModel,
    pub u: PairFunction,
    pub du: PairFunction,
    pub u_long: PairFunction,
    pub u_long_k: PairFunction,
    pub valences: Vec<f64>,
    core: Vec<f64>,
    r: Vec<f64>,
    short: bool,
}

impl PairPotential {
    #[inline]
    pub fn ncomp(&self) -> usize {
        self.valences.len()
    }

    /// Hard-core diameter of pair `(i, j)`; zero when there is none.
    #[inline]
    pub fn core_diameter(&self, i: usize, j: usize) -> f64 {
        self.core[i * self.ncomp() + j]
    }

    #[inline]
    pub fn in_core(&self, p: usize, i: usize, j: usize) -> bool {
        self.r[p] < self.core_diameter(i, j)
    }

    pub fn has_core(&self) -> bool {
        self.core.iter().any(|&d| d > 0.0)
    }

    /// Whether the closure sees `U_short` rather than the full potential.
    #[inline]
    pub fn uses_short(&self) -> bool {
        self.short
    }

    /// `u - U_short`: zero when the closure sees `U_short`, `u_long` when it
    /// sees the full potential.
    #[inline]
    pub fn closure_offset(&self, p: usize, i: usize, j: usize) -> f64 {
        if self.short {
            0.0
        } else {
            self.u_long.get(p, i, j)
        }
    }

    /// Total potential outside the core.
    #[inline]
    pub fn total(&self, p: usize, i: usize, j: usize) -> f64 {
        self.u.get(p, i, j) + self.u_long.get(p, i, j) - self.closure_offset(p, i, j)
    }
}

fn hard_sphere(grid: &Grid, ncomp: usize, sigma: f64) -> PairPotential {
    let n = grid.len();
    let r = grid.r();
    let u = PairFunction::from_fn(n, ncomp, |p, _, _| {
        if r[p] < sigma { f64::INFINITY } else { 0.0 }
    });

    PairPotential {
        model: PotentialModel::HardSphere { sigma },
        u,
        du: PairFunction::zeros(n, ncomp),
        u_long: PairFunction::zeros(n, ncomp),
        u_long_k: PairFunction::zeros(n, ncomp),
        valences: vec![0.0; ncomp],
        core: vec![sigma; ncomp * ncomp],
        r: r.to_vec(),
        short: false,
    }
}

fn urpm(grid: &Grid, lb: f64, sigma: f64, sigmap: f64, use_short: bool) -> PairPotential {
    let ncomp = URPM_VALENCES.len();
    let n = grid.len();
    let r = grid.r();
    let k = grid.k();
    let z = URPM_VALENCES;

    let mut core = vec![0.0; ncomp * ncomp];
    for (i, j) in pair_indices(ncomp) {
        let diameter = if i == j { sigma } else { sigmap };
        core[i * ncomp + j] = diameter;
        core[j * ncomp + i] = diameter;
    }
    let in_core = |p: usize, i: usize, j: usize| r[p] < core[i * ncomp + j];

    let du = PairFunction::from_fn(n, ncomp, |p, i, j| {
        if in_core(p, i, j) {
            0.0
        } else {
            -lb * z[i] * z[j] / (r[p] * r[p])
        }
    });

    let two_sigma = 2.0 * sigma;
    let u = PairFunction::from_fn(n, ncomp, |p, i, j| {
        if in_core(p, i, j) {
            f64::INFINITY
        } else if use_short {
            lb * z[i] * z[j] * erfc(r[p] / two_sigma) / r[p]
        } else {
            lb * z[i] * z[j] / r[p]
        }
    });
    let u_long = PairFunction::from_fn(n, ncomp, |p, i, j| {
        lb * z[i] * z[j] * erf(r[p] / two_sigma) / r[p]
    });
    let u_long_k = PairFunction::from_fn(n, ncomp, |p, i, j| {
        let kk = k[p] * k[p];
        4.0 * PI * lb * z[i] * z[j] * (-kk * sigma * sigma).exp() / kk
    });

    PairPotential {
        model: PotentialModel::Urpm {
            lb,
            sigma,
            sigmap,
            use_short,
        },
        u,
        du,
        u_long,
        u_long_k,
        valences: z.to_vec(),
        core,
        r: r.to_vec(),
        short: use_short,
    }
}
