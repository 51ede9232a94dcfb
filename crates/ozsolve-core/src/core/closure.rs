use super::pair::{PairFunction, pair_indices};
use super::potentials::PairPotential;
use serde::Deserialize;
use std::fmt;

/// Largest argument passed to `exp` on post-processing paths.
pub const EXP_ARGUMENT_LIMIT: f64 = 700.0;

/// Default floor used when plotting logarithmic tails.
pub const DEFAULT_LOG_FLOOR: f64 = 1e-20;

/// The algebraic relation closing the OZ equation.
///
/// All closures are written for the short-ranged direct correlation `c` and
/// the indirect correlation `e = h - c`; `u` is the potential seen by the
/// closure. When that is the full potential rather than `U_short`, `c` and
/// `e` are shifted by the potential's closure offset before and after the
/// closure is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Closure {
    /// Hypernetted chain: `c = exp(-u + e) - 1 - e`.
    Hnc,
    /// Mean spherical approximation: `c = -u` outside the core.
    Msa,
    /// Random phase approximation: `c = -u` outside the core, no exclusion.
    Rpa,
}

impl Closure {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hnc => "HNC",
            Self::Msa => "MSA",
            Self::Rpa => "RPA",
        }
    }

    /// Whether the closure imposes `h = -1` inside hard cores.
    pub fn enforces_core(&self) -> bool {
        !matches!(self, Self::Rpa)
    }

    #[inline]
    fn value(&self, u: f64, e: f64, in_core: bool) -> f64 {
        if in_core {
            return if self.enforces_core() { -1.0 - e } else { 0.0 };
        }
        match self {
            Self::Hnc => (-u + e).exp() - 1.0 - e,
            Self::Msa | Self::Rpa => -u,
        }
    }

    /// Closure value for the short-ranged `c`, given the offset between the
    /// potential the closure sees and `U_short`.
    #[inline]
    fn shifted_value(&self, u: f64, e: f64, offset: f64, in_core: bool) -> f64 {
        self.value(u, e + offset, in_core) + offset
    }

    /// Evaluates the closure pointwise, returning the trial direct correlation.
    pub fn evaluate(&self, potential: &PairPotential, e: &PairFunction) -> PairFunction {
        let ncomp = e.ncomp();
        let mut c = PairFunction::zeros(e.len(), ncomp);
        for p in 0..e.len() {
            for (i, j) in pair_indices(ncomp) {
                let value = self.shifted_value(
                    potential.u.get(p, i, j),
                    e.get(p, i, j),
                    potential.closure_offset(p, i, j),
                    potential.in_core(p, i, j),
                );
                c.set(p, i, j, value);
            }
        }
        c
    }

    /// The total correlation implied by `c` and `e`, pinned to exactly `-1`
    /// inside the core for closures that enforce exclusion.
    pub fn total_correlation(
        &self,
        potential: &PairPotential,
        c: &PairFunction,
        e: &PairFunction,
    ) -> PairFunction {
        let ncomp = c.ncomp();
        let mut h = PairFunction::zeros(c.len(), ncomp);
        for p in 0..c.len() {
            for (i, j) in pair_indices(ncomp) {
                let value = if self.enforces_core() && potential.in_core(p, i, j) {
                    -1.0
                } else {
                    c.get(p, i, j) + e.get(p, i, j)
                };
                h.set(p, i, j, value);
            }
        }
        h
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// EXP resummation `h = exp(h_base) - 1`, keeping `h = -1` inside cores when
/// `keep_core` is set.
pub fn exp_resummation(
    potential: &PairPotential,
    h_base: &PairFunction,
    keep_core: bool,
) -> PairFunction {
    let ncomp = h_base.ncomp();
    let mut h = PairFunction::zeros(h_base.len(), ncomp);
    for p in 0..h_base.len() {
        for (i, j) in pair_indices(ncomp) {
            let value = if keep_core && potential.in_core(p, i, j) {
                -1.0
            } else {
                h_base.get(p, i, j).min(EXP_ARGUMENT_LIMIT).exp() - 1.0
            };
            h.set(p, i, j, value);
        }
    }
    h
}

/// `log10(eps + |r h|)`, the floored tail used when plotting correlation
/// functions on a logarithmic scale.
pub fn log_tail(r: f64, h: f64, eps: f64) -> f64 {
    (eps + (r * h).abs()).log10()
}
