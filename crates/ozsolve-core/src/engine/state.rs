use super::error::EngineError;
use crate::core::closure::Closure;
use crate::core::grid::Grid;
use crate::core::pair::PairFunction;
use crate::core::species::Species;
use std::fmt;

/// How a solve ended. Divergence and running out of steps are outcomes, not
/// errors; callers must check the status before trusting the functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    Converged,
    MaxStepsExceeded,
    Diverged,
}

impl SolverStatus {
    /// Integer code used by drivers and process exit statuses.
    pub fn return_code(&self) -> i32 {
        match self {
            Self::Converged => 0,
            Self::MaxStepsExceeded => 1,
            Self::Diverged => 2,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged)
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Converged => "converged",
            Self::MaxStepsExceeded => "maximum steps exceeded",
            Self::Diverged => "diverged",
        })
    }
}

/// The functions produced by one solve (or one EXP refinement of a solve).
///
/// `c` and `ck` are the short-ranged direct correlation; the full direct
/// correlation in k-space is `ck - u_long_k`. `e = h - c` and the structure
/// factor `sk` is `S_ij = rho_i delta_ij + rho_i rho_j H_ij`.
#[derive(Debug, Clone)]
pub struct OzSolution {
    pub grid: Grid,
    pub closure: Closure,
    pub species: Species,
    pub c: PairFunction,
    pub e: PairFunction,
    pub hr: PairFunction,
    pub ck: PairFunction,
    pub ek: PairFunction,
    pub hk: PairFunction,
    pub sk: PairFunction,
    pub error: f64,
    pub steps: usize,
    pub status: SolverStatus,
    pub exp_refined: bool,
    /// The unrefined total correlation, kept so refinement is repeatable.
    pub(crate) h_base: PairFunction,
}

impl OzSolution {
    #[inline]
    pub fn r(&self) -> &[f64] {
        self.grid.r()
    }

    #[inline]
    pub fn k(&self) -> &[f64] {
        self.grid.k()
    }

    #[inline]
    pub fn deltak(&self) -> f64 {
        self.grid.deltak()
    }

    #[inline]
    pub fn rho(&self) -> &[f64] {
        self.species.rho()
    }

    #[inline]
    pub fn z(&self) -> &[f64] {
        self.species.z()
    }

    pub fn ncomp(&self) -> usize {
        self.species.ncomp()
    }

    /// Closure label, with `+EXP` appended once refined.
    pub fn closure_name(&self) -> String {
        if self.exp_refined {
            format!("{}+EXP", self.closure.name())
        } else {
            self.closure.name().to_string()
        }
    }

    pub fn return_code(&self) -> i32 {
        self.status.return_code()
    }

    pub fn is_converged(&self) -> bool {
        self.status.is_converged()
    }

    /// Pair distribution function `g = 1 + h` for pair `(i, j)`.
    pub fn g(&self, i: usize, j: usize) -> Vec<f64> {
        self.hr.column(i, j).into_iter().map(|h| 1.0 + h).collect()
    }

    pub(crate) fn require_converged(&self, operation: &'static str) -> Result<(), EngineError> {
        if self.status.is_converged() {
            Ok(())
        } else {
            Err(EngineError::Precondition {
                operation,
                status: self.status,
            })
        }
    }
}
