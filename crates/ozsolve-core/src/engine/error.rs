use thiserror::Error;

use super::state::SolverStatus;
use crate::core::params::ParamLoadError;
use crate::core::validation::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Configuration {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to load run parameters: {source}")]
    Params {
        #[from]
        source: ParamLoadError,
    },

    #[error("No interaction potential has been set; call a potential setup before solving")]
    MissingPotential,

    #[error("Grid mismatch: potential tabulated on {found} points, solver grid has {expected}")]
    GridMismatch { expected: usize, found: usize },

    #[error("{operation} requires a converged solution, but the solver finished with status '{status}'")]
    Precondition {
        operation: &'static str,
        status: SolverStatus,
    },

    #[error("The OZ relation is singular at one or more wavevectors during {operation}")]
    SingularOz { operation: &'static str },
}
