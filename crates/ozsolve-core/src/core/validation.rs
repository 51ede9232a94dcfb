use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid count for '{name}': {value} ({reason})")]
    InvalidCount {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    #[error("Model '{model}' expects {expected} species but the system has {found}")]
    ComponentMismatch {
        model: &'static str,
        expected: String,
        found: usize,
    },

    #[error("Expected {expected} densities but got {found}")]
    DensityLength { expected: usize, found: usize },
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be positive",
        });
    }
    Ok(value)
}

pub(crate) fn require_count(
    name: &'static str,
    value: usize,
    minimum: usize,
) -> Result<usize, ConfigError> {
    if value < minimum {
        return Err(ConfigError::InvalidCount {
            name,
            value,
            reason: if minimum == 1 {
                "must be at least 1"
            } else {
                "below the allowed minimum"
            },
        });
    }
    Ok(value)
}
