use super::closure::Closure;
use super::potentials::PotentialModel;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GridParams {
    pub ng: usize,
    pub deltar: f64,
}

/// Iteration controls; anything left out falls back to the solver defaults.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct IterationParams {
    pub alpha: Option<f64>,
    pub npic: Option<usize>,
    pub nps: Option<usize>,
    pub maxsteps: Option<usize>,
    pub tolerance: Option<f64>,
    pub divergence_limit: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpeciesParams {
    pub rho: Vec<f64>,
}

/// A complete solver run as described by a TOML file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunParams {
    pub closure: Closure,
    #[serde(default)]
    pub exp_refine: bool,
    pub grid: GridParams,
    #[serde(default)]
    pub iteration: IterationParams,
    pub model: PotentialModel,
    pub species: SpeciesParams,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl RunParams {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}
