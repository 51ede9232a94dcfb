pub use crate::core::validation::ConfigError;
use crate::core::validation::{require_count, require_positive};

pub const DEFAULT_ALPHA: f64 = 0.2;
pub const DEFAULT_NPIC: usize = 6;
pub const DEFAULT_NPS: usize = 6;
pub const DEFAULT_MAXSTEPS: usize = 100;
pub const DEFAULT_TOLERANCE: f64 = 1e-10;
pub const DEFAULT_DIVERGENCE_LIMIT: f64 = 1e6;

/// Controls for the fixed-point iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationConfig {
    /// Picard mixing fraction.
    pub alpha: f64,
    /// Plain Picard steps taken after every (re)start of the history.
    pub npic: usize,
    /// Depth of the iterate/residual history used for weighted mixing.
    pub nps: usize,
    pub maxsteps: usize,
    pub tolerance: f64,
    /// Errors above this are treated as divergence.
    pub divergence_limit: f64,
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            npic: DEFAULT_NPIC,
            nps: DEFAULT_NPS,
            maxsteps: DEFAULT_MAXSTEPS,
            tolerance: DEFAULT_TOLERANCE,
            divergence_limit: DEFAULT_DIVERGENCE_LIMIT,
        }
    }
}

impl IterationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("alpha", self.alpha)?;
        require_count("npic", self.npic, 1)?;
        require_count("nps", self.nps, 1)?;
        require_count("maxsteps", self.maxsteps, 1)?;
        require_positive("tolerance", self.tolerance)?;
        require_positive("divergence_limit", self.divergence_limit)?;
        Ok(())
    }
}

/// Everything needed to allocate a solver: system size, grid and iteration
/// controls, and the species densities.
#[derive(Debug, Clone, PartialEq)]
pub struct OzConfig {
    pub ncomp: usize,
    pub ng: usize,
    pub deltar: f64,
    pub rho: Vec<f64>,
    pub iteration: IterationConfig,
}

impl OzConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_count("ncomp", self.ncomp, 1)?;
        if self.rho.len() != self.ncomp {
            return Err(ConfigError::DensityLength {
                expected: self.ncomp,
                found: self.rho.len(),
            });
        }
        self.iteration.validate()
    }
}

#[derive(Default)]
pub struct OzConfigBuilder {
    ncomp: Option<usize>,
    ng: Option<usize>,
    deltar: Option<f64>,
    rho: Option<Vec<f64>>,
    alpha: Option<f64>,
    npic: Option<usize>,
    nps: Option<usize>,
    maxsteps: Option<usize>,
    tolerance: Option<f64>,
    divergence_limit: Option<f64>,
}

impl OzConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ncomp(mut self, ncomp: usize) -> Self {
        self.ncomp = Some(ncomp);
        self
    }
    pub fn ng(mut self, ng: usize) -> Self {
        self.ng = Some(ng);
        self
    }
    pub fn deltar(mut self, deltar: f64) -> Self {
        self.deltar = Some(deltar);
        self
    }
    pub fn rho(mut self, rho: Vec<f64>) -> Self {
        self.rho = Some(rho);
        self
    }
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }
    pub fn npic(mut self, npic: usize) -> Self {
        self.npic = Some(npic);
        self
    }
    pub fn nps(mut self, nps: usize) -> Self {
        self.nps = Some(nps);
        self
    }
    pub fn maxsteps(mut self, maxsteps: usize) -> Self {
        self.maxsteps = Some(maxsteps);
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn divergence_limit(mut self, limit: f64) -> Self {
        self.divergence_limit = Some(limit);
        self
    }

    /// Builds and validates the configuration. When densities are not given
    /// the system starts with all densities zero and they must be set before
    /// solving.
    pub fn build(self) -> Result<OzConfig, ConfigError> {
        let defaults = IterationConfig::default();
        let ncomp = self.ncomp.ok_or(ConfigError::MissingParameter("ncomp"))?;
        let config = OzConfig {
            ncomp,
            ng: self.ng.ok_or(ConfigError::MissingParameter("ng"))?,
            deltar: self.deltar.ok_or(ConfigError::MissingParameter("deltar"))?,
            rho: self.rho.unwrap_or_else(|| vec![0.0; ncomp]),
            iteration: IterationConfig {
                alpha: self.alpha.unwrap_or(defaults.alpha),
                npic: self.npic.unwrap_or(defaults.npic),
                nps: self.nps.unwrap_or(defaults.nps),
                maxsteps: self.maxsteps.unwrap_or(defaults.maxsteps),
                tolerance: self.tolerance.unwrap_or(defaults.tolerance),
                divergence_limit: self.divergence_limit.unwrap_or(defaults.divergence_limit),
            },
        };
        config.validate()?;
        Ok(config)
    }
}
