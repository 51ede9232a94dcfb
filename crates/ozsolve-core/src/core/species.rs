use super::validation::ConfigError;
use nalgebra::DMatrix;

/// The set of species in the fluid: number densities and valences.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    rho: Vec<f64>,
    z: Vec<f64>,
}

impl Species {
    /// Uncharged species with the given densities.
    pub fn neutral(rho: Vec<f64>) -> Result<Self, ConfigError> {
        let z = vec![0.0; rho.len()];
        Self::charged(rho, z)
    }

    pub fn charged(rho: Vec<f64>, z: Vec<f64>) -> Result<Self, ConfigError> {
        if rho.is_empty() {
            return Err(ConfigError::InvalidCount {
                name: "ncomp",
                value: 0,
                reason: "must be at least 1",
            });
        }
        if z.len() != rho.len() {
            return Err(ConfigError::DensityLength {
                expected: rho.len(),
                found: z.len(),
            });
        }
        for &value in &rho {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "rho",
                    value,
                    reason: "densities must be finite and non-negative",
                });
            }
        }
        if rho.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "rho",
                value: 0.0,
                reason: "total density must be positive",
            });
        }
        Ok(Self { rho, z })
    }

    #[inline]
    pub fn ncomp(&self) -> usize {
        self.rho.len()
    }

    #[inline]
    pub fn rho(&self) -> &[f64] {
        &self.rho
    }

    #[inline]
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn total_density(&self) -> f64 {
        self.rho.iter().sum()
    }

    pub fn net_charge_density(&self) -> f64 {
        self.rho.iter().zip(&self.z).map(|(r, z)| r * z).sum()
    }

    /// The diagonal matrix coupling species in the OZ relation.
    pub fn density_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&nalgebra::DVector::from_column_slice(&self.rho))
    }

    /// Returns a copy carrying the given valences, e.g. those imposed by a
    /// charged potential model.
    pub fn with_valences(&self, z: &[f64]) -> Result<Self, ConfigError> {
        Self::charged(self.rho.clone(), z.to_vec())
    }
}
