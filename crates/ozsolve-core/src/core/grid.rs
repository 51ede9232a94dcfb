use super::pair::{PairFunction, pair_indices};
use super::transform::SineTransform;
use super::validation::{ConfigError, require_positive};
use std::f64::consts::PI;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Paired real-space and reciprocal-space radial grids.
///
/// Both axes hold `ng - 1` samples, `r[p] = (p + 1) deltar` and
/// `k[p] = (p + 1) deltak` with `deltak = pi / (ng deltar)`. The origin and the
/// outer node `ng deltar` (where every sine basis function vanishes) are never
/// stored. `deltak` is derived; the only way to change it is to build a new grid.
#[derive(Debug, Clone)]
pub struct Grid {
    ng: usize,
    deltar: f64,
    deltak: f64,
    r: Vec<f64>,
    k: Vec<f64>,
    dst: SineTransform,
}

impl Grid {
    pub fn new(ng: usize, deltar: f64) -> Result<Self, ConfigError> {
        if ng < 2 {
            return Err(ConfigError::InvalidCount {
                name: "ng",
                value: ng,
                reason: "at least two grid intervals are required",
            });
        }
        let deltar = require_positive("deltar", deltar)?;
        let deltak = PI / (ng as f64 * deltar);

        let r = (1..ng).map(|p| p as f64 * deltar).collect();
        let k = (1..ng).map(|p| p as f64 * deltak).collect();

        Ok(Self {
            ng,
            deltar,
            deltak,
            r,
            k,
            dst: SineTransform::new(ng),
        })
    }

    #[inline]
    pub fn ng(&self) -> usize {
        self.ng
    }

    /// Number of stored samples on each axis.
    #[inline]
    pub fn len(&self) -> usize {
        self.ng - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn deltar(&self) -> f64 {
        self.deltar
    }

    #[inline]
    pub fn deltak(&self) -> f64 {
        self.deltak
    }

    #[inline]
    pub fn r(&self) -> &[f64] {
        &self.r
    }

    #[inline]
    pub fn k(&self) -> &[f64] {
        &self.k
    }

    /// Extent of the real-space box, `ng deltar`.
    pub fn r_max(&self) -> f64 {
        self.ng as f64 * self.deltar
    }

    /// `F(k) = (4 pi / k) int_0^inf r f(r) sin(kr) dr` on the grid.
    pub fn forward(&self, f: &[f64]) -> Vec<f64> {
        let weighted: Vec<f64> = f.iter().zip(&self.r).map(|(v, r)| v * r).collect();
        let prefactor = 4.0 * PI * self.deltar;
        self.dst
            .apply(&weighted)
            .into_iter()
            .zip(&self.k)
            .map(|(y, k)| prefactor * y / k)
            .collect()
    }

    /// `f(r) = (1 / (2 pi^2 r)) int_0^inf k F(k) sin(kr) dk` on the grid.
    pub fn inverse(&self, fk: &[f64]) -> Vec<f64> {
        let weighted: Vec<f64> = fk.iter().zip(&self.k).map(|(v, k)| v * k).collect();
        let prefactor = self.deltak / (2.0 * PI * PI);
        self.dst
            .apply(&weighted)
            .into_iter()
            .zip(&self.r)
            .map(|(y, r)| prefactor * y / r)
            .collect()
    }

    pub fn forward_pairs(&self, f: &PairFunction) -> PairFunction {
        self.map_pairs(f, |column| self.forward(column))
    }

    pub fn inverse_pairs(&self, fk: &PairFunction) -> PairFunction {
        self.map_pairs(fk, |column| self.inverse(column))
    }

    fn map_pairs<F>(&self, input: &PairFunction, transform: F) -> PairFunction
    where
        F: Fn(&[f64]) -> Vec<f64> + Sync,
    {
        let ncomp = input.ncomp();
        let pairs: Vec<(usize, usize)> = pair_indices(ncomp).collect();

        #[cfg(not(feature = "parallel"))]
        let iterator = pairs.iter();

        #[cfg(feature = "parallel")]
        let iterator = pairs.par_iter();

        let columns: Vec<((usize, usize), Vec<f64>)> = iterator
            .map(|&(i, j)| ((i, j), transform(&input.column(i, j))))
            .collect();

        let mut out = PairFunction::zeros(input.len(), ncomp);
        for ((i, j), column) in columns {
            out.set_column(i, j, &column);
        }
        out
    }

    /// `int_0^inf 4 pi r^2 f(r) dr` by the rectangle rule, i.e. the transform of
    /// `f` at `k = 0`.
    pub fn volume_integral(&self, f: &[f64]) -> f64 {
        4.0 * PI
            * self.deltar
            * f.iter().zip(&self.r).map(|(v, r)| v * r * r).sum::<f64>()
    }
}
