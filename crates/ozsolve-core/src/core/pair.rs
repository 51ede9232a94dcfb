use std::ops::{Index, IndexMut};

/// A pairwise radial function sampled on a grid: one value per grid point and
/// ordered species pair, stored point-major as `[p][i][j]`.
///
/// Writers that go through [`PairFunction::set`] or [`PairFunction::set_column`]
/// always update both `(i, j)` and `(j, i)`, so species symmetry holds unless a
/// caller deliberately reaches into the raw slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFunction {
    len: usize,
    ncomp: usize,
    data: Vec<f64>,
}

impl PairFunction {
    pub fn zeros(len: usize, ncomp: usize) -> Self {
        Self::filled(len, ncomp, 0.0)
    }

    pub fn filled(len: usize, ncomp: usize, value: f64) -> Self {
        Self {
            len,
            ncomp,
            data: vec![value; len * ncomp * ncomp],
        }
    }

    /// Builds a function by evaluating `f(p, i, j)` on the upper triangle and
    /// mirroring it onto the lower one.
    pub fn from_fn<F>(len: usize, ncomp: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        let mut out = Self::zeros(len, ncomp);
        for p in 0..len {
            for (i, j) in pair_indices(ncomp) {
                out.set(p, i, j, f(p, i, j));
            }
        }
        out
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn ncomp(&self) -> usize {
        self.ncomp
    }

    #[inline]
    fn offset(&self, p: usize, i: usize, j: usize) -> usize {
        (p * self.ncomp + i) * self.ncomp + j
    }

    #[inline]
    pub fn get(&self, p: usize, i: usize, j: usize) -> f64 {
        self.data[self.offset(p, i, j)]
    }

    #[inline]
    pub fn set(&mut self, p: usize, i: usize, j: usize, value: f64) {
        let a = self.offset(p, i, j);
        let b = self.offset(p, j, i);
        self.data[a] = value;
        self.data[b] = value;
    }

    /// The radial profile of pair `(i, j)`.
    pub fn column(&self, i: usize, j: usize) -> Vec<f64> {
        (0..self.len).map(|p| self.get(p, i, j)).collect()
    }

    pub fn set_column(&mut self, i: usize, j: usize, values: &[f64]) {
        debug_assert_eq!(values.len(), self.len);
        for (p, &v) in values.iter().enumerate() {
            self.set(p, i, j, v);
        }
    }

    /// The `ncomp x ncomp` block at grid point `p`.
    #[inline]
    pub fn block(&self, p: usize) -> &[f64] {
        let width = self.ncomp * self.ncomp;
        &self.data[p * width..(p + 1) * width]
    }

    #[inline]
    pub fn block_mut(&mut self, p: usize) -> &mut [f64] {
        let width = self.ncomp * self.ncomp;
        &mut self.data[p * width..(p + 1) * width]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.len).all(|p| {
            pair_indices(self.ncomp).all(|(i, j)| self.get(p, i, j) == self.get(p, j, i))
        })
    }

    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// `self - other`, element by element.
    pub fn difference(&self, other: &Self) -> Self {
        debug_assert_eq!(self.data.len(), other.data.len());
        Self {
            len: self.len,
            ncomp: self.ncomp,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a - b)
                .collect(),
        }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum()
    }

    pub fn sum_of_squares(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum()
    }

    /// `self += scale * other`
    pub fn add_scaled(&mut self, scale: f64, other: &Self) {
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += scale * b;
        }
    }

    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.data {
            *v *= factor;
        }
    }
}

impl Index<(usize, usize, usize)> for PairFunction {
    type Output = f64;

    fn index(&self, (p, i, j): (usize, usize, usize)) -> &Self::Output {
        &self.data[self.offset(p, i, j)]
    }
}

impl IndexMut<(usize, usize, usize)> for PairFunction {
    fn index_mut(&mut self, (p, i, j): (usize, usize, usize)) -> &mut Self::Output {
        let idx = self.offset(p, i, j);
        &mut self.data[idx]
    }
}

/// All unordered species pairs `(i, j)` with `i <= j`.
pub fn pair_indices(ncomp: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..ncomp).flat_map(move |i| (i..ncomp).map(move |j| (i, j)))
}
