use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Type-I discrete sine transform of length `n = size - 1`, evaluated through a
/// complex FFT of length `2 * size` on the odd extension of the input:
///
/// `Y_k = sum_{j=1}^{size-1} x_j sin(pi j k / size)` for `k = 1..size-1`.
///
/// Unnormalised; applying it twice multiplies by `size / 2`.
#[derive(Clone)]
pub struct SineTransform {
    size: usize,
    fft: Arc<dyn Fft<f64>>,
}

impl SineTransform {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(2 * size);
        Self { size, fft }
    }

    /// Number of samples transformed (`size - 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.size - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size <= 1
    }

    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let n = self.len();
        debug_assert_eq!(input.len(), n);

        let mut buffer = vec![Complex::new(0.0, 0.0); 2 * self.size];
        for (j, &x) in input.iter().enumerate() {
            buffer[j + 1] = Complex::new(x, 0.0);
            buffer[2 * self.size - (j + 1)] = Complex::new(-x, 0.0);
        }

        self.fft.process(&mut buffer);

        // For the odd extension A_k = -2i Y_k.
        buffer[1..=n].iter().map(|a| -0.5 * a.im).collect()
    }
}

impl fmt::Debug for SineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SineTransform")
            .field("size", &self.size)
            .finish()
    }
}
