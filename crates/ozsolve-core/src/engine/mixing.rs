use super::config::IterationConfig;
use crate::core::pair::PairFunction;
use nalgebra::{DMatrix, DVector};
use std::collections::VecDeque;
use tracing::debug;

/// An error growth by more than this factor between steps wipes the history
/// and restarts the Picard warm-up.
pub const RESTART_GROWTH: f64 = 10.0;

/// Relative cutoff for discarding small singular values in the weight solve.
const SINGULAR_VALUE_CUTOFF: f64 = 1e-12;

#[derive(Debug, Clone)]
struct HistoryEntry {
    iterate: PairFunction,
    residual: PairFunction,
}

/// Fixed-point accelerator: Picard steps until the history is warm, then
/// Anderson (DIIS) extrapolation over the last `nps` iterate/residual pairs.
#[derive(Debug)]
pub struct Mixer {
    alpha: f64,
    npic: usize,
    nps: usize,
    picard_remaining: usize,
    history: VecDeque<HistoryEntry>,
    last_error: Option<f64>,
    restarts: usize,
}

/// Which update produced the next iterate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixingStep {
    Picard,
    Anderson { depth: usize },
}

impl Mixer {
    pub fn new(config: &IterationConfig) -> Self {
        Self {
            alpha: config.alpha,
            npic: config.npic,
            nps: config.nps,
            picard_remaining: config.npic,
            history: VecDeque::with_capacity(config.nps),
            last_error: None,
            restarts: 0,
        }
    }

    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Produces the next iterate from the current one, its residual
    /// (`trial - current`) and the residual's error norm.
    pub fn next(
        &mut self,
        current: &PairFunction,
        residual: &PairFunction,
        error: f64,
    ) -> (PairFunction, MixingStep) {
        if let Some(previous) = self.last_error {
            if error > RESTART_GROWTH * previous && !self.history.is_empty() {
                debug!(error, previous, "Error grew sharply; restarting mixing history.");
                self.history.clear();
                self.picard_remaining = self.npic;
                self.restarts += 1;
            }
        }
        self.last_error = Some(error);

        if self.history.len() == self.nps {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            iterate: current.clone(),
            residual: residual.clone(),
        });

        if self.picard_remaining > 0 || self.history.len() < 2 {
            self.picard_remaining = self.picard_remaining.saturating_sub(1);
            return (self.picard(current, residual), MixingStep::Picard);
        }

        match self.anderson() {
            Some(next) => (
                next,
                MixingStep::Anderson {
                    depth: self.history.len(),
                },
            ),
            None => {
                debug!("Anderson weights unavailable; falling back to a Picard step.");
                (self.picard(current, residual), MixingStep::Picard)
            }
        }
    }

    fn picard(&self, current: &PairFunction, residual: &PairFunction) -> PairFunction {
        let mut next = current.clone();
        next.add_scaled(self.alpha, residual);
        next
    }

    /// Weights `w` with `sum w = 1` minimising `|sum w_i f_i|`, written
    /// relative to the newest entry `n` as `f_n + sum_j g_j (f_j - f_n)`; the
    /// next iterate is `sum w_i (c_i + alpha f_i)`.
    fn anderson(&self) -> Option<PairFunction> {
        let newest = self.history.back()?;
        let older: Vec<&HistoryEntry> = self.history.iter().take(self.history.len() - 1).collect();
        let m = older.len();

        let deltas: Vec<PairFunction> = older
            .iter()
            .map(|entry| entry.residual.difference(&newest.residual))
            .collect();

        let gram = DMatrix::from_fn(m, m, |a, b| deltas[a].dot(&deltas[b]));
        let rhs = DVector::from_fn(m, |a, _| -deltas[a].dot(&newest.residual));

        let svd = gram.svd(true, true);
        let largest = svd.singular_values.max();
        if !largest.is_finite() || largest <= 0.0 {
            return None;
        }
        let gamma = svd.solve(&rhs, SINGULAR_VALUE_CUTOFF * largest).ok()?;
        if !gamma.iter().all(|g| g.is_finite()) {
            return None;
        }

        let mut next = newest.iterate.clone();
        next.add_scaled(self.alpha, &newest.residual);
        for (entry, &g) in older.iter().zip(gamma.iter()) {
            next.add_scaled(g, &entry.iterate);
            next.add_scaled(-g, &newest.iterate);
            next.add_scaled(g * self.alpha, &entry.residual);
            next.add_scaled(-g * self.alpha, &newest.residual);
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(npic: usize, nps: usize) -> IterationConfig {
        IterationConfig {
            alpha: 0.5,
            npic,
            nps,
            ..IterationConfig::default()
        }
    }

    /// Fixed point of the linear map `x -> a x + b`, applied pointwise.
    fn linear_trial(x: &PairFunction) -> PairFunction {
        PairFunction::from_fn(x.len(), 1, |p, _, _| {
            let a = 0.3 + 0.1 * p as f64;
            a * x.get(p, 0, 0) + 1.0
        })
    }

    #[test]
    fn warm_up_uses_picard_steps() {
        let mut mixer = Mixer::new(&config(3, 4));
        let current = PairFunction::zeros(4, 1);
        let residual = PairFunction::filled(4, 1, 2.0);
        let (next, step) = mixer.next(&current, &residual, 1.0);
        assert_eq!(step, MixingStep::Picard);
        assert_eq!(next.get(0, 0, 0), 1.0);
    }

    #[test]
    fn history_is_bounded_by_depth() {
        let mut mixer = Mixer::new(&config(1, 3));
        let mut x = PairFunction::zeros(4, 1);
        for _ in 0..10 {
            let residual = linear_trial(&x).difference(&x);
            let error = residual.sum_of_squares().sqrt();
            x = mixer.next(&x, &residual, error).0;
        }
        assert_eq!(mixer.history_len(), 3);
    }

    #[test]
    fn anderson_solves_linear_problem_quickly() {
        let mut mixer = Mixer::new(&config(1, 6));
        let mut x = PairFunction::zeros(4, 1);
        let mut saw_anderson = false;
        for _ in 0..30 {
            let residual = linear_trial(&x).difference(&x);
            let error = residual.sum_of_squares().sqrt();
            if error < 1e-12 {
                break;
            }
            let (next, step) = mixer.next(&x, &residual, error);
            saw_anderson |= matches!(step, MixingStep::Anderson { .. });
            x = next;
        }
        assert!(saw_anderson);
        for p in 0..4 {
            let a = 0.3 + 0.1 * p as f64;
            assert!((x.get(p, 0, 0) - 1.0 / (1.0 - a)).abs() < 1e-8);
        }
    }

    #[test]
    fn sharp_error_growth_restarts_history() {
        let mut mixer = Mixer::new(&config(1, 4));
        let x = PairFunction::zeros(2, 1);
        let r = PairFunction::filled(2, 1, 1.0);
        mixer.next(&x, &r, 1.0);
        mixer.next(&x, &r, 0.5);
        assert_eq!(mixer.history_len(), 2);
        let (_, step) = mixer.next(&x, &r, 50.0);
        assert_eq!(mixer.restarts(), 1);
        assert_eq!(mixer.history_len(), 1);
        assert_eq!(step, MixingStep::Picard);
    }
}
