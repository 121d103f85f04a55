//! Read-only summaries of a model's current population.
//!
//! [`Model::mean_std`] uses ndarray's `mean_axis` / `std_axis` with `ddof = 0`,
//! i.e. the population (biased) standard deviation. That accumulation is
//! numerically stable, so it can differ in the last bits from the textbook
//! `sqrt(E[x^2] - E[x]^2)` and, unlike it, never goes negative (NaN) on a
//! column of identical values.

use ndarray::{Array1, Axis};

use crate::Model;

/// Index and value of the first minimum of `v` (strict `<`, so ties keep the
/// earliest index).
pub(crate) fn argmin(v: &Array1<f64>) -> (usize, f64) {
    let mut best_i = 0usize;
    let mut best_v = v[0];
    for (i, &val) in v.iter().enumerate() {
        if val < best_v {
            best_v = val;
            best_i = i;
        }
    }
    (best_i, best_v)
}

impl Model {
    /// Best individual and its fitness.
    ///
    /// Among equal fitness values the lowest index wins.
    ///
    /// # Panics
    ///
    /// Panics if the population is empty.
    pub fn best(&self) -> (Array1<f64>, f64) {
        let (best_idx, best_f) = argmin(self.fitness());
        (self.population().row(best_idx).to_owned(), best_f)
    }

    /// Per-dimension mean and population standard deviation (divide by NP).
    ///
    /// For a DE-MCMC model these are the posterior mean and spread estimates.
    /// An empty population yields NaN for every dimension.
    pub fn mean_std(&self) -> (Array1<f64>, Array1<f64>) {
        let pop = self.population();
        let mean = pop
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::from_elem(pop.ncols(), f64::NAN));
        let std = pop.std_axis(Axis(0), 0.0);
        (mean, std)
    }
}
