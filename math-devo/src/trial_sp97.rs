use ndarray::{Array1, Array2};
use rand::Rng;

use crate::crossover_binomial::binomial_crossover;
use crate::distinct_indices::distinct_donors;
use crate::mutant_rand1::mutant_rand1;

/// Storn & Price (1997) rand/1/bin trial for individual `i`.
pub(crate) fn trial_sp97<R: Rng + ?Sized>(
    i: usize,
    pop: &Array2<f64>,
    f: f64,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let donors = distinct_donors(i, pop.nrows(), rng);
    let mutant = mutant_rand1(pop, donors, f);
    binomial_crossover(pop.row(i), &mutant, cr, rng)
}
