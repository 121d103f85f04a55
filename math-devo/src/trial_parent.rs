use ndarray::{Array1, Array2};
use rand::Rng;

use crate::crossover_binomial::binomial_crossover;
use crate::distinct_indices::anchored_donors;
use crate::mutant_rand1::mutant_rand1;

/// rand/1/bin trial whose base vector is the individual itself, so the
/// proposal is a jump from the current chain position.
pub(crate) fn trial_parent<R: Rng + ?Sized>(
    i: usize,
    pop: &Array2<f64>,
    f: f64,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let [b, c] = anchored_donors(i, i, pop.nrows(), rng);
    let mutant = mutant_rand1(pop, [i, b, c], f);
    binomial_crossover(pop.row(i), &mutant, cr, rng)
}
