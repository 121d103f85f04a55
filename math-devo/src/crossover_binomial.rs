use ndarray::{Array1, ArrayView1};
use rand::Rng;

/// Copies `target`, then takes `mutant[j]` for the forced dimension and for
/// every other dimension with probability `cr`. No uniform is drawn for the
/// forced dimension.
pub(crate) fn binomial_crossover<R: Rng + ?Sized>(
    target: ArrayView1<f64>,
    mutant: &Array1<f64>,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let n = target.len();
    let jrand = rng.random_range(0..n);
    let mut trial = target.to_owned();
    for j in 0..n {
        if j == jrand || rng.random::<f64>() < cr {
            trial[j] = mutant[j];
        }
    }
    trial
}
