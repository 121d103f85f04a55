use ndarray::{Array1, ArrayView1};
use rand::Rng;

/// Copies `target` and overwrites a cyclic block of dimensions, starting at a
/// random index, with `mutant`. The block length starts at one and grows while
/// a fresh uniform is below `cr`, up to the full dimension.
pub(crate) fn exponential_crossover<R: Rng + ?Sized>(
    target: ArrayView1<f64>,
    mutant: &Array1<f64>,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let n = target.len();
    let start = rng.random_range(0..n);
    let mut len = 1usize;
    while rng.random::<f64>() < cr && len < n {
        len += 1;
    }

    let mut trial = target.to_owned();
    for k in start..start + len {
        trial[k % n] = mutant[k % n];
    }
    trial
}
