use ndarray::Array2;
use rand::Rng;

/// Uniform random population: coordinate `j` of every individual is drawn
/// from `[lower[j], upper[j])`, row by row.
pub(crate) fn init_random<R: Rng + ?Sized>(
    npop: usize,
    lower: &[f64],
    upper: &[f64],
    rng: &mut R,
) -> Array2<f64> {
    let n = lower.len();
    let mut pop = Array2::<f64>::zeros((npop, n));
    for i in 0..npop {
        for j in 0..n {
            let u: f64 = rng.random::<f64>();
            pop[(i, j)] = lower[j] + u * (upper[j] - lower[j]);
        }
    }
    pop
}
