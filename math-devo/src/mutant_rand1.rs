use ndarray::{Array1, Array2, Zip};

/// Donor combination `a + f * (b - c)` over every dimension.
pub(crate) fn mutant_rand1(pop: &Array2<f64>, donors: [usize; 3], f: f64) -> Array1<f64> {
    let [r0, r1, r2] = donors;

    Zip::from(pop.row(r0))
        .and(pop.row(r1))
        .and(pop.row(r2))
        .map_collect(|&x0, &x1, &x2| x0 + f * (x1 - x2))
}
