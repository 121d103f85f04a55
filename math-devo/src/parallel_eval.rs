use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;

/// Parallel evaluation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Evaluate individuals concurrently on the rayon pool
    pub enabled: bool,
    /// Number of threads for rayon's global pool (None = use rayon default).
    /// Only read when a model is built.
    pub num_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            num_threads: None,
        }
    }
}

impl ParallelConfig {
    /// Sequential or concurrent evaluation on rayon's default pool.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            num_threads: None,
        }
    }

    /// Sizes rayon's global pool once. Later calls, or a pool that rayon
    /// already initialised, leave the existing pool in place.
    pub(crate) fn configure_pool(&self) {
        if let Some(n) = self.num_threads {
            if let Err(err) = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build_global()
            {
                log::debug!("rayon global pool left unchanged: {err}");
            }
        }
    }
}

/// Evaluate every row of `population` with `objective`.
///
/// The result is index-aligned: `result[i] == objective(population.row(i))`.
/// When `config.enabled` is set each row is an independent rayon task and the
/// call returns once all of them are done. A panicking objective is not
/// caught; rayon lets in-flight tasks finish and re-raises the panic here.
///
/// # Arguments
/// * `population` - 2D array where each row is an individual
/// * `objective` - Function to evaluate each individual
/// * `config` - Parallel configuration
pub fn evaluate_population<F>(
    population: &Array2<f64>,
    objective: &F,
    config: &ParallelConfig,
) -> Array1<f64>
where
    F: Fn(ArrayView1<f64>) -> f64 + Sync + ?Sized,
{
    let npop = population.nrows();

    if !config.enabled {
        return population.rows().into_iter().map(objective).collect();
    }

    let results = (0..npop)
        .into_par_iter()
        .map(|i| objective(population.row(i)))
        .collect::<Vec<f64>>();

    Array1::from_vec(results)
}
