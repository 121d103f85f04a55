use crate::{Model, ModelConfig, ParallelConfig, Result};
use ndarray::ArrayView1;

/// Builds a Differential Evolution model with the DE preset.
///
/// The population holds `population_size` individuals drawn uniformly from
/// `[pmin[j], pmax[j])` and is fully evaluated before returning. The preset
/// uses CR = 0.1, F = 0.7, [`TrialStrategy::Sp97`](crate::TrialStrategy::Sp97)
/// and [`DenialStrategy::Greedy`](crate::DenialStrategy::Greedy); every
/// setting stays mutable on the returned model. `parallel` selects concurrent
/// evaluation for the initial population and every later step.
///
/// # Errors
///
/// Returns `DevoError::BoundsMismatch` if `pmin` and `pmax` have different
/// lengths.
///
/// # Example
///
/// ```rust
/// use math_devo::initialize;
///
/// let model = initialize(&[-1.0, -1.0], &[1.0, 1.0], 10, true, |x| x.dot(&x))
///     .expect("bounds have the same length");
/// assert_eq!(model.population().dim(), (10, 2));
/// ```
pub fn initialize<F>(
    pmin: &[f64],
    pmax: &[f64],
    population_size: usize,
    parallel: bool,
    objective: F,
) -> Result<Model>
where
    F: Fn(ArrayView1<f64>) -> f64 + Send + Sync + 'static,
{
    let config = ModelConfig {
        population_size,
        parallel: ParallelConfig::new(parallel),
        ..ModelConfig::default()
    };
    Model::new(pmin, pmax, objective, config)
}

/// Builds a DE-MCMC model: same validation and defaults as [`initialize`] but
/// with [`TrialStrategy::Parent`](crate::TrialStrategy::Parent) proposals and
/// [`DenialStrategy::Metropolis`](crate::DenialStrategy::Metropolis)
/// acceptance. The objective should be a chi-square-like statistic (sum of
/// squared standardized residuals).
///
/// # Errors
///
/// Returns `DevoError::BoundsMismatch` if `pmin` and `pmax` have different
/// lengths.
pub fn initialize_mcmc<F>(
    pmin: &[f64],
    pmax: &[f64],
    population_size: usize,
    parallel: bool,
    objective: F,
) -> Result<Model>
where
    F: Fn(ArrayView1<f64>) -> f64 + Send + Sync + 'static,
{
    let config = ModelConfig {
        population_size,
        parallel: ParallelConfig::new(parallel),
        ..ModelConfig::mcmc()
    };
    Model::new(pmin, pmax, objective, config)
}
