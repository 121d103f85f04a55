//! Differential Evolution optimizer and DE-MCMC sampler.
//!
//! This crate evolves a population of real-valued parameter vectors against a
//! scalar objective ("lower is better"). With greedy acceptance it is classic
//! Differential Evolution (Storn & Price); with Metropolis acceptance and
//! self-anchored proposals it becomes a DE Markov Chain Monte Carlo sampler
//! whose population approximates a posterior.
//!
//! # Features
//!
//! - Trial strategies: rand/1/bin (SP97), rand/1/exp (SP95), self-anchored
//!   rand/1/bin (Parent)
//! - Greedy and Metropolis acceptance
//! - Sequential or rayon-parallel fitness evaluation
//! - Seedable, reproducible random stream owned by the model
//! - Best individual and per-dimension mean / standard deviation
//!
//! # Example
//!
//! ```rust
//! use math_devo::{initialize, TrialStrategy};
//! use ndarray::ArrayView1;
//!
//! fn parabola(x: ArrayView1<f64>) -> f64 {
//!     3.0 + (x[0] - 1.0).powi(2) + (x[1] - 2.0).powi(2)
//! }
//!
//! let mut model = initialize(&[0.0, 0.0], &[2.0, 5.0], 15, false, parabola)
//!     .expect("bounds have the same length");
//! model.trial_strategy = TrialStrategy::Sp95;
//! model.crossover_constant = 0.4;
//! model.weighting_factor = 0.8;
//!
//! for _ in 0..200 {
//!     model.step();
//! }
//!
//! let (_x, fun) = model.best();
//! assert!(fun < 3.01);
//! ```
#![doc = include_str!("../README.md")]
#![doc = include_str!("../REFERENCES.md")]
#![warn(missing_docs)]

pub mod error;
pub use error::{DevoError, Result};

use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView1};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Donor index selection by rejection sampling.
mod distinct_indices;
/// Uniform random initialization within bounds.
mod init_random;
/// Donor combination a + F (b - c).
mod mutant_rand1;

/// Binomial crossover with a forced dimension.
mod crossover_binomial;
/// Exponential (contiguous block) crossover.
mod crossover_exponential;

/// rand/1/bin trial generation (Storn & Price 1997).
mod trial_sp97;
/// rand/1/exp trial generation (Storn & Price 1995).
mod trial_sp95;
/// Self-anchored rand/1/bin trial generation for DE-MCMC.
mod trial_parent;

/// Scenario and property tests for the engine.
#[cfg(test)]
mod de_tests;
/// Acceptance (denial) strategies.
pub mod denial;
/// Convenience constructors with the DE and DE-MCMC presets.
pub mod initialize;
/// Sequential and parallel population evaluation.
pub mod parallel_eval;
/// Multi-generation driver with reporting and callbacks.
pub mod run;
/// Best individual and population moments.
pub mod statistics;
/// Trial population strategies.
pub mod trial_strategy;

pub use denial::DenialStrategy;
pub use initialize::{initialize, initialize_mcmc};
pub use parallel_eval::ParallelConfig;
pub use run::{CallbackAction, GenerationInfo, RunReport};
pub use trial_strategy::TrialStrategy;

/// Objective function type: maps a parameter vector to a fitness, lower is
/// better. It is called concurrently when parallel evaluation is enabled.
pub type ObjectiveFn = Arc<dyn Fn(ArrayView1<f64>) -> f64 + Send + Sync>;

/// Configuration used to build a [`Model`].
///
/// `Default` is the DE preset; [`ModelConfig::mcmc`] is the DE-MCMC preset.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Number of individuals NP. Trial generation needs NP >= 4.
    pub population_size: usize,
    /// Crossover constant CR, expected in [0, 1].
    pub crossover_constant: f64,
    /// Weighting factor F applied to the donor difference, typically (0, 2].
    pub weighting_factor: f64,
    /// Trial generation strategy.
    pub trial_strategy: TrialStrategy,
    /// Acceptance strategy.
    pub denial_strategy: DenialStrategy,
    /// Fitness evaluation mode.
    pub parallel: ParallelConfig,
    /// Optional random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            population_size: 15,
            crossover_constant: 0.1,
            weighting_factor: 0.7,
            trial_strategy: TrialStrategy::Sp97,
            denial_strategy: DenialStrategy::Greedy,
            parallel: ParallelConfig::default(),
            seed: None,
        }
    }
}

impl ModelConfig {
    /// DE-MCMC preset: self-anchored trials with Metropolis acceptance.
    pub fn mcmc() -> Self {
        Self {
            trial_strategy: TrialStrategy::Parent,
            denial_strategy: DenialStrategy::Metropolis,
            ..Self::default()
        }
    }
}

/// Fluent builder for [`ModelConfig`].
///
/// # Example
///
/// ```rust
/// use math_devo::{DenialStrategy, ModelConfigBuilder, TrialStrategy};
///
/// let config = ModelConfigBuilder::new()
///     .population_size(30)
///     .trial_strategy(TrialStrategy::Sp95)
///     .denial_strategy(DenialStrategy::Greedy)
///     .crossover_constant(0.9)
///     .weighting_factor(0.8)
///     .seed(42)
///     .build();
/// assert_eq!(config.population_size, 30);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelConfigBuilder {
    cfg: ModelConfig,
}

impl ModelConfigBuilder {
    /// Starts from the DE preset.
    pub fn new() -> Self {
        Self {
            cfg: ModelConfig::default(),
        }
    }
    /// Starts from the DE-MCMC preset.
    pub fn mcmc() -> Self {
        Self {
            cfg: ModelConfig::mcmc(),
        }
    }
    /// Sets the population size NP.
    pub fn population_size(mut self, v: usize) -> Self {
        self.cfg.population_size = v;
        self
    }
    /// Sets the crossover constant CR.
    pub fn crossover_constant(mut self, v: f64) -> Self {
        self.cfg.crossover_constant = v;
        self
    }
    /// Sets the weighting factor F.
    pub fn weighting_factor(mut self, v: f64) -> Self {
        self.cfg.weighting_factor = v;
        self
    }
    /// Sets the trial generation strategy.
    pub fn trial_strategy(mut self, v: TrialStrategy) -> Self {
        self.cfg.trial_strategy = v;
        self
    }
    /// Sets the acceptance strategy.
    pub fn denial_strategy(mut self, v: DenialStrategy) -> Self {
        self.cfg.denial_strategy = v;
        self
    }
    /// Sets the parallel evaluation configuration.
    pub fn parallel(mut self, parallel: ParallelConfig) -> Self {
        self.cfg.parallel = parallel;
        self
    }
    /// Enables/disables parallel evaluation.
    pub fn enable_parallel(mut self, enable: bool) -> Self {
        self.cfg.parallel.enabled = enable;
        self
    }
    /// Sets the number of threads of rayon's global pool.
    pub fn parallel_threads(mut self, num_threads: usize) -> Self {
        self.cfg.parallel.num_threads = Some(num_threads);
        self
    }
    /// Sets the random seed for reproducibility.
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    /// Returns the configuration. No value is validated here.
    pub fn build(self) -> ModelConfig {
        self.cfg
    }
}

/// A differential evolution model: population, fitness and the settings that
/// drive the next generation.
///
/// The model is created once with [`Model::new`] (or [`initialize`] /
/// [`initialize_mcmc`]) and advanced one generation per [`step`](Self::step).
/// The public fields may be changed between steps. Population and fitness are
/// only handed out as shared borrows, so `fitness[i]` always equals the
/// objective at `population[i]` outside of `step`.
pub struct Model {
    population: Array2<f64>,
    fitness: Array1<f64>,
    /// Crossover constant CR.
    pub crossover_constant: f64,
    /// Weighting factor F.
    pub weighting_factor: f64,
    /// Trial generation strategy used by the next step.
    pub trial_strategy: TrialStrategy,
    /// Acceptance strategy used by the next step.
    pub denial_strategy: DenialStrategy,
    /// Fitness evaluation mode used by the next step.
    pub parallel: ParallelConfig,
    objective: ObjectiveFn,
    rng: StdRng,
    generation: usize,
    evaluations: usize,
    accepted_last: usize,
}

impl Model {
    /// Creates a model with a uniform random population in
    /// `[lower[j], upper[j])` and evaluates every individual.
    ///
    /// # Errors
    ///
    /// Returns `DevoError::BoundsMismatch` if `lower` and `upper` have
    /// different lengths. No other input is rejected: a population smaller
    /// than 4 builds fine, but the first [`step`](Self::step) then trips a
    /// debug assertion or, in release builds, never finishes its donor draw.
    pub fn new<F>(lower: &[f64], upper: &[f64], objective: F, config: ModelConfig) -> Result<Self>
    where
        F: Fn(ArrayView1<f64>) -> f64 + Send + Sync + 'static,
    {
        Self::with_objective(lower, upper, Arc::new(objective), config)
    }

    /// Same as [`Model::new`] for an objective that is already shared.
    pub fn with_objective(
        lower: &[f64],
        upper: &[f64],
        objective: ObjectiveFn,
        config: ModelConfig,
    ) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(DevoError::BoundsMismatch {
                lower_len: lower.len(),
                upper_len: upper.len(),
            });
        }

        let n = lower.len();
        let npop = config.population_size;
        if npop < 4 {
            log::warn!("population of {npop} is too small for donor selection (need >= 4)");
        }
        if n == 0 {
            log::warn!("zero-dimensional bounds: trial generation is undefined");
        }

        config.parallel.configure_pool();

        let mut rng: StdRng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };

        let population = init_random::init_random(npop, lower, upper, &mut rng);
        let fitness = parallel_eval::evaluate_population(&population, &*objective, &config.parallel);

        log::debug!(
            "DE init: {} dimensions, population={}, trial={}, denial={}, CR={:.3}, F={:.3}, parallel={}",
            n,
            npop,
            config.trial_strategy,
            config.denial_strategy,
            config.crossover_constant,
            config.weighting_factor,
            config.parallel.enabled
        );

        Ok(Self {
            population,
            fitness,
            crossover_constant: config.crossover_constant,
            weighting_factor: config.weighting_factor,
            trial_strategy: config.trial_strategy,
            denial_strategy: config.denial_strategy,
            parallel: config.parallel,
            objective,
            rng,
            generation: 0,
            evaluations: npop,
            accepted_last: 0,
        })
    }

    /// Advances the model by exactly one generation.
    ///
    /// Builds a trial population with the current strategy, F and CR,
    /// evaluates it, then lets the acceptance strategy decide for each index
    /// whether the trial replaces the incumbent. A panicking objective unwinds
    /// out of this call before any individual is replaced.
    pub fn step(&mut self) {
        let trials = self.trial_strategy.generate(
            &self.population,
            self.weighting_factor,
            self.crossover_constant,
            &mut self.rng,
        );
        let trial_fitness =
            parallel_eval::evaluate_population(&trials, &*self.objective, &self.parallel);
        self.evaluations += trials.nrows();

        let mut accepted = 0usize;
        for (i, &trial_f) in trial_fitness.iter().enumerate() {
            if !self
                .denial_strategy
                .deny(self.fitness[i], trial_f, &mut self.rng)
            {
                self.population.row_mut(i).assign(&trials.row(i));
                self.fitness[i] = trial_f;
                accepted += 1;
            }
        }

        self.generation += 1;
        self.accepted_last = accepted;

        if log::log_enabled!(log::Level::Debug) {
            let (_, best_f) = self.best();
            log::debug!(
                "DE iter {:4}  best_f={:.6e}  accepted={}/{}",
                self.generation,
                best_f,
                accepted,
                self.population.nrows()
            );
        }
    }

    /// Replaces the random stream with one seeded from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Current population, one individual per row.
    pub fn population(&self) -> &Array2<f64> {
        &self.population
    }

    /// Fitness of each individual, index-aligned with [`population`](Self::population).
    pub fn fitness(&self) -> &Array1<f64> {
        &self.fitness
    }

    /// Number of parameters D.
    pub fn dimension(&self) -> usize {
        self.population.ncols()
    }

    /// Number of individuals NP.
    pub fn population_size(&self) -> usize {
        self.population.nrows()
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Number of objective evaluations, including the initial population.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Number of trials accepted by the last step.
    pub fn accepted_last(&self) -> usize {
        self.accepted_last
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field(
                "population",
                &format!("{}x{}", self.population.nrows(), self.population.ncols()),
            )
            .field("crossover_constant", &self.crossover_constant)
            .field("weighting_factor", &self.weighting_factor)
            .field("trial_strategy", &self.trial_strategy)
            .field("denial_strategy", &self.denial_strategy)
            .field("parallel", &self.parallel)
            .field("generation", &self.generation)
            .field("evaluations", &self.evaluations)
            .finish()
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    fn sphere(x: ArrayView1<f64>) -> f64 {
        x.iter().map(|&xi| xi * xi).sum()
    }

    #[test]
    fn test_bounds_mismatch() {
        let err = Model::new(&[0.0, 0.0], &[1.0], sphere, ModelConfig::default()).unwrap_err();
        assert_eq!(
            err,
            DevoError::BoundsMismatch {
                lower_len: 2,
                upper_len: 1
            }
        );
        assert!(err.is_config_error());
    }

    #[test]
    fn test_presets() {
        let de = ModelConfig::default();
        assert_eq!(de.crossover_constant, 0.1);
        assert_eq!(de.weighting_factor, 0.7);
        assert_eq!(de.trial_strategy, TrialStrategy::Sp97);
        assert_eq!(de.denial_strategy, DenialStrategy::Greedy);

        let mcmc = ModelConfig::mcmc();
        assert_eq!(mcmc.crossover_constant, 0.1);
        assert_eq!(mcmc.weighting_factor, 0.7);
        assert_eq!(mcmc.trial_strategy, TrialStrategy::Parent);
        assert_eq!(mcmc.denial_strategy, DenialStrategy::Metropolis);
    }

    #[test]
    fn test_builder_overrides() {
        let cfg = ModelConfigBuilder::mcmc()
            .population_size(40)
            .crossover_constant(0.3)
            .weighting_factor(0.9)
            .enable_parallel(true)
            .parallel_threads(2)
            .seed(9)
            .build();
        assert_eq!(cfg.population_size, 40);
        assert_eq!(cfg.crossover_constant, 0.3);
        assert_eq!(cfg.weighting_factor, 0.9);
        assert_eq!(cfg.trial_strategy, TrialStrategy::Parent);
        assert!(cfg.parallel.enabled);
        assert_eq!(cfg.parallel.num_threads, Some(2));
        assert_eq!(cfg.seed, Some(9));
    }

    #[test]
    fn test_new_evaluates_population() {
        let cfg = ModelConfigBuilder::new().population_size(12).seed(1).build();
        let model = Model::new(&[-1.0, -2.0, -3.0], &[1.0, 2.0, 3.0], sphere, cfg).unwrap();

        assert_eq!(model.population_size(), 12);
        assert_eq!(model.dimension(), 3);
        assert_eq!(model.evaluations(), 12);
        assert_eq!(model.generation(), 0);
        for (row, &fit) in model.population().rows().into_iter().zip(model.fitness()) {
            assert_eq!(fit, sphere(row));
        }
    }

    #[test]
    fn test_step_preserves_fitness_invariant() {
        for (trial, denial) in [
            (TrialStrategy::Sp97, DenialStrategy::Greedy),
            (TrialStrategy::Sp95, DenialStrategy::Greedy),
            (TrialStrategy::Parent, DenialStrategy::Metropolis),
            (TrialStrategy::Sp97, DenialStrategy::Metropolis),
        ] {
            let cfg = ModelConfigBuilder::new()
                .population_size(10)
                .trial_strategy(trial)
                .denial_strategy(denial)
                .seed(17)
                .build();
            let mut model = Model::new(&[-5.0, -5.0], &[5.0, 5.0], sphere, cfg).unwrap();
            for _ in 0..5 {
                model.step();
                for (row, &fit) in model.population().rows().into_iter().zip(model.fitness()) {
                    assert_eq!(fit, sphere(row));
                }
            }
            assert_eq!(model.generation(), 5);
            assert_eq!(model.evaluations(), 10 * 6);
            assert!(model.accepted_last() <= 10);
        }
    }

    #[test]
    fn test_config_changes_apply_to_next_step() {
        let cfg = ModelConfigBuilder::new().population_size(8).seed(5).build();
        let mut model = Model::new(&[0.0; 4], &[1.0; 4], sphere, cfg).unwrap();
        model.step();

        // CR = 0 with SP97 rewrites exactly the forced dimension of accepted trials
        model.crossover_constant = 0.0;
        model.trial_strategy = TrialStrategy::Sp97;
        let before = model.population().clone();
        model.step();
        for (old, new) in before.rows().into_iter().zip(model.population().rows()) {
            let changed = old.iter().zip(new.iter()).filter(|(a, b)| a != b).count();
            assert!(changed <= 1);
        }
    }

    #[test]
    fn test_debug_output_is_compact() {
        let model = Model::new(&[0.0], &[1.0], sphere, ModelConfig::default()).unwrap();
        let dbg = format!("{model:?}");
        assert!(dbg.contains("15x1"));
        assert!(dbg.contains("Sp97"));
    }
}
