use std::fmt;

use ndarray::Array1;

use crate::Model;

/// Information passed to the callback after each generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationInfo {
    /// Generation number (1-based, counted over the model's lifetime).
    pub generation: usize,
    /// Best fitness in the population after this generation.
    pub best_fitness: f64,
    /// Trials accepted in this generation.
    pub accepted: usize,
}

/// Action returned by callback to control the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Continue with the next generation.
    Continue,
    /// Stop after this generation.
    Stop,
}

/// Summary of a multi-generation run.
#[derive(Clone)]
pub struct RunReport {
    /// Best parameter vector at the end of the run.
    pub x: Array1<f64>,
    /// Fitness of `x`.
    pub fun: f64,
    /// Generations performed by this run.
    pub generations: usize,
    /// Objective evaluations performed by this run.
    pub evaluations: usize,
    /// Fraction of trials accepted over this run.
    pub acceptance_rate: f64,
    /// Per-dimension population mean at the end of the run.
    pub mean: Array1<f64>,
    /// Per-dimension population standard deviation at the end of the run.
    pub std: Array1<f64>,
}

impl fmt::Debug for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunReport")
            .field("x", &format!("len={}", self.x.len()))
            .field("fun", &self.fun)
            .field("generations", &self.generations)
            .field("evaluations", &self.evaluations)
            .field("acceptance_rate", &self.acceptance_rate)
            .finish()
    }
}

impl Model {
    /// Steps exactly `generations` times and summarises the result.
    pub fn run(&mut self, generations: usize) -> RunReport {
        self.run_with_callback(generations, |_| CallbackAction::Continue)
    }

    /// Steps up to `generations` times, calling `callback` after each step.
    /// Returning [`CallbackAction::Stop`] ends the run early.
    pub fn run_with_callback<C>(&mut self, generations: usize, mut callback: C) -> RunReport
    where
        C: FnMut(&GenerationInfo) -> CallbackAction,
    {
        let start_evaluations = self.evaluations();
        let mut performed = 0usize;
        let mut accepted_total = 0usize;

        for _ in 0..generations {
            self.step();
            performed += 1;
            accepted_total += self.accepted_last();

            let (_, best_fitness) = self.best();
            let info = GenerationInfo {
                generation: self.generation(),
                best_fitness,
                accepted: self.accepted_last(),
            };
            if callback(&info) == CallbackAction::Stop {
                log::debug!("run stopped by callback at generation {}", info.generation);
                break;
            }
        }

        let (x, fun) = self.best();
        let (mean, std) = self.mean_std();
        let trials = performed * self.population_size();
        let acceptance_rate = if trials > 0 {
            accepted_total as f64 / trials as f64
        } else {
            0.0
        };

        RunReport {
            x,
            fun,
            generations: performed,
            evaluations: self.evaluations() - start_evaluations,
            acceptance_rate,
            mean,
            std,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelConfigBuilder;
    use ndarray::ArrayView1;

    fn sphere(x: ArrayView1<f64>) -> f64 {
        x.iter().map(|&xi| xi * xi).sum()
    }

    fn sphere_model(seed: u64) -> Model {
        let cfg = ModelConfigBuilder::new()
            .population_size(12)
            .crossover_constant(0.9)
            .weighting_factor(0.8)
            .seed(seed)
            .build();
        Model::new(&[-5.0, -5.0], &[5.0, 5.0], sphere, cfg).unwrap()
    }

    #[test]
    fn test_run_counts_generations_and_evaluations() {
        let mut model = sphere_model(42);
        let report = model.run(30);

        assert_eq!(report.generations, 30);
        assert_eq!(report.evaluations, 30 * 12);
        assert_eq!(model.generation(), 30);
        assert!((0.0..=1.0).contains(&report.acceptance_rate));
        assert_eq!(report.fun, model.best().1);
        assert_eq!(report.mean.len(), 2);
    }

    #[test]
    fn test_callback_stop_early() {
        let mut model = sphere_model(7);
        let mut calls = 0usize;

        let report = model.run_with_callback(1000, |info| {
            calls += 1;
            if info.generation >= 5 {
                CallbackAction::Stop
            } else {
                CallbackAction::Continue
            }
        });

        assert_eq!(calls, 5, "Callback should be called exactly 5 times");
        assert_eq!(report.generations, 5, "Should stop after 5 generations");
        assert_eq!(model.generation(), 5);
    }

    #[test]
    fn test_zero_generations_is_a_snapshot() {
        let mut model = sphere_model(1);
        let before = model.best();

        let report = model.run(0);

        assert_eq!(report.generations, 0);
        assert_eq!(report.evaluations, 0);
        assert_eq!(report.acceptance_rate, 0.0);
        assert_eq!(report.fun, before.1);
    }
}
