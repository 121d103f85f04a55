use crate::{DenialStrategy, Model, ModelConfigBuilder, TrialStrategy, initialize};
use approx::assert_abs_diff_eq;
use ndarray::{Array2, ArrayView1};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn parabola(vec: ArrayView1<f64>) -> f64 {
    3.0 + (vec[0] - 1.0) * (vec[0] - 1.0) + (vec[1] - 2.0) * (vec[1] - 2.0)
}

fn sphere(x: ArrayView1<f64>) -> f64 {
    x.iter().map(|&xi| xi * xi).sum()
}

fn rastrigin(x: ArrayView1<f64>) -> f64 {
    let a = 10.0;
    a * x.len() as f64
        + x.iter()
            .map(|&xi| xi * xi - a * (2.0 * std::f64::consts::PI * xi).cos())
            .sum::<f64>()
}

#[cfg(test)]
mod convergence_tests {
    use super::*;

    #[test]
    fn test_parabola_sp95_greedy() {
        let cfg = ModelConfigBuilder::new()
            .population_size(15)
            .trial_strategy(TrialStrategy::Sp95)
            .crossover_constant(0.4)
            .weighting_factor(0.8)
            .seed(42)
            .build();
        let mut model = Model::new(&[0.0, 0.0], &[2.0, 5.0], parabola, cfg).unwrap();

        for _ in 0..50 {
            model.step();
        }
        let (bp, bf) = model.best();
        assert_abs_diff_eq!(bf, 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(bp[0], 1.0, epsilon = 5e-2);
        assert_abs_diff_eq!(bp[1], 2.0, epsilon = 5e-2);

        for _ in 0..150 {
            model.step();
        }
        let (bp, bf) = model.best();
        assert_abs_diff_eq!(bf, 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bp[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(bp[1], 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_sp97_default_preset_converges_on_sphere() {
        let mut model = initialize(&[-5.0; 3], &[5.0; 3], 30, false, sphere).unwrap();
        model.reseed(123);
        model.crossover_constant = 0.9;
        model.weighting_factor = 0.8;

        let report = model.run(300);

        assert!(report.fun < 1e-4, "Should converge near origin: f={}", report.fun);
    }

    #[test]
    fn test_parent_greedy_converges() {
        let cfg = ModelConfigBuilder::new()
            .population_size(20)
            .trial_strategy(TrialStrategy::Parent)
            .crossover_constant(0.5)
            .weighting_factor(0.6)
            .seed(9)
            .build();
        let mut model = Model::new(&[-5.0, -5.0], &[5.0, 5.0], sphere, cfg).unwrap();

        let report = model.run(300);

        assert!(report.fun < 1e-3, "Should converge: f={}", report.fun);
    }

    #[test]
    fn test_rastrigin_improves_with_parallel_evaluation() {
        let cfg = ModelConfigBuilder::new()
            .population_size(40)
            .crossover_constant(0.9)
            .weighting_factor(0.5)
            .enable_parallel(true)
            .seed(2)
            .build();
        let mut model = Model::new(&[-5.12; 4], &[5.12; 4], rastrigin, cfg).unwrap();
        let (_, initial) = model.best();

        let report = model.run(200);

        assert!(report.fun < initial);
        assert!(report.fun < 10.0, "Should reach a low basin: f={}", report.fun);
    }
}

#[cfg(test)]
mod determinism_tests {
    use super::*;

    fn seeded(trial: TrialStrategy, denial: DenialStrategy, parallel: bool) -> Model {
        let cfg = ModelConfigBuilder::new()
            .population_size(12)
            .trial_strategy(trial)
            .denial_strategy(denial)
            .crossover_constant(0.5)
            .weighting_factor(0.8)
            .enable_parallel(parallel)
            .seed(2718)
            .build();
        Model::new(&[-3.0, -3.0, -3.0], &[3.0, 3.0, 3.0], sphere, cfg).unwrap()
    }

    #[test]
    fn test_deterministic_with_seed() {
        for (trial, denial) in [
            (TrialStrategy::Sp97, DenialStrategy::Greedy),
            (TrialStrategy::Sp95, DenialStrategy::Greedy),
            (TrialStrategy::Parent, DenialStrategy::Metropolis),
        ] {
            let mut m1 = seeded(trial, denial, false);
            let mut m2 = seeded(trial, denial, false);
            assert_eq!(m1.population(), m2.population());
            for _ in 0..40 {
                m1.step();
                m2.step();
            }
            assert_eq!(m1.population(), m2.population());
            assert_eq!(m1.fitness(), m2.fitness());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut seq = seeded(TrialStrategy::Parent, DenialStrategy::Metropolis, false);
        let mut par = seeded(TrialStrategy::Parent, DenialStrategy::Metropolis, true);
        for _ in 0..40 {
            seq.step();
            par.step();
        }
        assert_eq!(seq.population(), par.population());
        assert_eq!(seq.fitness(), par.fitness());
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut m1 = seeded(TrialStrategy::Sp97, DenialStrategy::Greedy, false);
        let mut m2 = seeded(TrialStrategy::Sp97, DenialStrategy::Greedy, false);
        m1.reseed(5);
        m2.reseed(5);
        m1.step();
        m2.step();
        assert_eq!(m1.population(), m2.population());
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn armed_model(parallel: bool) -> (Model, Arc<AtomicBool>) {
        let armed = Arc::new(AtomicBool::new(false));
        let flag = armed.clone();
        let objective = move |x: ArrayView1<f64>| {
            if flag.load(Ordering::SeqCst) {
                panic!("objective failed");
            }
            sphere(x)
        };
        let cfg = ModelConfigBuilder::new()
            .population_size(8)
            .enable_parallel(parallel)
            .seed(1)
            .build();
        let model = Model::new(&[-1.0, -1.0], &[1.0, 1.0], objective, cfg).unwrap();
        (model, armed)
    }

    #[test]
    #[should_panic(expected = "objective failed")]
    fn test_sequential_failure_propagates() {
        let (mut model, armed) = armed_model(false);
        armed.store(true, Ordering::SeqCst);
        model.step();
    }

    #[test]
    #[should_panic(expected = "objective failed")]
    fn test_parallel_failure_propagates() {
        let (mut model, armed) = armed_model(true);
        armed.store(true, Ordering::SeqCst);
        model.step();
    }

    #[test]
    fn test_failed_step_leaves_population_untouched() {
        let (mut model, armed) = armed_model(true);
        let before_pop = model.population().clone();
        let before_fit = model.fitness().clone();

        armed.store(true, Ordering::SeqCst);
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| model.step()));
        assert!(outcome.is_err());

        assert_eq!(model.population(), &before_pop);
        assert_eq!(model.fitness(), &before_fit);
        assert_eq!(model.generation(), 0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::distinct_indices::{anchored_donors, distinct_donors};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn donors_pairwise_distinct(seed in any::<u64>(), npop in 4usize..40, draws in 1usize..50) {
            let mut rng = StdRng::seed_from_u64(seed);
            for k in 0..draws {
                let target = k % npop;
                let [a, b, c] = distinct_donors(target, npop, &mut rng);
                prop_assert!(a < npop && b < npop && c < npop);
                prop_assert!(a != target && b != target && c != target);
                prop_assert!(a != b && a != c && b != c);
            }
        }

        #[test]
        fn anchored_donors_distinct(seed in any::<u64>(), npop in 3usize..40) {
            let mut rng = StdRng::seed_from_u64(seed);
            for target in 0..npop {
                let [b, c] = anchored_donors(target, target, npop, &mut rng);
                prop_assert!(b != target && c != target && b != c);
            }
        }

        #[test]
        fn greedy_best_is_monotone(
            seed in any::<u64>(),
            strategy in prop_oneof![
                Just(TrialStrategy::Sp97),
                Just(TrialStrategy::Sp95),
                Just(TrialStrategy::Parent),
            ],
            cr in 0.0f64..=1.0,
            f in 0.1f64..=1.5,
        ) {
            let cfg = ModelConfigBuilder::new()
                .population_size(8)
                .trial_strategy(strategy)
                .crossover_constant(cr)
                .weighting_factor(f)
                .seed(seed)
                .build();
            let mut model = Model::new(&[-4.0, -4.0, -4.0], &[4.0, 4.0, 4.0], rastrigin, cfg).unwrap();
            let mut previous = model.fitness().clone();
            let (_, mut best) = model.best();
            for _ in 0..15 {
                model.step();
                let (_, next) = model.best();
                prop_assert!(next <= best);
                for (old, new) in previous.iter().zip(model.fitness().iter()) {
                    prop_assert!(new <= old);
                }
                best = next;
                previous = model.fitness().clone();
            }
        }

        #[test]
        fn forced_dimension_always_mutated(seed in any::<u64>(), npop in 4usize..10, n in 1usize..6) {
            let mut rng = StdRng::seed_from_u64(seed);
            let pop = Array2::from_shape_fn((npop, n), |_| rng.random_range(-100.0..100.0));
            for strategy in [TrialStrategy::Sp97, TrialStrategy::Sp95, TrialStrategy::Parent] {
                // CR = 0: exactly one dimension comes from the donor combination
                let trials = strategy.generate(&pop, 0.7, 0.0, &mut rng);
                for (trial, parent) in trials.rows().into_iter().zip(pop.rows()) {
                    let changed = trial.iter().zip(parent.iter()).filter(|(t, p)| t != p).count();
                    prop_assert_eq!(changed, 1);
                }
            }
        }

        #[test]
        fn bounds_mismatch_iff_lengths_differ(lo in 0usize..6, hi in 0usize..6) {
            let cfg = ModelConfigBuilder::new().population_size(4).build();
            let result = Model::new(&vec![0.0; lo], &vec![1.0; hi], sphere, cfg);
            prop_assert_eq!(result.is_err(), lo != hi);
        }
    }
}
