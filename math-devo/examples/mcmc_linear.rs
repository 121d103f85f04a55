use math_devo::initialize_mcmc;
use ndarray::ArrayView1;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::time::Instant;

fn main() {
    // Synthetic data: y = 2x + 3 with Gaussian noise of sigma 0.5
    let sigma = 0.5;
    let noise = Normal::new(0.0, sigma).expect("sigma is positive");
    let mut rng = StdRng::seed_from_u64(7);
    let x: Vec<f64> = (0..21).map(|i| 0.5 * i as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|&xi| 2.0 * xi + 3.0 + noise.sample(&mut rng))
        .collect();
    let sigmasq = sigma * sigma;

    let chi_square = move |params: ArrayView1<f64>| {
        x.iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| {
                let diff = params[0] * xi + params[1] - yi;
                diff * diff / sigmasq
            })
            .sum::<f64>()
    };

    let mut model = initialize_mcmc(&[0.0, 0.0], &[10.0, 10.0], 500, true, chi_square)
        .expect("bounds match");
    model.reseed(11);
    model.weighting_factor = 0.9;

    // Burn-in, then keep sampling
    let start = Instant::now();
    let burn_in = model.run(1000);
    println!(
        "burn-in: {} generations, acceptance {:.1}%",
        burn_in.generations,
        100.0 * burn_in.acceptance_rate
    );

    let report = model.run(1000);
    println!(
        "sampling: {} generations, acceptance {:.1}%, {:.2?}",
        report.generations,
        100.0 * report.acceptance_rate,
        start.elapsed()
    );

    println!("\nPosterior:");
    println!("  slope     = {:.4} +- {:.4}", report.mean[0], report.std[0]);
    println!("  intercept = {:.4} +- {:.4}", report.mean[1], report.std[1]);
    println!("  best chi2 = {:.4} at {:?}", report.fun, report.x);
}
