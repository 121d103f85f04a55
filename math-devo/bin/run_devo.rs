use clap::{Parser, ValueEnum};
use math_devo::{
    CallbackAction, DenialStrategy, Model, ModelConfig, ModelConfigBuilder, ObjectiveFn,
    ParallelConfig, TrialStrategy,
};
use ndarray::ArrayView1;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::fmt::Write as FmtWrite;
use std::process;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "run_devo",
    about = "Run differential evolution or DE-MCMC on a bundled problem"
)]
struct Cli {
    /// Problem to solve
    #[arg(long, value_enum, default_value_t = Problem::Parabola)]
    problem: Problem,

    /// Dimensionality for sphere and rastrigin (parabola and linear-fit are 2D)
    #[arg(long, default_value_t = 2)]
    dim: usize,

    /// Number of generations to run
    #[arg(long, default_value_t = 200)]
    generations: usize,

    /// Population size (must be >= 4)
    #[arg(long, default_value_t = 15)]
    population: usize,

    /// Trial strategy: sp97 (rand1bin), sp95 (rand1exp) or parent.
    /// Defaults to sp97, or parent for linear-fit
    #[arg(long)]
    trial: Option<String>,

    /// Acceptance strategy: greedy or metropolis.
    /// Defaults to greedy, or metropolis for linear-fit
    #[arg(long)]
    denial: Option<String>,

    /// Crossover constant CR in [0, 1]
    #[arg(long)]
    cr: Option<f64>,

    /// Weighting factor F
    #[arg(long)]
    f: Option<f64>,

    /// Standard deviation of the synthetic noise for linear-fit
    #[arg(long, default_value_t = 0.5)]
    noise: f64,

    /// Optional random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluate the population in parallel
    #[arg(long)]
    parallel: bool,

    /// Number of threads for parallel evaluation (0 = use all available cores)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Print progress every N generations (0 = only the summary)
    #[arg(long, default_value_t = 0)]
    progress_every: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Problem {
    /// 3 + (x - 1)^2 + (y - 2)^2 over x in [0, 2], y in [0, 5]
    Parabola,
    /// Sum of squares over [-5, 5]^d
    Sphere,
    /// Rastrigin over [-5.12, 5.12]^d
    Rastrigin,
    /// Posterior of slope and intercept for noisy data from y = 2x + 3
    LinearFit,
}

fn parabola(x: ArrayView1<f64>) -> f64 {
    3.0 + (x[0] - 1.0) * (x[0] - 1.0) + (x[1] - 2.0) * (x[1] - 2.0)
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

/// Chi-square objective for a line fitted to 21 noisy points of y = 2x + 3.
fn linear_fit(noise: f64, seed: Option<u64>) -> Result<ObjectiveFn, String> {
    let normal =
        Normal::new(0.0, noise).map_err(|err| format!("invalid --noise {noise}: {err}"))?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let x: Vec<f64> = (0..21).map(|i| 0.5 * i as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|&xi| 2.0 * xi + 3.0 + normal.sample(&mut rng))
        .collect();
    let sigmasq = noise * noise;

    Ok(Arc::new(move |params: ArrayView1<f64>| {
        x.iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| {
                let diff = params[0] * xi + params[1] - yi;
                diff * diff / sigmasq
            })
            .sum::<f64>()
    }))
}

fn problem_setup(args: &Cli) -> Result<(ObjectiveFn, Vec<f64>, Vec<f64>), String> {
    match args.problem {
        Problem::Parabola => Ok((Arc::new(parabola), vec![0.0, 0.0], vec![2.0, 5.0])),
        Problem::Sphere => Ok((Arc::new(sphere), vec![-5.0; args.dim], vec![5.0; args.dim])),
        Problem::Rastrigin => Ok((
            Arc::new(rastrigin),
            vec![-5.12; args.dim],
            vec![5.12; args.dim],
        )),
        Problem::LinearFit => Ok((
            linear_fit(args.noise, args.seed)?,
            vec![0.0, 0.0],
            vec![10.0, 10.0],
        )),
    }
}

fn build_config(args: &Cli) -> Result<ModelConfig, String> {
    let mut builder = if args.problem == Problem::LinearFit {
        ModelConfigBuilder::mcmc()
    } else {
        ModelConfigBuilder::new()
    };

    if let Some(name) = &args.trial {
        let trial = TrialStrategy::from_str(name).map_err(|err| err.to_string())?;
        builder = builder.trial_strategy(trial);
    }
    if let Some(name) = &args.denial {
        let denial = DenialStrategy::from_str(name).map_err(|err| err.to_string())?;
        builder = builder.denial_strategy(denial);
    }
    if let Some(cr) = args.cr {
        if !(0.0..=1.0).contains(&cr) {
            return Err(format!("--cr must lie within [0, 1]; got {cr}"));
        }
        builder = builder.crossover_constant(cr);
    }
    if let Some(f) = args.f {
        builder = builder.weighting_factor(f);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    let parallel = ParallelConfig {
        enabled: args.parallel,
        num_threads: if args.threads == 0 {
            None
        } else {
            Some(args.threads)
        },
    };

    Ok(builder.population_size(args.population).parallel(parallel).build())
}

fn format_vector(values: ArrayView1<f64>) -> String {
    let mut buffer = String::new();
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            buffer.push_str(", ");
        }
        let _ = write!(&mut buffer, "{value:.6}");
    }
    buffer
}

fn main() {
    let args = Cli::parse();

    if args.population < 4 {
        eprintln!(
            "Error: --population must be at least 4; got {}",
            args.population
        );
        process::exit(2);
    }
    if args.dim == 0 {
        eprintln!("Error: --dim must be greater than zero.");
        process::exit(2);
    }

    let (objective, lower, upper) = problem_setup(&args).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        process::exit(2);
    });
    let config = build_config(&args).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        process::exit(2);
    });

    println!(
        "Running {:?} ({}D) with trial={} denial={} CR={:.3} F={:.3} NP={}",
        args.problem,
        lower.len(),
        config.trial_strategy,
        config.denial_strategy,
        config.crossover_constant,
        config.weighting_factor,
        config.population_size
    );

    let overall_start = Instant::now();
    let mut model =
        Model::with_objective(&lower, &upper, objective, config).unwrap_or_else(|err| {
            eprintln!("Error: {err}");
            process::exit(2);
        });

    let progress_every = args.progress_every;
    let report = model.run_with_callback(args.generations, |info| {
        if progress_every > 0 && info.generation % progress_every == 0 {
            println!(
                "gen {:>6} | best = {:>12.6e} | accepted = {}",
                info.generation, info.best_fitness, info.accepted
            );
        }
        CallbackAction::Continue
    });

    println!("\nCompleted in {:.2?}", overall_start.elapsed());
    println!(
        "Generations: {} | Evaluations: {} | Acceptance: {:.1}%",
        report.generations,
        report.evaluations,
        100.0 * report.acceptance_rate
    );
    println!("Best objective: {:.6e}", report.fun);
    println!("Best parameters: [{}]", format_vector(report.x.view()));
    println!("Mean: [{}]", format_vector(report.mean.view()));
    println!("Std dev: [{}]", format_vector(report.std.view()));
}
