use math_devo::{CallbackAction, TrialStrategy, initialize};
use ndarray::ArrayView1;

fn main() {
    // Minimum 3.0 at (1, 2)
    let parabola = |x: ArrayView1<f64>| {
        3.0 + (x[0] - 1.0) * (x[0] - 1.0) + (x[1] - 2.0) * (x[1] - 2.0)
    };

    let mut model =
        initialize(&[0.0, 0.0], &[2.0, 5.0], 15, false, parabola).expect("bounds match");
    model.reseed(2018);
    model.trial_strategy = TrialStrategy::Sp95; // rand/1/exp
    model.crossover_constant = 0.4;
    model.weighting_factor = 0.8;

    let report = model.run_with_callback(200, |info| {
        if info.generation % 25 == 0 {
            eprintln!(
                "gen {:4}  best_f={:.6e}  accepted={}",
                info.generation, info.best_fitness, info.accepted
            );
        }
        if info.best_fitness - 3.0 < 1e-10 {
            CallbackAction::Stop
        } else {
            CallbackAction::Continue
        }
    });

    println!(
        "generations={} evaluations={}\nbest f={:.6e}\nbest x={:?}",
        report.generations, report.evaluations, report.fun, report.x
    );
}
