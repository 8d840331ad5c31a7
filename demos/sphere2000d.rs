use lmmaes::{test_functions::sphere, LmmaesOptions, Problem};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dim = 2000;
    let problem = Problem::with_uniform_bounds(sphere, dim, -10.0, 10.0).unwrap();
    let mut opt = LmmaesOptions::new(20.0 / 3.0)
        .seed(0)
        .max_function_evaluations(500_000)
        .fitness_threshold(1e-10)
        .record_fitness_frequency(10_000)
        .verbose_frequency(Some(1_000))
        .build(problem)
        .unwrap();

    let result = opt.optimize().unwrap();
    for (evaluations, best) in &result.fitness {
        println!("{} {:.6e}", evaluations, best);
    }
    println!(
        "LMMAES: {} {} ({:?}, {:.2?})",
        result.n_function_evaluations,
        result.best_so_far_y,
        result.termination_reason,
        result.runtime
    );
}
