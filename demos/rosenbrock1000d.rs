use lmmaes::{test_functions::rosenbrock, LmmaesOptions, Problem};

fn main() {
    env_logger::init();

    let dim = 1000;
    let problem =
        Problem::with_uniform_bounds(|x: &[f64]| rosenbrock(x, 1.0, 100.0), dim, -5.0, 5.0)
            .unwrap();
    let mut opt = LmmaesOptions::new(1.0)
        .mean(vec![0.0; dim])
        .seed(2022)
        .max_function_evaluations(10_000_000)
        .fitness_threshold(1e-8)
        .build(problem)
        .unwrap();

    // one generation at a time, printing the state of the distribution
    let mut i = 0;
    while !opt.evaluator().should_terminate() {
        opt.sample_from_stream().unwrap();
        if opt.population().len() < opt.evolution_strategy().n_individuals() {
            break;
        }
        opt.update_distribution().unwrap();

        if i % 100 == 0 {
            println!(
                "{} {:.3e} {:.3e} {:.3e}",
                i,
                opt.evaluator().best_so_far_y(),
                opt.sigma(),
                opt.evolution_path().norm()
            );
        }
        i += 1;
    }
    println!(
        "best: {} evaluations: {}",
        opt.evaluator().best_so_far_y(),
        opt.evaluator().n_function_evaluations()
    );
}
