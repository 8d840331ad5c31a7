use lmmaes::test_functions::{cigar, sphere};
use lmmaes::{LmmaesOptions, OptimizationResult, Problem, TerminationReason};

fn run_sphere(dim: usize, budget: usize) -> OptimizationResult {
    let problem = Problem::with_uniform_bounds(sphere, dim, -10.0, 10.0).unwrap();
    let mut opt = LmmaesOptions::new(20.0 / 3.0)
        .seed(0)
        .max_function_evaluations(budget)
        .record_fitness_frequency(1_000)
        .build(problem)
        .unwrap();
    opt.optimize().unwrap()
}

fn check_progress(result: &OptimizationResult, budget: usize) {
    assert_eq!(result.termination_reason, TerminationReason::MaxFunctionEvaluations);
    assert_eq!(result.n_function_evaluations, budget);

    let initial = result.fitness[0].1;
    assert!(result.best_so_far_y < initial * 0.1);
    assert!(result.fitness.windows(2).all(|w| w[1].1 <= w[0].1));

    // later halves improve on earlier halves
    let half = result.fitness.len() / 2;
    assert!(result.fitness[result.fitness.len() - 1].1 < result.fitness[half].1);
    assert!(result.fitness[half].1 < initial);
    assert!(result.sigma > 0.0 && result.sigma.is_finite());
}

#[test]
fn sphere_200d() {
    let result = run_sphere(200, 20_000);
    check_progress(&result, 20_000);
}

#[test]
#[cfg_attr(debug_assertions, ignore = "slow in debug builds")]
fn sphere_2000d() {
    let result = run_sphere(2000, 50_000);
    check_progress(&result, 50_000);
}

#[test]
fn cigar_30d_converges() {
    let dim = 30;
    let problem = Problem::with_uniform_bounds(cigar, dim, -5.0, 5.0).unwrap();
    let mut opt = LmmaesOptions::new(3.0)
        .seed(7)
        .fitness_threshold(1e-6)
        .max_function_evaluations(500_000)
        .build(problem)
        .unwrap();
    let result = opt.optimize().unwrap();
    assert_eq!(result.termination_reason, TerminationReason::FitnessThreshold);
}

#[cfg(feature = "serde")]
#[test]
fn options_round_trip_through_json() {
    let options = LmmaesOptions::new(0.5)
        .n_individuals(12)
        .seed(3)
        .max_runtime(std::time::Duration::from_secs(2));
    let json = serde_json::to_string(&options).unwrap();
    let back: LmmaesOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);

    let result = run_sphere(10, 2_000);
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["n_function_evaluations"], 2_000);
}
