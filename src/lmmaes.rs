// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

use nalgebra::{DMatrix, DMatrixView, DVector};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{ConfigError, Error, Result};
use crate::es::{default_population_size, rank, EvolutionStrategy};
use crate::evaluator::Evaluator;
use crate::noise::NoiseSource;
use crate::options::{LmmaesOptions, RestartOptions};
use crate::problem::{ObjectiveFunction, Problem};
use crate::result::OptimizationResult;
use crate::termination::{TerminationCriteria, TerminationReason};

/// Recommended number of retained direction vectors, `4 + floor(3 ln(dim))`.
pub fn default_evolution_paths(dim: usize) -> usize {
    4 + ((dim as f64).ln() * 3.0).floor() as usize
}

fn cexp(a: f64) -> f64 {
    a.min(100.0).exp() // avoid overflow
}

/// Largest `c_s` or `c_c[k]` for which `sqrt(mu_eff * c * (2 - c))` is real.
const MAX_PATH_RATE: f64 = 2.0;

/// Default path rates above [`MAX_PATH_RATE`] fall back to this value.
const FALLBACK_PATH_RATE: f64 = 1.0;

fn default_path_rate(name: &'static str, value: f64) -> f64 {
    if value > MAX_PATH_RATE {
        log::debug!(
            "default {} {:.3} exceeds {}, using {}",
            name,
            value,
            MAX_PATH_RATE,
            FALLBACK_PATH_RATE
        );
        FALLBACK_PATH_RATE
    } else {
        value
    }
}

/// Learning rates fixed between restarts.
#[derive(Clone, Debug)]
struct LearningRates {
    c_s: f64,
    /// `1 - c_s`
    s_1: f64,
    /// `sqrt(mu_eff * c_s * (2 - c_s))`
    s_2: f64,

    /// m x 1, sampling decay of each direction vector
    c_d: DVector<f64>,

    /// m x 1, learning rate of each direction vector
    c_c: DVector<f64>,

    /// m x 1, `sqrt(mu_eff * c_c * (2 - c_c))`
    c_c_scale: DVector<f64>,
}

impl LearningRates {
    fn new(
        dim: usize,
        es: &EvolutionStrategy,
        m: usize,
        options: &LmmaesOptions,
    ) -> std::result::Result<Self, ConfigError> {
        let n = dim as f64;
        let mu = es.n_parents() as f64;
        let mu_eff = es.mu_eff();

        let c_s = match options.c_s {
            Some(c_s) => check_rate("c_s", c_s, MAX_PATH_RATE)?,
            None => default_path_rate("c_s", 2.0 * mu / n),
        };
        let c_d = match &options.c_d {
            Some(c_d) => check_rates("c_d", c_d, m, 1.0)?,
            None => DVector::from_fn(m, |j, _| 1.0 / (n * 1.5f64.powi(j as i32))),
        };
        let c_c = match &options.c_c {
            Some(c_c) => check_rates("c_c", c_c, m, MAX_PATH_RATE)?,
            None => DVector::from_fn(m, |k, _| {
                default_path_rate("c_c", mu / (n * 4.0f64.powi(k as i32)))
            }),
        };
        let c_c_scale = c_c.map(|c| (mu_eff * c * (2.0 - c)).sqrt());

        Ok(Self {
            c_s,
            s_1: 1.0 - c_s,
            s_2: (mu_eff * c_s * (2.0 - c_s)).sqrt(),
            c_d,
            c_c,
            c_c_scale,
        })
    }
}

fn check_rate(
    name: &'static str,
    value: f64,
    max: f64,
) -> std::result::Result<f64, ConfigError> {
    if value > 0.0 && value <= max {
        Ok(value)
    } else {
        Err(ConfigError::LearningRate { name, value, max })
    }
}

fn check_rates(
    name: &'static str,
    values: &[f64],
    m: usize,
    max: f64,
) -> std::result::Result<DVector<f64>, ConfigError> {
    if values.len() != m {
        return Err(ConfigError::ConstantsLength {
            name,
            len: values.len(),
            expected: m,
        });
    }
    for &value in values {
        check_rate(name, value, max)?;
    }
    Ok(DVector::from_column_slice(values))
}

#[derive(Clone, Debug)]
struct State {
    sigma: f64,

    /// dim x 1
    mean: DVector<f64>,

    /// dim x 1, evolution path
    s: DVector<f64>,

    /// dim x m, column j is the j-th transformation vector
    tm: DMatrix<f64>,

    /// generations completed since the last (re)start
    g: usize,
}

impl State {
    fn new(mean: DVector<f64>, sigma: f64, m: usize) -> Self {
        let dim = mean.len();
        Self {
            sigma,
            mean,
            s: DVector::zeros(dim),
            tm: DMatrix::zeros(dim, m),
            g: 0,
        }
    }

    /// First non-finite quantity, if any.
    fn instability(&self) -> Option<(&'static str, f64)> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Some(("sigma", self.sigma));
        }
        let first_bad = |v: &[f64]| v.iter().copied().find(|e| !e.is_finite());
        if let Some(e) = first_bad(self.mean.as_slice()) {
            return Some(("mean", e));
        }
        if let Some(e) = first_bad(self.s.as_slice()) {
            return Some(("evolution path", e));
        }
        if let Some(e) = first_bad(self.tm.as_slice()) {
            return Some(("transformation vectors", e));
        }
        None
    }
}

/// Buffers of one generation, reused between generations.
#[derive(Clone, Debug)]
pub struct Population {
    /// dim x n_individuals, isotropic Gaussian noise
    z: DMatrix<f64>,

    /// dim x n_individuals, noise after the low rank transformation
    d: DMatrix<f64>,

    y: Vec<f64>,

    /// only the first `evaluated` columns belong to the current generation
    evaluated: usize,
}

impl Population {
    fn new(dim: usize, n_individuals: usize) -> Self {
        Self {
            z: DMatrix::zeros(dim, n_individuals),
            d: DMatrix::zeros(dim, n_individuals),
            y: vec![f64::NAN; n_individuals],
            evaluated: 0,
        }
    }

    /// Noise vectors of the evaluated individuals, one per column.
    pub fn noise(&self) -> DMatrixView<f64> {
        self.z.columns(0, self.evaluated)
    }

    /// Search directions of the evaluated individuals, one per column.
    pub fn directions(&self) -> DMatrixView<f64> {
        self.d.columns(0, self.evaluated)
    }

    pub fn fitness(&self) -> &[f64] {
        &self.y[..self.evaluated]
    }

    pub fn len(&self) -> usize {
        self.evaluated
    }

    pub fn is_empty(&self) -> bool {
        self.evaluated == 0
    }

    pub fn capacity(&self) -> usize {
        self.y.len()
    }
}

#[derive(Clone, Debug)]
struct Restarts {
    options: RestartOptions,
    stagnation: usize,
    /// best fitness after each generation, non-increasing
    history: Vec<f64>,
}

impl Restarts {
    fn new(options: RestartOptions, dim: usize, n_individuals: usize) -> Self {
        let stagnation = options
            .stagnation
            .unwrap_or(10 + (30.0 * dim as f64 / n_individuals as f64).ceil() as usize);
        Self {
            options,
            stagnation,
            history: vec![f64::INFINITY],
        }
    }

    fn record(&mut self, generation_best: f64) {
        let last = self.history.last().copied().unwrap_or(f64::INFINITY);
        self.history.push(generation_best.min(last));
    }

    fn triggered(&self, sigma: f64) -> bool {
        if sigma < self.options.sigma_threshold {
            return true;
        }
        let len = self.history.len();
        len >= self.stagnation
            && self.history[len - self.stagnation] - self.history[len - 1]
                < self.options.fitness_diff
    }
}

/// Limited-Memory Matrix Adaptation Evolution Strategy.
///
/// The `dim x dim` covariance matrix of CMA-ES is replaced by `m` direction vectors, each
/// learning at its own rate, so a generation costs `O(m * dim)` per individual in time and the
/// optimiser needs `O(m * dim)` memory.
///
/// The optimiser can be driven by [`optimize`](Self::optimize) or step by step with
/// [`sample`](Self::sample) and [`update_distribution`](Self::update_distribution).
///
/// # Example
/// ```rust
/// use lmmaes::{LmmaesOptions, Problem, test_functions::rosenbrock};
///
/// let problem = Problem::with_uniform_bounds(|x: &[f64]| rosenbrock(x, 1.0, 100.0), 10, -5.0, 5.0).unwrap();
/// let mut opt = LmmaesOptions::new(1.0)
///     .mean(vec![0.0; 10])
///     .seed(1)
///     .max_function_evaluations(5_000)
///     .build(problem)
///     .unwrap();
///
/// while !opt.evaluator().should_terminate() {
///     opt.sample_from_stream().unwrap();
///     if opt.population().len() < opt.evolution_strategy().n_individuals() {
///         break;
///     }
///     opt.update_distribution().unwrap();
/// }
/// println!("best: {}", opt.evaluator().best_so_far_y());
/// ```
#[derive(Clone, Debug)]
pub struct Lmmaes<F> {
    /// number of dimensions in the problem
    dim: usize,

    /// number of retained direction vectors
    m: usize,

    es: EvolutionStrategy,
    rates: LearningRates,
    state: State,
    population: Population,
    evaluator: Evaluator<F>,

    rng: Xoshiro256PlusPlus,
    options: LmmaesOptions,
    restarts: Option<Restarts>,

    /// generations completed over all restarts
    n_generations: usize,
    n_restarts: usize,
}

impl<F: ObjectiveFunction> Lmmaes<F> {
    /// Validate `options` against `problem` and initialise the search distribution.
    ///
    /// See [`LmmaesOptions`] for the defaults.
    pub fn new(
        problem: Problem<F>,
        options: LmmaesOptions,
    ) -> std::result::Result<Self, ConfigError> {
        let dim = problem.dim();
        options.validate(dim)?;

        let n_individuals = options
            .n_individuals
            .unwrap_or_else(|| default_population_size(dim));
        let n_parents = options.n_parents.unwrap_or(n_individuals / 2);
        let es = EvolutionStrategy::new(n_individuals, n_parents)?;
        let m = options
            .n_evolution_paths
            .unwrap_or_else(|| default_evolution_paths(dim));
        let rates = LearningRates::new(dim, &es, m, &options)?;

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(options.seed);
        let mean = match &options.mean {
            Some(mean) => mean.clone(),
            None => uniform_mean(&mut rng, &problem),
        };

        log::debug!(
            "lmmaes: dim {} n_individuals {} n_parents {} m {} mu_eff {:.3} c_s {:.3e}",
            dim,
            n_individuals,
            n_parents,
            m,
            es.mu_eff(),
            rates.c_s
        );

        let restarts = options
            .restart
            .clone()
            .map(|r| Restarts::new(r, dim, n_individuals));
        let evaluator = Evaluator::new(
            problem,
            options.termination.clone(),
            options.record_fitness_frequency,
        );

        Ok(Self {
            dim,
            m,
            state: State::new(mean, options.sigma, m),
            population: Population::new(dim, n_individuals),
            es,
            rates,
            evaluator,
            rng,
            options,
            restarts,
            n_generations: 0,
            n_restarts: 0,
        })
    }

    /// Sample and evaluate one generation, drawing noise from `noise`.
    ///
    /// Each direction starts as a Gaussian vector and is pulled towards the first
    /// `min(generation, m)` transformation vectors. Candidates are evaluated at
    /// `mean + sigma * direction` without any projection onto the bounds.
    ///
    /// Returns the number of evaluated individuals. This is smaller than `n_individuals` only if
    /// the termination criteria fired part way through the generation.
    ///
    /// # Errors
    /// If the objective returns a non-finite value.
    pub fn sample<N: NoiseSource + ?Sized>(&mut self, noise: &mut N) -> Result<usize> {
        self.population.evaluated = 0;
        let active = self.active_paths();

        for k in 0..self.es.n_individuals() {
            if self.evaluator.should_terminate() {
                return Ok(k);
            }

            let z = noise.standard_normal(self.dim);
            let mut d = z.clone();
            for j in 0..active {
                let t = self.state.tm.column(j);
                let c_d = self.rates.c_d[j];
                let proj = t.dot(&d);
                d.axpy(c_d * proj, &t, 1.0 - c_d);
            }

            let x = &self.state.mean + self.state.sigma * &d;
            let y = self.evaluator.evaluate(&x)?;

            self.population.z.set_column(k, &z);
            self.population.d.set_column(k, &d);
            self.population.y[k] = y;
            self.population.evaluated = k + 1;
        }

        Ok(self.es.n_individuals())
    }

    /// [`sample`](Self::sample) using the run's own seeded random stream.
    pub fn sample_from_stream(&mut self) -> Result<usize> {
        let mut rng = self.rng.clone();
        let evaluated = self.sample(&mut rng);
        self.rng = rng;
        evaluated
    }

    /// Update the mean, evolution path, transformation vectors and step size from the ranked
    /// population.
    ///
    /// If an error is returned the distribution is left as it was before the call.
    ///
    /// # Errors
    /// * If the population is not fully evaluated.
    /// * If any part of the updated distribution is not finite, or the step size reached zero.
    pub fn update_distribution(&mut self) -> Result<()> {
        let lamb = self.es.n_individuals();
        if self.population.evaluated < lamb {
            return Err(Error::IncompletePopulation {
                evaluated: self.population.evaluated,
                expected: lamb,
            });
        }

        let order = rank(self.population.fitness());
        let d_w = self.es.recombine(self.population.directions(), &order);
        let z_w = self.es.recombine(self.population.noise(), &order);

        let mut new_state = self.state.clone();

        new_state.mean.axpy(new_state.sigma, &d_w, 1.0);

        new_state.s.axpy(self.rates.s_2, &z_w, self.rates.s_1);
        for k in 0..self.m {
            new_state
                .tm
                .column_mut(k)
                .axpy(self.rates.c_c_scale[k], &z_w, 1.0 - self.rates.c_c[k]);
        }

        new_state.sigma *= cexp(
            self.rates.c_s / 2.0 * (new_state.s.norm_squared() / self.dim as f64 - 1.0),
        );
        new_state.g += 1;

        if let Some((quantity, value)) = new_state.instability() {
            return Err(Error::NumericInstability {
                generation: new_state.g,
                quantity,
                value,
            });
        }

        // update state only if no errors arise.
        self.state = new_state;

        Ok(())
    }

    /// Run generations until a termination criterion fires.
    ///
    /// # Errors
    /// Objective failures and numeric instability end the run immediately.
    pub fn optimize(&mut self) -> Result<OptimizationResult> {
        if self.options.termination == TerminationCriteria::default() {
            log::warn!("no termination criterion set, the run only ends on an error");
        }
        self.evaluator.reset_clock();

        let reason = loop {
            self.sample_from_stream()?;
            if let Some(reason) = self.evaluator.termination_reason() {
                break reason;
            }

            if let Err(e) = self.update_distribution() {
                if matches!(e, Error::NumericInstability { .. }) {
                    log::warn!(
                        "stopping after {} evaluations: {}",
                        self.evaluator.n_function_evaluations(),
                        e
                    );
                }
                return Err(e);
            }
            self.n_generations += 1;
            self.log_progress();
            self.restart_if_stagnated()?;
        };

        self.evaluator.finish_record();
        log::info!(
            "finished ({:?}): evaluations {} generations {} best {:.6e}",
            reason,
            self.evaluator.n_function_evaluations(),
            self.n_generations,
            self.evaluator.best_so_far_y()
        );

        Ok(self.collect(reason))
    }

    fn log_progress(&self) {
        if let Some(frequency) = self.options.verbose_frequency {
            if self.n_generations % frequency == 0 {
                log::info!(
                    "generation {} evaluations {} best {:.6e} sigma {:.3e}",
                    self.n_generations,
                    self.evaluator.n_function_evaluations(),
                    self.evaluator.best_so_far_y(),
                    self.state.sigma
                );
            }
        }
    }

    fn restart_if_stagnated(&mut self) -> Result<()> {
        let Some(restarts) = self.restarts.as_mut() else {
            return Ok(());
        };
        let generation_best = self
            .population
            .fitness()
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        restarts.record(generation_best);

        if self.n_restarts >= restarts.options.max_restarts || !restarts.triggered(self.state.sigma)
        {
            return Ok(());
        }
        restarts.history = vec![f64::INFINITY];

        let n_individuals = self.es.n_individuals() * 2;
        self.es = EvolutionStrategy::new(n_individuals, n_individuals / 2)?;
        self.rates = LearningRates::new(self.dim, &self.es, self.m, &self.options)?;
        let mean = uniform_mean(&mut self.rng, self.evaluator.problem());
        self.state = State::new(mean, self.options.sigma, self.m);
        self.population = Population::new(self.dim, n_individuals);
        self.n_restarts += 1;

        log::info!(
            "restart {} after {} evaluations: n_individuals {} best {:.6e}",
            self.n_restarts,
            self.evaluator.n_function_evaluations(),
            n_individuals,
            self.evaluator.best_so_far_y()
        );
        Ok(())
    }

    fn collect(&self, termination_reason: TerminationReason) -> OptimizationResult {
        OptimizationResult {
            best_so_far_x: self.evaluator.best_so_far_x().clone(),
            best_so_far_y: self.evaluator.best_so_far_y(),
            n_function_evaluations: self.evaluator.n_function_evaluations(),
            n_generations: self.n_generations,
            n_restarts: self.n_restarts,
            runtime: self.evaluator.runtime(),
            termination_reason,
            mean: self.state.mean.clone(),
            sigma: self.state.sigma,
            fitness: self.evaluator.fitness().to_vec(),
        }
    }
}

impl<F> Lmmaes<F> {
    /// The dimensions of the problem space.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn n_evolution_paths(&self) -> usize {
        self.m
    }

    /// Generations completed since the last (re)start.
    pub fn generation(&self) -> usize {
        self.state.g
    }

    /// Number of transformation vectors applied when sampling the next generation.
    pub fn active_paths(&self) -> usize {
        self.state.g.min(self.m)
    }

    pub fn n_restarts(&self) -> usize {
        self.n_restarts
    }

    pub fn sigma(&self) -> f64 {
        self.state.sigma
    }

    pub fn mean(&self) -> &DVector<f64> {
        &self.state.mean
    }

    pub fn evolution_path(&self) -> &DVector<f64> {
        &self.state.s
    }

    /// Shape: dim x m, column j is the j-th transformation vector.
    pub fn transformation(&self) -> &DMatrix<f64> {
        &self.state.tm
    }

    pub fn c_s(&self) -> f64 {
        self.rates.c_s
    }

    pub fn c_d(&self) -> &DVector<f64> {
        &self.rates.c_d
    }

    pub fn c_c(&self) -> &DVector<f64> {
        &self.rates.c_c
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn evolution_strategy(&self) -> &EvolutionStrategy {
        &self.es
    }

    pub fn evaluator(&self) -> &Evaluator<F> {
        &self.evaluator
    }
}

fn uniform_mean<F, R: Rng>(rng: &mut R, problem: &Problem<F>) -> DVector<f64>
where
    F: ObjectiveFunction,
{
    let (lower, upper) = (problem.lower_bound(), problem.upper_bound());
    DVector::from_fn(problem.dim(), |i, _| rng.gen_range(lower[i]..=upper[i]))
}
