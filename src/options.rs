// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

//! Builder for [`Lmmaes`]. See [`LmmaesOptions`].

use std::time::Duration;

use nalgebra::DVector;

use crate::error::ConfigError;
use crate::lmmaes::Lmmaes;
use crate::problem::{ObjectiveFunction, Problem};
use crate::termination::TerminationCriteria;

/// Optional restart policy.
///
/// A restart draws a new mean, resets the step size and the learned directions and doubles the
/// population size. The evaluation count and best-so-far record carry over.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestartOptions {
    /// Restart once the step size falls below this value. Default value is `1e-12`.
    pub sigma_threshold: f64,
    /// Number of generations over which stagnation is judged. Default value is
    /// `10 + ceil(30 * dim / n_individuals)`, used if this field is `None`.
    pub stagnation: Option<usize>,
    /// Restart if the best fitness improved by less than this over `stagnation` generations.
    /// Default value is `1e-12`.
    pub fitness_diff: f64,
    /// Default value is `9`.
    pub max_restarts: usize,
}

impl Default for RestartOptions {
    fn default() -> Self {
        Self {
            sigma_threshold: 1e-12,
            stagnation: None,
            fitness_diff: 1e-12,
            max_restarts: 9,
        }
    }
}

/// A builder for [`Lmmaes`]. Every unset value falls back to a default derived from the problem
/// dimension.
///
/// # Examples
///
/// ```
/// use lmmaes::{LmmaesOptions, Problem, test_functions::sphere};
///
/// let problem = Problem::with_uniform_bounds(sphere, 20, -5.0, 5.0).unwrap();
/// let mut opt = LmmaesOptions::new(2.0)
///     .seed(3)
///     .max_function_evaluations(2_000)
///     .build(problem)
///     .unwrap();
/// let result = opt.optimize().unwrap();
/// assert!(result.n_function_evaluations <= 2_000);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LmmaesOptions {
    /// Initial global step size.
    pub sigma: f64,
    /// Initial mean. Default is a uniform random point inside the problem bounds.
    pub mean: Option<DVector<f64>>,
    /// Default value is `4 + floor(3 ln(dim))`.
    pub n_individuals: Option<usize>,
    /// Default value is `n_individuals / 2`.
    pub n_parents: Option<usize>,
    /// Number of retained direction vectors `m`. Default value is `4 + floor(3 ln(dim))`.
    pub n_evolution_paths: Option<usize>,
    /// Learning rate of the evolution path, at most `2`. Default value is `2 * n_parents / dim`,
    /// or `1` where that exceeds `2`.
    pub c_s: Option<f64>,
    /// Per vector sampling decay, each in `(0, 1]`. Default value is `1 / (dim * 1.5^j)`.
    pub c_d: Option<Vec<f64>>,
    /// Per vector learning rate, each at most `2`. Default value is `n_parents / (dim * 4^j)`,
    /// or `1` where that exceeds `2`.
    pub c_c: Option<Vec<f64>>,
    /// Seed of the run's random stream. Default value is `0`.
    pub seed: u64,
    pub termination: TerminationCriteria,
    /// Record `(evaluations, best-so-far fitness)` every this many evaluations. Off by default.
    pub record_fitness_frequency: Option<usize>,
    /// Log progress every this many generations. Default value is `10`, `None` silences it.
    pub verbose_frequency: Option<usize>,
    pub restart: Option<RestartOptions>,
}

impl LmmaesOptions {
    /// Creates options with the given initial step size and defaults for everything else.
    pub fn new(sigma: f64) -> Self {
        Self {
            sigma,
            mean: None,
            n_individuals: None,
            n_parents: None,
            n_evolution_paths: None,
            c_s: None,
            c_d: None,
            c_c: None,
            seed: 0,
            termination: TerminationCriteria::default(),
            record_fitness_frequency: None,
            verbose_frequency: Some(10),
            restart: None,
        }
    }

    pub fn mean<V: Into<DVector<f64>>>(mut self, mean: V) -> Self {
        self.mean = Some(mean.into());
        self
    }

    pub fn n_individuals(mut self, n_individuals: usize) -> Self {
        self.n_individuals = Some(n_individuals);
        self
    }

    pub fn n_parents(mut self, n_parents: usize) -> Self {
        self.n_parents = Some(n_parents);
        self
    }

    pub fn n_evolution_paths(mut self, n_evolution_paths: usize) -> Self {
        self.n_evolution_paths = Some(n_evolution_paths);
        self
    }

    pub fn c_s(mut self, c_s: f64) -> Self {
        self.c_s = Some(c_s);
        self
    }

    pub fn c_d(mut self, c_d: Vec<f64>) -> Self {
        self.c_d = Some(c_d);
        self
    }

    pub fn c_c(mut self, c_c: Vec<f64>) -> Self {
        self.c_c = Some(c_c);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn max_function_evaluations(mut self, max: usize) -> Self {
        self.termination.max_function_evaluations = Some(max);
        self
    }

    pub fn max_runtime(mut self, max: Duration) -> Self {
        self.termination.max_runtime = Some(max);
        self
    }

    pub fn fitness_threshold(mut self, threshold: f64) -> Self {
        self.termination.fitness_threshold = Some(threshold);
        self
    }

    pub fn record_fitness_frequency(mut self, frequency: usize) -> Self {
        self.record_fitness_frequency = Some(frequency);
        self
    }

    pub fn verbose_frequency(mut self, frequency: Option<usize>) -> Self {
        self.verbose_frequency = frequency;
        self
    }

    pub fn restart(mut self, restart: RestartOptions) -> Self {
        self.restart = Some(restart);
        self
    }

    /// Validate the options against `problem` and build the optimiser.
    pub fn build<F: ObjectiveFunction>(
        self,
        problem: Problem<F>,
    ) -> Result<Lmmaes<F>, ConfigError> {
        Lmmaes::new(problem, self)
    }

    pub(crate) fn validate(&self, dim: usize) -> Result<(), ConfigError> {
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return Err(ConfigError::StepSize(self.sigma));
        }
        if let Some(mean) = &self.mean {
            if mean.len() != dim {
                return Err(ConfigError::MeanLength {
                    dim,
                    len: mean.len(),
                });
            }
            if mean.iter().any(|e| !e.is_finite()) {
                return Err(ConfigError::NonFiniteMean);
            }
        }
        if self.n_evolution_paths == Some(0) {
            return Err(ConfigError::ZeroEvolutionPaths);
        }
        if self.record_fitness_frequency == Some(0) || self.verbose_frequency == Some(0) {
            return Err(ConfigError::ZeroFrequency);
        }
        if let Some(restart) = &self.restart {
            if restart.stagnation == Some(0) {
                return Err(ConfigError::ZeroFrequency);
            }
        }
        Ok(())
    }
}
