//! [LM-MA-ES](https://ieeexplore.ieee.org/abstract/document/8410043) is a derivative free optimiser developed by Ilya Loshchilov, Tobias Glasmachers and Hans-Georg Beyer for large scale black-box problems.
//!
//! Similar to CMA-ES at its core is sampling of a multivariate normal distribution.
//! To allow use on problems with thousands of dimensions the covariance matrix is never stored. Instead each Gaussian sample `z` is pulled towards `m` retained direction vectors `t_j`:
//!
//! `d = z; for j in 0..m { d = (1 - c_d[j]) d + c_d[j] t_j (t_j . d) }`
//!
//! The candidate solution is `x = mean + sigma * d`. Each `t_j` is an evolution path with its own learning rate, so together they hold a multi-timescale memory of successful steps in `O(m * dim)` space.
//! The mean `mean`, the step size `sigma`, the step size evolution path and the direction vectors are adjusted every generation from the rank of the evaluations returned by the user supplied objective function.
//!
//! The optimiser can be run to completion with [`Lmmaes::optimize`], which checks the termination criteria of [`LmmaesOptions`], or driven one generation at a time through [`Lmmaes::sample`] and [`Lmmaes::update_distribution`].
//!
//! ```rust
//! use lmmaes::{LmmaesOptions, Problem, TerminationReason, test_functions::sphere};
//!
//! let dim = 100;
//! let problem = Problem::with_uniform_bounds(sphere, dim, -10.0, 10.0).unwrap();
//! let mut opt = LmmaesOptions::new(20.0 / 3.0)
//!     .seed(0)
//!     .fitness_threshold(1e-8)
//!     .max_function_evaluations(200_000)
//!     .build(problem)
//!     .unwrap();
//!
//! let result = opt.optimize().unwrap();
//! assert_eq!(result.termination_reason, TerminationReason::FitnessThreshold);
//! println!("best: {} evaluations: {}", result.best_so_far_y, result.n_function_evaluations);
//! ```

// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

pub mod error;
pub mod es;
pub mod evaluator;
pub mod lmmaes;
pub mod noise;
pub mod options;
pub mod problem;
pub mod result;
pub mod termination;
pub mod test_functions;

pub use nalgebra::DVector;

pub use crate::error::{ConfigError, Error, Result};
pub use crate::es::{default_population_size, EvolutionStrategy};
pub use crate::evaluator::Evaluator;
pub use crate::lmmaes::{default_evolution_paths, Lmmaes, Population};
pub use crate::noise::NoiseSource;
pub use crate::options::{LmmaesOptions, RestartOptions};
pub use crate::problem::{ObjectiveFunction, Problem};
pub use crate::result::OptimizationResult;
pub use crate::termination::{TerminationCriteria, TerminationReason};
