// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

use std::time::Duration;

use nalgebra::DVector;

use crate::termination::TerminationReason;

/// Outcome of [`Lmmaes::optimize`](crate::Lmmaes::optimize).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptimizationResult {
    pub best_so_far_x: DVector<f64>,
    pub best_so_far_y: f64,
    pub n_function_evaluations: usize,
    /// Completed generations summed over all restarts.
    pub n_generations: usize,
    pub n_restarts: usize,
    pub runtime: Duration,
    pub termination_reason: TerminationReason,
    /// Final mean of the search distribution.
    pub mean: DVector<f64>,
    /// Final global step size.
    pub sigma: f64,
    /// `(evaluations, best-so-far fitness)` samples, empty unless recording was enabled.
    pub fitness: Vec<(usize, f64)>,
}
