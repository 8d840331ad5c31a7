// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

use std::time::Duration;

/// Budgets and targets that end a run. Every criterion is disabled when `None`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminationCriteria {
    pub max_function_evaluations: Option<usize>,
    pub max_runtime: Option<Duration>,
    /// Stop once the best-so-far fitness is at or below this value.
    pub fitness_threshold: Option<f64>,
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    MaxFunctionEvaluations,
    MaxRuntime,
    FitnessThreshold,
}

impl TerminationCriteria {
    /// Checks the criteria in a fixed order: evaluations, runtime, fitness threshold.
    pub fn check(
        &self,
        n_function_evaluations: usize,
        runtime: Duration,
        best_so_far_y: f64,
    ) -> Option<TerminationReason> {
        if let Some(max) = self.max_function_evaluations {
            if n_function_evaluations >= max {
                return Some(TerminationReason::MaxFunctionEvaluations);
            }
        }
        if let Some(max) = self.max_runtime {
            if runtime >= max {
                return Some(TerminationReason::MaxRuntime);
            }
        }
        if let Some(threshold) = self.fitness_threshold {
            if best_so_far_y <= threshold {
                return Some(TerminationReason::FitnessThreshold);
            }
        }
        None
    }
}
