// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

use std::time::{Duration, Instant};

use nalgebra::DVector;

use crate::error::{Error, Result};
use crate::problem::{ObjectiveFunction, Problem};
use crate::termination::{TerminationCriteria, TerminationReason};

/// Run scoped evaluation bookkeeping: counts evaluations, tracks the best point seen and decides
/// when the run is over.
///
/// Owned by exactly one run, so concurrent runs never share counters.
#[derive(Clone, Debug)]
pub struct Evaluator<F> {
    problem: Problem<F>,
    criteria: TerminationCriteria,

    n_function_evaluations: usize,
    best_so_far_x: DVector<f64>,
    best_so_far_y: f64,

    started: Instant,

    /// record the best-so-far fitness every `record_frequency` evaluations
    record_frequency: Option<usize>,
    fitness: Vec<(usize, f64)>,
}

impl<F: ObjectiveFunction> Evaluator<F> {
    pub fn new(
        problem: Problem<F>,
        criteria: TerminationCriteria,
        record_frequency: Option<usize>,
    ) -> Self {
        let best_so_far_x = DVector::from_element(problem.dim(), f64::NAN);
        Self {
            problem,
            criteria,
            n_function_evaluations: 0,
            best_so_far_x,
            best_so_far_y: f64::INFINITY,
            started: Instant::now(),
            record_frequency,
            fitness: Vec::new(),
        }
    }

    /// Evaluate `x`, updating the counter and the best-so-far record.
    ///
    /// # Errors
    /// If the objective returns a non-finite value. The evaluation is still counted but never
    /// becomes the best-so-far.
    pub fn evaluate(&mut self, x: &DVector<f64>) -> Result<f64> {
        let y = self.problem.fitness(x.as_slice());
        self.n_function_evaluations += 1;

        if !y.is_finite() {
            return Err(Error::ObjectiveEvaluation {
                evaluation: self.n_function_evaluations,
                value: y,
            });
        }

        if y < self.best_so_far_y {
            self.best_so_far_y = y;
            self.best_so_far_x.copy_from(x);
        }

        if let Some(frequency) = self.record_frequency {
            if self.n_function_evaluations == 1 || self.n_function_evaluations % frequency == 0 {
                self.fitness
                    .push((self.n_function_evaluations, self.best_so_far_y));
            }
        }

        Ok(y)
    }

    pub fn should_terminate(&self) -> bool {
        self.termination_reason().is_some()
    }

    pub fn termination_reason(&self) -> Option<TerminationReason> {
        self.criteria.check(
            self.n_function_evaluations,
            self.runtime(),
            self.best_so_far_y,
        )
    }

    pub fn problem(&self) -> &Problem<F> {
        &self.problem
    }

    pub fn n_function_evaluations(&self) -> usize {
        self.n_function_evaluations
    }

    /// Best point evaluated so far. All `NaN` before the first evaluation.
    pub fn best_so_far_x(&self) -> &DVector<f64> {
        &self.best_so_far_x
    }

    pub fn best_so_far_y(&self) -> f64 {
        self.best_so_far_y
    }

    pub fn runtime(&self) -> Duration {
        self.started.elapsed()
    }

    /// `(evaluations, best-so-far fitness)` samples recorded so far.
    pub fn fitness(&self) -> &[(usize, f64)] {
        &self.fitness
    }

    pub(crate) fn reset_clock(&mut self) {
        self.started = Instant::now();
    }

    /// Close the recorded trajectory with the final evaluation count.
    pub(crate) fn finish_record(&mut self) {
        if self.record_frequency.is_none() || self.n_function_evaluations == 0 {
            return;
        }
        let last = self.fitness.last().map(|(n, _)| *n);
        if last != Some(self.n_function_evaluations) {
            self.fitness
                .push((self.n_function_evaluations, self.best_so_far_y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_functions::sphere;

    fn evaluator(
        criteria: TerminationCriteria,
        record: Option<usize>,
    ) -> Evaluator<fn(&[f64]) -> f64> {
        let problem = Problem::with_uniform_bounds(sphere as fn(&[f64]) -> f64, 2, -5.0, 5.0)
            .unwrap();
        Evaluator::new(problem, criteria, record)
    }

    #[test]
    fn tracks_best_so_far() {
        let mut ev = evaluator(TerminationCriteria::default(), None);
        assert!(ev.best_so_far_y().is_infinite());

        ev.evaluate(&DVector::from_vec(vec![2.0, 0.0])).unwrap();
        ev.evaluate(&DVector::from_vec(vec![1.0, 0.0])).unwrap();
        ev.evaluate(&DVector::from_vec(vec![3.0, 0.0])).unwrap();

        assert_eq!(ev.n_function_evaluations(), 3);
        assert_eq!(ev.best_so_far_y(), 1.0);
        assert_eq!(ev.best_so_far_x().as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn non_finite_fitness_is_an_error() {
        let problem = Problem::with_uniform_bounds(|_: &[f64]| f64::NAN, 1, 0.0, 1.0).unwrap();
        let mut ev = Evaluator::new(problem, TerminationCriteria::default(), None);
        let err = ev.evaluate(&DVector::zeros(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::ObjectiveEvaluation { evaluation: 1, .. }
        ));
        assert!(ev.best_so_far_y().is_infinite());
    }

    #[test]
    fn stops_on_evaluation_budget() {
        let criteria = TerminationCriteria {
            max_function_evaluations: Some(2),
            ..Default::default()
        };
        let mut ev = evaluator(criteria, None);
        let x = DVector::from_element(2, 1.0);
        ev.evaluate(&x).unwrap();
        assert!(!ev.should_terminate());
        ev.evaluate(&x).unwrap();
        assert_eq!(
            ev.termination_reason(),
            Some(TerminationReason::MaxFunctionEvaluations)
        );
    }

    #[test]
    fn records_trajectory_at_frequency() {
        let mut ev = evaluator(TerminationCriteria::default(), Some(3));
        for i in (0..7).rev() {
            ev.evaluate(&DVector::from_element(2, i as f64)).unwrap();
        }
        ev.finish_record();
        let record: Vec<usize> = ev.fitness().iter().map(|(n, _)| *n).collect();
        assert_eq!(record, vec![1, 3, 6, 7]);
        assert_eq!(ev.fitness()[1].1, 32.0);
        assert_eq!(ev.fitness()[3].1, 0.0);
    }
}
