// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

use nalgebra::DVector;

use crate::error::ConfigError;

/// An objective function to be minimised.
///
/// Implemented for every `FnMut(&[f64]) -> f64`, so plain closures and the functions in
/// [`test_functions`](crate::test_functions) can be used directly.
pub trait ObjectiveFunction {
    fn evaluate(&mut self, x: &[f64]) -> f64;
}

impl<F: FnMut(&[f64]) -> f64> ObjectiveFunction for F {
    fn evaluate(&mut self, x: &[f64]) -> f64 {
        self(x)
    }
}

/// The objective together with its dimension and box bounds.
///
/// The bounds are used to draw starting points. Samples are never projected back into the box,
/// an objective that cares about feasibility has to handle out of bound points itself.
#[derive(Clone, Debug)]
pub struct Problem<F> {
    function: F,
    lower_bound: DVector<f64>,
    upper_bound: DVector<f64>,
}

impl<F: ObjectiveFunction> Problem<F> {
    /// # Errors
    /// * If the bounds are empty or of different length.
    /// * If any bound is non-finite or `lower_bound[i] > upper_bound[i]`.
    pub fn new(
        function: F,
        lower_bound: DVector<f64>,
        upper_bound: DVector<f64>,
    ) -> Result<Self, ConfigError> {
        let dim = lower_bound.len();
        if dim == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if upper_bound.len() != dim {
            return Err(ConfigError::BoundsLength {
                dim,
                len: upper_bound.len(),
            });
        }
        for (index, (&lower, &upper)) in lower_bound.iter().zip(upper_bound.iter()).enumerate() {
            if !lower.is_finite() || !upper.is_finite() || lower > upper {
                return Err(ConfigError::InvalidBounds {
                    index,
                    lower,
                    upper,
                });
            }
        }

        Ok(Self {
            function,
            lower_bound,
            upper_bound,
        })
    }

    /// Same bounds `[lower, upper]` on every axis.
    pub fn with_uniform_bounds(
        function: F,
        dim: usize,
        lower: f64,
        upper: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            function,
            DVector::from_element(dim, lower),
            DVector::from_element(dim, upper),
        )
    }

    pub fn dim(&self) -> usize {
        self.lower_bound.len()
    }

    pub fn lower_bound(&self) -> &DVector<f64> {
        &self.lower_bound
    }

    pub fn upper_bound(&self) -> &DVector<f64> {
        &self.upper_bound
    }

    pub(crate) fn fitness(&mut self, x: &[f64]) -> f64 {
        self.function.evaluate(x)
    }

    /// Gives back the objective, e.g. to read state accumulated by a stateful objective.
    pub fn into_function(self) -> F {
        self.function
    }
}
