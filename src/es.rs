// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

//! Generation independent parameters shared by the evolution strategy family.

use nalgebra::{DMatrixView, DVector};

use crate::error::ConfigError;

/// Recommended population size for a given dim size, `4 + floor(3 ln(dim))`.
pub fn default_population_size(dim: usize) -> usize {
    4 + ((dim as f64).ln() * 3.0).floor() as usize
}

/// Population size, parent count and the rank based recombination weights.
#[derive(Clone, Debug)]
pub struct EvolutionStrategy {
    n_individuals: usize,
    n_parents: usize,

    /// n_parents x 1, non-increasing and summing to one
    weights: DVector<f64>,

    /// variance effective number of parents
    mu_eff: f64,
}

impl EvolutionStrategy {
    /// # Errors
    /// * If `n_parents == 0` or `n_parents > n_individuals`.
    /// * If every log-rank weight is zero, e.g. a single individual.
    pub fn new(n_individuals: usize, n_parents: usize) -> Result<Self, ConfigError> {
        if n_parents == 0 || n_parents > n_individuals {
            return Err(ConfigError::Population {
                n_individuals,
                n_parents,
            });
        }

        let w_base = DVector::from_fn(n_parents, |row, _| {
            (((n_individuals as f64 + 1.0) / 2.0).ln() - ((row + 1) as f64).ln()).max(0.0)
        });
        let sum = w_base.sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(ConfigError::NonNormalizableWeights {
                n_individuals,
                n_parents,
            });
        }
        let weights = w_base / sum;
        let mu_eff = 1.0 / weights.norm_squared();

        Ok(Self {
            n_individuals,
            n_parents,
            weights,
            mu_eff,
        })
    }

    pub fn n_individuals(&self) -> usize {
        self.n_individuals
    }

    pub fn n_parents(&self) -> usize {
        self.n_parents
    }

    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    pub fn mu_eff(&self) -> f64 {
        self.mu_eff
    }

    /// Weighted sum of the columns of `population` selected by `order`.
    ///
    /// `order[k]` is the column index of the individual ranked `k`. Only the first `n_parents`
    /// entries are used.
    ///
    /// # Panics
    /// If `order` refers to a column outside `population`.
    pub fn recombine(&self, population: DMatrixView<f64>, order: &[usize]) -> DVector<f64> {
        debug_assert!(order.len() >= self.n_parents);
        let mut out = DVector::zeros(population.nrows());
        for (w, &i) in self.weights.iter().zip(order) {
            out.axpy(*w, &population.column(i), 1.0);
        }
        out
    }
}

/// Indices of `fitness` sorted ascending, best first.
///
/// Ties keep their sampling order so runs are reproducible.
pub fn rank(fitness: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..fitness.len()).collect();
    indices.sort_by(|a, b| fitness[*a].total_cmp(&fitness[*b]));
    indices
}
