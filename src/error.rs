// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

/// Invalid problem or optimiser configuration, reported at construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("problem dimension must be at least 1")]
    ZeroDimension,
    #[error("bound length {len} does not match problem dimension {dim}")]
    BoundsLength { dim: usize, len: usize },
    #[error("invalid bounds at index {index}: lower {lower} upper {upper}")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },
    #[error("need n_individuals >= n_parents >= 1, got n_individuals {n_individuals} n_parents {n_parents}")]
    Population {
        n_individuals: usize,
        n_parents: usize,
    },
    #[error("recombination weights for {n_parents} parents out of {n_individuals} cannot be normalised")]
    NonNormalizableWeights {
        n_individuals: usize,
        n_parents: usize,
    },
    #[error("step size must be positive and finite, got {0}")]
    StepSize(f64),
    #[error("initial mean has length {len}, expected {dim}")]
    MeanLength { dim: usize, len: usize },
    #[error("initial mean contains a non-finite value")]
    NonFiniteMean,
    #[error("number of evolution paths must be at least 1")]
    ZeroEvolutionPaths,
    #[error("{name} has {len} entries, expected {expected}")]
    ConstantsLength {
        name: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("{name} must lie in (0, {max}], got {value}")]
    LearningRate {
        name: &'static str,
        value: f64,
        max: f64,
    },
    #[error("record, verbose and stagnation intervals must be at least 1")]
    ZeroFrequency,
}

/// Errors that end a run.
///
/// None of these are retried: the algorithm is deterministic given its noise stream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The distribution state left the representable range. The state is not repaired.
    #[error("numeric instability in generation {generation}: {quantity} is {value}")]
    NumericInstability {
        generation: usize,
        quantity: &'static str,
        value: f64,
    },
    /// The objective returned NaN or an infinity.
    #[error("objective returned {value} at evaluation {evaluation}")]
    ObjectiveEvaluation { evaluation: usize, value: f64 },
    /// `update_distribution` was called before the population was fully evaluated.
    #[error("population holds {evaluated} evaluated individuals, expected {expected}")]
    IncompletePopulation { evaluated: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
