// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory.

use nalgebra::DVector;
use rand::Rng;
use rand_distr::StandardNormal;

/// Source of isotropic Gaussian sample vectors.
///
/// Every [`Rng`] is a noise source. Other implementations can replay a fixed stream of vectors.
pub trait NoiseSource {
    /// A vector of `dim` independent standard normal draws.
    fn standard_normal(&mut self, dim: usize) -> DVector<f64>;
}

impl<R: Rng + ?Sized> NoiseSource for R {
    fn standard_normal(&mut self, dim: usize) -> DVector<f64> {
        DVector::from_fn(dim, |_, _| self.sample::<f64, _>(StandardNormal))
    }
}
