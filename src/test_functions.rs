//! Benchmark objectives for exercising the optimiser.
//!
//! `sphere`, `rosenbrock`, `rastrigin` and `ackley` come from the now defunct [argmin-testfunctions](https://github.com/argmin-rs/argmin-testfunctions) crate by Stefan Kroboth.
//! The ill-conditioned `cigar`, `discus` and `ellipsoid` functions are the usual large scale evolution strategy benchmarks.

// Permission is hereby granted, free of charge, to any
// person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the
// Software without restriction, including without
// limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software
// is furnished to do so, subject to the following
// conditions:

// The above copyright notice and this permission notice
// shall be included in all copies or substantial portions
// of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF
// ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED
// TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
// SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR
// IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

use std::f64::consts::PI;

/// Sphere test function
///
/// Defined as
///
/// `f(x_1, x_2, ..., x_n) = \sum_{i=1}^n x_i^2`
///
/// where `x_i \in (-\infty, \infty)` and `n > 0`.
///
/// The global minimum is at `f(x_1, x_2, ..., x_n) = f(0, 0, ..., 0) = 0`.
pub fn sphere(param: &[f64]) -> f64 {
    param.iter().map(|x| x.powi(2)).sum()
}

/// Cigar test function
///
/// `f(x) = x_1^2 + 10^6 \sum_{i=2}^n x_i^2`
///
/// A single short axis. The global minimum is at the origin with value 0.
pub fn cigar(param: &[f64]) -> f64 {
    match param.split_first() {
        Some((x1, rest)) => x1.powi(2) + 1e6 * sphere(rest),
        None => 0.0,
    }
}

/// Discus test function
///
/// `f(x) = 10^6 x_1^2 + \sum_{i=2}^n x_i^2`
///
/// A single long axis. The global minimum is at the origin with value 0.
pub fn discus(param: &[f64]) -> f64 {
    match param.split_first() {
        Some((x1, rest)) => 1e6 * x1.powi(2) + sphere(rest),
        None => 0.0,
    }
}

/// Ellipsoid test function
///
/// `f(x) = \sum_{i=1}^n 10^{6 (i - 1) / (n - 1)} x_i^2`
///
/// Condition number `10^6`. The global minimum is at the origin with value 0.
pub fn ellipsoid(param: &[f64]) -> f64 {
    let n = param.len();
    if n < 2 {
        return sphere(param);
    }
    param
        .iter()
        .enumerate()
        .map(|(i, x)| 10f64.powf(6.0 * i as f64 / (n - 1) as f64) * x.powi(2))
        .sum()
}

/// Multidimensional Rosenbrock test function
///
/// Defined as
///
/// `f(x_1, x_2, ..., x_n) = \sum_{i=1}^{n-1} \left[ (a - x_i)^2 + b * (x_{i+1} - x_i^2)^2 \right]`
///
/// where `x_i \in (-\infty, \infty)`. The parameters a and b usually are: `a = 1` and `b = 100`.
///
/// The global minimum is at `f(x_1, x_2, ..., x_n) = f(1, 1, ..., 1) = 0`.
pub fn rosenbrock(param: &[f64], a: f64, b: f64) -> f64 {
    param
        .iter()
        .zip(param.iter().skip(1))
        .map(|(&xi, &xi1)| (a - xi).powi(2) + b * (xi1 - xi.powi(2)).powi(2))
        .sum()
}

/// Rastrigin test function
pub fn rastrigin(param: &[f64]) -> f64 {
    rastrigin_a(param, 10.0)
}

/// Rastrigin test function
///
/// The same as `rastrigin`; however, it allows to set the parameter a.
pub fn rastrigin_a(param: &[f64], a: f64) -> f64 {
    a * param.len() as f64
        + param
            .iter()
            .map(|&x| x.powi(2) - a * (2.0 * PI * x).cos())
            .sum::<f64>()
}

/// Ackley test function
///
/// Defined as
///
/// `f(x_1, x_2, ..., x_n) = - a * exp( -b \sqrt{\frac{1}{d}\sum_{i=1}^n x_i^2 ) -
/// exp( \frac{1}{d} cos(c * x_i) ) + a + exp(1)`
///
/// where `x_i \in [-32.768, 32.768]` and usually `a = 10`, `b = 0.2` and `c = 2*pi`
///
/// The global minimum is at `f(x_1, x_2, ..., x_n) = f(0, 0, ..., 0) = 0`.
pub fn ackley(param: &[f64]) -> f64 {
    ackley_param(param, 20.0, 0.2, 2.0 * PI)
}

/// Ackley test function
///
/// The same as `ackley`; however, it allows to set the parameters a, b and c.
pub fn ackley_param(param: &[f64], a: f64, b: f64, c: f64) -> f64 {
    let n = param.len() as f64;
    -a * (-b * ((1.0 / n) * sphere(param)).sqrt()).exp()
        - ((1.0 / n) * param.iter().map(|x| (c * *x).cos()).sum::<f64>()).exp()
        + a
        + 1f64.exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_minima() {
        let zeros = [0.0; 7];
        assert_eq!(sphere(&zeros), 0.0);
        assert_eq!(cigar(&zeros), 0.0);
        assert_eq!(discus(&zeros), 0.0);
        assert_eq!(ellipsoid(&zeros), 0.0);
        assert_eq!(rastrigin(&zeros), 0.0);
        assert!(ackley(&zeros).abs() < 1e-12);
        assert_eq!(rosenbrock(&[1.0; 7], 1.0, 100.0), 0.0);
    }

    #[test]
    fn conditioning() {
        let e1 = [1.0, 0.0, 0.0];
        let e3 = [0.0, 0.0, 1.0];
        assert_eq!(cigar(&e1), 1.0);
        assert_eq!(cigar(&e3), 1e6);
        assert_eq!(discus(&e1), 1e6);
        assert_eq!(discus(&e3), 1.0);
        assert_eq!(ellipsoid(&e1), 1.0);
        assert!((ellipsoid(&e3) - 1e6).abs() < 1e-6);
        assert_eq!(ellipsoid(&[2.0]), 4.0);
    }
}
