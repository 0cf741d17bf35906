//! Seeded synthetic data for linear relationships
//!
//! Samples are drawn from a ChaCha stream seeded per call, so the same model,
//! size, noise level and seed always reproduce the same data.

use crate::error::{Error, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

/// Paired observations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Samples {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Samples {
    /// Number of observations
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Check if there are no observations
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// `y = slope·x + intercept + ε` with `x ~ N(0, 1)` and `ε ~ N(0, σ)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl Default for LinearModel {
    fn default() -> Self {
        Self::new(2.0, 3.0)
    }
}

impl LinearModel {
    /// Create a model with the given true coefficients
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Draw `n` observations with noise standard deviation `noise_sd`
    ///
    /// All `x` values are drawn before any noise value.
    pub fn sample(&self, n: usize, noise_sd: f64, seed: u64) -> Result<Samples> {
        if !noise_sd.is_finite() || noise_sd < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "noise standard deviation must be finite and non-negative, got {noise_sd}"
            )));
        }
        let standard = Normal::new(0.0, 1.0)
            .map_err(|e| Error::InvalidParameter(e.to_string()))?;
        let noise = Normal::new(0.0, noise_sd)
            .map_err(|e| Error::InvalidParameter(e.to_string()))?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let x: Vec<f64> = (0..n).map(|_| standard.sample(&mut rng)).collect();
        let y = x
            .iter()
            .map(|&xi| self.slope * xi + self.intercept + noise.sample(&mut rng))
            .collect();

        debug!(n, noise_sd, seed, "sampled linear model");
        Ok(Samples { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{correlate, fit};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_same_seed_same_samples() {
        let model = LinearModel::default();
        let a = model.sample(200, 1.0, 7).unwrap();
        let b = model.sample(200, 1.0, 7).unwrap();
        let c = model.sample(200, 1.0, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 200);
    }

    #[test]
    fn test_x_does_not_depend_on_noise() {
        let model = LinearModel::default();
        let quiet = model.sample(100, 0.5, 0).unwrap();
        let loud = model.sample(100, 4.0, 0).unwrap();
        assert_eq!(quiet.x, loud.x);
        assert_ne!(quiet.y, loud.y);
    }

    #[test]
    fn test_noiseless_samples_lie_on_line() {
        let samples = LinearModel::new(-1.5, 0.5).sample(50, 0.0, 3).unwrap();
        for (x, y) in samples.x.iter().zip(&samples.y) {
            assert_abs_diff_eq!(*y, -1.5 * x + 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_recovers_coefficients() {
        let samples = LinearModel::default().sample(1000, 1.0, 0).unwrap();
        let line = fit(&samples.x, &samples.y).unwrap();
        assert_abs_diff_eq!(line.slope, 2.0, epsilon = 0.2);
        assert_abs_diff_eq!(line.intercept, 3.0, epsilon = 0.2);
        assert!(correlate(&samples.x, &samples.y).unwrap() > 0.8);
    }

    #[test]
    fn test_rejects_negative_noise() {
        assert!(matches!(
            LinearModel::default().sample(10, -1.0, 0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(LinearModel::default().sample(0, 1.0, 0).unwrap().is_empty());
    }
}
