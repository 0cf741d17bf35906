//! Pearson product-moment correlation

use crate::error::{Error, Result};
use crate::traits::{centered_sums, BivariateStatistic};
use num_traits::Float;

/// Pearson correlation coefficient
#[derive(Debug, Clone, Copy, Default)]
pub struct PearsonCorrelation;

impl PearsonCorrelation {
    /// Create a new Pearson correlation estimator
    pub fn new() -> Self {
        Self
    }
}

impl<T: Float> BivariateStatistic<T> for PearsonCorrelation {
    type Output = T;

    fn compute(&self, x: &[T], y: &[T]) -> Result<T> {
        Error::check_paired(x, y, 2)?;

        let (sxy, sxx, syy) = centered_sums(x, y);
        if sxx == T::zero() {
            return Err(Error::ZeroVariance("x"));
        }
        if syy == T::zero() {
            return Err(Error::ZeroVariance("y"));
        }

        // rounding can push |r| just past 1
        let r = sxy / (sxx * syy).sqrt();
        Ok(r.max(-T::one()).min(T::one()))
    }

    fn name(&self) -> &'static str {
        "pearson"
    }
}

/// Pearson correlation of two `f64` series
pub fn correlate(x: &[f64], y: &[f64]) -> Result<f64> {
    PearsonCorrelation.compute(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert_abs_diff_eq!(correlate(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perfect_negative() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, 8.0, 6.0, 4.0, 2.0];
        assert_abs_diff_eq!(correlate(&x, &y).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 4.0];
        assert_abs_diff_eq!(correlate(&x, &y).unwrap(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_single_precision() {
        let x = [1.0f32, 2.0, 3.0];
        let y = [3.0f32, 2.0, 1.0];
        let r: f32 = PearsonCorrelation::new().compute(&x, &y).unwrap();
        assert_abs_diff_eq!(r, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_variance() {
        let x = [1.0, 2.0, 3.0];
        let y = [5.0, 5.0, 5.0];
        assert_eq!(correlate(&x, &y), Err(Error::ZeroVariance("y")));
        assert_eq!(correlate(&y, &x), Err(Error::ZeroVariance("x")));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            correlate(&[1.0], &[2.0]),
            Err(Error::InsufficientData { .. })
        ));
        assert!(matches!(
            correlate(&[1.0, 2.0], &[2.0]),
            Err(Error::SizeMismatch { .. })
        ));
    }
}
