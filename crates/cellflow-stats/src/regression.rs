//! Degree-1 ordinary least squares

use crate::error::{Error, Result};
use crate::traits::{centered_sums, mean, BivariateStatistic};
use num_traits::Float;

/// Fitted line `y = slope·x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit<T = f64> {
    pub slope: T,
    pub intercept: T,
}

impl<T: Float> LinearFit<T> {
    /// Evaluate the line at `x`
    pub fn predict(&self, x: T) -> T {
        self.slope * x + self.intercept
    }
}

/// Least-squares line through paired observations
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinaryLeastSquares;

impl OrdinaryLeastSquares {
    /// Create a new least-squares estimator
    pub fn new() -> Self {
        Self
    }
}

impl<T: Float> BivariateStatistic<T> for OrdinaryLeastSquares {
    type Output = LinearFit<T>;

    fn compute(&self, x: &[T], y: &[T]) -> Result<LinearFit<T>> {
        Error::check_paired(x, y, 2)?;

        let (sxy, sxx, _) = centered_sums(x, y);
        if sxx == T::zero() {
            return Err(Error::ZeroVariance("x"));
        }

        let slope = sxy / sxx;
        let intercept = mean(y) - slope * mean(x);
        Ok(LinearFit { slope, intercept })
    }

    fn name(&self) -> &'static str {
        "ols"
    }
}

/// Least-squares line through two `f64` series
pub fn fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    OrdinaryLeastSquares.compute(x, y)
}

/// `num` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            values[num - 1] = end;
            values
        }
    }
}
