//! Trait shared by statistics computed over paired series

use crate::error::Result;
use num_traits::Float;

/// A statistic of two paired series `(x[i], y[i])`
pub trait BivariateStatistic<T: Float> {
    /// Value produced by the statistic
    type Output;

    /// Compute the statistic
    ///
    /// Implementations reject series of different lengths and series that
    /// are too short for the statistic to be defined.
    fn compute(&self, x: &[T], y: &[T]) -> Result<Self::Output>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Arithmetic mean of a non-empty slice
pub(crate) fn mean<T: Float>(values: &[T]) -> T {
    let n = T::from(values.len()).unwrap_or_else(T::one);
    values.iter().fold(T::zero(), |acc, &v| acc + v) / n
}

/// Centered sums `(Σdx·dy, Σdx², Σdy²)`
pub(crate) fn centered_sums<T: Float>(x: &[T], y: &[T]) -> (T, T, T) {
    let mean_x = mean(x);
    let mean_y = mean(y);
    x.iter()
        .zip(y)
        .fold((T::zero(), T::zero(), T::zero()), |(sxy, sxx, syy), (&xi, &yi)| {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
        })
}
