//! Error types for the numeric collaborators

use thiserror::Error;

/// Error type for correlation, fitting and data generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Too few observations for the statistic
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Paired series of different lengths
    #[error("Size mismatch: x has {x} values, y has {y}")]
    SizeMismatch { x: usize, y: usize },

    /// A series has no spread, so the statistic is undefined
    #[error("Zero variance in {0}")]
    ZeroVariance(&'static str),

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Validate that two paired series can be compared
    pub fn check_paired<T>(x: &[T], y: &[T], minimum: usize) -> Result<()> {
        if x.len() != y.len() {
            return Err(Self::SizeMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.len() < minimum {
            return Err(Self::InsufficientData {
                expected: minimum,
                actual: x.len(),
            });
        }
        Ok(())
    }
}
