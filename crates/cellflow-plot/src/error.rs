//! Error types for chart construction

use thiserror::Error;

/// Error type for plotting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Nothing to plot
    #[error("Empty series: {0}")]
    EmptySeries(&'static str),

    /// x and y series of different lengths
    #[error("Size mismatch: x has {x} values, y has {y}")]
    SizeMismatch { x: usize, y: usize },

    /// NaN or infinite value in the plotted data
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
