//! Error types for notebook assembly and configuration

use thiserror::Error;

/// Error type for building notebooks
#[derive(Error, Debug)]
pub enum Error {
    /// Widget or graph error from the evaluator core
    #[error(transparent)]
    Core(#[from] cellflow_core::Error),

    /// Malformed JSON configuration
    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Well-formed configuration with an unusable setting
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
