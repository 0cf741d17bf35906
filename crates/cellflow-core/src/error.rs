//! Error types for the reactive evaluator
//!
//! Two layers of failure exist. [`Error`] covers malformed notebooks and
//! invalid widget interaction and is returned to the caller. [`CellError`] is
//! raised by a cell's own computation and is recorded in the snapshot as a
//! `Failed` state instead of aborting the pass.

use thiserror::Error;

/// Core error type for graph construction and widget interaction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The cell dependency graph contains a cycle
    #[error("Dependency cycle between cells: {}", cells.join(" -> "))]
    Cycle { cells: Vec<String> },

    /// Two cells share an identifier
    #[error("Duplicate cell identifier: {0}")]
    DuplicateCell(String),

    /// An output name is produced twice, or shadows a widget
    #[error("Output '{name}' declared by cell '{cell}' is already defined by '{existing}'")]
    DuplicateOutput {
        name: String,
        cell: String,
        existing: String,
    },

    /// Two widgets share an identifier
    #[error("Duplicate widget identifier: {0}")]
    DuplicateWidget(String),

    /// A cell input refers to nothing known
    #[error("Cell '{cell}' declares input '{input}' which is neither a cell output nor a widget")]
    UnresolvedInput { cell: String, input: String },

    /// Widget value outside its domain or misaligned with the step
    #[error("Value {value} out of range for widget '{widget}': expected {min}..={max} in steps of {step}")]
    OutOfRange {
        widget: String,
        value: f64,
        min: f64,
        max: f64,
        step: f64,
    },

    /// Widget identifier not registered
    #[error("Unknown widget: {0}")]
    UnknownWidget(String),

    /// Value of the wrong kind for a widget
    #[error("Invalid value for widget '{widget}': {reason}")]
    InvalidWidgetValue { widget: String, reason: String },

    /// Slider domain is malformed
    #[error("Invalid domain for widget '{widget}': {reason}")]
    InvalidDomain { widget: String, reason: String },

    /// Output name not declared by any cell
    #[error("Unknown output: {0}")]
    UnknownOutput(String),

    /// Failure of the evaluation machinery itself
    #[error("Execution error: {0}")]
    Execution(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a value rejected by a widget
    pub fn invalid_value(widget: &str, reason: impl Into<String>) -> Self {
        Self::InvalidWidgetValue {
            widget: widget.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an error for a malformed widget domain
    pub fn invalid_domain(widget: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            widget: widget.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by user interaction rather than a
    /// malformed notebook
    pub fn is_widget_error(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. } | Self::UnknownWidget(_) | Self::InvalidWidgetValue { .. }
        )
    }
}

/// Error raised while computing a single cell
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    /// The cell's own logic failed
    #[error("Computation error: {0}")]
    Computation(String),

    /// A declared input has no value yet
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// An input holds a value of the wrong kind
    #[error("Input '{input}' has type {actual}, expected {expected}")]
    TypeMismatch {
        input: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The computation returned the wrong number of outputs
    #[error("Cell produced {actual} outputs, declared {expected}")]
    OutputArity { expected: usize, actual: usize },

    /// An ancestor cell failed, so this cell was not executed
    #[error("Upstream cell '{cell}' failed")]
    UpstreamFailed { cell: String },
}

impl CellError {
    /// Create a computation error from anything printable
    pub fn computation(message: impl std::fmt::Display) -> Self {
        Self::Computation(message.to_string())
    }
}

impl From<anyhow::Error> for CellError {
    fn from(err: anyhow::Error) -> Self {
        Self::Computation(format!("{err:#}"))
    }
}
