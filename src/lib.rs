//! Reactive notebook cells with incremental, dependency-driven recomputation
//!
//! This crate re-exports the workspace crates:
//!
//! - [`engine`] - widgets, cells, dependency graph and evaluator
//! - [`stats`] - correlation, least squares and seeded synthetic data
//! - [`plot`] - chart artifacts
//! - [`notebook`] - the regression notebook and its configuration

pub use cellflow_core as engine;
pub use cellflow_notebook as notebook;
pub use cellflow_plot as plot;
pub use cellflow_stats as stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use cellflow_core::prelude::*;
    pub use cellflow_notebook::{outputs, widgets, NotebookConfig};
}
