//! Reactive regression notebook
//!
//! Two sliders (sample count and noise level) drive a synthetic linear
//! dataset. Downstream cells fit a line, summarise the relationship in
//! Markdown, plot samples against the fit and arrange everything in a layout.
//! Moving a slider re-executes only the cells that depend on it.
//!
//! # Example
//!
//! ```rust
//! use cellflow_notebook::{notebook, outputs, widgets, NotebookConfig};
//!
//! let mut evaluator = notebook(&NotebookConfig::default()).unwrap();
//! evaluator.run_all();
//!
//! let md = evaluator.snapshot().value(outputs::SUMMARY).and_then(|v| v.as_text()).unwrap();
//! assert!(md.contains("Samples: **300**"));
//!
//! evaluator.set_widget(widgets::NOISE, 2.5).unwrap();
//! evaluator.run_pending().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod regression;

pub use config::{FloatSliderConfig, IntSliderConfig, NotebookConfig};
pub use error::{Error, Result};
pub use regression::{notebook, outputs, register, summary_markdown, widgets};
