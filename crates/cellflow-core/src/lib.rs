//! Reactive evaluation core for notebook cells
//!
//! This crate provides the dependency-driven recomputation that a reactive
//! notebook runtime performs: widgets feed cells, cells feed other cells, and
//! a change to one widget re-executes exactly the cells that depend on it.
//!
//! # Architecture Overview
//!
//! 1. **Widgets** ([`widget`]) - user-controlled values with validated domains
//! 2. **Cells** ([`cell`]) - pure computations over declared inputs and outputs
//! 3. **Dependency graph** ([`graph`]) - static edges, cycle detection, stable order
//! 4. **Evaluator** ([`evaluator`]) - full and incremental passes over a snapshot
//!
//! Observers subscribe through [`events`]; hosts queue widget changes through
//! [`queue::WidgetEvents`].
//!
//! # Example
//!
//! ```rust
//! use cellflow_core::prelude::*;
//!
//! let mut evaluator = NotebookBuilder::new()
//!     .widget(Widget::new("n", "Samples", WidgetDomain::int_slider(1, 10), 3).unwrap())
//!     .cell(Cell::new("square", ["n"], ["n2"], |inputs| {
//!         let n = inputs.integer("n")?;
//!         Ok(vec![Value::Integer(n * n)])
//!     }))
//!     .build()
//!     .unwrap();
//!
//! evaluator.run_all();
//! assert_eq!(evaluator.snapshot().value("n2"), Some(&Value::Integer(9)));
//!
//! evaluator.set_widget("n", 4).unwrap();
//! evaluator.run_pending().unwrap();
//! assert_eq!(evaluator.snapshot().value("n2"), Some(&Value::Integer(16)));
//! ```

pub mod builder;
pub mod cell;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod graph;
pub mod queue;
pub mod snapshot;
pub mod value;
pub mod widget;

// Re-export core types
pub use error::{CellError, Error, Result};

pub use builder::{NotebookBuilder, NAMESPACE_SEPARATOR};
pub use cell::{Cell, CellFn, CellInputs, CellResult};
pub use context::{EvalReport, PassContext, PassKind};
pub use evaluator::{Evaluator, PumpReport};
pub use events::{
    EvalEvent, EvalMetrics, EventBus, EventHandler, LoggingHandler, MetricsHandler,
    NullEventHandler,
};
pub use graph::DependencyGraph;
pub use queue::WidgetEvents;
pub use snapshot::{CellState, CellStatus, OutputValue, Snapshot, SnapshotEntry};
pub use value::{Table, Value};
pub use widget::{Widget, WidgetDomain, WidgetStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Cell, CellError, CellInputs, CellResult, CellState, DependencyGraph, Error, EvalReport,
        Evaluator, EventBus, NotebookBuilder, OutputValue, Result, Snapshot, Table, Value,
        Widget, WidgetDomain, WidgetEvents, WidgetStore,
    };
}
