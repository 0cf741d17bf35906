//! Builder for assembling widgets and cells into an evaluator
//!
//! Registrations made inside [`NotebookBuilder::with_namespace`] are
//! qualified as `namespace::name`, so two notebooks using the same top-level
//! names can be composed into one evaluator. A name that already contains
//! `::` is taken as absolute and left unchanged, which lets a namespaced cell
//! depend on a widget or output from another namespace.

use crate::cell::Cell;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::events::EventBus;
use crate::graph::DependencyGraph;
use crate::widget::{Widget, WidgetStore};

/// Separator between namespace segments and names
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Collects widgets and cells, then builds a validated [`Evaluator`]
#[derive(Debug, Default)]
pub struct NotebookBuilder {
    widgets: Vec<Widget>,
    cells: Vec<Cell>,
    scope: Vec<String>,
    events: Option<EventBus>,
}

impl NotebookBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget
    pub fn widget(mut self, widget: Widget) -> Self {
        let id = self.qualify(widget.id());
        self.widgets.push(widget.rename(id));
        self
    }

    /// Add a cell
    pub fn cell(mut self, cell: Cell) -> Self {
        let scope = self.scope.clone();
        self.cells
            .push(cell.qualified(|name| qualify_in(&scope, name)));
        self
    }

    /// Use `events` for the evaluator's notifications
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Register widgets and cells under a namespace
    ///
    /// Namespaces nest: registering under `b` inside `a` yields `a::b::name`.
    pub fn with_namespace<F, E>(mut self, namespace: &str, register: F) -> std::result::Result<Self, E>
    where
        F: FnOnce(Self) -> std::result::Result<Self, E>,
    {
        self.scope.push(namespace.to_string());
        let mut builder = register(self)?;
        builder.scope.pop();
        Ok(builder)
    }

    /// Qualify a name with the current namespace
    pub fn qualify(&self, name: &str) -> String {
        qualify_in(&self.scope, name)
    }

    /// Build the dependency graph and the evaluator
    ///
    /// Graph errors (cycles, duplicates, unresolved inputs) surface here,
    /// before any cell executes.
    pub fn build(self) -> Result<Evaluator> {
        let mut store = WidgetStore::new();
        for widget in self.widgets {
            store.register(widget)?;
        }
        let graph = DependencyGraph::build(self.cells, &store)?;
        let evaluator = Evaluator::new(graph, store);
        Ok(match self.events {
            Some(events) => evaluator.with_event_bus(events),
            None => evaluator,
        })
    }
}

fn qualify_in(scope: &[String], name: &str) -> String {
    if scope.is_empty() || name.contains(NAMESPACE_SEPARATOR) {
        name.to_string()
    } else {
        format!("{}{NAMESPACE_SEPARATOR}{name}", scope.join(NAMESPACE_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::Value;
    use crate::widget::WidgetDomain;

    fn slider(id: &str) -> Widget {
        Widget::new(id, id, WidgetDomain::int_slider(0, 10), 1).unwrap()
    }

    fn add_one(id: &str, input: &str, output: &str) -> Cell {
        let name = input.to_string();
        Cell::new(id, [input], [output], move |inputs| {
            Ok(vec![Value::Float(inputs.float(&name)? + 1.0)])
        })
    }

    #[test]
    fn test_qualify() {
        let builder = NotebookBuilder::new();
        assert_eq!(builder.qualify("x"), "x");
        let builder = builder
            .with_namespace("outer", |b| {
                assert_eq!(b.qualify("x"), "outer::x");
                assert_eq!(b.qualify("other::x"), "other::x");
                b.with_namespace("inner", |b| {
                    assert_eq!(b.qualify("x"), "outer::inner::x");
                    Ok::<_, Error>(b)
                })
            })
            .unwrap();
        assert_eq!(builder.qualify("x"), "x");
    }

    #[test]
    fn test_namespaced_notebooks_do_not_collide() {
        let register = |b: NotebookBuilder| -> Result<NotebookBuilder> {
            Ok(b.widget(slider("w")).cell(add_one("a", "w", "a_out")))
        };
        let mut evaluator = NotebookBuilder::new()
            .with_namespace("left", register)
            .and_then(|b| b.with_namespace("right", register))
            .and_then(NotebookBuilder::build)
            .unwrap();

        evaluator.run_all();
        evaluator.set_widget("left::w", 5).unwrap();
        let report = evaluator.run_pending().unwrap().unwrap();

        assert_eq!(report.executed, vec!["left::a".to_string()]);
        assert_eq!(evaluator.snapshot().value("left::a_out"), Some(&Value::Float(6.0)));
        assert_eq!(evaluator.snapshot().value("right::a_out"), Some(&Value::Float(2.0)));
    }

    #[test]
    fn test_cross_namespace_reference() {
        // "::w" is absolute but does not name the root widget "w"
        let unresolved = NotebookBuilder::new()
            .widget(slider("w"))
            .with_namespace("ns", |b| Ok::<_, Error>(b.cell(add_one("a", "::w", "a_out"))))
            .and_then(NotebookBuilder::build);
        assert!(matches!(unresolved, Err(Error::UnresolvedInput { .. })));

        let mut evaluator = NotebookBuilder::new()
            .with_namespace("shared", |b| Ok::<_, Error>(b.widget(slider("w"))))
            .and_then(|b| b.with_namespace("ns", |b| Ok(b.cell(add_one("a", "shared::w", "a_out")))))
            .and_then(NotebookBuilder::build)
            .unwrap();
        evaluator.run_all();
        assert_eq!(evaluator.snapshot().value("ns::a_out"), Some(&Value::Float(2.0)));
    }

    #[test]
    fn test_build_reports_duplicate_widgets() {
        let result = NotebookBuilder::new()
            .widget(slider("w"))
            .widget(slider("w"))
            .build();
        assert_eq!(result.unwrap_err(), Error::DuplicateWidget("w".to_string()));
    }
}
