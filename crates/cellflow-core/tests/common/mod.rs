//! Shared fixtures for integration tests

#![allow(dead_code)]

use cellflow_core::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Execution counter shared with a cell closure
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Counters for every cell of [`diamond_notebook`]
#[derive(Clone, Default)]
pub struct Counters {
    pub scaled: Counter,
    pub shifted: Counter,
    pub combined: Counter,
    pub label: Counter,
}

/// Two sliders feeding a small diamond:
///
/// ```text
/// a ──> scaled ──┐
///                ├──> combined
/// b ──> shifted ─┘
/// a ──> label
/// ```
///
/// `shifted` fails when `b` is zero.
pub fn diamond_notebook() -> (Evaluator, Counters) {
    let counters = Counters::default();
    let (c1, c2, c3, c4) = (
        counters.scaled.clone(),
        counters.shifted.clone(),
        counters.combined.clone(),
        counters.label.clone(),
    );

    let evaluator = NotebookBuilder::new()
        .widget(Widget::new("a", "A", WidgetDomain::int_slider(0, 100), 10).unwrap())
        .widget(Widget::new("b", "B", WidgetDomain::float_slider(0.0, 5.0, 0.5), 1.0).unwrap())
        .cell(Cell::new("scaled", ["a"], ["a2"], move |inputs| {
            c1.bump();
            Ok(vec![Value::Float(inputs.float("a")? * 2.0)])
        }))
        .cell(Cell::new("shifted", ["b"], ["b_inv"], move |inputs| {
            c2.bump();
            let b = inputs.float("b")?;
            if b == 0.0 {
                return Err(CellError::computation("division by zero"));
            }
            Ok(vec![Value::Float(1.0 / b)])
        }))
        .cell(Cell::new("combined", ["a2", "b_inv"], ["sum"], move |inputs| {
            c3.bump();
            Ok(vec![Value::Float(inputs.float("a2")? + inputs.float("b_inv")?)])
        }))
        .cell(Cell::new("label", ["a"], ["text"], move |inputs| {
            c4.bump();
            Ok(vec![Value::Markdown(format!("a = **{}**", inputs.integer("a")?))])
        }))
        .build()
        .unwrap();

    (evaluator, counters)
}
