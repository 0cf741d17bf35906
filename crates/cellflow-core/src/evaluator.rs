//! Reactive evaluator
//!
//! The evaluator owns the dependency graph, the widget store and the
//! snapshot. Passes run synchronously to completion; host events queued in
//! [`WidgetEvents`] are applied only between passes.

use crate::cell::Cell;
use crate::context::{EvalReport, PassContext, PassKind};
use crate::error::{CellError, Error, Result};
use crate::events::{EvalEvent, EventBus};
use crate::graph::DependencyGraph;
use crate::queue::WidgetEvents;
use crate::snapshot::{OutputValue, Snapshot, SnapshotEntry};
use crate::value::Value;
use crate::widget::WidgetStore;
use tracing::{debug, instrument};

/// Outcome of [`Evaluator::pump`]
#[derive(Debug, Default)]
pub struct PumpReport {
    /// Widgets whose value changed, in first-submission order
    pub applied: Vec<String>,
    /// Events rejected by the widget store
    pub rejected: Vec<(String, Error)>,
    /// Pass triggered by the applied changes, if any
    pub pass: Option<EvalReport>,
}

/// Incremental evaluator over a cell graph
#[derive(Debug)]
pub struct Evaluator {
    graph: DependencyGraph,
    widgets: WidgetStore,
    snapshot: Snapshot,
    events: EventBus,
    queue: WidgetEvents,
}

impl Evaluator {
    /// Create an evaluator; no cell runs until [`Evaluator::run_all`]
    pub fn new(graph: DependencyGraph, widgets: WidgetStore) -> Self {
        let snapshot = Snapshot::new(&graph);
        Self {
            graph,
            widgets,
            snapshot,
            events: EventBus::new(),
            queue: WidgetEvents::new(),
        }
    }

    /// Replace the event bus
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Event bus used for notifications
    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    /// Dependency graph
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Widget store
    pub fn widgets(&self) -> &WidgetStore {
        &self.widgets
    }

    /// Last completed snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Snapshot entry of an output
    pub fn get_snapshot(&self, output: &str) -> Result<&SnapshotEntry> {
        self.snapshot
            .get(output)
            .ok_or_else(|| Error::UnknownOutput(output.to_string()))
    }

    /// Handle for the host to queue widget changes
    pub fn widget_events(&self) -> WidgetEvents {
        self.queue.clone()
    }

    /// Set a widget value directly, marking it dirty on change
    pub fn set_widget(&mut self, id: &str, value: impl Into<Value>) -> Result<bool> {
        match self.widgets.set(id, value) {
            Ok(changed) => {
                if changed {
                    let value = self.widgets.get(id)?.clone();
                    self.events.publish(&EvalEvent::WidgetChanged {
                        widget: id.to_string(),
                        value,
                    });
                }
                Ok(changed)
            }
            Err(err) => {
                self.events.publish(&EvalEvent::WidgetRejected {
                    widget: id.to_string(),
                    error: err.clone(),
                });
                Err(err)
            }
        }
    }

    /// Execute every cell once in topological order
    #[instrument(skip(self), fields(cells = self.graph.len()))]
    pub fn run_all(&mut self) -> EvalReport {
        self.widgets.clear_dirty();
        let order = self.graph.order_indices().to_vec();
        self.execute(&order, PassKind::Full)
    }

    /// Re-execute only the cells reachable from the dirty names
    ///
    /// Names may be widget ids or output names. Every other snapshot entry is
    /// left untouched.
    #[instrument(skip_all)]
    pub fn run_from<'a, I>(&mut self, dirty: I) -> Result<EvalReport>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let dirty: Vec<&str> = dirty.into_iter().collect();
        if let Some(unknown) = dirty
            .iter()
            .find(|n| !self.widgets.contains(n) && !self.graph.has_output(n))
        {
            return Err(Error::UnknownOutput(unknown.to_string()));
        }
        self.widgets.mark_clean(dirty.iter().copied());
        let closure = self.graph.closure_indices(dirty.iter().copied());
        debug!(dirty = ?dirty, cells = closure.len(), "incremental pass");
        Ok(self.execute(&closure, PassKind::Incremental))
    }

    /// Run the closure of every widget changed since the last pass
    pub fn run_pending(&mut self) -> Result<Option<EvalReport>> {
        let dirty = self.widgets.take_dirty();
        if dirty.is_empty() {
            return Ok(None);
        }
        self.run_from(dirty.iter().map(String::as_str)).map(Some)
    }

    /// Apply queued host events, coalesced per widget, then run one pass
    pub fn pump(&mut self) -> Result<PumpReport> {
        let mut report = PumpReport::default();
        for (widget, value) in self.queue.drain_coalesced()? {
            match self.set_widget(&widget, value) {
                Ok(true) => report.applied.push(widget),
                Ok(false) => {}
                Err(err) => report.rejected.push((widget, err)),
            }
        }
        report.pass = self.run_pending()?;
        Ok(report)
    }

    fn execute(&mut self, cells: &[usize], kind: PassKind) -> EvalReport {
        let generation = self.snapshot.begin_pass();
        let mut ctx = PassContext::new(kind, generation);
        self.events.publish(&EvalEvent::PassStarted {
            trace_id: ctx.trace_id,
            kind,
            generation,
            cells: cells.len(),
        });

        for &i in cells {
            self.snapshot.mark_stale(self.graph.cell_at(i).id());
        }

        for &i in cells {
            let cell = self.graph.cell_at(i);
            let outcome = match gather_inputs(cell, &self.graph, &self.widgets, &self.snapshot) {
                Ok(values) => {
                    let inputs = cell.bind(values);
                    Ok(ctx.time_cell(cell.id(), || cell.execute(&inputs)))
                }
                Err(reason) => Err(reason),
            };

            match outcome {
                Ok(Ok(values)) => {
                    self.events.publish(&EvalEvent::CellComputed {
                        trace_id: ctx.trace_id,
                        cell: cell.id().to_string(),
                        duration: ctx.cell_timing(cell.id()).unwrap_or_default(),
                    });
                    self.snapshot.record_success(cell.id(), cell.outputs(), values);
                }
                Ok(Err(error)) => {
                    debug!(cell = cell.id(), %error, "cell failed");
                    ctx.record_failed(cell.id());
                    self.events.publish(&EvalEvent::CellFailed {
                        trace_id: ctx.trace_id,
                        cell: cell.id().to_string(),
                        error: error.clone(),
                    });
                    self.snapshot.record_failure(cell.id(), cell.outputs(), error);
                }
                Err(reason) => {
                    ctx.record_skipped(cell.id());
                    self.events.publish(&EvalEvent::CellSkipped {
                        trace_id: ctx.trace_id,
                        cell: cell.id().to_string(),
                        reason: reason.clone(),
                    });
                    self.snapshot.record_failure(cell.id(), cell.outputs(), reason);
                }
            }
        }

        let report = ctx.finish();
        self.events.publish(&EvalEvent::PassCompleted {
            trace_id: report.trace_id,
            generation,
            duration: report.duration,
            executed: report.executed.len(),
            failed: report.failed.len() + report.skipped.len(),
        });
        debug!(
            generation,
            executed = report.executed.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "pass finished"
        );
        report
    }
}

/// Collect a cell's declared inputs from the widget store and snapshot
///
/// Fails when an upstream output is failed or has never been computed.
fn gather_inputs<'a>(
    cell: &Cell,
    graph: &DependencyGraph,
    widgets: &'a WidgetStore,
    snapshot: &'a Snapshot,
) -> std::result::Result<Vec<&'a Value>, CellError> {
    let mut values = Vec::with_capacity(cell.inputs().len());
    for input in cell.inputs() {
        if let Some(producer) = graph.producer_index(input) {
            let entry = snapshot
                .get(input)
                .ok_or_else(|| CellError::MissingInput(input.clone()))?;
            match &entry.value {
                OutputValue::Ready(value) => values.push(value),
                OutputValue::Failed(CellError::UpstreamFailed { cell: root }) => {
                    return Err(CellError::UpstreamFailed { cell: root.clone() })
                }
                OutputValue::Failed(_) => {
                    return Err(CellError::UpstreamFailed {
                        cell: graph.cell_at(producer).id().to_string(),
                    })
                }
                OutputValue::Uninitialized => return Err(CellError::MissingInput(input.clone())),
            }
        } else {
            let value = widgets
                .get(input)
                .map_err(|_| CellError::MissingInput(input.clone()))?;
            values.push(value);
        }
    }
    Ok(values)
}
