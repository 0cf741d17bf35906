//! Event-based evaluation notification system
//!
//! Observers (logging, metrics, a display host) subscribe to the evaluator's
//! progress through an [`EventBus`] instead of being wired into the pass
//! loop.

use crate::context::PassKind;
use crate::error::{CellError, Error, Result};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Event emitted by the evaluator
#[derive(Debug, Clone)]
pub enum EvalEvent {
    /// A pass started
    PassStarted {
        trace_id: Uuid,
        kind: PassKind,
        generation: u64,
        cells: usize,
    },

    /// A cell computed successfully
    CellComputed {
        trace_id: Uuid,
        cell: String,
        duration: Duration,
    },

    /// A cell's own computation failed
    CellFailed {
        trace_id: Uuid,
        cell: String,
        error: CellError,
    },

    /// A cell was not executed because an input was unavailable
    CellSkipped {
        trace_id: Uuid,
        cell: String,
        reason: CellError,
    },

    /// A pass completed
    PassCompleted {
        trace_id: Uuid,
        generation: u64,
        duration: Duration,
        executed: usize,
        failed: usize,
    },

    /// A widget accepted a new value
    WidgetChanged { widget: String, value: Value },

    /// A widget rejected a value
    WidgetRejected { widget: String, error: Error },
}

/// Trait for handling evaluation events
pub trait EventHandler: Send + Sync {
    /// Handle an event
    fn handle_event(&self, event: &EvalEvent);

    /// Check if this handler is interested in a particular event type
    fn is_interested(&self, event: &EvalEvent) -> bool {
        let _ = event;
        true
    }

    /// Get the name of this handler for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Event bus for distributing events to multiple handlers
pub struct EventBus {
    handlers: Arc<Mutex<Vec<Box<dyn EventHandler>>>>,
    enabled: Arc<AtomicBool>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(Vec::new())),
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Register an event handler
    pub fn register<H>(&self, handler: H) -> Result<()>
    where
        H: EventHandler + 'static,
    {
        let mut handlers = self
            .handlers
            .lock()
            .map_err(|e| Error::Execution(format!("event handler list poisoned: {e}")))?;
        handlers.push(Box::new(handler));
        Ok(())
    }

    /// Emit an event to all interested handlers
    pub fn emit(&self, event: &EvalEvent) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let handlers = self
            .handlers
            .lock()
            .map_err(|e| Error::Execution(format!("event handler list poisoned: {e}")))?;
        for handler in handlers.iter() {
            if handler.is_interested(event) {
                handler.handle_event(event);
            }
        }
        Ok(())
    }

    /// Emit an event, logging delivery failures instead of returning them
    pub fn publish(&self, event: &EvalEvent) {
        if let Err(err) = self.emit(event) {
            tracing::warn!(%err, "event delivery failed");
        }
    }

    /// Enable or disable event emission
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Check if the event bus is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Get the number of registered handlers
    pub fn handler_count(&self) -> Result<usize> {
        let handlers = self
            .handlers
            .lock()
            .map_err(|e| Error::Execution(format!("event handler list poisoned: {e}")))?;
        Ok(handlers.len())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            enabled: Arc::clone(&self.enabled),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handler_count().unwrap_or(0))
            .finish()
    }
}

/// Handler forwarding events to `tracing`
pub struct LoggingHandler {
    level: tracing::Level,
}

impl LoggingHandler {
    /// Create a new logging handler; failures always log at `ERROR`
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {
        let level = $level;
        if level == tracing::Level::ERROR {
            tracing::error!($($arg)+)
        } else if level == tracing::Level::WARN {
            tracing::warn!($($arg)+)
        } else if level == tracing::Level::INFO {
            tracing::info!($($arg)+)
        } else if level == tracing::Level::DEBUG {
            tracing::debug!($($arg)+)
        } else {
            tracing::trace!($($arg)+)
        }
    };
}

impl EventHandler for LoggingHandler {
    fn handle_event(&self, event: &EvalEvent) {
        match event {
            EvalEvent::PassStarted { trace_id, kind, generation, cells } => {
                log_at!(self.level, %trace_id, ?kind, generation, cells, "pass started");
            }
            EvalEvent::PassCompleted { trace_id, duration, executed, failed, .. } => {
                log_at!(self.level, %trace_id, ?duration, executed, failed, "pass completed");
            }
            EvalEvent::CellFailed { trace_id, cell, error } => {
                tracing::error!(%trace_id, cell = %cell, %error, "cell failed");
            }
            EvalEvent::WidgetRejected { widget, error } => {
                tracing::error!(widget = %widget, %error, "widget value rejected");
            }
            _ => {
                tracing::trace!(?event, "evaluation event");
            }
        }
    }
}

/// Counters accumulated by [`MetricsHandler`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalMetrics {
    pub passes: usize,
    pub executions: usize,
    pub failures: HashMap<String, usize>,
    pub skipped: usize,
    pub widget_changes: usize,
    pub rejected_widget_values: usize,
}

/// Metrics collection handler
///
/// Clones share the same counters: register one clone and read from another.
#[derive(Clone, Default)]
pub struct MetricsHandler {
    metrics: Arc<Mutex<EvalMetrics>>,
}

impl MetricsHandler {
    /// Create a new metrics handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> Result<EvalMetrics> {
        let metrics = self
            .metrics
            .lock()
            .map_err(|e| Error::Execution(format!("metrics poisoned: {e}")))?;
        Ok(metrics.clone())
    }
}

impl EventHandler for MetricsHandler {
    fn handle_event(&self, event: &EvalEvent) {
        let Ok(mut metrics) = self.metrics.lock() else {
            tracing::error!("metrics poisoned, event dropped");
            return;
        };

        match event {
            EvalEvent::PassStarted { .. } => metrics.passes += 1,
            EvalEvent::CellComputed { .. } => metrics.executions += 1,
            EvalEvent::CellFailed { cell, .. } => {
                metrics.executions += 1;
                *metrics.failures.entry(cell.clone()).or_insert(0) += 1;
            }
            EvalEvent::CellSkipped { .. } => metrics.skipped += 1,
            EvalEvent::WidgetChanged { .. } => metrics.widget_changes += 1,
            EvalEvent::WidgetRejected { .. } => metrics.rejected_widget_values += 1,
            EvalEvent::PassCompleted { .. } => {}
        }
    }
}

/// Null event handler that does nothing
#[derive(Default, Clone)]
pub struct NullEventHandler;

impl EventHandler for NullEventHandler {
    fn handle_event(&self, _event: &EvalEvent) {}

    fn is_interested(&self, _event: &EvalEvent) -> bool {
        false
    }
}
