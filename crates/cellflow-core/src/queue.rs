//! Host-facing queue of widget change events
//!
//! The host may submit changes at any time, including while a pass is in
//! progress. The evaluator drains the queue only between passes and applies
//! the latest value per widget.

use crate::error::{Error, Result};
use crate::value::Value;
use std::sync::{Arc, Mutex};

/// Cloneable handle for submitting `(widget_id, value)` events
#[derive(Clone, Default)]
pub struct WidgetEvents {
    pending: Arc<Mutex<Vec<(String, Value)>>>,
}

impl WidgetEvents {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a widget change
    pub fn submit(&self, widget: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| Error::Execution(format!("Failed to lock widget queue: {e}")))?;
        pending.push((widget.into(), value.into()));
        Ok(())
    }

    /// Number of queued events, before coalescing
    pub fn len(&self) -> Result<usize> {
        let pending = self
            .pending
            .lock()
            .map_err(|e| Error::Execution(format!("Failed to lock widget queue: {e}")))?;
        Ok(pending.len())
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }

    /// Take every queued event, keeping only the latest value per widget
    ///
    /// Widgets appear in the order of their first submission.
    pub fn drain_coalesced(&self) -> Result<Vec<(String, Value)>> {
        let drained = {
            let mut pending = self
                .pending
                .lock()
                .map_err(|e| Error::Execution(format!("Failed to lock widget queue: {e}")))?;
            std::mem::take(&mut *pending)
        };

        let mut coalesced: Vec<(String, Value)> = Vec::with_capacity(drained.len());
        for (widget, value) in drained {
            match coalesced.iter_mut().find(|(w, _)| *w == widget) {
                Some((_, latest)) => *latest = value,
                None => coalesced.push((widget, value)),
            }
        }
        Ok(coalesced)
    }
}

impl std::fmt::Debug for WidgetEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetEvents")
            .field("pending", &self.len().unwrap_or(0))
            .finish()
    }
}
