//! Evaluation pass context
//!
//! A [`PassContext`] accompanies one evaluation pass, accumulating which cells
//! ran and how long they took. It is turned into an [`EvalReport`] when the
//! pass completes.

use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Kind of evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PassKind {
    /// Every cell in topological order
    Full,
    /// Only the closure of a dirty set
    Incremental,
}

/// Context that flows through one evaluation pass
#[derive(Debug, Clone)]
pub struct PassContext {
    /// Unique trace ID for this pass
    pub trace_id: Uuid,
    /// Snapshot generation written by this pass
    pub generation: u64,
    /// Full or incremental
    pub kind: PassKind,
    start_time: Instant,
    executed: Vec<String>,
    failed: Vec<String>,
    skipped: Vec<String>,
    cell_timings: HashMap<String, Duration>,
}

impl PassContext {
    /// Create a context for a new pass
    pub fn new(kind: PassKind, generation: u64) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            generation,
            kind,
            start_time: Instant::now(),
            executed: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            cell_timings: HashMap::new(),
        }
    }

    /// Time a cell execution and record it as executed
    pub fn time_cell<F, R>(&mut self, cell: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.cell_timings.insert(cell.to_string(), start.elapsed());
        self.executed.push(cell.to_string());
        result
    }

    /// Record that an executed cell failed
    pub fn record_failed(&mut self, cell: &str) {
        self.failed.push(cell.to_string());
    }

    /// Record that a cell was not executed because an input was unavailable
    pub fn record_skipped(&mut self, cell: &str) {
        self.skipped.push(cell.to_string());
    }

    /// Duration of a cell executed in this pass
    pub fn cell_timing(&self, cell: &str) -> Option<Duration> {
        self.cell_timings.get(cell).copied()
    }

    /// Get total elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Close the pass
    pub fn finish(self) -> EvalReport {
        EvalReport {
            trace_id: self.trace_id,
            generation: self.generation,
            kind: self.kind,
            duration: self.start_time.elapsed(),
            executed: self.executed,
            failed: self.failed,
            skipped: self.skipped,
            cell_timings: self.cell_timings,
        }
    }
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub trace_id: Uuid,
    pub generation: u64,
    pub kind: PassKind,
    pub duration: Duration,
    /// Cells whose computation ran, in execution order
    pub executed: Vec<String>,
    /// Executed cells whose computation raised an error
    pub failed: Vec<String>,
    /// Cells marked failed without running because an input was unavailable
    pub skipped: Vec<String>,
    pub cell_timings: HashMap<String, Duration>,
}

impl EvalReport {
    /// Whether every touched cell computed successfully
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// Check whether a cell ran in this pass
    pub fn executed_cell(&self, id: &str) -> bool {
        self.executed.iter().any(|c| c == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_timing() {
        let mut ctx = PassContext::new(PassKind::Full, 1);

        let result = ctx.time_cell("slow", || {
            std::thread::sleep(Duration::from_millis(10));
            42
        });

        assert_eq!(result, 42);
        let report = ctx.finish();
        assert_eq!(report.executed, vec!["slow".to_string()]);
        assert!(report.cell_timings["slow"] >= Duration::from_millis(10));
        assert!(report.duration >= report.cell_timings["slow"]);
        assert!(report.is_success());
    }

    #[test]
    fn test_report_failures() {
        let mut ctx = PassContext::new(PassKind::Incremental, 3);
        ctx.time_cell("a", || ());
        ctx.record_failed("a");
        ctx.record_skipped("b");
        let report = ctx.finish();
        assert!(!report.is_success());
        assert!(report.executed_cell("a"));
        assert!(!report.executed_cell("b"));
        assert_eq!(report.generation, 3);
        assert_eq!(report.kind, PassKind::Incremental);
    }
}
