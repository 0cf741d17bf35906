//! Execution snapshot: latest output values and per-cell state

use crate::error::CellError;
use crate::graph::DependencyGraph;
use crate::value::Value;
use serde::Serialize;
use std::collections::HashMap;

/// Lifecycle state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CellState {
    /// Never executed
    Uninitialized,
    /// Outputs reflect the current inputs
    Computed,
    /// An upstream value changed and the cell awaits re-execution
    Stale,
    /// The cell or one of its ancestors failed
    Failed,
}

/// Value slot of a single output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    /// Producer has not run yet
    Uninitialized,
    /// Value computed by the producer
    Ready(Value),
    /// Producer failed, with the attributed error
    Failed(CellError),
}

impl OutputValue {
    /// The value, if ready
    pub fn ready(&self) -> Option<&Value> {
        match self {
            OutputValue::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// The failure, if failed
    pub fn error(&self) -> Option<&CellError> {
        match self {
            OutputValue::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Snapshot entry for one output name
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    /// Identifier of the producing cell
    pub producer: String,
    /// Current slot contents
    pub value: OutputValue,
    /// Pass generation in which the slot was last written (0 = never)
    pub generation: u64,
}

/// State of one cell in the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct CellStatus {
    pub state: CellState,
    /// Error of the last execution, when failed
    pub error: Option<CellError>,
    /// Pass generation in which the cell last changed state (0 = never)
    pub generation: u64,
}

/// Most recently computed outputs of every cell
#[derive(Debug, Clone)]
pub struct Snapshot {
    outputs: Vec<String>,
    entries: HashMap<String, SnapshotEntry>,
    cells: HashMap<String, CellStatus>,
    generation: u64,
}

impl Snapshot {
    /// Empty snapshot with one uninitialized slot per declared output
    pub fn new(graph: &DependencyGraph) -> Self {
        let mut outputs = Vec::new();
        let mut entries = HashMap::new();
        let mut cells = HashMap::new();
        for cell in graph.cells() {
            cells.insert(
                cell.id().to_string(),
                CellStatus {
                    state: CellState::Uninitialized,
                    error: None,
                    generation: 0,
                },
            );
            for output in cell.outputs() {
                outputs.push(output.clone());
                entries.insert(
                    output.clone(),
                    SnapshotEntry {
                        producer: cell.id().to_string(),
                        value: OutputValue::Uninitialized,
                        generation: 0,
                    },
                );
            }
        }
        Self {
            outputs,
            entries,
            cells,
            generation: 0,
        }
    }

    /// Generation of the last completed pass
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Entry for an output name
    pub fn get(&self, output: &str) -> Option<&SnapshotEntry> {
        self.entries.get(output)
    }

    /// Ready value of an output
    pub fn value(&self, output: &str) -> Option<&Value> {
        self.entries.get(output).and_then(|e| e.value.ready())
    }

    /// State of a cell
    pub fn cell_state(&self, id: &str) -> Option<CellState> {
        self.cells.get(id).map(|s| s.state)
    }

    /// Full status of a cell
    pub fn cell_status(&self, id: &str) -> Option<&CellStatus> {
        self.cells.get(id)
    }

    /// Entries in output declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SnapshotEntry)> {
        self.outputs
            .iter()
            .filter_map(|name| self.entries.get(name).map(|e| (name.as_str(), e)))
    }

    /// Number of output entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the snapshot has no outputs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compare output slots bit for bit, ignoring generations
    pub fn same_values(&self, other: &Snapshot) -> bool {
        self.outputs == other.outputs
            && self.iter().zip(other.iter()).all(|((_, a), (_, b))| {
                match (&a.value, &b.value) {
                    (OutputValue::Ready(x), OutputValue::Ready(y)) => x.bit_eq(y),
                    (x, y) => x == y,
                }
            })
    }

    /// Render ready values and failures as JSON for a display host
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, entry) in self.iter() {
            let rendered = match &entry.value {
                OutputValue::Uninitialized => serde_json::Value::Null,
                OutputValue::Ready(v) => {
                    serde_json::to_value(v).unwrap_or(serde_json::Value::Null)
                }
                OutputValue::Failed(e) => serde_json::json!({ "error": e.to_string() }),
            };
            map.insert(name.to_string(), rendered);
        }
        serde_json::Value::Object(map)
    }

    pub(crate) fn begin_pass(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn mark_stale(&mut self, cell: &str) {
        if let Some(status) = self.cells.get_mut(cell) {
            status.state = CellState::Stale;
        }
    }

    pub(crate) fn record_success(&mut self, cell: &str, outputs: &[String], values: Vec<Value>) {
        let generation = self.generation;
        for (name, value) in outputs.iter().zip(values) {
            if let Some(entry) = self.entries.get_mut(name) {
                entry.value = OutputValue::Ready(value);
                entry.generation = generation;
            }
        }
        if let Some(status) = self.cells.get_mut(cell) {
            status.state = CellState::Computed;
            status.error = None;
            status.generation = generation;
        }
    }

    pub(crate) fn record_failure(&mut self, cell: &str, outputs: &[String], error: CellError) {
        let generation = self.generation;
        for name in outputs {
            if let Some(entry) = self.entries.get_mut(name) {
                entry.value = OutputValue::Failed(error.clone());
                entry.generation = generation;
            }
        }
        if let Some(status) = self.cells.get_mut(cell) {
            status.state = CellState::Failed;
            status.error = Some(error);
            status.generation = generation;
        }
    }
}
