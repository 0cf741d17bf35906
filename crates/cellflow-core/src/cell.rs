//! Cells: named computations over declared inputs and outputs

use crate::error::CellError;
use crate::value::{Table, Value};
use std::fmt;
use std::sync::Arc;

/// Result of a cell computation
pub type CellResult<T> = std::result::Result<T, CellError>;

/// Signature of a cell computation
///
/// The returned values correspond one-to-one to the declared outputs.
pub type CellFn = dyn Fn(&CellInputs<'_>) -> CellResult<Vec<Value>> + Send + Sync;

/// A named unit of computation
#[derive(Clone)]
pub struct Cell {
    id: String,
    /// Input names as written by the cell author
    local_inputs: Vec<String>,
    /// Fully qualified input names used for graph resolution
    inputs: Vec<String>,
    outputs: Vec<String>,
    compute: Arc<CellFn>,
}

impl Cell {
    /// Create a cell from its declared inputs, outputs and computation
    pub fn new<I, O, F>(id: impl Into<String>, inputs: I, outputs: O, compute: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
        F: Fn(&CellInputs<'_>) -> CellResult<Vec<Value>> + Send + Sync + 'static,
    {
        let inputs: Vec<String> = inputs.into_iter().map(Into::into).collect();
        Self {
            id: id.into(),
            local_inputs: inputs.clone(),
            inputs,
            outputs: outputs.into_iter().map(Into::into).collect(),
            compute: Arc::new(compute),
        }
    }

    /// Cell identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared inputs (qualified names)
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Declared outputs (qualified names)
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Run the computation against the given inputs
    pub fn execute(&self, inputs: &CellInputs<'_>) -> CellResult<Vec<Value>> {
        let values = (self.compute)(inputs)?;
        if values.len() != self.outputs.len() {
            return Err(CellError::OutputArity {
                expected: self.outputs.len(),
                actual: values.len(),
            });
        }
        Ok(values)
    }

    /// Bind input values in declaration order
    pub(crate) fn bind<'a>(&'a self, values: Vec<&'a Value>) -> CellInputs<'a> {
        let entries = self
            .local_inputs
            .iter()
            .zip(&self.inputs)
            .zip(values)
            .map(|((local, qualified), value)| InputEntry {
                local,
                qualified,
                value,
            })
            .collect();
        CellInputs {
            cell: &self.id,
            entries,
        }
    }

    /// Qualify the identifier and every name with `qualify`
    pub(crate) fn qualified(mut self, qualify: impl Fn(&str) -> String) -> Self {
        self.id = qualify(&self.id);
        self.inputs = self.inputs.iter().map(|n| qualify(n)).collect();
        self.outputs = self.outputs.iter().map(|n| qualify(n)).collect();
        self
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

struct InputEntry<'a> {
    local: &'a str,
    qualified: &'a str,
    value: &'a Value,
}

/// Read-only view of a cell's declared inputs for one execution
pub struct CellInputs<'a> {
    cell: &'a str,
    entries: Vec<InputEntry<'a>>,
}

impl<'a> CellInputs<'a> {
    /// Identifier of the executing cell
    pub fn cell_id(&self) -> &str {
        self.cell
    }

    /// Get an input by its declared name
    ///
    /// Names not declared by the cell are reported as missing, so a cell can
    /// never observe state it did not declare.
    pub fn get(&self, name: &str) -> CellResult<&'a Value> {
        self.entries
            .iter()
            .find(|e| e.local == name || e.qualified == name)
            .map(|e| e.value)
            .ok_or_else(|| CellError::MissingInput(name.to_string()))
    }

    /// Get a numeric input as `f64`
    pub fn float(&self, name: &str) -> CellResult<f64> {
        let value = self.get(name)?;
        value.as_float().ok_or_else(|| mismatch(name, "float", value))
    }

    /// Get an integer input
    pub fn integer(&self, name: &str) -> CellResult<i64> {
        let value = self.get(name)?;
        value.as_integer().ok_or_else(|| mismatch(name, "integer", value))
    }

    /// Get a table input
    pub fn table(&self, name: &str) -> CellResult<&'a Table> {
        let value = self.get(name)?;
        value.as_table().ok_or_else(|| mismatch(name, "table", value))
    }

    /// Get a text or markdown input
    pub fn text(&self, name: &str) -> CellResult<&'a str> {
        let value = self.get(name)?;
        value.as_text().ok_or_else(|| mismatch(name, "text", value))
    }

    /// Number of bound inputs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cell has no inputs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mismatch(name: &str, expected: &'static str, value: &Value) -> CellError {
    CellError::TypeMismatch {
        input: name.to_string(),
        expected,
        actual: value.type_name(),
    }
}
