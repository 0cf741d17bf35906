//! Dynamic values flowing between widgets and cells

use serde::{Deserialize, Serialize};

/// Column-oriented table of `f64` columns sharing one length
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<(String, Vec<f64>)>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, replacing an existing one with the same name
    ///
    /// Returns an error message when the length differs from the existing rows.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> std::result::Result<Self, String> {
        let name = name.into();
        if let Some(rows) = self.first_len() {
            let replacing_only = self.columns.len() == 1 && self.columns[0].0 == name;
            if values.len() != rows && !replacing_only {
                return Err(format!(
                    "column '{name}' has {} rows, table has {rows}",
                    values.len()
                ));
            }
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        Ok(self)
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.first_len().unwrap_or(0)
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn first_len(&self) -> Option<usize> {
        self.columns.first().map(|(_, v)| v.len())
    }
}

/// Dynamic value type for widget state and cell outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Plain text
    Text(String),
    /// Markdown source for display
    Markdown(String),
    /// Tabular data
    Table(Table),
    /// Opaque display artifact produced by a rendering collaborator
    Artifact { kind: String, payload: String },
    /// Ordered composition of display values
    Layout(Vec<Value>),
}

impl Value {
    /// Name of the variant, used in type mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Markdown(_) => "markdown",
            Value::Table(_) => "table",
            Value::Artifact { .. } => "artifact",
            Value::Layout(_) => "layout",
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as text (plain or markdown)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Markdown(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as table
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Try to get as artifact `(kind, payload)`
    pub fn as_artifact(&self) -> Option<(&str, &str)> {
        match self {
            Value::Artifact { kind, payload } => Some((kind, payload)),
            _ => None,
        }
    }

    /// Try to get as layout children
    pub fn as_layout(&self) -> Option<&[Value]> {
        match self {
            Value::Layout(items) => Some(items),
            _ => None,
        }
    }

    /// Bitwise equality, treating NaN payloads with identical bits as equal
    pub fn bit_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Table(a), Value::Table(b)) => {
                a.columns.len() == b.columns.len()
                    && a.columns.iter().zip(&b.columns).all(|((na, va), (nb, vb))| {
                        na == nb
                            && va.len() == vb.len()
                            && va.iter().zip(vb).all(|(x, y)| x.to_bits() == y.to_bits())
                    })
            }
            (Value::Layout(a), Value::Layout(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.bit_eq(y))
            }
            _ => self == other,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Table> for Value {
    fn from(v: Table) -> Self {
        Value::Table(v)
    }
}
