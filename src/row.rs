//! Row abstraction.
//!
//! The engine never looks inside a row except through [`TableRow`]: an
//! identity used for selection, and a value per column key used for sorting,
//! searching, rendering and export.

use serde_json::Value;
use std::fmt;

/// A single cell value as seen by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing or null value. Sorts after everything else.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
}

impl CellValue {
    /// Returns true for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the value as a finite number, parsing text if needed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(v: Option<V>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl From<&Value> for CellValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Null),
            Value::String(s) => CellValue::Text(s.clone()),
            nested => CellValue::Text(nested.to_string()),
        }
    }
}

/// A record that can be displayed by the table.
///
/// ```rust
/// use bubbletea_datatable::{CellValue, TableRow};
///
/// #[derive(Clone)]
/// struct Service {
///     id: u32,
///     name: String,
/// }
///
/// impl TableRow for Service {
///     fn id(&self) -> String {
///         self.id.to_string()
///     }
///
///     fn value(&self, key: &str) -> CellValue {
///         match key {
///             "name" => self.name.as_str().into(),
///             _ => CellValue::Null,
///         }
///     }
///
///     fn field_values(&self) -> Vec<CellValue> {
///         vec![(self.id as i64).into(), self.name.as_str().into()]
///     }
/// }
/// ```
pub trait TableRow: Clone {
    /// Identity used for selection. Must be unique within a dataset.
    fn id(&self) -> String;

    /// Value of the field addressed by a column key.
    fn value(&self, key: &str) -> CellValue;

    /// Every field of the row, used by client-side search.
    fn field_values(&self) -> Vec<CellValue>;
}

/// JSON objects as returned by REST endpoints. The identity is the `"id"`
/// field; string and numeric ids are both accepted.
impl TableRow for Value {
    fn id(&self) -> String {
        match self.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    fn value(&self, key: &str) -> CellValue {
        self.get(key).map(CellValue::from).unwrap_or(CellValue::Null)
    }

    fn field_values(&self) -> Vec<CellValue> {
        match self {
            Value::Object(map) => map.values().map(CellValue::from).collect(),
            other => vec![CellValue::from(other)],
        }
    }
}
