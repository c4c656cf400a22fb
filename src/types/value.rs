//! Scalar value and data type definitions for NQL columns and cells.

use std::fmt;

/// The static type declared for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    Float,
    /// `max_length` applies only to `String`.
    String(usize),
    Bool,
}

impl DataType {
    /// The name used in `col_def`/`DESCRIBE` rendering.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::String(_) => "STRING",
            DataType::Bool => "BOOL",
        }
    }

    /// Whether a value of `other` may be stored/compared against a column
    /// of this type, per the type-compatibility table.
    pub fn accepts(&self, other: &Value) -> bool {
        match (self, other) {
            (DataType::Int, Value::Int(_)) => true,
            (DataType::Int, Value::Bool(_)) => true,
            (DataType::Float, Value::Float(_)) => true,
            (DataType::Float, Value::Int(_)) => true,
            (DataType::String(_), _) if !other.is_null() => true,
            (DataType::Bool, Value::Bool(_)) => true,
            (_, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::String(len) => write!(f, "STRING({len})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// A runtime scalar value stored in a cell or produced by an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The runtime type name, for TypeMismatch error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "INT",
            Value::Float(_) => "FLOAT",
            Value::Str(_) => "STRING",
            Value::Bool(_) => "BOOL",
            Value::Null => "NULL",
        }
    }

    /// Coerce this value into the representation a `column_type` cell
    /// should hold, per the compatibility table (INT accepts BOOL as 0/1,
    /// FLOAT accepts INT, STRING accepts anything by stringifying it).
    /// Caller must already have checked `column_type.accepts(self)`.
    pub fn coerce(self, column_type: DataType) -> Value {
        match (column_type, self) {
            (DataType::Int, Value::Bool(b)) => Value::Int(if b { 1 } else { 0 }),
            (DataType::Float, Value::Int(i)) => Value::Float(i as f64),
            (DataType::String(_), v) if !v.is_null() => Value::Str(format(&v)),
            (_, v) => v,
        }
    }

    /// Truthiness used when a value appears where a boolean is expected.
    /// Mirrors the boolean literal table: `true/1/yes/y` are true,
    /// case-insensitively for strings; everything else is false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => {
                let lower = s.to_ascii_lowercase();
                matches!(lower.as_str(), "true" | "1" | "yes" | "y")
            }
            Value::Null => false,
        }
    }
}

/// Parse a literal's text into a `Value` for the target column type.
pub fn parse_literal(text: &str, ty: DataType) -> Value {
    match ty {
        DataType::Int => text.parse::<i64>().map(Value::Int).unwrap_or(Value::Null),
        DataType::Float => text.parse::<f64>().map(Value::Float).unwrap_or(Value::Null),
        DataType::String(_) => Value::Str(text.to_string()),
        DataType::Bool => {
            let lower = text.to_ascii_lowercase();
            Value::Bool(matches!(lower.as_str(), "true" | "1" | "yes" | "y"))
        }
    }
}

/// Render a value for tabular output: floats get two fractional digits,
/// integers render as plain decimal, strings render unquoted, and `Null`
/// renders as an empty string.
pub fn format(value: &Value) -> String {
    match value {
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format!("{f:.2}"),
        Value::Str(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
    }
}
