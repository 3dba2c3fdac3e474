mod collation;

use serde::{Deserialize, Serialize};

/// A scalar that can appear as a literal in a predicate or be resolved from a record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
}

impl Value {
    pub fn is_nil(&self) -> bool { matches!(self, Value::Nil) }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used for cross-type comparisons. Booleans count as 1/0.
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::I64(i) => Some(*i as f64),
            Value::F64(f) => Some(*f),
            Value::Nil | Value::String(_) => None,
        }
    }

    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(*b as i64),
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::I64(_) => "integer",
            Value::F64(_) => "float",
            Value::String(_) => "string",
        }
    }
}

/// Convert a scalar JSON value. Arrays and objects have no scalar form and yield `None`.
pub fn json_to_value(json: &serde_json::Value) -> Option<Value> {
    match json {
        serde_json::Value::Null => Some(Value::Nil),
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::I64(i))
            } else {
                n.as_f64().map(Value::F64)
            }
        }
        serde_json::Value::String(s) => Some(Value::String(s.clone())),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self { Value::Bool(val) }
}
impl From<i64> for Value {
    fn from(val: i64) -> Self { Value::I64(val) }
}
impl From<i32> for Value {
    fn from(val: i32) -> Self { Value::I64(val as i64) }
}
impl From<u32> for Value {
    fn from(val: u32) -> Self { Value::I64(val as i64) }
}
impl From<f64> for Value {
    fn from(val: f64) -> Self { Value::F64(val) }
}
impl From<&str> for Value {
    fn from(val: &str) -> Self { Value::String(val.to_string()) }
}
impl From<String> for Value {
    fn from(val: String) -> Self { Value::String(val) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(val: Option<T>) -> Self { val.map(Into::into).unwrap_or(Value::Nil) }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = &'static str;

    fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
        json_to_value(json).ok_or(if json.is_array() { "array" } else { "object" })
    }
}
