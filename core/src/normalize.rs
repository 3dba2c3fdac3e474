//! Conversion of the accepted filter inputs into a single [`Criterion`].
//!
//! `Scope::filter` takes anything that converts into a [`CriterionInput`]; normalization is the only place the
//! input kinds are told apart.

use indexmap::{IndexMap, IndexSet};
use scopeql::value::json_to_value;
use scopeql::{Predicate, Value};
use tracing::debug;

use crate::context::Record;
use crate::criterion::{Criterion, FieldPath, LogicalKind, Op};
use crate::error::ScopeError;
use crate::scope::Scope;

#[derive(Debug, Clone)]
pub enum CriterionInput {
    /// Field to value equalities, ANDed in insertion order. Keys must be unique.
    Fields(Vec<(String, Value)>),
    Criterion(Criterion),
    /// The compiled criterion of another scope, if it has one
    Scope(Option<Criterion>),
    /// A native predicate, adopted as an opaque leaf
    Predicate(Predicate),
    /// A format string with positional placeholders and the values to bind to them
    Format { format: String, arguments: Vec<Value> },
}

impl CriterionInput {
    /// Name of the input kind, for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            CriterionInput::Fields(_) => "field map",
            CriterionInput::Criterion(_) => "criterion",
            CriterionInput::Scope(_) => "scope",
            CriterionInput::Predicate(_) => "predicate",
            CriterionInput::Format { .. } => "format string",
        }
    }

    /// Produce the criterion this input stands for. `None` means the input does not filter anything.
    pub fn normalize(self) -> Result<Option<Criterion>, ScopeError> {
        debug!(shape = self.shape(), "normalizing criterion input");
        match self {
            CriterionInput::Fields(fields) => {
                if fields.is_empty() {
                    return Ok(None);
                }
                let mut seen = IndexSet::with_capacity(fields.len());
                let mut operands = Vec::with_capacity(fields.len());
                for (key, value) in fields {
                    let field = FieldPath::parse(&key).map_err(|_| ScopeError::InvalidFieldPath(key.clone()))?;
                    if !seen.insert(field.to_string()) {
                        return Err(unsupported(format!("field map with duplicate key {key:?}")));
                    }
                    operands.push(Criterion::comparison(field, Op::Equal, value));
                }
                // A map always yields an AND group, even with a single entry
                let criterion = Criterion::Logical { kind: LogicalKind::And, operands };
                criterion.validate()?;
                Ok(Some(criterion))
            }
            CriterionInput::Criterion(criterion) => {
                criterion.validate()?;
                Ok(Some(criterion))
            }
            CriterionInput::Scope(criterion) => Ok(criterion),
            CriterionInput::Predicate(predicate) => {
                let criterion = Criterion::from(predicate);
                criterion.validate()?;
                Ok(Some(criterion))
            }
            CriterionInput::Format { format, arguments } => {
                let predicate = scopeql::parse_with_arguments(&format, &arguments)?;
                Ok(Some(Criterion::from(predicate)))
            }
        }
    }

    /// Interpret a dynamic JSON value.
    ///
    /// An object is a field map, a string is a format string without arguments, and an array whose first element is
    /// a string is a format string followed by its positional arguments.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, ScopeError> {
        match json {
            serde_json::Value::Object(object) => {
                let mut fields = Vec::with_capacity(object.len());
                for (key, value) in object {
                    let value = json_to_value(value).ok_or_else(|| unsupported(format!("field {key:?} holding {}", json_kind(value))))?;
                    fields.push((key.clone(), value));
                }
                Ok(CriterionInput::Fields(fields))
            }
            serde_json::Value::String(format) => Ok(CriterionInput::Format { format: format.clone(), arguments: Vec::new() }),
            serde_json::Value::Array(items) => match items.split_first() {
                Some((serde_json::Value::String(format), rest)) => {
                    let arguments = rest
                        .iter()
                        .map(|item| json_to_value(item).ok_or_else(|| unsupported(format!("format argument holding {}", json_kind(item)))))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(CriterionInput::Format { format: format.clone(), arguments })
                }
                Some((first, _)) => Err(unsupported(format!("array starting with {}", json_kind(first)))),
                None => Err(unsupported("empty array")),
            },
            other => Err(unsupported(json_kind(other))),
        }
    }
}

fn unsupported(shape: impl Into<String>) -> ScopeError { ScopeError::UnsupportedCriterionInput { shape: shape.into() } }

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl From<Criterion> for CriterionInput {
    fn from(criterion: Criterion) -> Self { CriterionInput::Criterion(criterion) }
}

impl<R: Record> From<&Scope<R>> for CriterionInput {
    fn from(scope: &Scope<R>) -> Self { CriterionInput::Scope(scope.criterion().cloned()) }
}

impl From<Predicate> for CriterionInput {
    fn from(predicate: Predicate) -> Self { CriterionInput::Predicate(predicate) }
}

impl From<&str> for CriterionInput {
    fn from(format: &str) -> Self { CriterionInput::Format { format: format.to_string(), arguments: Vec::new() } }
}

impl From<String> for CriterionInput {
    fn from(format: String) -> Self { CriterionInput::Format { format, arguments: Vec::new() } }
}

impl<S: Into<String>> From<(S, Vec<Value>)> for CriterionInput {
    fn from((format, arguments): (S, Vec<Value>)) -> Self { CriterionInput::Format { format: format.into(), arguments } }
}

impl From<IndexMap<String, Value>> for CriterionInput {
    fn from(fields: IndexMap<String, Value>) -> Self { CriterionInput::Fields(fields.into_iter().collect()) }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for CriterionInput {
    fn from(entries: [(K, V); N]) -> Self { CriterionInput::Fields(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()) }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for CriterionInput {
    fn from(entries: Vec<(K, V)>) -> Self { CriterionInput::Fields(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()) }
}
