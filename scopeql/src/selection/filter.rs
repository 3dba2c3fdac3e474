//! Evaluate predicates against in-memory records. Key paths walk nested objects; a path that does not
//! resolve to a scalar makes the comparison non-matching rather than failing the evaluation.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::ast::{ComparisonOperator, CompoundKind, Expr, KeyPath, Predicate};
use crate::error::FilterError;
use crate::value::{json_to_value, Value};

/// Records that can be filtered by predicate evaluation
pub trait Filterable {
    /// Resolve a key path to a scalar value, or `None` if the path does not resolve.
    fn value(&self, path: &KeyPath) -> Option<Value>;
}

impl Filterable for serde_json::Value {
    fn value(&self, path: &KeyPath) -> Option<Value> {
        let mut current = self;
        for step in &path.steps {
            current = current.as_object()?.get(step)?;
        }
        json_to_value(current)
    }
}

impl Filterable for serde_json::Map<String, serde_json::Value> {
    fn value(&self, path: &KeyPath) -> Option<Value> {
        let (first, rest) = path.steps.split_first()?;
        let mut current = self.get(first)?;
        for step in rest {
            current = current.as_object()?.get(step)?;
        }
        json_to_value(current)
    }
}

impl Filterable for BTreeMap<String, Value> {
    fn value(&self, path: &KeyPath) -> Option<Value> { if path.is_simple() { self.get(path.first()).cloned() } else { None } }
}

impl Filterable for HashMap<String, Value> {
    fn value(&self, path: &KeyPath) -> Option<Value> { if path.is_simple() { self.get(path.first()).cloned() } else { None } }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn value(&self, path: &KeyPath) -> Option<Value> { (**self).value(path) }
}

impl<T: Filterable + ?Sized> Filterable for Box<T> {
    fn value(&self, path: &KeyPath) -> Option<Value> { (**self).value(path) }
}

impl<T: Filterable + ?Sized> Filterable for Arc<T> {
    fn value(&self, path: &KeyPath) -> Option<Value> { (**self).value(path) }
}

/// Apply a comparison operator to two resolved values.
///
/// String operators only match string operands. With `case_insensitive`, string operands are lower-cased first.
pub fn compare(left: &Value, operator: ComparisonOperator, right: &Value, case_insensitive: bool) -> bool {
    if case_insensitive {
        if let (Value::String(l), Value::String(r)) = (left, right) {
            return compare(&Value::String(l.to_lowercase()), operator, &Value::String(r.to_lowercase()), false);
        }
    }

    match operator {
        ComparisonOperator::BeginsWith | ComparisonOperator::Contains | ComparisonOperator::EndsWith => {
            let (Value::String(l), Value::String(r)) = (left, right) else {
                return false;
            };
            match operator {
                ComparisonOperator::BeginsWith => l.starts_with(r.as_str()),
                ComparisonOperator::EndsWith => l.ends_with(r.as_str()),
                _ => l.contains(r.as_str()),
            }
        }
        ComparisonOperator::Equal => left.compare(right) == Some(Ordering::Equal),
        ComparisonOperator::NotEqual => left.compare(right) != Some(Ordering::Equal),
        ComparisonOperator::LessThan => left.compare(right) == Some(Ordering::Less),
        ComparisonOperator::LessThanOrEqual => matches!(left.compare(right), Some(Ordering::Less | Ordering::Equal)),
        ComparisonOperator::GreaterThan => left.compare(right) == Some(Ordering::Greater),
        ComparisonOperator::GreaterThanOrEqual => matches!(left.compare(right), Some(Ordering::Greater | Ordering::Equal)),
    }
}

fn evaluate_expr<'a, R: Filterable + ?Sized>(record: &R, expr: &'a Expr) -> Result<Option<Cow<'a, Value>>, FilterError> {
    match expr {
        Expr::Literal(value) => Ok(Some(Cow::Borrowed(value))),
        Expr::Path(path) => Ok(record.value(path).map(Cow::Owned)),
        Expr::Placeholder(placeholder) => Err(FilterError::UnboundPlaceholder(*placeholder)),
    }
}

pub fn evaluate_predicate<R: Filterable + ?Sized>(record: &R, predicate: &Predicate) -> Result<bool, FilterError> {
    match predicate {
        Predicate::Comparison { left, operator, right, case_insensitive } => {
            let left = evaluate_expr(record, left)?;
            let right = evaluate_expr(record, right)?;
            Ok(match (left, right) {
                (Some(left), Some(right)) => compare(&left, *operator, &right, *case_insensitive),
                _ => false,
            })
        }
        Predicate::Compound { kind: CompoundKind::And, operands } => {
            for operand in operands {
                if !evaluate_predicate(record, operand)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Predicate::Compound { kind: CompoundKind::Or, operands } => {
            for operand in operands {
                if evaluate_predicate(record, operand)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Predicate::Not(inner) => Ok(!evaluate_predicate(record, inner)?),
        Predicate::True => Ok(true),
        Predicate::False => Ok(false),
    }
}
