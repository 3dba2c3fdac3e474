//! Criteria are immutable boolean expression trees used to filter records.
//!
//! Combining criteria always allocates a new node; inputs are never modified. Two criteria are equal when
//! their canonical renderings (see [`render`]) are equal, regardless of tree shape.

pub mod builder;
mod opaque;
pub mod render;

use std::fmt;
use std::sync::Arc;

use scopeql::{Filterable, ParseError, Value};
use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

pub use opaque::OpaquePredicate;
pub use scopeql::ComparisonOperator as Op;
pub use scopeql::KeyPath as FieldPath;

/// Right-hand side of a comparison: a constant, or another field of the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Value(Value),
    Field(FieldPath),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalKind {
    And,
    Or,
    Not,
}

#[derive(Clone, Serialize, Deserialize)]
pub enum Criterion {
    Comparison {
        field: FieldPath,
        operator: Op,
        value: Literal,
        case_insensitive: bool,
    },
    /// `And`/`Or` combine two or more operands (a field map may produce a single-operand `And`);
    /// `Not` has exactly one.
    Logical {
        kind: LogicalKind,
        operands: Vec<Criterion>,
    },
    /// A leaf owned by an external predicate language. Rendered and evaluated by the collaborator, never reparsed.
    Opaque(#[serde(with = "opaque::serde_format")] Arc<dyn OpaquePredicate>),
}

impl Criterion {
    pub fn comparison(field: FieldPath, operator: Op, value: impl Into<Literal>) -> Self {
        Criterion::Comparison { field, operator, value: value.into(), case_insensitive: false }
    }

    pub fn opaque(predicate: impl OpaquePredicate + 'static) -> Self { Criterion::Opaque(Arc::new(predicate)) }

    pub fn and(self, other: Criterion) -> Criterion { Criterion::Logical { kind: LogicalKind::And, operands: vec![self, other] } }

    pub fn or(self, other: Criterion) -> Criterion { Criterion::Logical { kind: LogicalKind::Or, operands: vec![self, other] } }

    pub fn negate(self) -> Criterion { Criterion::Logical { kind: LogicalKind::Not, operands: vec![self] } }

    /// Combine an existing and an incoming criterion with AND. A missing side passes the other through unchanged.
    pub fn combine(existing: Option<Criterion>, incoming: Option<Criterion>) -> Option<Criterion> {
        match (existing, incoming) {
            (None, incoming) => incoming,
            (existing, None) => existing,
            (Some(existing), Some(incoming)) => Some(existing.and(incoming)),
        }
    }

    /// Whether this node renders as a multi-operand AND/OR and so needs parentheses when nested.
    pub fn is_compound(&self) -> bool {
        match self {
            Criterion::Comparison { .. } => false,
            Criterion::Logical { kind, .. } => *kind != LogicalKind::Not,
            Criterion::Opaque(predicate) => predicate.is_compound(),
        }
    }

    /// Evaluate against a record. Unresolvable field paths make the comparison non-matching.
    pub fn evaluate<R: Filterable>(&self, record: &R) -> bool {
        match self {
            Criterion::Comparison { field, operator, value, case_insensitive } => {
                let Some(left) = record.value(field) else {
                    return false;
                };
                let right = match value {
                    Literal::Value(value) => value.clone(),
                    Literal::Field(path) => match record.value(path) {
                        Some(value) => value,
                        None => return false,
                    },
                };
                scopeql::compare(&left, *operator, &right, *case_insensitive)
            }
            Criterion::Logical { kind: LogicalKind::And, operands } => operands.iter().all(|c| c.evaluate(record)),
            Criterion::Logical { kind: LogicalKind::Or, operands } => operands.iter().any(|c| c.evaluate(record)),
            Criterion::Logical { kind: LogicalKind::Not, operands } => !operands.iter().all(|c| c.evaluate(record)),
            Criterion::Opaque(predicate) => predicate.evaluate(record),
        }
    }

    /// Check that every field path in the tree is well formed, every literal has a canonical form and no opaque
    /// leaf still carries unbound placeholders.
    pub fn validate(&self) -> Result<(), ScopeError> {
        match self {
            Criterion::Comparison { field, value, .. } => {
                if !field.is_valid() {
                    return Err(ScopeError::InvalidFieldPath(field.to_string()));
                }
                match value {
                    Literal::Field(path) if !path.is_valid() => Err(ScopeError::InvalidFieldPath(path.to_string())),
                    Literal::Value(Value::F64(number)) if !number.is_finite() => {
                        Err(ParseError::NonFiniteNumber(number.to_string()).into())
                    }
                    _ => Ok(()),
                }
            }
            Criterion::Logical { operands, .. } => operands.iter().try_for_each(Criterion::validate),
            Criterion::Opaque(predicate) => match predicate.placeholder_count() {
                0 => Ok(()),
                expected => Err(ParseError::PlaceholderCountMismatch { expected, found: 0 }.into()),
            },
        }
    }
}

impl PartialEq for Criterion {
    fn eq(&self, other: &Self) -> bool { self.to_string() == other.to_string() }
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Criterion({self})") }
}

impl From<scopeql::Predicate> for Criterion {
    fn from(predicate: scopeql::Predicate) -> Self { Criterion::opaque(predicate) }
}

macro_rules! literal_from_value {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Literal {
            fn from(val: $ty) -> Self { Literal::Value(val.into()) }
        })*
    };
}

literal_from_value!(Value, bool, i32, i64, u32, f64, &str, String);

impl From<FieldPath> for Literal {
    fn from(val: FieldPath) -> Self { Literal::Field(val) }
}
