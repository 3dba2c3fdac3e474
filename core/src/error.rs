//! Public error types for scopes.
//!
//! Every fallible operation fails synchronously and atomically: no existing scope is modified on error.

use thiserror::Error;

use crate::target::TypeDescriptor;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScopeError {
    /// A format string failed to parse, or its placeholders did not match the supplied arguments
    #[error("predicate syntax error: {0}")]
    PredicateSyntax(#[from] scopeql::ParseError),

    /// The criterion input has a shape that cannot be turned into a criterion
    #[error("unsupported criterion input: {shape}")]
    UnsupportedCriterionInput { shape: String },

    #[error("invalid sort field: {0:?}")]
    InvalidSortField(String),

    #[error("invalid field path: {0:?}")]
    InvalidFieldPath(String),

    #[error("no current execution context registered for {record_type}")]
    NoCurrentContext { record_type: &'static str },

    #[error("unknown target: {0}")]
    UnknownTarget(TypeDescriptor),
}
