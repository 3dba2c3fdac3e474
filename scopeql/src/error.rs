use crate::grammar;
use thiserror::Error;

/// Custom error type for parsing errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Syntax error: {0}")]
    SyntaxError(String),
    #[error("Empty expression")]
    EmptyExpression,
    #[error("Expected {expected}, got {got:?}")]
    UnexpectedRule { expected: &'static str, got: grammar::Rule },
    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),
    #[error("Invalid key path: {0:?}")]
    InvalidKeyPath(String),
    #[error("Placeholder count mismatch: expected {expected}, found {found}")]
    PlaceholderCountMismatch { expected: usize, found: usize },
    #[error("%K argument must be a string naming a key path, got {0}")]
    InvalidKeyPathArgument(String),
    #[error("Non-finite number {0} has no literal form")]
    NonFiniteNumber(String),
}

impl From<pest::error::Error<grammar::Rule>> for ParseError {
    fn from(error: pest::error::Error<grammar::Rule>) -> Self { ParseError::SyntaxError(error.to_string()) }
}

/// Errors raised while evaluating a predicate against a record
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("unbound placeholder: {0:?} must be substituted before filtering")]
    UnboundPlaceholder(crate::ast::Placeholder),
}
