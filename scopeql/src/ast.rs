use crate::error::ParseError;
use crate::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Comparison {
        left: Expr,
        operator: ComparisonOperator,
        right: Expr,
        /// Set by the `[c]` modifier.
        case_insensitive: bool,
    },
    Compound {
        kind: CompoundKind,
        operands: Vec<Predicate>,
    },
    Not(Box<Predicate>),
    True,
    False,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundKind {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Value),
    Path(KeyPath),
    Placeholder(Placeholder),
}

/// Positional argument slots, bound left to right by [`crate::parse_with_arguments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placeholder {
    /// `%@`, replaced by a literal value
    Value,
    /// `%K`, replaced by a key path named by a string argument
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Equal,              // ==
    NotEqual,           // != or <>
    LessThan,           // <
    LessThanOrEqual,    // <=
    GreaterThan,        // >
    GreaterThanOrEqual, // >=
    BeginsWith,         // BEGINSWITH
    Contains,           // CONTAINS
    EndsWith,           // ENDSWITH
}

impl ComparisonOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::BeginsWith => "BEGINSWITH",
            ComparisonOperator::Contains => "CONTAINS",
            ComparisonOperator::EndsWith => "ENDSWITH",
        }
    }

    pub fn is_string_operator(self) -> bool {
        matches!(self, ComparisonOperator::BeginsWith | ComparisonOperator::Contains | ComparisonOperator::EndsWith)
    }
}

/// A dot separated sequence of identifiers, e.g. `job.title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyPath {
    pub steps: Vec<String>,
}

impl KeyPath {
    /// Parse and validate a dotted key path. Every step must be an identifier.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::InvalidKeyPath(input.to_string()));
        }
        let steps: Vec<String> = input.split('.').map(str::to_string).collect();
        if !steps.iter().all(|step| is_identifier(step)) {
            return Err(ParseError::InvalidKeyPath(input.to_string()));
        }
        Ok(Self { steps })
    }

    /// Build a key path without validating it. Paths that are not valid identifiers never resolve.
    pub fn new_unchecked(input: &str) -> Self { Self { steps: input.split('.').map(str::to_string).collect() } }

    pub fn is_simple(&self) -> bool { self.steps.len() == 1 }

    pub fn first(&self) -> &str { self.steps.first().map(String::as_str).unwrap_or("") }

    pub fn is_valid(&self) -> bool { !self.steps.is_empty() && self.steps.iter().all(|step| is_identifier(step)) }
}

/// Words the grammar reads as literals or connectives. A step spelled like one would not reparse as a path.
const RESERVED_WORDS: [&str; 11] = ["yes", "no", "true", "false", "nil", "null", "and", "or", "not", "truepredicate", "falsepredicate"];

fn is_identifier(step: &str) -> bool {
    let mut chars = step.chars();
    let well_formed = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    };
    well_formed && !RESERVED_WORDS.iter().any(|word| step.eq_ignore_ascii_case(word))
}

impl Predicate {
    /// Compound nodes need parentheses when nested inside another compound.
    pub fn is_compound(&self) -> bool { matches!(self, Predicate::Compound { .. }) }

    pub fn placeholder_count(&self) -> usize {
        match self {
            Predicate::Comparison { left, right, .. } => {
                [left, right].iter().filter(|expr| matches!(expr, Expr::Placeholder(_))).count()
            }
            Predicate::Compound { operands, .. } => operands.iter().map(Predicate::placeholder_count).sum(),
            Predicate::Not(inner) => inner.placeholder_count(),
            Predicate::True | Predicate::False => 0,
        }
    }
}
