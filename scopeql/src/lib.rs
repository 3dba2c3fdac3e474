//! scopeql - a small key-path predicate language.
//!
//! Predicates are written in a format-string syntax with positional placeholders:
//!
//! ```
//! use scopeql::{parse_with_arguments, evaluate_predicate, Value};
//!
//! let predicate = parse_with_arguments("name != %@ OR amount > %@", &[Value::from("bob"), Value::from(42)]).unwrap();
//! assert_eq!(predicate.to_string(), r#"name != "bob" OR amount > 42"#);
//!
//! let record = serde_json::json!({"name": "bob", "amount": 50});
//! assert!(evaluate_predicate(&record, &predicate).unwrap());
//! ```

pub mod ast;
pub mod error;
pub mod format;
pub mod grammar;
pub mod parser;
pub mod selection;
pub mod value;

pub use ast::{ComparisonOperator, CompoundKind, Expr, KeyPath, Placeholder, Predicate};
pub use error::{FilterError, ParseError};
pub use parser::{parse_selection, parse_with_arguments};
pub use selection::filter::{compare, evaluate_predicate, Filterable};
pub use value::Value;

impl TryFrom<&str> for Predicate {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> { parser::parse_selection(value) }
}

impl TryFrom<String> for Predicate {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> { parser::parse_selection(&value) }
}

impl std::str::FromStr for KeyPath {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { KeyPath::parse(s) }
}
