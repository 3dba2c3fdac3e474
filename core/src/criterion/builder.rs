//! Fluent construction of criteria from field references.
//!
//! ```
//! use scope_core::field;
//!
//! let criterion = field("name").case_insensitive().neq("bob").or(field("amount").gt(42));
//! assert_eq!(criterion.to_string(), r#"name !=[c] "bob" OR amount > 42"#);
//! ```

use super::{Criterion, FieldPath, Literal, Op};

/// Reference a (possibly dotted) field. Malformed paths are reported when the criterion enters a scope.
pub fn field(path: &str) -> FieldRef { FieldRef::new(path) }

/// A field reference token. Builder methods never modify the token they are called on.
#[derive(Debug, Clone)]
pub struct FieldRef {
    path: FieldPath,
    case_insensitive: bool,
}

#[allow(clippy::should_implement_trait)]
impl FieldRef {
    pub fn new(path: &str) -> Self { FieldRef { path: FieldPath::new_unchecked(path), case_insensitive: false } }

    pub fn path(&self) -> &FieldPath { &self.path }

    /// A new token whose comparisons ignore case. `self` is unaffected.
    pub fn case_insensitive(&self) -> FieldRef { FieldRef { path: self.path.clone(), case_insensitive: true } }

    fn compare(&self, operator: Op, value: impl Into<Literal>) -> Criterion {
        Criterion::Comparison {
            field: self.path.clone(),
            operator,
            value: value.into(),
            case_insensitive: self.case_insensitive,
        }
    }

    pub fn eq(&self, value: impl Into<Literal>) -> Criterion { self.compare(Op::Equal, value) }

    pub fn neq(&self, value: impl Into<Literal>) -> Criterion { self.compare(Op::NotEqual, value) }

    pub fn lt(&self, value: impl Into<Literal>) -> Criterion { self.compare(Op::LessThan, value) }

    pub fn lte(&self, value: impl Into<Literal>) -> Criterion { self.compare(Op::LessThanOrEqual, value) }

    pub fn gt(&self, value: impl Into<Literal>) -> Criterion { self.compare(Op::GreaterThan, value) }

    pub fn gte(&self, value: impl Into<Literal>) -> Criterion { self.compare(Op::GreaterThanOrEqual, value) }

    pub fn begins_with(&self, value: impl Into<Literal>) -> Criterion { self.compare(Op::BeginsWith, value) }

    pub fn contains_substring(&self, value: impl Into<Literal>) -> Criterion { self.compare(Op::Contains, value) }

    pub fn ends_with(&self, value: impl Into<Literal>) -> Criterion { self.compare(Op::EndsWith, value) }
}

impl From<FieldRef> for Literal {
    fn from(val: FieldRef) -> Self { Literal::Field(val.path) }
}

impl From<&FieldRef> for Literal {
    fn from(val: &FieldRef) -> Self { Literal::Field(val.path.clone()) }
}
