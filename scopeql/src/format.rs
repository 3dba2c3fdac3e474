//! Canonical string form of predicates. Parsing the output of `Display` yields a predicate that formats identically.

use std::fmt::{self, Display, Formatter};

use crate::ast::{ComparisonOperator, CompoundKind, Expr, KeyPath, Placeholder, Predicate};
use crate::value::Value;

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", if *b { 1 } else { 0 }),
            Value::I64(i) => write!(f, "{i}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::String(s) => write_quoted(f, s),
        }
    }
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(&self.steps.join(".")) }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(self.symbol()) }
}

impl Display for CompoundKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompoundKind::And => "AND",
            CompoundKind::Or => "OR",
        })
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => value.fmt(f),
            Expr::Path(path) => path.fmt(f),
            Expr::Placeholder(Placeholder::Value) => f.write_str("%@"),
            Expr::Placeholder(Placeholder::Key) => f.write_str("%K"),
        }
    }
}

/// Write `<lhs> <op>[c] <rhs>`. Shared with scope criteria so both render comparisons identically.
pub fn write_comparison(
    f: &mut Formatter<'_>,
    left: &dyn Display,
    operator: ComparisonOperator,
    right: &dyn Display,
    case_insensitive: bool,
) -> fmt::Result {
    write!(f, "{left} {operator}")?;
    if case_insensitive {
        f.write_str("[c]")?;
    }
    write!(f, " {right}")
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison { left, operator, right, case_insensitive } => {
                write_comparison(f, left, *operator, right, *case_insensitive)
            }
            Predicate::Compound { kind, operands } => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {kind} ")?;
                    }
                    write_operand(f, operand)?;
                }
                Ok(())
            }
            Predicate::Not(inner) => {
                f.write_str("NOT ")?;
                write_operand(f, inner)
            }
            Predicate::True => f.write_str("TRUEPREDICATE"),
            Predicate::False => f.write_str("FALSEPREDICATE"),
        }
    }
}

fn write_operand(f: &mut Formatter<'_>, operand: &Predicate) -> fmt::Result {
    if operand.is_compound() {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}
