//! Canonical string form of criteria.
//!
//! Comparisons render as `<field> <op>[c] <value>` with booleans as `1`/`0`, strings double-quoted and nil as
//! `nil`. An operand of AND/OR/NOT is parenthesized exactly when it is itself compound, so nested combinations
//! keep their grouping: `(a OR b) AND c`, `(a AND b) AND (c)`.

use std::fmt::{self, Display, Formatter};

use super::{Criterion, Literal, LogicalKind};

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Value(value) => value.fmt(f),
            Literal::Field(path) => path.fmt(f),
        }
    }
}

impl Display for LogicalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalKind::And => "AND",
            LogicalKind::Or => "OR",
            LogicalKind::Not => "NOT",
        })
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Comparison { field, operator, value, case_insensitive } => {
                scopeql::format::write_comparison(f, field, *operator, value, *case_insensitive)
            }
            Criterion::Logical { kind: LogicalKind::Not, operands } => match operands.as_slice() {
                [operand] => {
                    f.write_str("NOT ")?;
                    write_operand(f, operand)
                }
                operands => {
                    f.write_str("NOT (")?;
                    write_joined(f, LogicalKind::And, operands)?;
                    f.write_str(")")
                }
            },
            Criterion::Logical { kind, operands } => write_joined(f, *kind, operands),
            Criterion::Opaque(predicate) => f.write_str(&predicate.format()),
        }
    }
}

fn write_joined(f: &mut Formatter<'_>, kind: LogicalKind, operands: &[Criterion]) -> fmt::Result {
    if operands.is_empty() {
        return f.write_str(if kind == LogicalKind::Or { "FALSEPREDICATE" } else { "TRUEPREDICATE" });
    }
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {kind} ")?;
        }
        write_operand(f, operand)?;
    }
    Ok(())
}

fn write_operand(f: &mut Formatter<'_>, operand: &Criterion) -> fmt::Result {
    if operand.is_compound() {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}
