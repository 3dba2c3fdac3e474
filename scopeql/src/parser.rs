use crate::ast::{self, ComparisonOperator, CompoundKind, Expr, KeyPath, Placeholder, Predicate};
use crate::error::ParseError;
use crate::grammar::{self, Rule};
use crate::value::Value;
use pest::iterators::Pair;
use pest::Parser;
use tracing::debug;

/// Print a parse tree node and its children recursively
#[cfg(test)]
fn print_tree(pair: Pair<Rule>, indent: usize) {
    if matches!(pair.as_rule(), Rule::EOI) {
        return;
    }
    println!("{:indent$}{:?}: '{}'", "", pair.as_rule(), pair.as_str().trim(), indent = indent);
    for inner in pair.into_inner() {
        print_tree(inner, indent + 2);
    }
}

/// Parse a predicate format string into a predicate AST.
///
/// Placeholders (`%@`, `%K`) are kept in the tree; use [`parse_with_arguments`] to bind them.
pub fn parse_selection(input: &str) -> Result<ast::Predicate, ParseError> {
    let pairs = grammar::ScopeqlParser::parse(Rule::Selection, input)?;

    #[cfg(test)]
    for pair in pairs.clone() {
        print_tree(pair, 0);
    }

    // Selection is silent, so the first pair is the top-level OrExpr
    let expr = pairs.into_iter().next().ok_or(ParseError::EmptyExpression)?;
    if expr.as_rule() != Rule::OrExpr {
        return Err(ParseError::UnexpectedRule { expected: "OrExpr", got: expr.as_rule() });
    }

    parse_or_expr(expr)
}

/// Parse a format string and substitute its placeholders, left to right, from `args`.
pub fn parse_with_arguments(format: &str, args: &[Value]) -> Result<ast::Predicate, ParseError> {
    let predicate = parse_selection(format)?;
    let expected = predicate.placeholder_count();
    if expected != args.len() {
        return Err(ParseError::PlaceholderCountMismatch { expected, found: args.len() });
    }

    let mut args = args.iter();
    let bound = bind_predicate(predicate, &mut args)?;
    debug!(format, predicate = %bound, "bound predicate arguments");
    Ok(bound)
}

fn bind_predicate<'a>(predicate: Predicate, args: &mut impl Iterator<Item = &'a Value>) -> Result<Predicate, ParseError> {
    Ok(match predicate {
        Predicate::Comparison { left, operator, right, case_insensitive } => {
            // Left operand first so arguments are consumed in order of appearance
            let left = bind_expr(left, args)?;
            let right = bind_expr(right, args)?;
            Predicate::Comparison { left, operator, right, case_insensitive }
        }
        Predicate::Compound { kind, operands } => Predicate::Compound {
            kind,
            operands: operands.into_iter().map(|operand| bind_predicate(operand, args)).collect::<Result<_, _>>()?,
        },
        Predicate::Not(inner) => Predicate::Not(Box::new(bind_predicate(*inner, args)?)),
        other @ (Predicate::True | Predicate::False) => other,
    })
}

fn bind_expr<'a>(expr: Expr, args: &mut impl Iterator<Item = &'a Value>) -> Result<Expr, ParseError> {
    let Expr::Placeholder(placeholder) = expr else {
        return Ok(expr);
    };
    // Counts were checked up front, but guard anyway
    let arg = args.next().ok_or(ParseError::PlaceholderCountMismatch { expected: 1, found: 0 })?;
    match placeholder {
        Placeholder::Value => match arg {
            Value::F64(number) if !number.is_finite() => Err(ParseError::NonFiniteNumber(number.to_string())),
            _ => Ok(Expr::Literal(arg.clone())),
        },
        Placeholder::Key => match arg {
            Value::String(path) => Ok(Expr::Path(KeyPath::parse(path)?)),
            other => Err(ParseError::InvalidKeyPathArgument(other.kind().to_string())),
        },
    }
}

/// Parse a chain of OR-ed terms. A chain of one term yields the term itself.
fn parse_or_expr(pair: Pair<Rule>) -> Result<Predicate, ParseError> {
    let operands = pair
        .into_inner()
        .filter(|inner| inner.as_rule() != Rule::Or)
        .map(parse_and_expr)
        .collect::<Result<Vec<_>, _>>()?;
    compound(CompoundKind::Or, operands)
}

fn parse_and_expr(pair: Pair<Rule>) -> Result<Predicate, ParseError> {
    if pair.as_rule() != Rule::AndExpr {
        return Err(ParseError::UnexpectedRule { expected: "AndExpr", got: pair.as_rule() });
    }
    let operands = pair
        .into_inner()
        .filter(|inner| inner.as_rule() != Rule::And)
        .map(parse_not_expr)
        .collect::<Result<Vec<_>, _>>()?;
    compound(CompoundKind::And, operands)
}

fn compound(kind: CompoundKind, mut operands: Vec<Predicate>) -> Result<Predicate, ParseError> {
    match operands.len() {
        0 => Err(ParseError::EmptyExpression),
        1 => Ok(operands.remove(0)),
        _ => Ok(Predicate::Compound { kind, operands }),
    }
}

fn parse_not_expr(pair: Pair<Rule>) -> Result<Predicate, ParseError> {
    if pair.as_rule() != Rule::NotExpr {
        return Err(ParseError::UnexpectedRule { expected: "NotExpr", got: pair.as_rule() });
    }
    let mut inner = pair.into_inner();
    let first = inner.next().ok_or(ParseError::EmptyExpression)?;
    match first.as_rule() {
        Rule::Not => {
            let negated = inner.next().ok_or(ParseError::InvalidPredicate("NOT without operand".into()))?;
            Ok(Predicate::Not(Box::new(parse_not_expr(negated)?)))
        }
        Rule::ExpressionInParentheses => {
            let group = first.into_inner().next().ok_or(ParseError::EmptyExpression)?;
            parse_or_expr(group)
        }
        Rule::TruePredicate => Ok(Predicate::True),
        Rule::FalsePredicate => Ok(Predicate::False),
        Rule::Comparison => parse_comparison(first),
        got => Err(ParseError::UnexpectedRule { expected: "NOT, parenthesized expression or comparison", got }),
    }
}

fn parse_comparison(pair: Pair<Rule>) -> Result<Predicate, ParseError> {
    let mut inner = pair.into_inner();
    let left = parse_operand(inner.next().ok_or(ParseError::InvalidPredicate("missing left operand".into()))?)?;
    let (operator, case_insensitive) =
        parse_operator(inner.next().ok_or(ParseError::InvalidPredicate("missing operator".into()))?)?;
    let right = parse_operand(inner.next().ok_or(ParseError::InvalidPredicate("missing right operand".into()))?)?;
    Ok(Predicate::Comparison { left, operator, right, case_insensitive })
}

fn parse_operator(pair: Pair<Rule>) -> Result<(ComparisonOperator, bool), ParseError> {
    let mut inner = pair.into_inner();
    let op = inner.next().ok_or(ParseError::InvalidPredicate("empty operator".into()))?;
    let operator = match op.as_rule() {
        Rule::Eq => ComparisonOperator::Equal,
        Rule::NotEq => ComparisonOperator::NotEqual,
        Rule::Lt => ComparisonOperator::LessThan,
        Rule::LtEq => ComparisonOperator::LessThanOrEqual,
        Rule::Gt => ComparisonOperator::GreaterThan,
        Rule::GtEq => ComparisonOperator::GreaterThanOrEqual,
        Rule::BeginsWith => ComparisonOperator::BeginsWith,
        Rule::Contains => ComparisonOperator::Contains,
        Rule::EndsWith => ComparisonOperator::EndsWith,
        got => return Err(ParseError::UnexpectedRule { expected: "comparison operator", got }),
    };

    let case_insensitive = match inner.next() {
        None => false,
        Some(modifier) => {
            let flags = modifier.into_inner().next().map(|flags| flags.as_str()).unwrap_or("");
            if flags != "c" {
                return Err(ParseError::InvalidPredicate(format!("unsupported comparison modifier [{flags}]")));
            }
            true
        }
    };
    Ok((operator, case_insensitive))
}

fn parse_operand(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    Ok(match pair.as_rule() {
        Rule::ValuePlaceholder => Expr::Placeholder(Placeholder::Value),
        Rule::KeyPlaceholder => Expr::Placeholder(Placeholder::Key),
        Rule::Nil => Expr::Literal(Value::Nil),
        Rule::True => Expr::Literal(Value::Bool(true)),
        Rule::False => Expr::Literal(Value::Bool(false)),
        Rule::Integer => {
            let text = pair.as_str();
            match text.parse::<i64>() {
                Ok(i) => Expr::Literal(Value::I64(i)),
                // Out of i64 range, keep the magnitude as a float
                Err(_) => Expr::Literal(Value::F64(parse_float(text)?)),
            }
        }
        Rule::Float => Expr::Literal(Value::F64(parse_float(pair.as_str())?)),
        Rule::DoubleQuotedString | Rule::SingleQuotedString => {
            let raw = pair.into_inner().next().map(|inner| inner.as_str()).unwrap_or("");
            Expr::Literal(Value::String(unescape(raw)))
        }
        Rule::KeyPath => Expr::Path(KeyPath::parse(pair.as_str())?),
        got => return Err(ParseError::UnexpectedRule { expected: "operand", got }),
    })
}

fn parse_float(text: &str) -> Result<f64, ParseError> {
    text.parse::<f64>().map_err(|e| ParseError::InvalidPredicate(format!("Failed to parse number {text}: {e}")))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
