use anyhow::Result;

use common::{author_scope, authors};
use scope_core::{field, Context, Criterion, CriterionInput, MemoryContext, RecordSet, Scope, ScopeError, Value};
use scopeql::ParseError;

#[test]
fn malformed_format_strings_fail_at_filter_time() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors()));

    for format in ["name ==", "name == 'bob' AND", "(name == 'bob'", "name ==[x] 'bob'", "== 'bob'"] {
        match scope.filter(format) {
            Err(ScopeError::PredicateSyntax(_)) => {}
            other => panic!("expected a syntax error for {format:?}, got {other:?}"),
        }
    }
    Ok(())
}

#[test]
fn placeholder_counts_must_match() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors()));

    let too_few = scope.filter(("name == %@ AND amount > %@", vec![Value::from("bob")]));
    assert_eq!(too_few.unwrap_err(), ScopeError::PredicateSyntax(ParseError::PlaceholderCountMismatch { expected: 2, found: 1 }));

    let too_many = scope.filter(("name == %@", vec![Value::from("bob"), Value::from(42)]));
    assert_eq!(too_many.unwrap_err(), ScopeError::PredicateSyntax(ParseError::PlaceholderCountMismatch { expected: 1, found: 2 }));

    let bad_key = scope.filter(("%K == %@", vec![Value::from(42), Value::from("bob")]));
    assert!(matches!(bad_key, Err(ScopeError::PredicateSyntax(ParseError::InvalidKeyPathArgument(_)))));
    Ok(())
}

#[test]
fn unbound_native_predicates_are_rejected_wherever_they_appear() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors()));
    let unbound = Criterion::from(scopeql::parse_selection("name == %@")?);
    let mismatch = ScopeError::PredicateSyntax(ParseError::PlaceholderCountMismatch { expected: 1, found: 0 });

    assert_eq!(scope.filter(unbound.clone()).unwrap_err(), mismatch);
    assert_eq!(scope.filter(field("amount").gt(1).and(unbound.clone())).unwrap_err(), mismatch);
    assert_eq!(scope.filter(unbound.clone().negate().or(field("enabled").eq(true))).unwrap_err(), mismatch);

    let context = Context::new(MemoryContext::new().with("Author", RecordSet::unordered(authors())));
    assert_eq!(Scope::from_parts("Author", Some(unbound), &[], Some(context)).unwrap_err(), mismatch);
    Ok(())
}

#[test]
fn unsupported_inputs_name_their_shape() -> Result<()> {
    let error = CriterionInput::from_json(&serde_json::json!(true)).unwrap_err();
    assert_eq!(error, ScopeError::UnsupportedCriterionInput { shape: "bool".into() });
    assert_eq!(error.to_string(), "unsupported criterion input: bool");

    let error = CriterionInput::from_json(&serde_json::json!([{"name": "bob"}])).unwrap_err();
    assert_eq!(error, ScopeError::UnsupportedCriterionInput { shape: "array starting with object".into() });
    Ok(())
}

#[test]
fn malformed_fields_are_rejected() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors()));

    assert_eq!(scope.sort_by("").unwrap_err(), ScopeError::InvalidSortField("".into()));
    assert_eq!(scope.sort_by(("job..title", false)).unwrap_err(), ScopeError::InvalidSortField("job..title".into()));
    assert_eq!(scope.filter(field("1st").eq(1)).unwrap_err(), ScopeError::InvalidFieldPath("1st".into()));
    assert_eq!(scope.filter([("", 1)]).unwrap_err(), ScopeError::InvalidFieldPath("".into()));
    Ok(())
}

#[test]
fn failures_leave_the_scope_usable() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors())).filter([("name", "bob")])?;
    assert!(scope.filter("name ==").is_err());
    assert!(scope.sort_by("").is_err());
    assert_eq!(scope.predicate_format().as_deref(), Some(r#"name == "bob""#));
    assert!(scope.sort_directives().is_empty());
    assert_eq!(scope.set()?.len(), 1);
    Ok(())
}
