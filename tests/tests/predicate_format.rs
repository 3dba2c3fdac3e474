use anyhow::Result;

use common::{author_scope, authors};
use scope_core::{field, Criterion, CriterionInput, RecordSet, ScopeError, Value};
use scopeql::ParseError;

#[test]
fn from_a_field_map() -> Result<()> {
    let scope1 = author_scope(RecordSet::unordered(authors()));

    let scope2 = scope1.filter([("name", Value::from("bob")), ("amount", Value::from(42))])?;
    assert_eq!(scope2.predicate_format().as_deref(), Some(r#"name == "bob" AND amount == 42"#));

    let scope3 = scope2.filter([("enabled", true)])?;
    assert_eq!(scope3.predicate_format().as_deref(), Some(r#"(name == "bob" AND amount == 42) AND (enabled == 1)"#));
    Ok(())
}

#[test]
fn from_a_scope() -> Result<()> {
    let scope1 = author_scope(RecordSet::unordered(authors()));

    let scope2 = scope1.filter(field("name").case_insensitive().neq("bob").or(field("amount").gt(42)))?;
    let scope3 = scope1.filter(field("enabled").eq(true).and(field("job.title").neq(Value::Nil)))?;

    let scope4 = scope3.filter(&scope2)?;
    assert_eq!(
        scope4.predicate_format().as_deref(),
        Some(r#"(enabled == 1 AND job.title != nil) AND (name !=[c] "bob" OR amount > 42)"#)
    );
    Ok(())
}

#[test]
fn from_a_builder_expression() -> Result<()> {
    let scope1 = author_scope(RecordSet::unordered(authors()));

    let scope2 = scope1.filter(field("name").begins_with("bob").or(field("amount").gt(42)))?;
    assert_eq!(scope2.predicate_format().as_deref(), Some(r#"name BEGINSWITH "bob" OR amount > 42"#));

    let scope3 = scope2.filter(field("enabled").eq(true))?;
    assert_eq!(scope3.predicate_format().as_deref(), Some(r#"(name BEGINSWITH "bob" OR amount > 42) AND enabled == 1"#));
    Ok(())
}

#[test]
fn from_a_native_predicate() -> Result<()> {
    let scope1 = author_scope(RecordSet::unordered(authors()));

    let scope2 = scope1.filter(scopeql::parse_with_arguments("name != %@ OR amount > %@", &["bob".into(), 42.into()])?)?;
    assert_eq!(scope2.predicate_format().as_deref(), Some(r#"name != "bob" OR amount > 42"#));

    let scope3 = scope2.filter(scopeql::parse_selection("enabled == 1")?)?;
    assert_eq!(scope3.predicate_format().as_deref(), Some(r#"(name != "bob" OR amount > 42) AND enabled == 1"#));
    Ok(())
}

#[test]
fn from_a_format_string() -> Result<()> {
    let scope1 = author_scope(RecordSet::unordered(authors()));

    let scope2 = scope1.filter(("name != %@ OR amount > %@", vec![Value::from("bob"), Value::from(42)]))?;
    assert_eq!(scope2.predicate_format().as_deref(), Some(r#"name != "bob" OR amount > 42"#));

    let scope3 = scope2.filter("enabled == 1")?;
    assert_eq!(scope3.predicate_format().as_deref(), Some(r#"(name != "bob" OR amount > 42) AND enabled == 1"#));
    Ok(())
}

#[test]
fn every_input_form_renders_the_same() -> Result<()> {
    let expected = r#"name != "bob" OR amount > 42"#;
    let inputs: Vec<CriterionInput> = vec![
        field("name").neq("bob").or(field("amount").gt(42)).into(),
        ("name != %@ OR amount > %@", vec![Value::from("bob"), Value::from(42)]).into(),
        scopeql::parse_selection(r#"name <> 'bob' || amount > 42"#)?.into(),
        CriterionInput::from_json(&serde_json::json!(["name != %@ OR amount > %@", "bob", 42]))?,
    ];

    let scope = author_scope(RecordSet::unordered(authors()));
    let criteria = inputs.into_iter().map(|input| scope.filter(input)).collect::<Result<Vec<_>, _>>()?;
    for derived in &criteria {
        assert_eq!(derived.predicate_format().as_deref(), Some(expected));
        assert_eq!(derived.criterion(), criteria[0].criterion());
    }

    let from_map = scope.filter([("name", Value::from("bob")), ("amount", Value::from(42))])?;
    let from_json = scope.filter(CriterionInput::from_json(&serde_json::json!({"name": "bob", "amount": 42}))?)?;
    assert_eq!(from_map.criterion(), from_json.criterion());
    Ok(())
}

#[test]
fn derived_scopes_do_not_modify_the_original() -> Result<()> {
    let scope1 = author_scope(RecordSet::unordered(authors()));

    let scope2 = scope1.filter([("name", "bob")])?;
    let scope3 = scope2.filter(field("name").eq("bob"))?;
    let scope4 = scope3.filter(("name == %@", vec![Value::from("bob")]))?;
    let scope5 = scope4.filter(scopeql::parse_selection(r#"name == "bob""#)?)?;

    assert_eq!(scope1.predicate_format(), None);
    assert_eq!(scope2.predicate_format().as_deref(), Some(r#"name == "bob""#));
    assert_eq!(scope3.predicate_format().as_deref(), Some(r#"(name == "bob") AND name == "bob""#));
    assert_eq!(scope4.predicate_format().as_deref(), Some(r#"((name == "bob") AND name == "bob") AND name == "bob""#));
    assert_eq!(scope5.predicate_format().as_deref(), Some(r#"(((name == "bob") AND name == "bob") AND name == "bob") AND name == "bob""#));
    assert!(scope5.sort_directives().is_empty());
    Ok(())
}

#[test]
fn compiled_criteria_persist() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors()))
        .filter(("name != %@ OR amount > %@", vec![Value::from("bob"), Value::from(42)]))?
        .filter(field("job.title").case_insensitive().eq("cook"))?;

    let json = serde_json::to_string(&scope.criterion())?;
    let restored: Option<Criterion> = serde_json::from_str(&json)?;
    assert_eq!(restored.as_ref(), scope.criterion());

    let reapplied = author_scope(RecordSet::unordered(authors())).filter(restored.ok_or_else(|| anyhow::anyhow!("criterion lost"))?)?;
    assert_eq!(reapplied.set()?, scope.set()?);
    Ok(())
}

#[test]
fn criteria_without_a_literal_form_are_rejected() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors()));

    // A path named like a keyword would reparse as that keyword
    let keyword_key = scope.filter(("%K == %@", vec![Value::from("yes"), Value::from(1)]));
    assert_eq!(keyword_key.unwrap_err(), ScopeError::PredicateSyntax(ParseError::InvalidKeyPath("yes".into())));
    assert_eq!(scope.filter(field("nil").eq(1)).unwrap_err(), ScopeError::InvalidFieldPath("nil".into()));
    assert_eq!(scope.filter([("job.Not", 1)]).unwrap_err(), ScopeError::InvalidFieldPath("job.Not".into()));

    let infinite = scope.filter(("amount > %@", vec![Value::F64(f64::INFINITY)]));
    assert_eq!(infinite.unwrap_err(), ScopeError::PredicateSyntax(ParseError::NonFiniteNumber("inf".into())));
    let nan = scope.filter(field("amount").lt(f64::NAN));
    assert_eq!(nan.unwrap_err(), ScopeError::PredicateSyntax(ParseError::NonFiniteNumber("NaN".into())));

    // Paths that merely start with a keyword still persist and reparse as paths
    let scope = scope.filter(("notes == %@ OR amount > %@", vec![Value::Nil, Value::from(40.5)]))?.filter(field("nothing").neq(1).negate())?;
    let json = serde_json::to_string(&scope.criterion())?;
    let restored: Option<Criterion> = serde_json::from_str(&json)?;
    let restored = restored.ok_or_else(|| anyhow::anyhow!("criterion lost"))?;
    assert_eq!(Some(restored.to_string()), scope.predicate_format());

    let reapplied = author_scope(RecordSet::unordered(authors())).filter(restored)?;
    assert_eq!(reapplied.set()?, scope.set()?);
    Ok(())
}
