use anyhow::Result;

use common::{author_scope, authors, names, people, people_scope, person};
use scope_core::{field, Context, Filterable, MemoryContext, RecordSet, Scope, ScopeError, Value};

type Json = serde_json::Value;

fn behaves_like_scope_set(backing: RecordSet<Json>, set: fn(Vec<Json>) -> RecordSet<Json>) -> Result<()> {
    let scope = people_scope(backing.clone());

    // returns the original set when there are no finder or sort conditions
    assert!(scope.set()?.ptr_eq(&backing));

    // returns a set derived from the original set by applying the finder conditions
    let filtered = scope.filter(field("name").eq("bob").or(field("name").eq("appie")))?;
    assert_eq!(filtered.set()?, set(vec![person("appie"), person("bob")]));

    // returns an ordered set if sort conditions have been assigned
    let sorted = scope.sort_by("name")?.set()?;
    assert!(sorted.is_ordered());
    assert_eq!(sorted, RecordSet::ordered(vec![person("alfred"), person("appie"), person("bob")]));
    Ok(())
}

#[test]
fn set_with_an_unordered_backing_collection() -> Result<()> { behaves_like_scope_set(RecordSet::unordered(people()), RecordSet::unordered) }

#[test]
fn set_with_an_ordered_backing_collection() -> Result<()> { behaves_like_scope_set(RecordSet::ordered(people()), RecordSet::ordered) }

#[test]
fn filtering_an_unordered_set_ignores_order() -> Result<()> {
    let result = people_scope(RecordSet::unordered(people())).filter(("name BEGINSWITH %@", vec![Value::from("a")]))?.set()?;
    assert!(!result.is_ordered());
    assert_eq!(result, RecordSet::unordered(vec![person("alfred"), person("appie")]));
    assert_ne!(result, RecordSet::ordered(vec![person("appie"), person("alfred")]));
    Ok(())
}

#[test]
fn composite_sort_breaks_ties_in_order() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors()));

    let by_amount_then_name = scope.sort_by(("amount", false))?.sort_by("name")?.set()?;
    assert_eq!(names(&by_amount_then_name), vec!["appie", "alfred", "bob", "Bobby"]);

    let by_name_descending = scope.sort_by(("name", false))?.set()?;
    assert_eq!(names(&by_name_descending), vec!["bob", "appie", "alfred", "Bobby"]);
    Ok(())
}

#[test]
fn filters_walk_nested_fields() -> Result<()> {
    let scope = author_scope(RecordSet::ordered(authors()));

    let cooks = scope.filter(field("job.title").case_insensitive().eq("COOK"))?.set()?;
    assert!(cooks.is_ordered());
    assert_eq!(names(&cooks), vec!["bob", "Bobby"]);

    // appie has no job, so job.title cannot be resolved and never matches
    let employed = scope.filter(field("job.title").neq(Value::Nil))?.set()?;
    assert_eq!(names(&employed), vec!["bob", "alfred", "Bobby"]);
    let unemployed = scope.filter(field("job.title").neq(Value::Nil).negate())?.set()?;
    assert_eq!(names(&unemployed), vec!["appie"]);
    Ok(())
}

#[test]
fn filter_and_sort_together() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors()))
        .filter([("enabled", true)])?
        .filter("amount >= 42")?
        .sort_by(("name", false))?;

    let result = scope.set()?;
    assert!(result.is_ordered());
    assert_eq!(names(&result), vec!["bob", "alfred"]);
    Ok(())
}

#[test]
fn json_filters_apply_like_field_maps() -> Result<()> {
    let scope = author_scope(RecordSet::unordered(authors()));
    let input = scope_core::CriterionInput::from_json(&serde_json::json!({"amount": 42, "enabled": true}))?;
    let result = scope.filter(input)?.sort_by("name")?.set()?;
    assert_eq!(names(&result), vec!["alfred", "bob"]);
    Ok(())
}

/// A record type used only here, so the process-wide current context is not shared with other tests.
#[derive(Debug, Clone, PartialEq)]
struct Album(serde_json::Value);

impl Filterable for Album {
    fn value(&self, path: &scopeql::KeyPath) -> Option<Value> { self.0.value(path) }
}

#[test]
fn scopes_default_to_the_current_context() -> Result<()> {
    assert_eq!(Scope::<Album>::new("Album").unwrap_err(), ScopeError::NoCurrentContext { record_type: std::any::type_name::<Album>() });

    let albums = RecordSet::unordered(vec![Album(serde_json::json!({"name": "Two Vines", "year": 2016}))]);
    let context = Context::new(MemoryContext::new().with("Album", albums.clone()));
    Context::set_current(context.clone());

    let scope = Scope::<Album>::new("Album")?;
    assert!(scope.context().ptr_eq(&context));
    assert_eq!(scope.target(), "Album");
    assert!(scope.set()?.ptr_eq(&albums));

    // The context is captured at construction; clearing the default does not affect existing scopes
    Context::<Album>::clear_current();
    assert_eq!(scope.filter(field("year").gt(2010))?.set()?.len(), 1);
    assert!(Scope::<Album>::new("Album").is_err());
    Ok(())
}

#[test]
fn unknown_targets_fail_at_evaluation() -> Result<()> {
    let scope = Scope::with_context("Book", Context::new(MemoryContext::<serde_json::Value>::new()));
    assert_eq!(scope.set().unwrap_err(), ScopeError::UnknownTarget("Book".into()));
    Ok(())
}
