use std::fmt;

#[cfg(feature = "instrument")]
use tracing::instrument;
use tracing::debug;

use crate::context::{Context, Record};
use crate::criterion::Criterion;
use crate::error::ScopeError;
use crate::normalize::CriterionInput;
use crate::recordset::RecordSet;
use crate::sort::{IntoSortDirective, SortDirective};
use crate::target::TypeDescriptor;

/// An immutable selection over the records of one target.
///
/// Every derivation (`filter`, `sort_by`) returns a new scope and leaves `self` untouched, so scopes can be
/// shared freely and used as building blocks for each other.
///
/// ```
/// use scope_core::{field, Context, MemoryContext, RecordSet, Scope};
/// use serde_json::json;
///
/// let people = RecordSet::unordered(vec![json!({"name": "appie"}), json!({"name": "bob"}), json!({"name": "alfred"})]);
/// let context = Context::new(MemoryContext::new().with("Person", people));
///
/// let scope = Scope::with_context("Person", context).filter(field("name").begins_with("a")).unwrap().sort_by("name").unwrap();
/// let names: Vec<_> = scope.set().unwrap().iter().map(|p| p["name"].as_str().unwrap().to_string()).collect();
/// assert_eq!(names, vec!["alfred", "appie"]);
/// ```
pub struct Scope<R: Record> {
    target: TypeDescriptor,
    criterion: Option<Criterion>,
    sort_directives: Vec<SortDirective>,
    context: Context<R>,
}

impl<R: Record> Scope<R> {
    /// A scope over every record of `target`, evaluated in the current context for `R`.
    pub fn new(target: impl Into<TypeDescriptor>) -> Result<Self, ScopeError> {
        let context = current_context::<R>()?;
        Ok(Self::with_context(target, context))
    }

    pub fn with_context(target: impl Into<TypeDescriptor>, context: Context<R>) -> Self {
        Scope { target: target.into(), criterion: None, sort_directives: Vec::new(), context }
    }

    /// Assemble a scope from its parts. The directives are copied, so the caller's list may change afterwards
    /// without affecting the scope. Without an explicit context the current one for `R` is used.
    pub fn from_parts(
        target: impl Into<TypeDescriptor>,
        criterion: Option<Criterion>,
        sort_directives: &[SortDirective],
        context: Option<Context<R>>,
    ) -> Result<Self, ScopeError> {
        if let Some(criterion) = &criterion {
            criterion.validate()?;
        }
        let sort_directives = sort_directives.iter().map(IntoSortDirective::into_sort_directive).collect::<Result<Vec<_>, _>>()?;
        let context = match context {
            Some(context) => context,
            None => current_context::<R>()?,
        };
        Ok(Scope { target: target.into(), criterion, sort_directives, context })
    }

    pub fn target(&self) -> &TypeDescriptor { &self.target }

    pub fn criterion(&self) -> Option<&Criterion> { self.criterion.as_ref() }

    pub fn sort_directives(&self) -> &[SortDirective] { &self.sort_directives }

    pub fn context(&self) -> &Context<R> { &self.context }

    /// The canonical rendering of the compiled criterion, if any.
    pub fn predicate_format(&self) -> Option<String> { self.criterion.as_ref().map(Criterion::to_string) }

    /// Narrow the scope with another criterion, ANDed onto the existing one.
    pub fn filter(&self, input: impl Into<CriterionInput>) -> Result<Self, ScopeError> {
        let incoming = input.into().normalize()?;
        let criterion = Criterion::combine(self.criterion.clone(), incoming);
        debug!(target_type = %self.target, criterion = ?criterion.as_ref().map(ToString::to_string), "derived filtered scope");
        Ok(Scope { criterion, ..self.clone() })
    }

    /// Append a sort directive. Earlier directives take precedence; this one only breaks their ties.
    pub fn sort_by(&self, directive: impl IntoSortDirective) -> Result<Self, ScopeError> {
        let directive = directive.into_sort_directive()?;
        debug!(target_type = %self.target, %directive, "derived sorted scope");
        let mut sort_directives = Vec::with_capacity(self.sort_directives.len() + 1);
        sort_directives.extend_from_slice(&self.sort_directives);
        sort_directives.push(directive);
        Ok(Scope { sort_directives, ..self.clone() })
    }

    /// Evaluate the scope against the backing collection its context supplies for the target.
    #[cfg_attr(feature = "instrument", instrument(level = "debug", skip_all, fields(target_type = %self.target)))]
    pub fn set(&self) -> Result<RecordSet<R>, ScopeError> {
        self.context.fetch(&self.target, self.criterion.as_ref(), &self.sort_directives)
    }
}

fn current_context<R: Record>() -> Result<Context<R>, ScopeError> {
    Context::<R>::current().ok_or(ScopeError::NoCurrentContext { record_type: std::any::type_name::<R>() })
}

impl<R: Record> Clone for Scope<R> {
    fn clone(&self) -> Self {
        Scope {
            target: self.target.clone(),
            criterion: self.criterion.clone(),
            sort_directives: self.sort_directives.clone(),
            context: self.context.clone(),
        }
    }
}

impl<R: Record> fmt::Debug for Scope<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("target", &self.target)
            .field("criterion", &self.criterion)
            .field("sort_directives", &self.sort_directives)
            .finish_non_exhaustive()
    }
}

impl<R: Record> fmt::Display for Scope<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)?;
        if let Some(criterion) = &self.criterion {
            write!(f, " WHERE {criterion}")?;
        }
        for (i, directive) in self.sort_directives.iter().enumerate() {
            write!(f, "{}{directive}", if i == 0 { " ORDER BY " } else { ", " })?;
        }
        Ok(())
    }
}
