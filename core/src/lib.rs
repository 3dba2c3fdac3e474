//! Immutable query scopes.
//!
//! A [`Scope`] pairs a target with an optional [`Criterion`] and a list of [`SortDirective`]s. Scopes are
//! derived from each other with [`Scope::filter`] and [`Scope::sort_by`], and evaluated with [`Scope::set`]
//! against the collection an [`ExecutionContext`] supplies for the target.

pub mod context;
pub mod criterion;
pub mod error;
pub mod normalize;
pub mod recordset;
pub mod scope;
pub mod sort;
pub mod target;

pub use context::{Context, ExecutionContext, MemoryContext, Record};
pub use criterion::builder::{field, FieldRef};
pub use criterion::{Criterion, FieldPath, Literal, LogicalKind, Op, OpaquePredicate};
pub use error::ScopeError;
pub use normalize::CriterionInput;
pub use recordset::{materialize, RecordSet};
pub use scope::Scope;
pub use sort::{IntoSortDirective, SortDirective};
pub use target::TypeDescriptor;

pub use scopeql;
pub use scopeql::{Filterable, Value};
