use std::cmp::Ordering;
use std::fmt;

use scopeql::{Filterable, Value};
use serde::{Deserialize, Serialize};

use crate::criterion::FieldPath;
use crate::error::ScopeError;

/// One key of a composite ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDirective {
    pub field: FieldPath,
    pub ascending: bool,
}

impl SortDirective {
    pub fn new(field: &str, ascending: bool) -> Result<Self, ScopeError> {
        let field = FieldPath::parse(field).map_err(|_| ScopeError::InvalidSortField(field.to_string()))?;
        Ok(SortDirective { field, ascending })
    }

    pub fn asc(field: &str) -> Result<Self, ScopeError> { Self::new(field, true) }

    pub fn desc(field: &str) -> Result<Self, ScopeError> { Self::new(field, false) }

    /// Compare two records by this directive. Missing fields collate as nil, which sorts first when ascending.
    pub fn compare<R: Filterable>(&self, a: &R, b: &R) -> Ordering {
        let a = a.value(&self.field).unwrap_or(Value::Nil);
        let b = b.value(&self.field).unwrap_or(Value::Nil);
        let ordering = a.collate(&b);
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, if self.ascending { "ASC" } else { "DESC" })
    }
}

/// Compare two records using a list of directives.
///
/// The first directive is the primary key; each following directive only breaks ties left by the previous ones.
pub fn compare_by_directives<R: Filterable>(a: &R, b: &R, directives: &[SortDirective]) -> Ordering {
    directives
        .iter()
        .map(|directive| directive.compare(a, b))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Anything `Scope::sort_by` accepts: a field name (ascending), a `(field, ascending)` pair, or a directive.
pub trait IntoSortDirective {
    fn into_sort_directive(self) -> Result<SortDirective, ScopeError>;
}

impl IntoSortDirective for SortDirective {
    fn into_sort_directive(self) -> Result<SortDirective, ScopeError> {
        if self.field.is_valid() {
            Ok(self)
        } else {
            Err(ScopeError::InvalidSortField(self.field.to_string()))
        }
    }
}

impl IntoSortDirective for &SortDirective {
    fn into_sort_directive(self) -> Result<SortDirective, ScopeError> { self.clone().into_sort_directive() }
}

impl IntoSortDirective for &str {
    fn into_sort_directive(self) -> Result<SortDirective, ScopeError> { SortDirective::asc(self) }
}

impl IntoSortDirective for String {
    fn into_sort_directive(self) -> Result<SortDirective, ScopeError> { SortDirective::asc(&self) }
}

impl IntoSortDirective for (&str, bool) {
    fn into_sort_directive(self) -> Result<SortDirective, ScopeError> { SortDirective::new(self.0, self.1) }
}

impl IntoSortDirective for FieldPath {
    fn into_sort_directive(self) -> Result<SortDirective, ScopeError> { (self, true).into_sort_directive() }
}

impl IntoSortDirective for (FieldPath, bool) {
    fn into_sort_directive(self) -> Result<SortDirective, ScopeError> {
        SortDirective { field: self.0, ascending: self.1 }.into_sort_directive()
    }
}
