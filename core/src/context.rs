use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use scopeql::Filterable;
use tracing::{debug, warn};

use crate::criterion::Criterion;
use crate::error::ScopeError;
use crate::recordset::{materialize, RecordSet};
use crate::sort::SortDirective;
use crate::target::TypeDescriptor;

/// Records a scope can select. Blanket-implemented for every suitable type.
pub trait Record: Filterable + Clone + Send + Sync + 'static {}
impl<T: Filterable + Clone + Send + Sync + 'static> Record for T {}

/// Supplies backing collections for targets.
pub trait ExecutionContext<R: Record>: Send + Sync {
    /// The full collection for `target`.
    fn backing(&self, target: &TypeDescriptor) -> Result<RecordSet<R>, ScopeError>;

    /// Resolve a compiled criterion and sort directives for `target`.
    ///
    /// The default evaluates in memory over [`ExecutionContext::backing`]. Contexts backed by a store may
    /// override this to push the work down, as long as the result follows the same collection semantics.
    fn fetch(
        &self,
        target: &TypeDescriptor,
        criterion: Option<&Criterion>,
        sort_directives: &[SortDirective],
    ) -> Result<RecordSet<R>, ScopeError> {
        Ok(materialize(self.backing(target)?, criterion, sort_directives))
    }
}

/// Type-erased execution context handle
pub struct Context<R: Record>(Arc<dyn ExecutionContext<R>>);

impl<R: Record> Clone for Context<R> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<R: Record> fmt::Debug for Context<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context<{}>({:p})", std::any::type_name::<R>(), Arc::as_ptr(&self.0))
    }
}

/// Process-wide default contexts, one per record type. Only consulted when a scope is constructed.
static CURRENT: Lazy<DashMap<TypeId, Box<dyn Any + Send + Sync>>> = Lazy::new(DashMap::new);

impl<R: Record> Context<R> {
    pub fn new(context: impl ExecutionContext<R> + 'static) -> Self { Self(Arc::new(context)) }

    pub fn fetch(
        &self,
        target: &TypeDescriptor,
        criterion: Option<&Criterion>,
        sort_directives: &[SortDirective],
    ) -> Result<RecordSet<R>, ScopeError> {
        self.0.fetch(target, criterion, sort_directives)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }

    /// The current default context for records of type `R`, if one has been installed.
    pub fn current() -> Option<Self> {
        CURRENT.get(&TypeId::of::<R>()).and_then(|entry| entry.value().downcast_ref::<Context<R>>().cloned())
    }

    /// Install the default context for records of type `R`, returning the previous one.
    pub fn set_current(context: Context<R>) -> Option<Context<R>> {
        debug!(record_type = std::any::type_name::<R>(), "installing current context");
        CURRENT
            .insert(TypeId::of::<R>(), Box::new(context))
            .and_then(|previous| previous.downcast::<Context<R>>().ok().map(|b| *b))
    }

    pub fn clear_current() -> Option<Context<R>> {
        CURRENT.remove(&TypeId::of::<R>()).and_then(|(_, previous)| previous.downcast::<Context<R>>().ok().map(|b| *b))
    }
}

/// In-memory execution context mapping targets to collections.
pub struct MemoryContext<R> {
    collections: DashMap<TypeDescriptor, RecordSet<R>>,
}

impl<R: Record> MemoryContext<R> {
    pub fn new() -> Self { Self { collections: DashMap::new() } }

    pub fn with(self, target: impl Into<TypeDescriptor>, records: RecordSet<R>) -> Self {
        self.insert(target, records);
        self
    }

    /// Register the backing collection for `target`, returning the one it replaces.
    pub fn insert(&self, target: impl Into<TypeDescriptor>, records: RecordSet<R>) -> Option<RecordSet<R>> {
        self.collections.insert(target.into(), records)
    }

    pub fn remove(&self, target: &TypeDescriptor) -> Option<RecordSet<R>> { self.collections.remove(target).map(|(_, records)| records) }
}

impl<R: Record> Default for MemoryContext<R> {
    fn default() -> Self { Self::new() }
}

impl<R: Record> ExecutionContext<R> for MemoryContext<R> {
    fn backing(&self, target: &TypeDescriptor) -> Result<RecordSet<R>, ScopeError> {
        match self.collections.get(target) {
            Some(records) => Ok(records.value().clone()),
            None => {
                warn!(%target, "no backing collection registered");
                Err(ScopeError::UnknownTarget(target.clone()))
            }
        }
    }
}
