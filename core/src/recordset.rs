//! Backing and result collections.
//!
//! A [`RecordSet`] is either unordered (set semantics: equality ignores order) or ordered (sequence semantics).
//! Clones share the same allocation, which is how scope evaluation hands back the backing collection itself.

use std::fmt;
use std::sync::Arc;

use scopeql::Filterable;
#[cfg(feature = "instrument")]
use tracing::instrument;
use tracing::debug;

use crate::criterion::Criterion;
use crate::sort::{compare_by_directives, SortDirective};

/// A collection of records, ordered or not. Duplicates are kept, so unordered sets compare as multisets.
pub struct RecordSet<R> {
    records: Arc<Vec<R>>,
    ordered: bool,
}

impl<R> RecordSet<R> {
    pub fn unordered(records: Vec<R>) -> Self { RecordSet { records: Arc::new(records), ordered: false } }

    pub fn ordered(records: Vec<R>) -> Self { RecordSet { records: Arc::new(records), ordered: true } }

    pub fn is_ordered(&self) -> bool { self.ordered }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, R> { self.records.iter() }

    /// Records in storage order. Only meaningful as an order when [`RecordSet::is_ordered`].
    pub fn as_slice(&self) -> &[R] { &self.records }

    /// Whether both handles refer to the same underlying collection.
    pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.records, &other.records) && self.ordered == other.ordered }
}

impl<R: PartialEq> RecordSet<R> {
    pub fn contains(&self, record: &R) -> bool { self.records.contains(record) }
}

impl<R> Clone for RecordSet<R> {
    fn clone(&self) -> Self { RecordSet { records: self.records.clone(), ordered: self.ordered } }
}

impl<R: fmt::Debug> fmt::Debug for RecordSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.ordered { "OrderedSet" } else { "UnorderedSet" };
        f.debug_tuple(kind).field(&self.records).finish()
    }
}

/// Ordered sets compare as sequences, unordered sets as multisets. Sets of different orderedness are never equal.
impl<R: PartialEq> PartialEq for RecordSet<R> {
    fn eq(&self, other: &Self) -> bool {
        if self.ordered != other.ordered || self.len() != other.len() {
            return false;
        }
        if self.ordered {
            return self.records == other.records;
        }

        let mut matched = vec![false; other.len()];
        self.iter().all(|record| {
            let found = other.iter().enumerate().position(|(i, candidate)| !matched[i] && candidate == record);
            match found {
                Some(i) => {
                    matched[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

impl<'a, R> IntoIterator for &'a RecordSet<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}

/// Apply a criterion and sort directives to a backing collection.
///
/// - neither present: the backing collection itself is returned (same allocation)
/// - with directives: the result is ordered by the composite key, stable for equal keys
/// - filter only: the result keeps the backing collection's orderedness and relative order
#[cfg_attr(feature = "instrument", instrument(level = "debug", skip_all, fields(records = backing.len())))]
pub fn materialize<R: Filterable + Clone>(
    backing: RecordSet<R>,
    criterion: Option<&Criterion>,
    sort_directives: &[SortDirective],
) -> RecordSet<R> {
    if criterion.is_none() && sort_directives.is_empty() {
        debug!("no criterion or sort directives; returning backing collection");
        return backing;
    }

    let mut records: Vec<R> = match criterion {
        Some(criterion) => backing.iter().filter(|record| criterion.evaluate(*record)).cloned().collect(),
        None => backing.as_slice().to_vec(),
    };
    debug!(backing = backing.len(), matched = records.len(), "filtered backing collection");

    if sort_directives.is_empty() {
        return RecordSet { records: Arc::new(records), ordered: backing.is_ordered() };
    }

    // sort_by is stable, so records with equal composite keys keep their relative order
    records.sort_by(|a, b| compare_by_directives(a, b, sort_directives));
    RecordSet::ordered(records)
}
