use std::fmt;

use scopeql::{evaluate_predicate, Filterable, Predicate};
use tracing::warn;

/// A predicate owned by an external predicate language.
///
/// Scopes never look inside an opaque predicate: they ask it for its canonical format, whether that format
/// is compound (so it can be parenthesized when nested), and whether a record matches.
pub trait OpaquePredicate: fmt::Debug + Send + Sync {
    fn format(&self) -> String;

    fn is_compound(&self) -> bool;

    /// Placeholders still waiting for an argument. A predicate with any left cannot be evaluated.
    fn placeholder_count(&self) -> usize { 0 }

    fn evaluate(&self, record: &dyn Filterable) -> bool;
}

impl OpaquePredicate for Predicate {
    fn format(&self) -> String { self.to_string() }

    fn is_compound(&self) -> bool { Predicate::is_compound(self) }

    fn placeholder_count(&self) -> usize { Predicate::placeholder_count(self) }

    fn evaluate(&self, record: &dyn Filterable) -> bool {
        match evaluate_predicate(record, self) {
            Ok(matched) => matched,
            Err(error) => {
                warn!(predicate = %self, %error, "opaque predicate could not be evaluated");
                false
            }
        }
    }
}

/// Opaque leaves persist as their canonical format string and are restored by reparsing it.
pub(super) mod serde_format {
    use std::sync::Arc;

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::OpaquePredicate;

    pub fn serialize<S: Serializer>(predicate: &Arc<dyn OpaquePredicate>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&predicate.format())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<dyn OpaquePredicate>, D::Error> {
        let format = String::deserialize(deserializer)?;
        let predicate = scopeql::parse_selection(&format).map_err(D::Error::custom)?;
        Ok(Arc::new(predicate))
    }
}
