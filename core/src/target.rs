use serde::{Deserialize, Serialize};

/// Opaque identifier for the record type a scope selects from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor(String);

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self { TypeDescriptor(name.into()) }

    /// Descriptor named after a Rust type.
    pub fn of<T: ?Sized>() -> Self { TypeDescriptor(std::any::type_name::<T>().to_string()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for TypeDescriptor {
    fn from(val: &str) -> Self { TypeDescriptor(val.to_string()) }
}
impl From<String> for TypeDescriptor {
    fn from(val: String) -> Self { TypeDescriptor(val) }
}
impl From<&TypeDescriptor> for TypeDescriptor {
    fn from(val: &TypeDescriptor) -> Self { val.clone() }
}
impl PartialEq<str> for TypeDescriptor {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}
impl AsRef<str> for TypeDescriptor {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}
