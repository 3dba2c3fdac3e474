use std::cmp::Ordering;

use super::Value;

impl Value {
    /// Compare two values for predicate evaluation.
    ///
    /// Integers, floats and booleans (as 1/0) form one numeric family and compare with each other.
    /// Strings only compare with strings. `nil` only equals `nil`. Returns `None` for incomparable pairs.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Nil, Value::Nil) => Some(Ordering::Equal),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Nil, _) | (_, Value::Nil) | (Value::String(_), _) | (_, Value::String(_)) => None,
            (a, b) => match (a.as_i64(), b.as_i64()) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
            },
        }
    }

    /// Total order used for sorting: nil first, then the numeric family, then strings.
    /// Values of the same family compare by [`Value::compare`]; NaN sorts after every other number.
    pub fn collate(&self, other: &Value) -> Ordering {
        self.family().cmp(&other.family()).then_with(|| match self.compare(other) {
            Some(ordering) => ordering,
            None => {
                let (a, b) = (self.as_f64().unwrap_or(f64::NAN), other.as_f64().unwrap_or(f64::NAN));
                a.total_cmp(&b)
            }
        })
    }

    fn family(&self) -> u8 {
        match self {
            Value::Nil => 0,
            Value::Bool(_) | Value::I64(_) | Value::F64(_) => 1,
            Value::String(_) => 2,
        }
    }
}
