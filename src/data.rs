//! Flattened extraction output.
//!
//! [`Data`] is an ordered, append-only list of extracted values. It is never
//! deduplicated or reordered, and serializes as a plain sequence.
//!
//! Values are added through the flatten rule: a nil value contributes one
//! [`Value::Nil`] entry, a sequence contributes each of its elements
//! (normalized), and anything else contributes itself.

use crate::normalize::Normalized;
use crate::Value;
use serde::Serialize;

/// Ordered, append-only collection of extracted values.
///
/// # Examples
///
/// ```rust
/// use structmeta::{normalize, Data, Value};
///
/// let mut data = Data::new();
/// data.append_flattened(&normalize(&vec![1i64, 2]));
/// data.append_flattened(&normalize(&None::<i64>));
/// data.append_flattened(&normalize(&3i64));
///
/// assert_eq!(
///     data.as_slice(),
///     &[Value::Int(1), Value::Int(2), Value::Nil, Value::Int(3)]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Data(Vec<Value>);

impl Data {
    #[must_use]
    pub fn new() -> Self {
        Data(Vec::new())
    }

    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    /// Appends the flattened form of a normalized value.
    pub fn append_flattened(&mut self, value: &Normalized) {
        self.0.extend(flatten(value));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

/// Flattens a normalized value into its data entries.
#[must_use]
pub fn flatten(value: &Normalized) -> Vec<Value> {
    if value.is_nil() {
        return vec![Value::Nil];
    }
    match value.value() {
        Value::Seq { items, .. } => items
            .iter()
            .map(|item| entry(Normalized::from_value(item.clone())))
            .collect(),
        other => vec![other.clone()],
    }
}

fn entry(value: Normalized) -> Value {
    if value.is_nil() {
        Value::Nil
    } else {
        value.into_value()
    }
}

impl Extend<Value> for Data {
    fn extend<T: IntoIterator<Item = Value>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<Value> for Data {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Data(iter.into_iter().collect())
    }
}

impl IntoIterator for Data {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Data {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
