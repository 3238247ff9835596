//! Collections of structs and column extraction.
//!
//! [`Structs`] is an ordered collection of [`Struct`]s, typically built from a
//! batch of homogeneous records. Construction is all-or-nothing: one element
//! that does not resolve to a struct rejects the whole batch.
//!
//! [`Structs::extract_data_by_name`] is the "pull out the columns I care about
//! across many records" primitive: every struct contributes itself under its
//! type name, and every selected field contributes its flattened value under
//! the field name.
//!
//! ## Examples
//!
//! ```rust
//! use structmeta::{reflect_struct, to_structs, Value};
//!
//! reflect_struct! {
//!     struct Shift {
//!         pub id: i64,
//!         pub tags: Vec<String>,
//!     }
//! }
//!
//! let shifts = vec![
//!     Shift { id: 1, tags: vec!["am".into()] },
//!     Shift { id: 2, tags: vec!["pm".into(), "oncall".into()] },
//! ];
//!
//! let structs = to_structs(&shifts).unwrap();
//! let data = structs.extract_data_by_name(["id", "tags"]);
//!
//! assert_eq!(data["Shift"].len(), 2);
//! assert_eq!(data["id"].as_slice(), &[Value::Int(1), Value::Int(2)]);
//! assert_eq!(data["tags"].len(), 3);
//! ```

use crate::data::Data;
use crate::field::Struct;
use crate::{Error, MetaOptions, Reflect, Result};
use indexmap::IndexMap;

const LOG_TARGET: &str = "structs";

/// An ordered collection of structs; duplicates by name are preserved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Structs(Vec<Struct>);

impl Structs {
    #[must_use]
    pub fn new() -> Self {
        Structs(Vec::new())
    }

    /// Converts every element into a [`Struct`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Collection`] for the first element that does not
    /// resolve to a struct; no partial collection is produced.
    pub fn from_slice<T: Reflect>(values: &[T]) -> Result<Self> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                Struct::new(value).map_err(|err| {
                    log::debug!(
                        target: LOG_TARGET,
                        "rejecting collection at element {}: {}",
                        index,
                        err
                    );
                    Error::collection(index, err)
                })
            })
            .collect()
    }

    pub fn push(&mut self, value: Struct) {
        self.0.push(value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Struct> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Struct] {
        &self.0
    }

    /// Type names, one per element.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Struct::name).collect()
    }

    /// [`Struct::tag_name`] for every element, in order.
    pub fn tag_names<I>(&self, keys: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let keys: Vec<I::Item> = keys.into_iter().collect();
        self.0.iter().map(|s| s.tag_name(&keys)).collect()
    }

    /// [`Struct::identifier`] for every element, in order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.identifiers_with(&MetaOptions::default())
    }

    #[must_use]
    pub fn identifiers_with(&self, options: &MetaOptions) -> Vec<String> {
        self.0.iter().map(|s| s.identifier_with(options)).collect()
    }

    /// Indexes the collection by type name; later entries overwrite earlier
    /// ones with the same name.
    #[must_use]
    pub fn to_struct_map(&self) -> IndexMap<String, Struct> {
        let mut map = IndexMap::with_capacity(self.0.len());
        for s in &self.0 {
            map.insert(s.name().to_string(), s.clone());
        }
        map
    }

    /// Flattens each struct under its type name and each field selected by
    /// declared name under the field name.
    ///
    /// Contributions under the same key are concatenated in collection order,
    /// then field order.
    pub fn extract_data_by_name<I>(&self, names: I) -> IndexMap<String, Data>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let names: Vec<I::Item> = names.into_iter().collect();
        let mut data: IndexMap<String, Data> = IndexMap::new();

        for s in &self.0 {
            data.entry(s.name().to_string())
                .or_default()
                .append_flattened(s.value());
            for field in s.fields().by_names(&names) {
                data.entry(field.name().to_string())
                    .or_default()
                    .append_flattened(field.value());
            }
        }

        data
    }
}

impl IntoIterator for Structs {
    type Item = Struct;
    type IntoIter = std::vec::IntoIter<Struct>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Structs {
    type Item = &'a Struct;
    type IntoIter = std::slice::Iter<'a, Struct>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Struct> for Structs {
    fn from_iter<T: IntoIterator<Item = Struct>>(iter: T) -> Self {
        Structs(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    crate::reflect_struct! {
        #[derive(Debug, Clone)]
        struct Task => r#"vm:"task" json:"tasks""# {
            pub id: i64,
            pub labels: Vec<String>,
            pub owner: Option<String>,
        }
    }

    crate::reflect_struct! {
        #[derive(Debug, Clone)]
        struct Staff {
            pub id: i64,
        }
    }

    fn task(id: i64, labels: &[&str]) -> Task {
        Task {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            owner: None,
        }
    }

    #[test]
    fn test_all_or_nothing() {
        let values = vec![Task::default_value(), Value::Int(3), Task::default_value()];
        let err = Structs::from_slice(&values).unwrap_err();
        assert!(matches!(err, Error::Collection { index: 1, .. }));
        assert!(err.is_not_a_struct());
    }

    #[test]
    fn test_heterogeneous_structs() {
        let values = vec![Task::default_value(), Staff { id: 9 }.reflect()];
        let structs = Structs::from_slice(&values).unwrap();
        assert_eq!(structs.names(), vec!["Task", "Staff"]);
        assert_eq!(structs.identifiers(), vec!["task", "Staff"]);
        assert_eq!(structs.tag_names(["json"]), vec!["tasks", "Staff"]);
    }

    #[test]
    fn test_struct_map_last_write_wins() {
        let structs = Structs::from_slice(&[task(1, &[]), task(2, &[])]).unwrap();
        let map = structs.to_struct_map();
        assert_eq!(map.len(), 1);
        let kept = map["Task"].field("id").unwrap();
        assert_eq!(kept.value().value(), &Value::Int(2));
    }

    #[test]
    fn test_extract_concatenates_in_order() {
        let structs = Structs::from_slice(&[task(1, &["a", "b"]), task(2, &["c"])]).unwrap();
        let data = structs.extract_data_by_name(["labels", "owner", "unknown"]);

        let keys: Vec<_> = data.keys().cloned().collect();
        assert_eq!(keys, vec!["Task", "labels", "owner"]);
        assert_eq!(
            data["labels"].as_slice(),
            &[Value::from("a"), Value::from("b"), Value::from("c")]
        );
        assert_eq!(data["owner"].as_slice(), &[Value::Nil, Value::Nil]);
        assert_eq!(data["Task"].len(), 2);
        assert!(data["Task"].iter().all(Value::is_struct));
    }

    #[test]
    fn test_empty_collection() {
        let structs = Structs::from_slice::<Task>(&[]).unwrap();
        assert!(structs.is_empty());
        assert!(structs.extract_data_by_name(["id"]).is_empty());
    }

    impl Task {
        fn default_value() -> Value {
            task(0, &[]).reflect()
        }
    }
}
