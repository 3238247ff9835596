//! Dynamic value representation.
//!
//! This module provides the [`Value`] enum, a tagged union over every shape
//! the introspection engine carries: scalars, timestamps, sequences, maps,
//! structs and (possibly nil) pointers. Values are self-describing: every
//! value knows its [`Type`](crate::Type), including the pointee type of a nil
//! pointer.
//!
//! ## Core Types
//!
//! - [`Value`]: the tagged union
//! - [`StructValue`]: field values of one struct, paired with its descriptor
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use structmeta::{Reflect, Value};
//!
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! let missing = None::<i64>.reflect();
//!
//! assert!(number.is_int());
//! assert!(text.is_string());
//! assert!(missing.is_nil_pointer());
//! ```
//!
//! ### Inspecting Structs
//!
//! ```rust
//! use structmeta::{reflect_struct, Reflect};
//!
//! reflect_struct! {
//!     struct Point {
//!         pub x: i64,
//!         pub y: i64,
//!     }
//! }
//!
//! let value = Point { x: 1, y: 2 }.reflect();
//! assert_eq!(value.field("y").and_then(|v| v.as_i64()), Some(2));
//! ```

use crate::{Kind, StructType, Type};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A dynamically typed value with a known shape.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// An untyped absent value.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Time(DateTime<Utc>),
    Seq {
        elem: Type,
        items: Vec<Value>,
    },
    Map {
        key: Type,
        value: Type,
        entries: IndexMap<String, Value>,
    },
    Struct(StructValue),
    /// A reference to another value; `target` is `None` for a nil pointer.
    Pointer {
        pointee: Type,
        target: Option<Box<Value>>,
    },
}

/// The field values of one struct, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct StructValue {
    ty: StructType,
    fields: Vec<Value>,
}

impl StructValue {
    #[must_use]
    pub fn new(ty: StructType, fields: Vec<Value>) -> Self {
        StructValue { ty, fields }
    }

    #[must_use]
    pub fn ty(&self) -> &StructType {
        &self.ty
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.ty.name()
    }

    #[must_use]
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Returns the value of the field declared as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.ty.fields().iter().position(|f| f.name() == name)?;
        self.fields.get(index)
    }

    /// Iterates `(field name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.ty
            .fields()
            .iter()
            .map(|def| def.name())
            .zip(self.fields.iter())
    }
}

impl Value {
    /// Returns the type this value belongs to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structmeta::{Reflect, Type, Value};
    ///
    /// assert_eq!(Value::Nil.type_of(), Type::Invalid);
    /// assert_eq!(vec![1u8, 2].reflect().type_of(), Type::Seq(Box::new(Type::Uint)));
    /// assert_eq!(
    ///     None::<String>.reflect().type_of(),
    ///     Type::Pointer(Box::new(Type::String))
    /// );
    /// ```
    #[must_use]
    pub fn type_of(&self) -> Type {
        match self {
            Value::Nil => Type::Invalid,
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::Uint(_) => Type::Uint,
            Value::Float(_) => Type::Float,
            Value::String(_) => Type::String,
            Value::Time(_) => Type::Time,
            Value::Seq { elem, .. } => Type::Seq(Box::new(elem.clone())),
            Value::Map { key, value, .. } => {
                Type::Map(Box::new(key.clone()), Box::new(value.clone()))
            }
            Value::Struct(sv) => Type::Struct(sv.ty.clone()),
            Value::Pointer { pointee, .. } => Type::Pointer(Box::new(pointee.clone())),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Invalid,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Time(_) => Kind::Time,
            Value::Seq { .. } => Kind::Seq,
            Value::Map { .. } => Kind::Map,
            Value::Struct(_) => Kind::Struct,
            Value::Pointer { .. } => Kind::Pointer,
        }
    }

    /// Returns `true` if the value is the untyped nil.
    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns `true` if the value is a typed pointer with no target.
    #[inline]
    #[must_use]
    pub const fn is_nil_pointer(&self) -> bool {
        matches!(self, Value::Pointer { target: None, .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        matches!(self, Value::Pointer { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Uint(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self, Value::Seq { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self, Value::Struct(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer that fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Returns the value as `u64` if it is a non-negative integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(u) => Some(*u),
            Value::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq { items, .. } => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map { entries, .. } => Some(entries),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(sv) => Some(sv),
            _ => None,
        }
    }

    /// Follows one pointer level; `None` for nil pointers and non-pointers.
    #[must_use]
    pub fn pointer_target(&self) -> Option<&Value> {
        match self {
            Value::Pointer {
                target: Some(target),
                ..
            } => Some(target),
            _ => None,
        }
    }

    /// Looks up a field by declared name on a struct value, following pointers.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(sv) => sv.get(name),
            Value::Pointer {
                target: Some(target),
                ..
            } => target.field(name),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Time(t) => f.write_str(&t.to_rfc3339()),
            Value::Seq { items, .. } => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map { entries, .. } => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Value::Struct(sv) => {
                write!(f, "{} {{", Type::Struct(sv.ty.clone()))?;
                for (i, (name, value)) in sv.iter().enumerate() {
                    f.write_str(if i > 0 { ", " } else { " " })?;
                    write!(f, "{}: {}", name, value)?;
                }
                f.write_str(if sv.fields.is_empty() { "}" } else { " }" })
            }
            Value::Pointer { target: None, .. } => f.write_str("nil"),
            Value::Pointer {
                target: Some(target),
                ..
            } => write!(f, "&{}", target),
        }
    }
}

impl Serialize for Value {
    /// Struct values serialize as maps of their exported fields; pointers as
    /// options; timestamps as RFC 3339 strings.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Uint(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Time(t) => serializer.serialize_str(&t.to_rfc3339()),
            Value::Seq { items, .. } => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map { entries, .. } => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Struct(sv) => {
                use serde::ser::SerializeMap;
                let exported: Vec<_> = sv
                    .ty
                    .fields()
                    .iter()
                    .zip(sv.fields.iter())
                    .filter(|(def, _)| def.exported())
                    .collect();
                let mut map = serializer.serialize_map(Some(exported.len()))?;
                for (def, value) in exported {
                    map.serialize_entry(def.name(), value)?;
                }
                map.end()
            }
            Value::Pointer { target: None, .. } => serializer.serialize_none(),
            Value::Pointer {
                target: Some(target),
                ..
            } => serializer.serialize_some(target.as_ref()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Uint(value as u64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Time(value)
    }
}

impl From<StructValue> for Value {
    fn from(value: StructValue) -> Self {
        Value::Struct(value)
    }
}

/// Builds a sequence of dynamically typed elements.
impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq {
            elem: Type::Any,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldDef;

    fn account() -> StructValue {
        let ty = StructType::new("Account", "bank::Account").with_fields(vec![
            FieldDef::typed("id", Type::Int),
            FieldDef::typed("secret", Type::String).with_exported(false),
            FieldDef::typed("owner", Type::Pointer(Box::new(Type::String))),
        ]);
        StructValue::new(
            ty,
            vec![
                Value::Int(7),
                Value::from("hunter2"),
                Value::Pointer {
                    pointee: Type::String,
                    target: None,
                },
            ],
        )
    }

    #[test]
    fn test_struct_lookup() {
        let value = Value::Struct(account());
        assert_eq!(value.field("id"), Some(&Value::Int(7)));
        assert!(value.field("owner").is_some_and(Value::is_nil_pointer));
        assert_eq!(value.field("missing"), None);
    }

    #[test]
    fn test_field_through_pointer() {
        let value = Value::Pointer {
            pointee: Type::Struct(account().ty().clone()),
            target: Some(Box::new(Value::Struct(account()))),
        };
        assert_eq!(value.field("id").and_then(Value::as_i64), Some(7));
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(Value::Uint(5).as_i64(), Some(5));
        assert_eq!(Value::Uint(u64::MAX).as_i64(), None);
        assert_eq!(Value::Int(-1).as_u64(), None);
        assert_eq!(Value::Float(1.0).as_i64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(
            Value::Struct(account()).to_string(),
            r#"Account { id: 7, secret: "hunter2", owner: nil }"#
        );
        assert_eq!(
            Value::from(vec![Value::from(1), Value::from("a")]).to_string(),
            r#"[1, "a"]"#
        );
    }

    #[test]
    fn test_serialize_skips_unexported_fields() {
        let json = serde_json::to_value(Value::Struct(account())).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "owner": null }));
    }

    #[test]
    fn test_kind_matches_type() {
        let values = [
            Value::Nil,
            Value::Bool(true),
            Value::Int(1),
            Value::from("s"),
            Value::from(Vec::<Value>::new()),
            Value::Struct(account()),
        ];
        for value in values {
            assert_eq!(value.kind(), value.type_of().kind());
        }
    }
}
