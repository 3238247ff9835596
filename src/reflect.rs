//! The reflection capability.
//!
//! Rust has no runtime struct introspection, so types opt in by implementing
//! [`Reflect`]: a static [`Type`] descriptor plus a conversion of an instance
//! into a self-describing [`Value`]. Records describe their own fields through
//! [`Record`], usually generated by [`reflect_struct!`](crate::reflect_struct).
//!
//! Pointer-shaped types are `Option<T>`, `Box<T>`, `&T`, `Rc<T>` and `Arc<T>`.
//! `None` is the nil pointer and still carries `T`'s descriptor. Unit and
//! tuples are anonymous structs whose fields are named by position.
//!
//! ## Implementing by hand
//!
//! ```rust
//! use structmeta::{FieldDef, Record, Reflect, StructType, Type, Value};
//!
//! struct Celsius {
//!     degrees: f64,
//! }
//!
//! impl Record for Celsius {
//!     fn struct_type() -> StructType {
//!         StructType::new("Celsius", "weather::Celsius").with_fields(vec![
//!             FieldDef::new("degrees", f64::reflect_type).with_tag(r#"vm:"temp""#),
//!         ])
//!     }
//!
//!     fn field_values(&self) -> Vec<Value> {
//!         vec![self.degrees.reflect()]
//!     }
//! }
//!
//! impl Reflect for Celsius {
//!     fn reflect_type() -> Type {
//!         structmeta::reflect::record_type::<Self>()
//!     }
//!
//!     fn reflect(&self) -> Value {
//!         structmeta::reflect::record_value(self)
//!     }
//! }
//!
//! let value = Celsius { degrees: 21.5 }.reflect();
//! assert_eq!(value.field("degrees"), Some(&Value::Float(21.5)));
//! ```

use crate::{StructType, StructValue, Type, Value};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

/// Types whose shape and values can be inspected generically.
pub trait Reflect {
    /// The static descriptor of this type.
    fn reflect_type() -> Type
    where
        Self: Sized;

    /// Converts this instance into a self-describing value.
    fn reflect(&self) -> Value;
}

/// Records that describe their own fields.
pub trait Record {
    /// The struct descriptor, with fields in declaration order.
    fn struct_type() -> StructType;

    /// Field values in the same order as [`Record::struct_type`] declares them.
    fn field_values(&self) -> Vec<Value>;
}

/// Descriptor of a [`Record`], for use in a hand-written [`Reflect`] impl.
pub fn record_type<R: Record>() -> Type {
    Type::Struct(R::struct_type())
}

/// Value of a [`Record`], for use in a hand-written [`Reflect`] impl.
pub fn record_value<R: Record>(record: &R) -> Value {
    Value::Struct(StructValue::new(R::struct_type(), record.field_values()))
}

macro_rules! reflect_scalar {
    ($($ty:ty => $variant:ident as $repr:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn reflect_type() -> Type {
                    Type::$variant
                }

                fn reflect(&self) -> Value {
                    Value::$variant(*self as $repr)
                }
            }
        )*
    };
}

reflect_scalar! {
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    isize => Int as i64,
    u8 => Uint as u64,
    u16 => Uint as u64,
    u32 => Uint as u64,
    u64 => Uint as u64,
    usize => Uint as u64,
    f32 => Float as f64,
    f64 => Float as f64,
}

impl Reflect for bool {
    fn reflect_type() -> Type {
        Type::Bool
    }

    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Reflect for String {
    fn reflect_type() -> Type {
        Type::String
    }

    fn reflect(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Reflect for char {
    fn reflect_type() -> Type {
        Type::String
    }

    fn reflect(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl Reflect for DateTime<Utc> {
    fn reflect_type() -> Type {
        Type::Time
    }

    fn reflect(&self) -> Value {
        Value::Time(*self)
    }
}

/// A `Value` is a dynamically typed slot.
impl Reflect for Value {
    fn reflect_type() -> Type {
        Type::Any
    }

    fn reflect(&self) -> Value {
        self.clone()
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect_type() -> Type {
        Type::Pointer(Box::new(T::reflect_type()))
    }

    fn reflect(&self) -> Value {
        Value::Pointer {
            pointee: T::reflect_type(),
            target: self.as_ref().map(|inner| Box::new(inner.reflect())),
        }
    }
}

macro_rules! reflect_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Reflect> Reflect for $ptr<T> {
                fn reflect_type() -> Type {
                    Type::Pointer(Box::new(T::reflect_type()))
                }

                fn reflect(&self) -> Value {
                    Value::Pointer {
                        pointee: T::reflect_type(),
                        target: Some(Box::new(T::reflect(self))),
                    }
                }
            }
        )*
    };
}

reflect_pointer!(Box, Rc, Arc);

impl<T: Reflect> Reflect for &T {
    fn reflect_type() -> Type {
        Type::Pointer(Box::new(T::reflect_type()))
    }

    fn reflect(&self) -> Value {
        Value::Pointer {
            pointee: T::reflect_type(),
            target: Some(Box::new(T::reflect(self))),
        }
    }
}

macro_rules! reflect_dyn_pointer {
    ($($ptr:ty),*) => {
        $(
            /// Points to a value whose type is only known at runtime.
            impl Reflect for $ptr {
                fn reflect_type() -> Type {
                    Type::Pointer(Box::new(Type::Any))
                }

                fn reflect(&self) -> Value {
                    Value::Pointer {
                        pointee: Type::Any,
                        target: Some(Box::new((**self).reflect())),
                    }
                }
            }
        )*
    };
}

reflect_dyn_pointer!(&dyn Reflect, Box<dyn Reflect>, Rc<dyn Reflect>, Arc<dyn Reflect>);

fn reflect_items<'a, T, I>(items: I) -> Value
where
    T: Reflect + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::Seq {
        elem: T::reflect_type(),
        items: items.into_iter().map(Reflect::reflect).collect(),
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect_type() -> Type {
        Type::Seq(Box::new(T::reflect_type()))
    }

    fn reflect(&self) -> Value {
        reflect_items(self)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect_type() -> Type {
        Type::Seq(Box::new(T::reflect_type()))
    }

    fn reflect(&self) -> Value {
        reflect_items(self)
    }
}

fn reflect_entries<'a, K, V, I>(entries: I) -> Value
where
    K: Reflect + Display + 'a,
    V: Reflect + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    Value::Map {
        key: K::reflect_type(),
        value: V::reflect_type(),
        entries: entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.reflect()))
            .collect(),
    }
}

/// Entries are ordered by rendered key, since hash order is arbitrary.
impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: Reflect + Display,
    V: Reflect,
    S: BuildHasher,
{
    fn reflect_type() -> Type {
        Type::Map(Box::new(K::reflect_type()), Box::new(V::reflect_type()))
    }

    fn reflect(&self) -> Value {
        let mut value = reflect_entries(self);
        if let Value::Map { entries, .. } = &mut value {
            entries.sort_keys();
        }
        value
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + Display,
    V: Reflect,
{
    fn reflect_type() -> Type {
        Type::Map(Box::new(K::reflect_type()), Box::new(V::reflect_type()))
    }

    fn reflect(&self) -> Value {
        reflect_entries(self)
    }
}

impl<K, V, S> Reflect for IndexMap<K, V, S>
where
    K: Reflect + Display,
    V: Reflect,
    S: BuildHasher,
{
    fn reflect_type() -> Type {
        Type::Map(Box::new(K::reflect_type()), Box::new(V::reflect_type()))
    }

    fn reflect(&self) -> Value {
        reflect_entries(self)
    }
}

/// Unit is the empty anonymous struct.
impl Reflect for () {
    fn reflect_type() -> Type {
        Type::Struct(StructType::anonymous("()"))
    }

    fn reflect(&self) -> Value {
        Value::Struct(StructValue::new(StructType::anonymous("()"), Vec::new()))
    }
}

macro_rules! reflect_tuple {
    ($(($($name:ident : $idx:tt),+)),* $(,)?) => {
        $(
            impl<$($name: Reflect),+> Reflect for ($($name,)+) {
                fn reflect_type() -> Type {
                    Type::Struct(reflect_tuple!(@descriptor Self; $($name : $idx),+))
                }

                fn reflect(&self) -> Value {
                    let ty = reflect_tuple!(@descriptor Self; $($name : $idx),+);
                    Value::Struct(StructValue::new(ty, vec![$(self.$idx.reflect(),)+]))
                }
            }
        )*
    };
    (@descriptor $tuple:ty; $($name:ident : $idx:tt),+) => {
        StructType::anonymous(std::any::type_name::<$tuple>()).with_fields(vec![
            $(crate::FieldDef::new(stringify!($idx), <$name as Reflect>::reflect_type),)+
        ])
    };
}

reflect_tuple! {
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3),
    (A: 0, B: 1, C: 2, D: 3, E: 4),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    #[test]
    fn test_scalars() {
        assert_eq!(7u8.reflect(), Value::Uint(7));
        assert_eq!((-3i16).reflect(), Value::Int(-3));
        assert_eq!(1.5f32.reflect(), Value::Float(1.5));
        assert_eq!('x'.reflect(), Value::from("x"));
        assert_eq!(<usize as Reflect>::reflect_type(), Type::Uint);
    }

    #[test]
    fn test_none_keeps_pointee_type() {
        let value = None::<Vec<i32>>.reflect();
        assert_eq!(
            value,
            Value::Pointer {
                pointee: Type::Seq(Box::new(Type::Int)),
                target: None,
            }
        );
    }

    #[test]
    fn test_nested_pointers() {
        let value = Some(Box::new(5i64)).reflect();
        assert_eq!(
            value.type_of(),
            Type::Pointer(Box::new(Type::Pointer(Box::new(Type::Int))))
        );
        let inner = value.pointer_target().and_then(Value::pointer_target);
        assert_eq!(inner, Some(&Value::Int(5)));
    }

    #[test]
    fn test_hash_map_entries_sorted() {
        let map: HashMap<String, i32> = [("b", 2), ("a", 1), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let value = map.reflect();
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(
            value.type_of(),
            Type::Map(Box::new(Type::String), Box::new(Type::Int))
        );
    }

    #[test]
    fn test_tuple_is_anonymous_struct() {
        let value = (1i32, "a".to_string()).reflect();
        let sv = value.as_struct().unwrap();
        assert_eq!(sv.name(), "");
        assert_eq!(sv.get("1"), Some(&Value::from("a")));
        assert_eq!(().reflect().kind(), Kind::Struct);
        assert!(().reflect().as_struct().unwrap().fields().is_empty());
    }

    #[test]
    fn test_dyn_pointers_resolve_to_runtime_value() {
        let values: Vec<Box<dyn Reflect>> = vec![Box::new(3i32), Box::new("x".to_string())];
        assert_eq!(
            <Box<dyn Reflect> as Reflect>::reflect_type(),
            Type::Pointer(Box::new(Type::Any))
        );
        assert_eq!(values[0].reflect().pointer_target(), Some(&Value::Int(3)));

        let seq = values.reflect();
        assert_eq!(seq.type_of(), Type::Seq(Box::new(Type::Pointer(Box::new(Type::Any)))));

        let borrowed: &dyn Reflect = &true;
        assert_eq!(
            Reflect::reflect(&borrowed).pointer_target(),
            Some(&Value::Bool(true))
        );
        let shared: Arc<dyn Reflect> = Arc::new(1.5f64);
        assert_eq!(shared.reflect().pointer_target(), Some(&Value::Float(1.5)));
    }

    #[test]
    fn test_empty_vec_keeps_element_type() {
        let value = Vec::<bool>::new().reflect();
        assert_eq!(value.type_of(), Type::Seq(Box::new(Type::Bool)));
        assert_eq!(value.as_seq(), Some(&[][..]));
    }
}
