//! # structmeta
//!
//! Struct introspection for code that has to handle records it does not know
//! at compile time: enumerate fields, read their annotations, pick fields by
//! name or by tag, and pull the same columns out of many records at once.
//!
//! ## Key Features
//!
//! - **Normalization**: any input, whether plain, behind any number of
//!   `Option`/`Box`/`Rc`/`Arc`/`&` layers, or nil, resolves to a concrete
//!   value, its type, and two flags (`was_pointer`, `is_nil`)
//! - **Tags**: struct- and field-level annotations in the `key:"value"` form,
//!   with a configurable identity key (`vm` by default) for override names and
//!   "participate in processing" flags
//! - **Field selection**: by declared name, by identifier, by tag presence or
//!   by truthy tag value
//! - **Column extraction**: concatenate selected fields across a collection of
//!   records, flattening sequences
//! - **Serde bridge**: any `T: Serialize` can be introspected through
//!   [`to_value`]
//!
//! ## Quick Start
//!
//! ```rust
//! use structmeta::{reflect_struct, to_struct};
//!
//! reflect_struct! {
//!     #[derive(Debug, Clone, Default)]
//!     pub struct Shift => r#"vm:"shift""# {
//!         pub id: i64 => r#"vm:"shiftid""#,
//!         pub staff: Option<String> => r#"export:"true""#,
//!         pub notes: String,
//!     }
//! }
//!
//! let shift = to_struct(&Shift::default()).unwrap();
//! assert_eq!(shift.identifier(), "shift");
//!
//! let fields = shift.fields();
//! assert_eq!(fields.identifiers(), vec!["shiftid", "staff", "notes"]);
//! assert_eq!(fields.with_tag_true("export").names(), vec!["staff"]);
//! ```
//!
//! ### Extracting columns from many records
//!
//! ```rust
//! use structmeta::{reflect_struct, to_structs, Value};
//!
//! reflect_struct! {
//!     pub struct Visit {
//!         pub patient: String,
//!         pub codes: Vec<String>,
//!     }
//! }
//!
//! let visits = vec![
//!     Visit { patient: "p1".into(), codes: vec!["a".into(), "b".into()] },
//!     Visit { patient: "p2".into(), codes: vec!["c".into()] },
//! ];
//!
//! let data = to_structs(&visits).unwrap().extract_data_by_name(["codes"]);
//! assert_eq!(data["codes"].len(), 3);
//! assert_eq!(data["codes"].as_slice()[2], Value::from("c"));
//! ```
//!
//! ## Logging
//!
//! The crate emits records through the [`log`] facade: `trace` for every
//! normalization, `debug` for rejected collections and malformed tags. Install
//! any `log` implementation to see them.

mod data;
pub mod error;
mod field;
pub mod macros;
pub mod normalize;
pub mod options;
pub mod reflect;
pub mod ser;
mod structs;
pub mod tag;
pub mod types;
pub mod value;

pub use data::Data;
pub use error::{Error, Result};
pub use field::{Field, Fields, Struct};
pub use normalize::{normalize, normalize_type, Normalized};
pub use options::{MetaOptions, IDENTITY_KEY, TRUTH_SENTINEL};
pub use reflect::{Record, Reflect};
pub use ser::{to_value, ValueSerializer};
pub use structs::Structs;
pub use tag::Tag;
pub use types::{FieldDef, Kind, StructType, Type};
pub use value::{StructValue, Value};

/// Normalizes `value` and asserts that it is a struct.
///
/// # Examples
///
/// ```rust
/// use structmeta::{reflect_struct, to_struct};
///
/// reflect_struct! {
///     pub struct Point { pub x: i32, pub y: i32 }
/// }
///
/// let point = to_struct(&Some(Box::new(Point { x: 1, y: 2 }))).unwrap();
/// assert_eq!(point.name(), "Point");
/// assert!(point.value().was_pointer());
///
/// assert!(to_struct(&5i32).unwrap_err().is_not_a_struct());
/// ```
///
/// # Errors
///
/// Returns [`Error::NotAStruct`] if the value does not resolve to a struct.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_struct<T>(value: &T) -> Result<Struct>
where
    T: ?Sized + Reflect,
{
    Struct::new(value)
}

/// Converts every element of `values` into a [`Struct`].
///
/// # Errors
///
/// Returns [`Error::Collection`] naming the first element that is not a
/// struct. The collection is rejected as a whole.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_structs<T>(values: &[T]) -> Result<Structs>
where
    T: Reflect,
{
    Structs::from_slice(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::reflect_struct! {
        #[derive(Debug, Clone, Default)]
        struct Point => r#"vm:"pt""# {
            pub x: i32,
            pub y: i32,
        }
    }

    #[test]
    fn test_to_struct_through_pointers() {
        let point = Point { x: 1, y: 2 };
        let s = to_struct(&&point).unwrap();
        assert_eq!(s.name(), "Point");
        assert!(s.value().was_pointer());
        assert_eq!(s.identifier(), "pt");
    }

    #[test]
    fn test_to_struct_nil_pointer() {
        let s = to_struct(&None::<Point>).unwrap();
        assert!(s.is_nil());
        assert_eq!(s.fields().len(), 2);
        assert_eq!(s.field("x").unwrap().value().value(), &Value::Int(0));
    }

    #[test]
    fn test_to_struct_rejects_scalars() {
        assert!(matches!(to_struct(&"text".to_string()), Err(Error::NotAStruct { .. })));
        assert!(matches!(to_struct(&Value::Nil), Err(Error::NotAStruct { .. })));
    }

    #[test]
    fn test_to_structs() {
        let points = vec![Point::default(), Point { x: 3, y: 4 }];
        let structs = to_structs(&points).unwrap();
        assert_eq!(structs.len(), 2);
        assert_eq!(structs.identifiers(), vec!["pt", "pt"]);
    }

    #[test]
    fn test_serde_bridge() {
        #[derive(serde::Serialize)]
        struct Plain {
            a: u8,
        }

        let value = to_value(&Plain { a: 1 }).unwrap();
        let s = to_struct(&value).unwrap();
        assert_eq!(s.name(), "Plain");
        assert_eq!(s.fields().names(), vec!["a"]);
    }
}
