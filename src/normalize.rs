//! Value normalization.
//!
//! Normalization resolves any input down to its concrete, non-pointer form:
//! pointer chains of any depth are collapsed, and the result records whether
//! the input was pointer-shaped and whether the chain ended in nil. A nil
//! pointer still reports the type it points to.
//!
//! Normalization never fails; untyped nil, typed nil and plain values are all
//! valid results.
//!
//! ## Examples
//!
//! ```rust
//! use structmeta::{normalize, Type};
//!
//! let plain = normalize(&5i64);
//! assert_eq!(plain.ty(), &Type::Int);
//! assert!(!plain.was_pointer());
//!
//! let boxed = normalize(&Some(Box::new(5i64)));
//! assert_eq!(boxed.ty(), &Type::Int);
//! assert!(boxed.was_pointer());
//!
//! let missing = normalize(&None::<Box<i64>>);
//! assert!(missing.is_nil());
//! assert_eq!(missing.ty(), &Type::Int);
//! ```

use crate::{Kind, Reflect, Type, Value};

const LOG_TARGET: &str = "normalize";

/// The fully dereferenced form of a value.
///
/// `value` and `ty` always describe the dereferenced form; for a nil result
/// `value` is the zero value of `ty`.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    value: Value,
    ty: Type,
    was_pointer: bool,
    is_nil: bool,
}

impl Normalized {
    /// The untyped nil.
    #[must_use]
    pub fn nil() -> Self {
        Normalized {
            value: Value::Nil,
            ty: Type::Invalid,
            was_pointer: false,
            is_nil: true,
        }
    }

    /// Dereferences `value` through every pointer layer.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let mut current = value;
        let mut last_pointee: Option<Type> = None;

        let normalized = loop {
            match current {
                Value::Pointer { pointee, target } => match target {
                    Some(target) => {
                        last_pointee = Some(pointee);
                        current = *target;
                    }
                    None => break Normalized::typed_nil(&pointee),
                },
                Value::Nil => match &last_pointee {
                    Some(pointee) => break Normalized::typed_nil(&pointee),
                    None => break Normalized::nil(),
                },
                concrete => {
                    break Normalized {
                        ty: concrete.type_of(),
                        value: concrete,
                        was_pointer: false,
                        is_nil: false,
                    }
                }
            }
        };

        let was_pointer = last_pointee.is_some() || normalized.was_pointer;
        let normalized = Normalized {
            was_pointer,
            ..normalized
        };
        log::trace!(
            target: LOG_TARGET,
            "normalized to {} (pointer: {}, nil: {})",
            normalized.ty,
            normalized.was_pointer,
            normalized.is_nil
        );
        normalized
    }

    /// Derives the zero-form value of a type descriptor.
    ///
    /// Pointer layers of the descriptor are stripped, but a descriptor carries
    /// no pointer-ness of an instance, so `was_pointer` is never set. `Invalid`
    /// and `Any` descriptors have no concrete shape and yield the untyped nil.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structmeta::{Normalized, Type, Value};
    ///
    /// let ptr = Type::Pointer(Box::new(Type::Bool));
    /// let normalized = Normalized::from_type(&ptr);
    /// assert_eq!(normalized.ty(), &Type::Bool);
    /// assert_eq!(normalized.value(), &Value::Bool(false));
    /// assert!(!normalized.was_pointer());
    /// assert!(!normalized.is_nil());
    /// ```
    #[must_use]
    pub fn from_type(ty: &Type) -> Self {
        let ty = ty.indirect();
        if matches!(ty, Type::Invalid | Type::Any) {
            return Normalized::nil();
        }
        Normalized {
            value: ty.zero(),
            ty: ty.clone(),
            was_pointer: false,
            is_nil: false,
        }
    }

    // A pointer chain ending in nil: the fully dereferenced pointee type and
    // its zero value.
    fn typed_nil(pointee: &Type) -> Self {
        let ty = pointee.indirect().clone();
        Normalized {
            value: ty.zero(),
            ty,
            was_pointer: true,
            is_nil: true,
        }
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    #[must_use]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.ty.kind()
    }

    /// Returns `true` if the input had at least one pointer layer.
    #[must_use]
    pub fn was_pointer(&self) -> bool {
        self.was_pointer
    }

    /// Returns `true` if the input was nil or a pointer chain ending in nil.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.is_nil
    }

    /// Returns `true` if the value is present and struct-shaped, or a nil
    /// pointer to a struct type.
    #[must_use]
    pub fn is_struct(&self) -> bool {
        self.ty.is_struct()
    }
}

impl Default for Normalized {
    fn default() -> Self {
        Normalized::nil()
    }
}

/// Renormalizing a normalized value gives back the same result, including
/// the pointer flag.
impl Reflect for Normalized {
    fn reflect_type() -> Type {
        Type::Any
    }

    fn reflect(&self) -> Value {
        match (self.was_pointer, self.is_nil) {
            (false, false) => self.value.clone(),
            (false, true) => Value::Nil,
            (true, true) => Value::Pointer {
                pointee: self.ty.clone(),
                target: None,
            },
            (true, false) => Value::Pointer {
                pointee: self.ty.clone(),
                target: Some(Box::new(self.value.clone())),
            },
        }
    }
}

/// Normalizes any reflectable input.
///
/// Accepts plain values, pointer-shaped values of any depth, and already
/// reflected [`Value`]s or [`Normalized`] handles.
pub fn normalize<T: Reflect + ?Sized>(input: &T) -> Normalized {
    Normalized::from_value(input.reflect())
}

/// Normalizes a type descriptor; see [`Normalized::from_type`].
pub fn normalize_type(ty: &Type) -> Normalized {
    Normalized::from_type(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_untyped_nil() {
        let normalized = normalize(&Value::Nil);
        assert!(normalized.is_nil());
        assert!(!normalized.was_pointer());
        assert_eq!(normalized.ty(), &Type::Invalid);
        assert_eq!(normalized, Normalized::nil());
    }

    #[test]
    fn test_deep_chain_collapses() {
        let value = Some(Rc::new(Box::new(Some(42u32))));
        let normalized = normalize(&value);
        assert_eq!(normalized.value(), &Value::Uint(42));
        assert_eq!(normalized.ty(), &Type::Uint);
        assert!(normalized.was_pointer());
        assert!(!normalized.is_nil());
    }

    #[test]
    fn test_nil_inside_chain_reports_innermost_type() {
        let value: Option<Box<Option<String>>> = Some(Box::new(None));
        let normalized = normalize(&value);
        assert!(normalized.is_nil());
        assert!(normalized.was_pointer());
        assert_eq!(normalized.ty(), &Type::String);
        assert_eq!(normalized.value(), &Value::String(String::new()));
    }

    #[test]
    fn test_pointer_to_dynamic_nil() {
        let value = Some(Value::Nil);
        let normalized = normalize(&value);
        assert!(normalized.is_nil());
        assert!(normalized.was_pointer());
        assert_eq!(normalized.ty(), &Type::Any);
    }

    #[test]
    fn test_dynamic_slot_unwraps_pointer() {
        let inner = Some(7i64).reflect();
        let normalized = normalize(&inner);
        assert_eq!(normalized.value(), &Value::Int(7));
        assert!(normalized.was_pointer());
    }

    #[test]
    fn test_renormalize_is_identity() {
        let inputs = [
            Value::Nil,
            5i64.reflect(),
            Some(5i64).reflect(),
            None::<Box<bool>>.reflect(),
            Some(Value::Nil).reflect(),
        ];
        for input in inputs {
            let once = normalize(&input);
            assert_eq!(normalize(&once), once, "input: {}", input);
        }
    }

    #[test]
    fn test_type_descriptor_inputs() {
        assert_eq!(normalize_type(&Type::Invalid), Normalized::nil());
        assert_eq!(normalize_type(&Type::Any), Normalized::nil());
        let normalized = normalize_type(&Type::Seq(Box::new(Type::Int)));
        assert_eq!(normalized.kind(), Kind::Seq);
        assert_eq!(normalized.value().as_seq().map(<[Value]>::len), Some(0));
    }
}
