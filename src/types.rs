//! Type descriptors.
//!
//! A [`Type`] describes the shape of a [`Value`](crate::Value) independently of
//! any instance. Struct descriptors ([`StructType`]) carry the declared name,
//! struct-level tag and an ordered list of [`FieldDef`]s with per-field tags and
//! access level.
//!
//! Field descriptors resolve their type lazily, so records that contain
//! themselves through a sequence or pointer (`Vec<Self>`, `Option<Box<Self>>`)
//! have finite descriptors.
//!
//! ## Examples
//!
//! ```rust
//! use structmeta::{FieldDef, Kind, StructType, Type};
//!
//! let ty = Type::Struct(
//!     StructType::new("Point", "geo::Point").with_fields(vec![
//!         FieldDef::typed("x", Type::Float).with_tag(r#"vm:"x""#),
//!         FieldDef::typed("y", Type::Float),
//!     ]),
//! );
//!
//! assert_eq!(ty.kind(), Kind::Struct);
//! assert_eq!(ty.name(), "Point");
//! assert_eq!(Type::Pointer(Box::new(ty.clone())).indirect(), &ty);
//! ```

use crate::{StructValue, Tag, Value};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// The shape category of a type, without its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Invalid,
    Any,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Time,
    Seq,
    Map,
    Struct,
    Pointer,
}

impl Kind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Any => "any",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Time => "time",
            Kind::Seq => "seq",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Pointer => "pointer",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type descriptor.
///
/// `Invalid` is the type of an untyped nil; `Any` is a dynamically typed slot
/// (a field of type [`Value`](crate::Value)).
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Type {
    #[default]
    Invalid,
    Any,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Time,
    Seq(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Struct(StructType),
    Pointer(Box<Type>),
}

impl Type {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Type::Invalid => Kind::Invalid,
            Type::Any => Kind::Any,
            Type::Bool => Kind::Bool,
            Type::Int => Kind::Int,
            Type::Uint => Kind::Uint,
            Type::Float => Kind::Float,
            Type::String => Kind::String,
            Type::Time => Kind::Time,
            Type::Seq(_) => Kind::Seq,
            Type::Map(..) => Kind::Map,
            Type::Struct(_) => Kind::Struct,
            Type::Pointer(_) => Kind::Pointer,
        }
    }

    /// Returns the declared name of the type.
    ///
    /// Structs report their declared name (empty for anonymous tuple types),
    /// scalars their kind name, and unnamed composites an empty string.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Type::Struct(st) => st.name(),
            Type::Seq(_) | Type::Map(..) | Type::Pointer(_) => "",
            other => other.kind().as_str(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    #[inline]
    #[must_use]
    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    #[must_use]
    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Type::Struct(st) => Some(st),
            _ => None,
        }
    }

    /// Returns the element type of a pointer or sequence.
    #[must_use]
    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Pointer(inner) | Type::Seq(inner) => Some(inner),
            Type::Map(_, value) => Some(value),
            _ => None,
        }
    }

    /// Strips every pointer layer and returns the innermost type.
    #[must_use]
    pub fn indirect(&self) -> &Type {
        let mut current = self;
        while let Type::Pointer(inner) = current {
            current = inner;
        }
        current
    }

    /// Builds the zero value of this type.
    ///
    /// Pointers are nil, sequences and maps empty, structs carry the zero value
    /// of every field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structmeta::{Type, Value};
    ///
    /// assert_eq!(Type::Int.zero(), Value::Int(0));
    /// assert!(Type::Pointer(Box::new(Type::Int)).zero().is_nil_pointer());
    /// assert_eq!(Type::Any.zero(), Value::Nil);
    /// ```
    #[must_use]
    pub fn zero(&self) -> Value {
        match self {
            Type::Invalid | Type::Any => Value::Nil,
            Type::Bool => Value::Bool(false),
            Type::Int => Value::Int(0),
            Type::Uint => Value::Uint(0),
            Type::Float => Value::Float(0.0),
            Type::String => Value::String(String::new()),
            Type::Time => Value::Time(DateTime::<Utc>::default()),
            Type::Seq(elem) => Value::Seq {
                elem: (**elem).clone(),
                items: Vec::new(),
            },
            Type::Map(key, value) => Value::Map {
                key: (**key).clone(),
                value: (**value).clone(),
                entries: IndexMap::new(),
            },
            Type::Struct(st) => Value::Struct(st.zero()),
            Type::Pointer(pointee) => Value::Pointer {
                pointee: (**pointee).clone(),
                target: None,
            },
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Seq(elem) => write!(f, "[{}]", elem),
            Type::Map(key, value) => write!(f, "{{{}: {}}}", key, value),
            Type::Pointer(pointee) => write!(f, "Ptr<{}>", pointee),
            Type::Struct(st) if st.name().is_empty() => f.write_str(st.path()),
            Type::Struct(st) => f.write_str(st.name()),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// Descriptor of a struct type: declared name, full path, struct-level tag and
/// fields in declaration order.
///
/// Cloning is cheap; the descriptor is shared.
#[derive(Clone, Debug)]
pub struct StructType(Arc<StructTypeInner>);

#[derive(Clone, Debug)]
struct StructTypeInner {
    name: Cow<'static, str>,
    path: Cow<'static, str>,
    tag: Tag,
    fields: Vec<FieldDef>,
}

impl StructType {
    /// Creates a descriptor with no fields and no tag.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, path: impl Into<Cow<'static, str>>) -> Self {
        StructType(Arc::new(StructTypeInner {
            name: name.into(),
            path: path.into(),
            tag: Tag::new(),
            fields: Vec::new(),
        }))
    }

    /// Creates a descriptor for an anonymous type (empty declared name).
    #[must_use]
    pub fn anonymous(path: impl Into<Cow<'static, str>>) -> Self {
        StructType::new("", path)
    }

    /// Sets the struct-level tag from its raw `key:"value"` form.
    #[must_use]
    pub fn with_tag(mut self, raw: &str) -> Self {
        Arc::make_mut(&mut self.0).tag = Tag::parse(raw);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldDef>) -> Self {
        Arc::make_mut(&mut self.0).fields = fields;
        self
    }

    /// The declared name; empty for anonymous types.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The fully qualified type path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.0.path
    }

    #[must_use]
    pub fn tag(&self) -> &Tag {
        &self.0.tag
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.0.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.0.fields.iter().find(|field| field.name() == name)
    }

    /// Builds the zero value of this struct.
    #[must_use]
    pub fn zero(&self) -> StructValue {
        let fields = self.0.fields.iter().map(|field| field.ty().zero()).collect();
        StructValue::new(self.clone(), fields)
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.path == other.0.path
                && self.0.name == other.0.name
                && self.0.tag == other.0.tag
                && self.0.fields == other.0.fields)
    }
}

#[derive(Clone)]
enum TypeSource {
    Deferred(fn() -> Type),
    Known(Type),
}

impl fmt::Debug for TypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSource::Deferred(_) => f.write_str("Deferred"),
            TypeSource::Known(ty) => write!(f, "Known({})", ty),
        }
    }
}

/// Descriptor of one declared struct member.
#[derive(Clone, Debug)]
pub struct FieldDef {
    name: Cow<'static, str>,
    tag: Tag,
    exported: bool,
    ty: TypeSource,
}

impl FieldDef {
    /// Creates an exported field whose type is resolved on demand.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, ty: fn() -> Type) -> Self {
        FieldDef {
            name: name.into(),
            tag: Tag::new(),
            exported: true,
            ty: TypeSource::Deferred(ty),
        }
    }

    /// Creates an exported field with an already known type.
    #[must_use]
    pub fn typed(name: impl Into<Cow<'static, str>>, ty: Type) -> Self {
        FieldDef {
            name: name.into(),
            tag: Tag::new(),
            exported: true,
            ty: TypeSource::Known(ty),
        }
    }

    /// Sets the field tag from its raw `key:"value"` form.
    #[must_use]
    pub fn with_tag(mut self, raw: &str) -> Self {
        self.tag = Tag::parse(raw);
        self
    }

    /// Sets the access level; non-exported fields are still enumerated.
    #[must_use]
    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    #[must_use]
    pub fn exported(&self) -> bool {
        self.exported
    }

    /// Resolves the declared type.
    #[must_use]
    pub fn ty(&self) -> Type {
        match &self.ty {
            TypeSource::Deferred(resolve) => resolve(),
            TypeSource::Known(ty) => ty.clone(),
        }
    }
}

impl PartialEq for FieldDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.tag == other.tag && self.exported == other.exported
    }
}
