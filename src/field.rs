//! The field model.
//!
//! A [`Struct`] is a named view over one normalized struct value. Its
//! [`Fields`] enumerate every declared member in declaration order, exported
//! or not, each with its tag, access level, declared type and independently
//! normalized value.
//!
//! Recursion is caller-driven: a struct-typed field is not expanded
//! automatically, but [`Field::to_struct`] turns it into a child [`Struct`].
//!
//! All lookups are total. Missing tags and unmatched names produce empty
//! results rather than errors.
//!
//! ## Examples
//!
//! ```rust
//! use structmeta::{reflect_struct, to_struct};
//!
//! reflect_struct! {
//!     #[derive(Default)]
//!     struct Location {
//!         pub name: String,
//!     }
//! }
//!
//! reflect_struct! {
//!     #[derive(Default)]
//!     struct Shift {
//!         pub id: i64 => r#"vm:"shiftid""#,
//!         pub staff: Option<String>,
//!         pub location: Location => r#"struct:"true""#,
//!     }
//! }
//!
//! let shift = to_struct(&Shift::default()).unwrap();
//! let nested = shift.fields().with_tag_true("struct");
//! assert_eq!(nested.names(), vec!["location"]);
//!
//! let location = nested[0].to_struct().unwrap();
//! assert_eq!(location.name(), "Location");
//! ```

use crate::normalize::{normalize, Normalized};
use crate::{Error, FieldDef, MetaOptions, Reflect, Result, StructType, Tag, Type, Value};
use std::ops::Index;

/// A named, typed view over one struct value.
#[derive(Clone, Debug, PartialEq)]
pub struct Struct {
    name: String,
    value: Normalized,
    ty: StructType,
}

impl Struct {
    /// Normalizes `input` and asserts that it resolves to a struct.
    ///
    /// A nil pointer to a struct type is accepted; its fields carry zero
    /// values and [`Struct::is_nil`] reports the absence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAStruct`] if the input resolves to anything other
    /// than a struct, including an untyped nil.
    pub fn new<T: Reflect + ?Sized>(input: &T) -> Result<Self> {
        Struct::from_normalized(normalize(input))
    }

    /// Wraps an already normalized value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAStruct`] if the value is not struct-shaped.
    pub fn from_normalized(value: Normalized) -> Result<Self> {
        let ty = match value.ty() {
            Type::Struct(ty) => ty.clone(),
            other => return Err(Error::not_a_struct(other)),
        };
        Ok(Struct {
            name: ty.name().to_string(),
            value,
            ty,
        })
    }

    /// The declared type name; empty for anonymous types.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &Normalized {
        &self.value
    }

    #[must_use]
    pub fn ty(&self) -> &StructType {
        &self.ty
    }

    /// The struct-level tag.
    #[must_use]
    pub fn tag(&self) -> &Tag {
        self.ty.tag()
    }

    /// Returns `true` if this struct came from a nil pointer.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.value.is_nil()
    }

    /// Enumerates every declared field in declaration order.
    #[must_use]
    pub fn fields(&self) -> Fields {
        let values = match self.value.value() {
            Value::Struct(sv) => sv.fields(),
            _ => &[][..],
        };
        self.ty
            .fields()
            .iter()
            .enumerate()
            .map(|(index, def)| {
                let value = values.get(index).cloned().unwrap_or_else(|| def.ty().zero());
                Field::new(index, def, value)
            })
            .collect()
    }

    /// Returns the field declared as `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Field> {
        self.fields().into_iter().find(|field| field.name() == name)
    }

    /// Returns the first non-empty struct-level tag value among `keys`, or
    /// the type name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structmeta::{reflect_struct, to_struct};
    ///
    /// reflect_struct! {
    ///     struct Staff => r#"json:"staff" db:"""# {
    ///         pub id: i64,
    ///     }
    /// }
    ///
    /// let staff = to_struct(&Staff { id: 1 }).unwrap();
    /// assert_eq!(staff.tag_name(["db", "json"]), "staff");
    /// assert_eq!(staff.tag_name(["db"]), "Staff");
    /// ```
    pub fn tag_name<I>(&self, keys: I) -> String
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.tag()
            .first_non_empty(keys)
            .unwrap_or(self.name.as_str())
            .to_string()
    }

    /// The struct-level identity tag value, or the type name.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.identifier_with(&MetaOptions::default())
    }

    #[must_use]
    pub fn identifier_with(&self, options: &MetaOptions) -> String {
        self.tag()
            .get_non_empty(&options.identity_key)
            .unwrap_or(self.name.as_str())
            .to_string()
    }
}

/// One declared member of a [`Struct`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    index: usize,
    name: String,
    tag: Tag,
    exported: bool,
    value: Normalized,
    ty: Type,
}

impl Field {
    fn new(index: usize, def: &FieldDef, value: Value) -> Self {
        Field {
            index,
            name: def.name().to_string(),
            tag: def.tag().clone(),
            exported: def.exported(),
            value: Normalized::from_value(value),
            ty: def.ty(),
        }
    }

    /// Position of the field in declaration order.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Whether the field is visible outside its declaring module.
    #[must_use]
    pub fn exported(&self) -> bool {
        self.exported
    }

    /// The normalized field value.
    #[must_use]
    pub fn value(&self) -> &Normalized {
        &self.value
    }

    /// The declared type, before normalization.
    #[must_use]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[must_use]
    pub fn has_tag(&self, key: &str) -> bool {
        self.tag.contains_key(key)
    }

    /// Returns `true` if the tag under `key` equals the default truth sentinel.
    #[must_use]
    pub fn is_tag_true(&self, key: &str) -> bool {
        self.is_tag_true_with(key, &MetaOptions::default())
    }

    #[must_use]
    pub fn is_tag_true_with(&self, key: &str, options: &MetaOptions) -> bool {
        self.tag.get(key).is_some_and(|value| options.is_truthy(value))
    }

    /// Returns the first non-empty tag value among `keys`, or the field name.
    pub fn tag_name<I>(&self, keys: I) -> String
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.tag
            .first_non_empty(keys)
            .unwrap_or(self.name.as_str())
            .to_string()
    }

    /// The identity tag value if present and non-empty, else the field name.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.identifier_with(&MetaOptions::default())
    }

    #[must_use]
    pub fn identifier_with(&self, options: &MetaOptions) -> String {
        self.tag
            .get_non_empty(&options.identity_key)
            .unwrap_or(self.name.as_str())
            .to_string()
    }

    /// Views a struct-typed field as a [`Struct`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAStruct`] if the field value is not struct-shaped.
    pub fn to_struct(&self) -> Result<Struct> {
        Struct::from_normalized(self.value.clone())
    }
}

/// An ordered selection of fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields(Vec<Field>);

impl Fields {
    #[must_use]
    pub fn new() -> Self {
        Fields(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Field] {
        &self.0
    }

    /// Returns the field declared as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|field| field.name == name)
    }

    fn filter<P>(&self, predicate: P) -> Fields
    where
        P: FnMut(&&Field) -> bool,
    {
        self.0.iter().filter(predicate).cloned().collect()
    }

    /// Fields whose tag contains `key`, whatever its value.
    #[must_use]
    pub fn with_tag(&self, key: &str) -> Fields {
        self.filter(|field| field.has_tag(key))
    }

    /// Fields whose tag under `key` equals `value` exactly.
    #[must_use]
    pub fn with_tag_value(&self, key: &str, value: &str) -> Fields {
        self.filter(|field| field.tag.is(key, value))
    }

    /// Fields whose tag under `key` equals the default truth sentinel.
    #[must_use]
    pub fn with_tag_true(&self, key: &str) -> Fields {
        self.with_tag_true_with(key, &MetaOptions::default())
    }

    #[must_use]
    pub fn with_tag_true_with(&self, key: &str, options: &MetaOptions) -> Fields {
        self.filter(|field| field.is_tag_true_with(key, options))
    }

    /// Fields whose declared name is in `names`.
    ///
    /// The result follows field order, not the order of `names`; unmatched
    /// names are ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structmeta::{reflect_struct, to_struct};
    ///
    /// reflect_struct! {
    ///     struct Row {
    ///         pub a: i32,
    ///         pub b: i32,
    ///         pub c: i32,
    ///     }
    /// }
    ///
    /// let row = to_struct(&Row { a: 1, b: 2, c: 3 }).unwrap();
    /// let picked = row.fields().by_names(["c", "a", "zzz"]);
    /// assert_eq!(picked.names(), vec!["a", "c"]);
    /// ```
    pub fn by_names<I>(&self, names: I) -> Fields
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let names: Vec<I::Item> = names.into_iter().collect();
        self.filter(|field| names.iter().any(|name| name.as_ref() == field.name))
    }

    /// Fields whose [`Field::identifier`] is in `identifiers`.
    pub fn by_identifiers<I>(&self, identifiers: I) -> Fields
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let identifiers: Vec<I::Item> = identifiers.into_iter().collect();
        self.filter(|field| {
            let identifier = field.identifier();
            identifiers.iter().any(|wanted| wanted.as_ref() == identifier)
        })
    }

    /// Exported fields only.
    #[must_use]
    pub fn exported(&self) -> Fields {
        self.filter(|field| field.exported)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Field::name).collect()
    }

    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.0.iter().map(Field::identifier).collect()
    }
}

impl Index<usize> for Fields {
    type Output = Field;

    fn index(&self, index: usize) -> &Field {
        &self.0[index]
    }
}

impl IntoIterator for Fields {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        Fields(iter.into_iter().collect())
    }
}
