//! Conversion of serde-serializable data into [`Value`]s.
//!
//! Types that do not implement [`Reflect`](crate::Reflect) can still be
//! introspected through their `Serialize` impl. The serde data model carries
//! struct and field names but no tags and no static type of an absent value,
//! so:
//!
//! - every field is exported and untagged
//! - `None` becomes a nil pointer to `Any`
//! - sequences and maps get the common element type of their entries, or `Any`
//! - enum variants other than unit variants become single-entry maps keyed by
//!   the variant name; unit variants become strings
//!
//! ```rust
//! use serde::Serialize;
//! use structmeta::{to_struct, to_value};
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_value(&Point { x: 1, y: 2 }).unwrap();
//! let point = to_struct(&value).unwrap();
//! assert_eq!(point.name(), "Point");
//! assert_eq!(point.fields().names(), vec!["x", "y"]);
//! ```

use crate::{Error, FieldDef, Result, StructType, StructValue, Type, Value};
use indexmap::IndexMap;
use serde::{ser, Serialize};

/// Serializer producing a [`Value`].
pub struct ValueSerializer;

pub struct SerializeVec {
    items: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    entries: IndexMap<String, Value>,
    current_key: Option<String>,
}

pub struct SerializeStruct {
    name: &'static str,
    defs: Vec<FieldDef>,
    values: Vec<Value>,
    variant: Option<&'static str>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeStruct;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStruct;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Int(v as i64))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Int(v as i64))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Int(v as i64))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Uint(v as u64))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Uint(v as u64))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Uint(v as u64))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Uint(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Seq {
            elem: Type::Uint,
            items: v.iter().map(|&b| Value::Uint(b as u64)).collect(),
        })
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Pointer {
            pointee: Type::Any,
            target: None,
        })
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let inner = to_value(value)?;
        Ok(Value::Pointer {
            pointee: inner.type_of(),
            target: Some(Box::new(inner)),
        })
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Nil)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        Ok(Value::Struct(StructValue::new(
            StructType::new(name, name),
            Vec::new(),
        )))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged_variant(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, name: &'static str, len: usize) -> Result<SerializeStruct> {
        Ok(SerializeStruct::new(name, len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<SerializeStruct> {
        Ok(SerializeStruct::new(name, len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStruct> {
        Ok(SerializeStruct::new(variant, len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            items: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn finish(self) -> Value {
        let seq = Value::Seq {
            elem: common_type(&self.items),
            items: self.items,
        };
        match self.variant {
            Some(variant) => tagged_variant(variant, seq),
            None => seq,
        }
    }
}

impl SerializeMap {
    fn new(capacity: usize) -> Self {
        SerializeMap {
            entries: IndexMap::with_capacity(capacity),
            current_key: None,
        }
    }
}

impl SerializeStruct {
    fn new(name: &'static str, capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeStruct {
            name,
            defs: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push(&mut self, name: String, value: Value) {
        self.defs.push(FieldDef::typed(name, value.type_of()));
        self.values.push(value);
    }

    fn finish(self) -> Value {
        let ty = StructType::new(self.name, self.name).with_fields(self.defs);
        let value = Value::Struct(StructValue::new(ty, self.values));
        match self.variant {
            Some(variant) => tagged_variant(variant, value),
            None => value,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeStruct {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let position = self.values.len().to_string();
        self.push(position, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(map_key(to_value(key)?)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.entries.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let value = common_type(self.entries.values());
        Ok(Value::Map {
            key: Type::String,
            value,
            entries: self.entries,
        })
    }
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeStruct {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

/// Converts any `T: Serialize` into a [`Value`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for map keys that are not scalars, and
/// propagates errors raised by the type's own `Serialize` impl.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

fn tagged_variant(variant: &'static str, value: Value) -> Value {
    let value_type = value.type_of();
    let mut entries = IndexMap::with_capacity(1);
    entries.insert(variant.to_string(), value);
    Value::Map {
        key: Type::String,
        value: value_type,
        entries,
    }
}

fn map_key(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(_) | Value::Int(_) | Value::Uint(_) | Value::Float(_) => Ok(key.to_string()),
        other => Err(Error::unsupported_type(&format!(
            "map key of kind {}",
            other.kind()
        ))),
    }
}

// The shared type of all elements, or `Any` when they differ or there are none.
fn common_type<'a, I>(values: I) -> Type
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut types = values.into_iter().map(Value::type_of);
    let Some(first) = types.next() else {
        return Type::Any;
    };
    if types.all(|ty| ty == first) {
        first
    } else {
        Type::Any
    }
}
