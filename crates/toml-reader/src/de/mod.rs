//! serde::Deserializer implementation backed by the decoded Value tree

use serde::de::{self, DeserializeOwned, IntoDeserializer, MapAccess, SeqAccess};
use serde::de::value::MapAccessDeserializer;

use crate::value::{Table, Value};
use crate::{Error, Result};

#[derive(Debug)]
pub struct DeError {
    msg: String,
}

impl core::fmt::Display for DeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.msg)
    }
}
impl de::Error for DeError {
    fn custom<T: core::fmt::Display>(t: T) -> Self {
        DeError {
            msg: format!("{}", t),
        }
    }
}
impl core::error::Error for DeError {}

pub struct Deserializer {
    value: Value,
}

impl Deserializer {
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }
}

struct SeqDeserializer<I> {
    iter: I,
}

impl<'de, I> SeqAccess<'de> for SeqDeserializer<I>
where
    I: Iterator<Item = Value>,
{
    type Error = DeError;

    fn next_element_seed<T>(&mut self, seed: T) -> core::result::Result<Option<T::Value>, DeError>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(Deserializer { value }).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lo, Some(hi)) if lo == hi => Some(lo),
            _ => None,
        }
    }
}

struct TableAccess {
    entries: indexmap::map::IntoIter<String, Value>,
    next_val: Option<Value>,
}

impl TableAccess {
    fn new(table: Table) -> Self {
        Self {
            entries: table.into_iter(),
            next_val: None,
        }
    }
}

impl<'de> MapAccess<'de> for TableAccess {
    type Error = DeError;

    fn next_key_seed<K>(&mut self, seed: K) -> core::result::Result<Option<K::Value>, DeError>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((key, val)) => {
                self.next_val = Some(val);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<VV>(&mut self, seed: VV) -> core::result::Result<VV::Value, DeError>
    where
        VV: de::DeserializeSeed<'de>,
    {
        match self.next_val.take() {
            Some(value) => seed.deserialize(Deserializer { value }),
            None => Err(de::Error::custom("value requested before its key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = DeError;

    fn deserialize_any<V>(self, visitor: V) -> core::result::Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Datetime(d) => visitor.visit_string(d.to_string()),
            Value::Array(items) => visitor.visit_seq(SeqDeserializer {
                iter: items.into_iter(),
            }),
            Value::Table(t) => visitor.visit_map(TableAccess::new(t)),
            Value::TableArray(tables) => visitor.visit_seq(SeqDeserializer {
                iter: tables.into_iter().map(Value::Table),
            }),
        }
    }

    // A present key is always `Some`; absent keys never reach the deserializer.
    fn deserialize_option<V>(self, visitor: V) -> core::result::Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> core::result::Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    /// Unit variants are written as strings, others as a single-key table.
    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> core::result::Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Table(t) if t.len() == 1 => {
                visitor.visit_enum(MapAccessDeserializer::new(TableAccess::new(t)))
            }
            other => Err(de::Error::custom(format!(
                "expected enum {} as a string or a single-key table, found {}",
                name,
                other.type_name()
            ))),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 char str string bytes byte_buf
        unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(Deserializer::from_value(value)).map_err(|e: DeError| Error::Message(e.msg))
}
