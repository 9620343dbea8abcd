#![doc = include_str!("../README.md")]

pub mod datetime;
pub mod decode;
pub mod error;
pub mod options;
pub mod value;

mod number;

#[cfg(feature = "serde")]
pub mod de;

pub use crate::datetime::Datetime;
pub use crate::error::{Error, ErrorKind, ParseError, Result};
pub use crate::options::Options;
pub use crate::value::{Family, Table, Value};

use std::io::Read;

#[cfg(feature = "serde")]
use serde::de::DeserializeOwned;

/// Parses a document with default [`Options`].
pub fn parse(input: &str) -> core::result::Result<Table, ParseError> {
    parse_with_options(input, &Options::default())
}

pub fn parse_with_options(input: &str, options: &Options) -> core::result::Result<Table, ParseError> {
    crate::decode::document::parse_document(input, options)
}

/// Reads the whole stream into memory, then parses it.
pub fn from_reader<R: Read>(mut reader: R, options: &Options) -> Result<Table> {
    let mut s = String::new();
    reader.read_to_string(&mut s)?;
    Ok(parse_with_options(&s, options)?)
}

#[cfg(feature = "serde")]
pub fn from_str<T: DeserializeOwned>(s: &str, options: &Options) -> Result<T> {
    let root = parse_with_options(s, options)?;
    from_value(Value::Table(root))
}

#[cfg(feature = "serde")]
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    crate::de::from_value(value)
}

/// Converts a decoded table to JSON. Datetimes and non-finite floats become
/// strings; table arrays become arrays of objects.
#[cfg(feature = "json")]
pub fn to_json_value(table: &Table) -> serde_json::Value {
    serde_json::Value::Object(
        table
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect(),
    )
}

#[cfg(feature = "json")]
fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as J;
    match value {
        Value::String(s) => J::String(s.clone()),
        Value::Integer(i) => J::Number((*i).into()),
        Value::Float(f) => match serde_json::Number::from_f64(*f) {
            Some(n) => J::Number(n),
            None => J::String(crate::number::format_float(*f)),
        },
        Value::Boolean(b) => J::Bool(*b),
        Value::Datetime(d) => J::String(d.to_string()),
        Value::Array(items) => J::Array(items.iter().map(value_to_json).collect()),
        Value::Table(t) => to_json_value(t),
        Value::TableArray(tables) => J::Array(tables.iter().map(to_json_value).collect()),
    }
}
