use core::fmt;

use indexmap::IndexMap;

use crate::datetime::Datetime;
use crate::number::format_float;

/// A mapping from key to value, in insertion order.
pub type Table = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(Datetime),
    Array(Vec<Value>),
    Table(Table),
    /// The target of repeated `[[path]]` headers.
    TableArray(Vec<Table>),
}

/// Category used to keep arrays homogeneous. Integers and floats are
/// distinct, and so are the three datetime forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    String,
    Integer,
    Float,
    Boolean,
    LocalDate,
    LocalDateTime,
    OffsetDateTime,
    Array,
    Table,
    TableArray,
}

impl Family {
    pub fn as_str(self) -> &'static str {
        match self {
            Family::String => "string",
            Family::Integer => "integer",
            Family::Float => "float",
            Family::Boolean => "boolean",
            Family::LocalDate => "local date",
            Family::LocalDateTime => "local date-time",
            Family::OffsetDateTime => "offset date-time",
            Family::Array => "array",
            Family::Table => "table",
            Family::TableArray => "array of tables",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn family(&self) -> Family {
        match self {
            Value::String(_) => Family::String,
            Value::Integer(_) => Family::Integer,
            Value::Float(_) => Family::Float,
            Value::Boolean(_) => Family::Boolean,
            Value::Datetime(Datetime::Date(_)) => Family::LocalDate,
            Value::Datetime(Datetime::Local(_)) => Family::LocalDateTime,
            Value::Datetime(Datetime::Offset(_)) => Family::OffsetDateTime,
            Value::Array(_) => Family::Array,
            Value::Table(_) => Family::Table,
            Value::TableArray(_) => Family::TableArray,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.family().as_str()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Value::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_array(&self) -> Option<&[Table]> {
        match self {
            Value::TableArray(t) => Some(t),
            _ => None,
        }
    }

    /// Looks `key` up when this value is a table.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_table().and_then(|t| t.get(key))
    }
}

/// Renders the value as a TOML inline literal.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write_basic_string(f, s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(num) => f.write_str(&format_float(*num)),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Datetime(dt) => write!(f, "{}", dt),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Table(table) => write_inline_table(f, table),
            Value::TableArray(tables) => {
                f.write_str("[")?;
                for (i, table) in tables.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_inline_table(f, table)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn write_inline_table(f: &mut fmt::Formatter<'_>, table: &Table) -> fmt::Result {
    if table.is_empty() {
        return f.write_str("{}");
    }
    f.write_str("{ ")?;
    for (i, (key, value)) in table.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_key(f, key)?;
        write!(f, " = {}", value)?;
    }
    f.write_str(" }")
}

pub(crate) fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    if !key.is_empty() && key.chars().all(is_bare_key_char) {
        f.write_str(key)
    } else {
        write_basic_string(f, key)
    }
}

fn write_basic_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    use fmt::Write;
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{0008}' => f.write_str("\\b")?,
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            '\u{000C}' => f.write_str("\\f")?,
            '\r' => f.write_str("\\r")?,
            c if (c as u32) < 0x20 || c == '\u{7F}' => write!(f, "\\u{:04X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
