//! Key paths and their resolution against a table tree.
//!
//! Rules:
//! - Dotted keys inside a block or inline table create missing tables and
//!   descend into existing ones; anything else on the way is a conflict
//! - Header paths also descend into the last element of an array of tables
//! - A header landing on an existing table merges its body into it; two
//!   tables merge recursively, any other key collision is a duplicate key
//! - A table written inline is closed; headers and dotted keys cannot reach
//!   into it afterwards

use core::fmt;
use std::collections::HashSet;

use crate::decode::Fault;
use crate::error::ErrorKind;
use crate::value::{Table, Value, is_bare_key_char};

/// One or more key segments, as written in `a."b c".d`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Returns `None` for an empty segment list.
    pub fn new(segments: Vec<String>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// All segments but the last, and the last one.
    pub fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }

    fn prefix(&self, len: usize) -> KeyPath {
        KeyPath {
            segments: self.segments[..len].to_vec(),
        }
    }

    fn child(&self, key: &str) -> KeyPath {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        KeyPath { segments }
    }

    /// This path read relative to `prefix`; the root block has none.
    pub fn under(&self, prefix: Option<&KeyPath>) -> KeyPath {
        match prefix {
            Some(prefix) => {
                let mut segments = prefix.segments.clone();
                segments.extend(self.segments.iter().cloned());
                KeyPath { segments }
            }
            None => self.clone(),
        }
    }

    /// True when `self` lies strictly below `ancestor`.
    pub fn is_below(&self, ancestor: &KeyPath) -> bool {
        self.segments.len() > ancestor.segments.len()
            && self.segments.starts_with(&ancestor.segments)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if !seg.is_empty() && seg.chars().all(is_bare_key_char) {
                f.write_str(seg)?;
            } else {
                write!(f, "{:?}", seg)?;
            }
        }
        Ok(())
    }
}

/// Resolution failure, located by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PathError {
    fn conflict(path: &KeyPath, found: &Value) -> Self {
        Self {
            kind: ErrorKind::StructuralConflict,
            message: format!("`{}` is a {}, not a table", path, found.type_name()),
        }
    }

    fn duplicate_key(path: &KeyPath) -> Self {
        Self {
            kind: ErrorKind::DuplicateKey,
            message: format!("key `{}` is defined twice", path),
        }
    }

    pub fn duplicate_table(path: &KeyPath) -> Self {
        Self {
            kind: ErrorKind::DuplicateTable,
            message: format!("table [{}] is defined twice", path),
        }
    }

    pub fn closed_table(path: &KeyPath, kind: ErrorKind) -> Self {
        Self {
            kind,
            message: format!("table `{}` was written inline and cannot be extended", path),
        }
    }

    pub fn at(self, offset: usize) -> Fault {
        Fault::new(self.kind, offset, self.message)
    }
}

/// Paths of tables written as `{ ... }` values. Such a table is complete as
/// written: no header or later dotted key may add to it.
#[derive(Debug, Default)]
pub struct ClosedTables {
    paths: HashSet<KeyPath>,
}

impl ClosedTables {
    pub fn close(&mut self, path: KeyPath) {
        self.paths.insert(path);
    }

    /// The closed table that `path` lands on or runs through.
    pub fn enclosing(&self, path: &KeyPath) -> Option<KeyPath> {
        (1..=path.segments.len())
            .map(|len| path.prefix(len))
            .find(|p| self.paths.contains(p))
    }

    pub fn forget_below(&mut self, path: &KeyPath) {
        self.paths.retain(|p| !p.is_below(path));
    }
}

// Arrays of tables are created with one element, so this cannot happen in
// a tree built by the assembler.
fn empty_table_array() -> PathError {
    PathError {
        kind: ErrorKind::StructuralConflict,
        message: "array of tables has no element to extend".to_string(),
    }
}

/// Stores `value` under a dotted key relative to `table`.
pub fn insert_dotted(table: &mut Table, path: &KeyPath, value: Value) -> Result<(), PathError> {
    let (parents, last) = path.split_last();
    let mut current = table;
    for (i, seg) in parents.iter().enumerate() {
        current = match current
            .entry(seg.clone())
            .or_insert_with(|| Value::Table(Table::new()))
        {
            Value::Table(t) => t,
            other => return Err(PathError::conflict(&path.prefix(i + 1), other)),
        };
    }
    if current.contains_key(last) {
        return Err(PathError::duplicate_key(path));
    }
    current.insert(last.to_string(), value);
    Ok(())
}

/// Walks the non-final segments of a header path, creating implicit tables.
/// An array of tables on the way continues into its most recent element.
pub fn resolve_parent<'t>(root: &'t mut Table, path: &KeyPath) -> Result<&'t mut Table, PathError> {
    let (parents, _) = path.split_last();
    let mut current = root;
    for (i, seg) in parents.iter().enumerate() {
        current = match current
            .entry(seg.clone())
            .or_insert_with(|| Value::Table(Table::new()))
        {
            Value::Table(t) => t,
            Value::TableArray(tables) => match tables.last_mut() {
                Some(t) => t,
                None => return Err(empty_table_array()),
            },
            other => return Err(PathError::conflict(&path.prefix(i + 1), other)),
        };
    }
    Ok(current)
}

/// Attaches the body of a `[path]` header under `parent`.
pub fn attach_table(parent: &mut Table, path: &KeyPath, body: Table) -> Result<(), PathError> {
    let (_, last) = path.split_last();
    match parent.get_mut(last) {
        None => {
            parent.insert(last.to_string(), Value::Table(body));
            Ok(())
        }
        Some(Value::Table(existing)) => merge_tables(existing, body, path),
        Some(other) => Err(PathError::conflict(path, other)),
    }
}

/// Appends the body of a `[[path]]` header to the array of tables under `parent`.
pub fn append_table_array(
    parent: &mut Table,
    path: &KeyPath,
    body: Table,
) -> Result<(), PathError> {
    let (_, last) = path.split_last();
    match parent.get_mut(last) {
        None => {
            parent.insert(last.to_string(), Value::TableArray(vec![body]));
            Ok(())
        }
        Some(Value::TableArray(tables)) => {
            tables.push(body);
            Ok(())
        }
        Some(other) => Err(PathError {
            kind: ErrorKind::StructuralConflict,
            message: format!("`{}` is a {}, not an array of tables", path, other.type_name()),
        }),
    }
}

/// Deep merge `source` into `target`. Tables merge recursively; any other
/// collision is a duplicate key.
fn merge_tables(target: &mut Table, source: Table, path: &KeyPath) -> Result<(), PathError> {
    for (key, incoming) in source {
        match target.get_mut(&key) {
            None => {
                target.insert(key, incoming);
            }
            Some(Value::Table(existing)) => {
                let child = path.child(&key);
                let Value::Table(incoming) = incoming else {
                    return Err(PathError::duplicate_key(&child));
                };
                merge_tables(existing, incoming, &child)?;
            }
            Some(_) => return Err(PathError::duplicate_key(&path.child(&key))),
        }
    }
    Ok(())
}
