//! Decoding pipeline: scanner, scalar and container readers, document assembly.

pub mod document;
pub mod number;
pub mod parser;
pub mod path;
pub mod position;
pub mod scanner;
pub mod strings;

use crate::error::{ErrorKind, ParseError};
use position::LineIndex;

/// A failure located by byte offset; turned into a [`ParseError`] once, at
/// the top of the parse, using the line index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub kind: ErrorKind,
    pub message: String,
    pub offset: usize,
}

impl Fault {
    pub fn new(kind: ErrorKind, offset: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn locate(self, lines: &LineIndex<'_>) -> ParseError {
        let pos = lines.locate(self.offset);
        ParseError {
            kind: self.kind,
            message: self.message,
            line: pos.line,
            column: pos.column,
        }
    }
}

pub type Parsed<T> = Result<T, Fault>;
