use core::fmt;
use std::io;

use thiserror::Error;

/// Crate-level error returned by the reader-based and serde entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[cfg(feature = "json")]
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = core::result::Result<T, Error>;

/// Category of a decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The buffer ended in the middle of a token or where a value was required.
    UnexpectedEndOfInput,
    InvalidEscapeSequence,
    /// A raw line break where the grammar forbids one.
    InvalidLineBreak,
    /// Text at a value position that no reader accepts, or a number/date
    /// that failed its final conversion.
    InvalidLiteral,
    MalformedHeader,
    TypeMismatchInArray,
    DuplicateTable,
    /// A key path runs through a value that is not a table.
    StructuralConflict,
    DuplicateKey,
    /// Arrays or inline tables nested deeper than `Options::max_depth`.
    NestingTooDeep,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnexpectedEndOfInput => "unexpected end of input",
            ErrorKind::InvalidEscapeSequence => "invalid escape sequence",
            ErrorKind::InvalidLineBreak => "invalid line break",
            ErrorKind::InvalidLiteral => "invalid literal",
            ErrorKind::MalformedHeader => "malformed table header",
            ErrorKind::TypeMismatchInArray => "type mismatch in array",
            ErrorKind::DuplicateTable => "duplicate table",
            ErrorKind::StructuralConflict => "structural conflict",
            ErrorKind::DuplicateKey => "duplicate key",
            ErrorKind::NestingTooDeep => "nesting too deep",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoding failure with the 1-indexed source position where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_carries_position() {
        let err = ParseError {
            kind: ErrorKind::DuplicateTable,
            message: "table [a] is already defined".to_string(),
            line: 3,
            column: 1,
        };
        assert_eq!(
            err.to_string(),
            "duplicate table at line 3, column 1: table [a] is already defined"
        );
    }

    #[test]
    fn crate_error_is_transparent_over_parse_error() {
        let err: Error = ParseError {
            kind: ErrorKind::InvalidLiteral,
            message: "x".to_string(),
            line: 1,
            column: 5,
        }
        .into();
        assert_eq!(err.to_string(), "invalid literal at line 1, column 5: x");
    }
}
