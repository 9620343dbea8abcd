//! Basic and literal strings, single-line and multi-line.
//!
//! Every reader expects the cursor on the opening quote and leaves it just
//! past the closing one.

use crate::decode::scanner::Scanner;
use crate::decode::{Fault, Parsed};
use crate::error::ErrorKind;

pub fn read_basic_string(sc: &mut Scanner<'_>) -> Parsed<String> {
    sc.advance();
    let mut out = String::new();
    loop {
        let at = sc.offset();
        match sc.advance() {
            None => {
                return Err(Fault::new(
                    ErrorKind::UnexpectedEndOfInput,
                    at,
                    "unterminated basic string",
                ));
            }
            Some('"') => return Ok(out),
            Some('\\') => out.push(read_escape(sc, at)?),
            Some('\n' | '\r') => {
                return Err(Fault::new(
                    ErrorKind::InvalidLineBreak,
                    at,
                    "line break in a single-line basic string",
                ));
            }
            Some(c) => out.push(c),
        }
    }
}

pub fn read_multiline_basic_string(sc: &mut Scanner<'_>) -> Parsed<String> {
    sc.eat_str("\"\"\"");
    sc.eat_newline();
    let mut out = String::new();
    loop {
        if sc.eat_str("\"\"\"") {
            return Ok(out);
        }
        let at = sc.offset();
        match sc.advance() {
            None => {
                return Err(Fault::new(
                    ErrorKind::UnexpectedEndOfInput,
                    at,
                    "unterminated multi-line basic string",
                ));
            }
            Some('\\') if is_line_ending_backslash(sc.rest()) => {
                // Trim the line break and any whitespace that follows it.
                sc.skip_insignificant(false);
            }
            Some('\\') => out.push(read_escape(sc, at)?),
            Some(c) => out.push(c),
        }
    }
}

pub fn read_literal_string(sc: &mut Scanner<'_>) -> Parsed<String> {
    sc.advance();
    let body = sc.consume_until(&['\'', '\n', '\r']);
    let at = sc.offset();
    match sc.advance() {
        Some('\'') => Ok(body.to_string()),
        Some(_) => Err(Fault::new(
            ErrorKind::InvalidLineBreak,
            at,
            "line break in a single-line literal string",
        )),
        None => Err(Fault::new(
            ErrorKind::UnexpectedEndOfInput,
            at,
            "unterminated literal string",
        )),
    }
}

pub fn read_multiline_literal_string(sc: &mut Scanner<'_>) -> Parsed<String> {
    sc.eat_str("'''");
    sc.eat_newline();
    let mut out = String::new();
    loop {
        if sc.eat_str("'''") {
            return Ok(out);
        }
        match sc.advance() {
            Some(c) => out.push(c),
            None => {
                return Err(Fault::new(
                    ErrorKind::UnexpectedEndOfInput,
                    sc.offset(),
                    "unterminated multi-line literal string",
                ));
            }
        }
    }
}

// `rest` follows a backslash: only spaces/tabs up to the line break.
fn is_line_ending_backslash(rest: &str) -> bool {
    let trimmed = rest.trim_start_matches([' ', '\t']);
    trimmed.starts_with('\n') || trimmed.starts_with("\r\n")
}

/// Decodes the escape whose backslash sits at `start`; the cursor is just
/// past the backslash.
fn read_escape(sc: &mut Scanner<'_>, start: usize) -> Parsed<char> {
    match sc.advance() {
        None => Err(Fault::new(
            ErrorKind::UnexpectedEndOfInput,
            start,
            "unterminated escape sequence",
        )),
        Some('b') => Ok('\u{0008}'),
        Some('t') => Ok('\t'),
        Some('n') => Ok('\n'),
        Some('f') => Ok('\u{000C}'),
        Some('r') => Ok('\r'),
        Some('"') => Ok('"'),
        Some('\\') => Ok('\\'),
        Some('u') => read_unicode_escape(sc, start, 4),
        Some('U') => read_unicode_escape(sc, start, 8),
        Some(c) => Err(Fault::new(
            ErrorKind::InvalidEscapeSequence,
            start,
            format!("invalid escape sequence \\{}", c.escape_debug()),
        )),
    }
}

fn read_unicode_escape(sc: &mut Scanner<'_>, start: usize, digits: usize) -> Parsed<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        let at = sc.offset();
        let Some(c) = sc.advance() else {
            return Err(Fault::new(
                ErrorKind::UnexpectedEndOfInput,
                at,
                "unterminated unicode escape",
            ));
        };
        let Some(d) = c.to_digit(16) else {
            return Err(Fault::new(
                ErrorKind::InvalidEscapeSequence,
                at,
                format!("invalid hex digit {:?} in unicode escape", c),
            ));
        };
        code = (code << 4) | d;
    }
    char::from_u32(code).ok_or_else(|| {
        Fault::new(
            ErrorKind::InvalidEscapeSequence,
            start,
            format!("U+{:X} is not a unicode scalar value", code),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(s: &str) -> Parsed<String> {
        read_basic_string(&mut Scanner::new(s))
    }

    #[test]
    fn basic_string_escapes() {
        assert_eq!(basic(r#""a\tb\n\"q\" \\""#).unwrap(), "a\tb\n\"q\" \\");
        assert_eq!(basic(r#""\u00E9\U0001F600""#).unwrap(), "é😀");
    }

    #[test]
    fn basic_string_stops_at_the_closing_quote() {
        let mut sc = Scanner::new("\"abc\" # rest");
        assert_eq!(read_basic_string(&mut sc).unwrap(), "abc");
        assert_eq!(sc.peek(), Some(' '));
    }

    #[test]
    fn basic_string_failures() {
        assert_eq!(basic("\"abc\ndef\"").unwrap_err().kind, ErrorKind::InvalidLineBreak);
        assert_eq!(basic(r#""\q""#).unwrap_err().kind, ErrorKind::InvalidEscapeSequence);
        assert_eq!(basic(r#""\uD800""#).unwrap_err().kind, ErrorKind::InvalidEscapeSequence);
        assert_eq!(basic(r#""\u12"#).unwrap_err().kind, ErrorKind::UnexpectedEndOfInput);
        assert_eq!(basic(r#""abc\"#).unwrap_err().kind, ErrorKind::UnexpectedEndOfInput);
        assert_eq!(basic("\"abc").unwrap_err().kind, ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn multiline_basic_strips_first_newline_and_trims_after_backslash() {
        let mut sc = Scanner::new("\"\"\"\nline one\nline \\\n    two\"\"\"");
        assert_eq!(
            read_multiline_basic_string(&mut sc).unwrap(),
            "line one\nline two"
        );
        assert!(sc.is_at_end());

        let mut sc = Scanner::new("\"\"\"tab\\there\"\"\"");
        assert_eq!(read_multiline_basic_string(&mut sc).unwrap(), "tab\there");

        let mut sc = Scanner::new("\"\"\"never closed\"\"");
        assert_eq!(
            read_multiline_basic_string(&mut sc).unwrap_err().kind,
            ErrorKind::UnexpectedEndOfInput
        );
    }

    #[test]
    fn literal_strings_are_verbatim() {
        let mut sc = Scanner::new(r"'C:\Users\nodejs'");
        assert_eq!(read_literal_string(&mut sc).unwrap(), r"C:\Users\nodejs");

        let mut sc = Scanner::new("'''\nIt's here\n  \\raw'''");
        assert_eq!(
            read_multiline_literal_string(&mut sc).unwrap(),
            "It's here\n  \\raw"
        );

        let mut sc = Scanner::new("'ab\ncd'");
        assert_eq!(
            read_literal_string(&mut sc).unwrap_err().kind,
            ErrorKind::InvalidLineBreak
        );
    }
}
