use crate::decode::number::read_number_or_datetime;
use crate::decode::path::{ClosedTables, KeyPath, PathError, insert_dotted};
use crate::decode::scanner::Scanner;
use crate::decode::strings::{
    read_basic_string, read_literal_string, read_multiline_basic_string,
    read_multiline_literal_string,
};
use crate::decode::{Fault, Parsed};
use crate::error::ErrorKind;
use crate::options::Options;
use crate::value::{Family, Table, Value, is_bare_key_char};

/// Recursive-descent reader for keys and values.
pub struct Parser<'a> {
    pub(crate) sc: Scanner<'a>,
    depth: usize,
    max_depth: usize,
    // Number of enclosing inline tables; line breaks are forbidden while > 0.
    inline_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: &Options) -> Self {
        Self {
            sc: Scanner::new(input),
            depth: 0,
            max_depth: options.max_depth,
            inline_depth: 0,
        }
    }

    fn fault(&self, kind: ErrorKind, message: impl Into<String>) -> Fault {
        Fault::new(kind, self.sc.offset(), message)
    }

    /// Reads one value starting at the next character.
    pub fn read_value(&mut self) -> Parsed<Value> {
        match self.sc.peek() {
            None => Err(self.fault(ErrorKind::UnexpectedEndOfInput, "missing value")),
            Some('[') => self.read_array(),
            Some('{') => self.read_inline_table(),
            Some('"') => {
                let s = if self.sc.starts_with("\"\"\"") {
                    read_multiline_basic_string(&mut self.sc)?
                } else {
                    read_basic_string(&mut self.sc)?
                };
                Ok(Value::String(s))
            }
            Some('\'') => {
                let s = if self.sc.starts_with("'''") {
                    read_multiline_literal_string(&mut self.sc)?
                } else {
                    read_literal_string(&mut self.sc)?
                };
                Ok(Value::String(s))
            }
            Some('t') => self.read_boolean("true", true),
            Some('f') => self.read_boolean("false", false),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => {
                read_number_or_datetime(&mut self.sc)
            }
            Some('\n' | '\r') => Err(self.fault(ErrorKind::InvalidLiteral, "missing value")),
            Some(c) => Err(self.fault(
                ErrorKind::InvalidLiteral,
                format!("unexpected character {:?} at the start of a value", c),
            )),
        }
    }

    fn read_boolean(&mut self, keyword: &'static str, value: bool) -> Parsed<Value> {
        let start = self.sc.offset();
        let rest = self.sc.rest();
        if self.sc.eat_str(keyword) {
            if !self.sc.peek().is_some_and(is_bare_key_char) {
                return Ok(Value::Boolean(value));
            }
        } else if keyword.starts_with(rest) {
            return Err(Fault::new(
                ErrorKind::UnexpectedEndOfInput,
                start,
                format!("input ends inside `{}`", keyword),
            ));
        }
        let word = rest.split(|c: char| !is_bare_key_char(c)).next().unwrap_or(rest);
        Err(Fault::new(
            ErrorKind::InvalidLiteral,
            start,
            format!("invalid value `{}`", word),
        ))
    }

    fn enter(&mut self) -> Parsed<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.fault(
                ErrorKind::NestingTooDeep,
                format!("values nest deeper than {} levels", self.max_depth),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn read_array(&mut self) -> Parsed<Value> {
        self.enter()?;
        self.sc.advance();
        let mut items: Vec<Value> = Vec::new();
        let mut family: Option<Family> = None;
        loop {
            self.skip_array_space()?;
            if self.sc.eat(']') {
                break;
            }
            let at = self.sc.offset();
            let item = self.read_value()?;
            match family {
                None => family = Some(item.family()),
                Some(expected) if expected != item.family() => {
                    return Err(Fault::new(
                        ErrorKind::TypeMismatchInArray,
                        at,
                        format!(
                            "array of {} values cannot hold a {}",
                            expected,
                            item.family()
                        ),
                    ));
                }
                Some(_) => {}
            }
            items.push(item);
            self.skip_array_space()?;
            match self.sc.peek() {
                Some(',') => {
                    self.sc.advance();
                }
                Some(']') => {
                    self.sc.advance();
                    break;
                }
                None => {
                    return Err(self.fault(ErrorKind::UnexpectedEndOfInput, "unterminated array"));
                }
                Some(c) => {
                    return Err(self.fault(
                        ErrorKind::InvalidLiteral,
                        format!("expected `,` or `]` after an array element, found {:?}", c),
                    ));
                }
            }
        }
        self.leave();
        Ok(Value::Array(items))
    }

    // Comments and line breaks are allowed between array elements, unless
    // the array sits inside an inline table.
    fn skip_array_space(&mut self) -> Parsed<()> {
        if self.inline_depth == 0 {
            self.sc.skip_insignificant(true);
            Ok(())
        } else {
            self.skip_inline_space()
        }
    }

    fn skip_inline_space(&mut self) -> Parsed<()> {
        self.sc.skip_whitespace();
        match self.sc.peek() {
            Some('\n' | '\r') => Err(self.fault(
                ErrorKind::InvalidLineBreak,
                "line break inside an inline table",
            )),
            _ => Ok(()),
        }
    }

    fn read_inline_table(&mut self) -> Parsed<Value> {
        self.enter()?;
        self.inline_depth += 1;
        self.sc.advance();
        let mut table = Table::new();
        let mut closed = ClosedTables::default();
        self.skip_inline_space()?;
        if !self.sc.eat('}') {
            loop {
                let key_at = self.sc.offset();
                let key = self.read_key_path(ErrorKind::InvalidLiteral)?;
                if let Some(inner) = closed.enclosing(&key) {
                    return Err(PathError::closed_table(&inner, ErrorKind::DuplicateKey).at(key_at));
                }
                self.skip_inline_space()?;
                self.expect_equals()?;
                self.skip_inline_space()?;
                let value = self.read_value()?;
                let is_table = matches!(value, Value::Table(_));
                insert_dotted(&mut table, &key, value).map_err(|e| e.at(key_at))?;
                if is_table {
                    closed.close(key);
                }
                self.skip_inline_space()?;
                let at = self.sc.offset();
                match self.sc.advance() {
                    Some('}') => break,
                    Some(',') => {
                        self.skip_inline_space()?;
                        if self.sc.peek() == Some('}') {
                            return Err(Fault::new(
                                ErrorKind::InvalidLiteral,
                                at,
                                "trailing comma in an inline table",
                            ));
                        }
                    }
                    None => {
                        return Err(Fault::new(
                            ErrorKind::UnexpectedEndOfInput,
                            at,
                            "unterminated inline table",
                        ));
                    }
                    Some(c) => {
                        return Err(Fault::new(
                            ErrorKind::InvalidLiteral,
                            at,
                            format!("expected `,` or `}}` in an inline table, found {:?}", c),
                        ));
                    }
                }
            }
        }
        self.inline_depth -= 1;
        self.leave();
        Ok(Value::Table(table))
    }

    /// Reads `a.b."c d"`. An empty segment is reported with `empty`.
    pub fn read_key_path(&mut self, empty: ErrorKind) -> Parsed<KeyPath> {
        let mut segments = Vec::new();
        loop {
            self.sc.skip_whitespace();
            segments.push(self.read_key_segment(empty)?);
            self.sc.skip_whitespace();
            if !self.sc.eat('.') {
                break;
            }
        }
        KeyPath::new(segments).ok_or_else(|| self.fault(empty, "empty key"))
    }

    fn read_key_segment(&mut self, empty: ErrorKind) -> Parsed<String> {
        match self.sc.peek() {
            Some('"') if self.sc.starts_with("\"\"\"") => Err(self.fault(
                ErrorKind::InvalidLiteral,
                "multi-line strings cannot be used as keys",
            )),
            Some('"') => read_basic_string(&mut self.sc),
            Some('\'') if self.sc.starts_with("'''") => Err(self.fault(
                ErrorKind::InvalidLiteral,
                "multi-line strings cannot be used as keys",
            )),
            Some('\'') => read_literal_string(&mut self.sc),
            Some(_) => {
                let at = self.sc.offset();
                let bare = self.sc.consume_while(is_bare_key_char);
                if bare.is_empty() {
                    return Err(match self.sc.peek() {
                        Some(c) => Fault::new(empty, at, format!("expected a key, found {:?}", c)),
                        None => Fault::new(ErrorKind::UnexpectedEndOfInput, at, "expected a key"),
                    });
                }
                Ok(bare.to_string())
            }
            None => Err(self.fault(ErrorKind::UnexpectedEndOfInput, "expected a key")),
        }
    }

    pub fn expect_equals(&mut self) -> Parsed<()> {
        match self.sc.peek() {
            Some('=') => {
                self.sc.advance();
                Ok(())
            }
            Some(c) => Err(self.fault(
                ErrorKind::InvalidLiteral,
                format!("expected `=` after a key, found {:?}", c),
            )),
            None => Err(self.fault(ErrorKind::UnexpectedEndOfInput, "expected `=` after a key")),
        }
    }

    /// Requires the rest of the line to be blank or a comment, and consumes
    /// the line break.
    pub fn expect_line_end(&mut self, kind: ErrorKind, after: &str) -> Parsed<()> {
        self.sc.skip_whitespace();
        self.sc.skip_comment();
        if self.sc.is_at_end() || self.sc.eat_newline() {
            return Ok(());
        }
        let found = self.sc.peek().unwrap_or('\0');
        Err(self.fault(
            kind,
            format!("expected a line break after {}, found {:?}", after, found),
        ))
    }
}
