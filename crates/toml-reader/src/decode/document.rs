//! Document assembly: alternates between key/value blocks and headers and
//! grafts each block onto the root table.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::decode::parser::Parser;
use crate::decode::path::{
    ClosedTables, KeyPath, PathError, append_table_array, attach_table, insert_dotted,
    resolve_parent,
};
use crate::decode::position::LineIndex;
use crate::decode::{Fault, Parsed};
use crate::error::{ErrorKind, ParseError};
use crate::options::Options;
use crate::value::{Table, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKind {
    Table,
    Array,
}

#[derive(Debug)]
struct Header {
    path: KeyPath,
    kind: HeaderKind,
    offset: usize,
}

enum State {
    /// Reading key/value pairs; `None` is the root block.
    Content(Option<Header>),
    Header,
    Done,
}

struct Assembler<'a> {
    parser: Parser<'a>,
    strict_tables: bool,
    // Paths declared by a `[header]` so far.
    defined: HashSet<KeyPath>,
    closed: ClosedTables,
}

impl<'a> Assembler<'a> {
    fn new(input: &'a str, options: &Options) -> Self {
        Self {
            parser: Parser::new(input, options),
            strict_tables: options.strict_tables,
            defined: HashSet::new(),
            closed: ClosedTables::default(),
        }
    }

    fn run(mut self) -> Parsed<Table> {
        let mut root = Table::new();
        let mut state = State::Content(None);
        loop {
            state = match state {
                State::Content(header) => {
                    if let Some(header) = &header {
                        self.open(header)?;
                    }
                    let body = self.read_table_content(header.as_ref().map(|h| &h.path))?;
                    match header {
                        // The root block always comes first.
                        None => root = body,
                        Some(header) => self.attach(&mut root, header, body)?,
                    }
                    if self.parser.sc.is_at_end() {
                        State::Done
                    } else {
                        State::Header
                    }
                }
                State::Header => State::Content(Some(self.read_header()?)),
                State::Done => return Ok(root),
            };
        }
    }

    /// Reads pairs until a `[` opens a line or the input ends. `prefix` is
    /// the header path of the block.
    fn read_table_content(&mut self, prefix: Option<&KeyPath>) -> Parsed<Table> {
        let mut table = Table::new();
        loop {
            self.parser.sc.skip_insignificant(true);
            if matches!(self.parser.sc.peek(), None | Some('[')) {
                return Ok(table);
            }
            let key_at = self.parser.sc.offset();
            let key = self.parser.read_key_path(ErrorKind::InvalidLiteral)?;
            let full = key.under(prefix);
            if let Some(inline) = self.closed.enclosing(&full) {
                return Err(PathError::closed_table(&inline, ErrorKind::DuplicateKey).at(key_at));
            }
            self.parser.expect_equals()?;
            self.parser.sc.skip_whitespace();
            let value = self.parser.read_value()?;
            let is_table = matches!(value, Value::Table(_));
            insert_dotted(&mut table, &key, value).map_err(|e| e.at(key_at))?;
            if is_table {
                self.closed.close(full);
            }
            self.parser
                .expect_line_end(ErrorKind::InvalidLiteral, "a key/value pair")?;
        }
    }

    fn read_header(&mut self) -> Parsed<Header> {
        let offset = self.parser.sc.offset();
        self.parser.sc.advance();
        let kind = if self.parser.sc.eat('[') {
            HeaderKind::Array
        } else {
            HeaderKind::Table
        };
        let path = self.parser.read_key_path(ErrorKind::MalformedHeader)?;
        let close = match kind {
            HeaderKind::Table => "]",
            HeaderKind::Array => "]]",
        };
        if !self.parser.sc.eat_str(close) {
            let at = self.parser.sc.offset();
            return Err(match self.parser.sc.peek() {
                None => Fault::new(ErrorKind::UnexpectedEndOfInput, at, "unterminated table header"),
                Some('\n' | '\r') => Fault::new(
                    ErrorKind::InvalidLineBreak,
                    at,
                    "line break inside a table header",
                ),
                Some(c) => Fault::new(
                    ErrorKind::MalformedHeader,
                    at,
                    format!("expected `{}` to close the header, found {:?}", close, c),
                ),
            });
        }
        self.parser
            .expect_line_end(ErrorKind::MalformedHeader, "a table header")?;
        Ok(Header { path, kind, offset })
    }

    /// Checks a header against earlier declarations before its body is read.
    fn open(&mut self, header: &Header) -> Parsed<()> {
        let Header { path, kind, offset } = header;
        if let Some(inline) = self.closed.enclosing(path) {
            return Err(PathError::closed_table(&inline, ErrorKind::DuplicateTable).at(*offset));
        }
        match kind {
            HeaderKind::Table => {
                if self.strict_tables && self.defined.contains(path) {
                    return Err(PathError::duplicate_table(path).at(*offset));
                }
            }
            HeaderKind::Array => {
                // A fresh element may declare its sub-tables again.
                self.defined.retain(|p| !p.is_below(path));
                self.closed.forget_below(path);
            }
        }
        Ok(())
    }

    fn attach(&mut self, root: &mut Table, header: Header, body: Table) -> Parsed<()> {
        let Header { path, kind, offset } = header;
        trace!(path = %path, ?kind, keys = body.len(), "attaching header");
        match kind {
            HeaderKind::Table => {
                resolve_parent(root, &path)
                    .and_then(|parent| attach_table(parent, &path, body))
                    .map_err(|e| e.at(offset))?;
                self.defined.insert(path);
            }
            HeaderKind::Array => {
                resolve_parent(root, &path)
                    .and_then(|parent| append_table_array(parent, &path, body))
                    .map_err(|e| e.at(offset))?;
            }
        }
        Ok(())
    }
}

/// Parses a whole document into its root table.
pub fn parse_document(input: &str, options: &Options) -> Result<Table, ParseError> {
    debug!(bytes = input.len(), "parsing document");
    match Assembler::new(input, options).run() {
        Ok(root) => {
            debug!(keys = root.len(), "parsed document");
            Ok(root)
        }
        Err(fault) => {
            let err = fault.locate(&LineIndex::new(input));
            debug!(kind = %err.kind, line = err.line, column = err.column, "parse failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Table, ParseError> {
        parse_document(s, &Options::default())
    }

    #[test]
    fn empty_and_blank_documents() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n  # only a comment\r\n\t\n").unwrap().is_empty());
    }

    #[test]
    fn root_pairs_then_tables() {
        let root = parse("title = \"x\" # c\n\n[owner]\nname = 'Tom'\n[db.conn]\nport = 8000\n").unwrap();
        assert_eq!(root["title"], Value::String("x".into()));
        assert_eq!(root["owner"].get("name"), Some(&Value::String("Tom".into())));
        let conn = root["db"].get("conn").unwrap();
        assert_eq!(conn.get("port"), Some(&Value::Integer(8000)));
        let keys: Vec<&str> = root.keys().map(String::as_str).collect();
        assert_eq!(keys, ["title", "owner", "db"]);
    }

    #[test]
    fn header_errors() {
        let err = parse("[a\nb = 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidLineBreak);
        assert_eq!(parse("[a").unwrap_err().kind, ErrorKind::UnexpectedEndOfInput);
        assert_eq!(parse("[[a]\n").unwrap_err().kind, ErrorKind::MalformedHeader);
        assert_eq!(parse("[a]]\n").unwrap_err().kind, ErrorKind::MalformedHeader);
        assert_eq!(parse("[]\n").unwrap_err().kind, ErrorKind::MalformedHeader);
        assert_eq!(parse("[a.]\n").unwrap_err().kind, ErrorKind::MalformedHeader);
        assert_eq!(parse("[a] x = 1\n").unwrap_err().kind, ErrorKind::MalformedHeader);
    }

    #[test]
    fn pairs_must_end_their_line() {
        let err = parse("a = 1 b = 2\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidLiteral);
        assert_eq!((err.line, err.column), (1, 7));
        assert_eq!(parse("a\n").unwrap_err().kind, ErrorKind::InvalidLiteral);
        assert_eq!(parse("a =").unwrap_err().kind, ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn duplicate_tables_depend_on_strictness() {
        let src = "[a]\nx = 1\n[a]\ny = 2\n";
        let err = parse(src).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateTable);
        assert_eq!((err.line, err.column), (3, 1));

        let lenient = Options {
            strict_tables: false,
            ..Options::default()
        };
        let root = parse_document(src, &lenient).unwrap();
        assert_eq!(root["a"].as_table().map(|t| t.len()), Some(2));
    }

    #[test]
    fn sub_tables_reset_per_array_element() {
        let src = "[[fruit]]\n[fruit.physical]\ncolor = 'red'\n[[fruit]]\n[fruit.physical]\ncolor = 'green'\n";
        let root = parse(src).unwrap();
        let fruit = root["fruit"].as_table_array().unwrap();
        assert_eq!(fruit.len(), 2);
        assert_eq!(
            fruit[1]["physical"].get("color"),
            Some(&Value::String("green".into()))
        );
    }

    #[test]
    fn conflicts_are_reported_at_the_header() {
        let err = parse("a = 1\n[a.b]\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::StructuralConflict);
        assert_eq!((err.line, err.column), (2, 1));

        let err = parse("[a]\n[[a]]\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::StructuralConflict);
    }
}
