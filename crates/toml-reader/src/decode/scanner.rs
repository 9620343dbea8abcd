//! Character cursor shared by every reader.
//!
//! The cursor only moves forward. Lookahead goes through [`Scanner::peek_nth`]
//! (never more than three characters are inspected), so no reader has to
//! step back after looking ahead.

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the cursor.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Character `n` positions after the cursor (`peek_nth(0) == peek()`).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    #[inline]
    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Consumes one character.
    #[inline]
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `c` if it is the next character.
    #[inline]
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes `s` if the input continues with it.
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consumes a `\n` or `\r\n` line ending.
    pub fn eat_newline(&mut self) -> bool {
        self.eat('\n') || self.eat_str("\r\n")
    }

    /// Skips spaces and tabs.
    pub fn skip_whitespace(&mut self) {
        self.consume_while(|c| c == ' ' || c == '\t');
    }

    /// Skips the rest of a `#` comment, leaving the cursor on the line ending.
    pub fn skip_comment(&mut self) {
        if self.peek() == Some('#') {
            self.consume_until(&['\n']);
        }
    }

    /// Skips whitespace, line endings and, when `allow_comments` is set,
    /// `#` comments. The cursor stops on the first significant character.
    pub fn skip_insignificant(&mut self, allow_comments: bool) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\n') => {
                    self.pos += 1;
                }
                Some('\r') if self.peek_nth(1) == Some('\n') => {
                    self.pos += 2;
                }
                Some('#') if allow_comments => self.skip_comment(),
                _ => return,
            }
        }
    }

    /// Returns everything up to the first character in `stop`; the cursor is
    /// left on that character. Runs to the end of input when none is found.
    pub fn consume_until(&mut self, stop: &[char]) -> &'a str {
        self.consume_while(|c| !stop.contains(&c))
    }

    pub fn consume_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &rest[..len]
    }
}
