//! Offset to line/column mapping for diagnostics.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Newline index over an input buffer, built once before parsing.
#[derive(Debug)]
pub struct LineIndex<'a> {
    input: &'a str,
    // Byte offset of the first character of every line.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            input
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { input, line_starts }
    }

    /// Maps a byte offset to a 1-indexed line and a 1-indexed column counted
    /// in characters. Offsets past the end clamp to the end of the input.
    pub fn locate(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.input.len());
        while !self.input.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        Position {
            line,
            column: self.input[start..offset].chars().count() + 1,
        }
    }
}
