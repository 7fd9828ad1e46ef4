use std::fmt;

/// A line/column position in the source text, 1-based on both axes.
///
/// Owned by the lexer engine; state functions move it indirectly through
/// [`Lexer::step`](crate::Lexer::step) and
/// [`Lexer::newline`](crate::Lexer::newline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The start of the input: line 1, column 1.
    pub fn new() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Move `n` columns forward. Used after consuming `n` runes that contain
    /// no newline.
    pub fn advance(&mut self, n: usize) {
        self.column += n;
    }

    /// Move to the start of the next line.
    pub fn newline(&mut self) {
        self.line += 1;
        self.column = 1;
    }

    /// Back to line 1, column 1.
    pub fn reset(&mut self) {
        self.line = 1;
        self.column = 1;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}
