use std::fmt;

use crate::position::Position;
use crate::LexError;

/// Token classification.
///
/// An open enumeration shared between the engine and a grammar: the engine
/// reserves id `0` ([`TokenType::ERROR`]) for its own error tokens, and
/// grammars define their kinds from `1` upward.
///
/// ```
/// use quill_lexer::TokenType;
///
/// const WORD: TokenType = TokenType(1);
/// const NUMBER: TokenType = TokenType(2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenType(pub u32);

impl TokenType {
    /// Reserved for tokens produced by the engine's error paths.
    pub const ERROR: TokenType = TokenType(0);
}

/// A committed token: the exact consumed text and the position where that
/// text began (not the position after consumption).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub ty: TokenType,
    pub text: String,
    pub pos: Position,
}

/// An error surfaced on the token stream, at the position the engine held
/// when it was reported.
#[derive(Debug)]
pub struct ErrorToken {
    pub err: LexError,
    pub pos: Position,
}

impl ErrorToken {
    pub fn message(&self) -> String {
        self.err.to_string()
    }
}

impl fmt::Display for ErrorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.err.fmt(f)
    }
}

/// A syntax error with full diagnostic context: the position and lookahead
/// offset at the moment of failure, plus the raw unconsumed buffer that was
/// being looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorToken {
    /// The formatted diagnostic, `"Syntax Error at <line>.<column>+<cursor>[: <msg>]"`.
    pub message: String,
    pub pos: Position,
    /// Lookahead offset at the moment of failure.
    pub cursor: usize,
    /// The buffered-but-unconsumed input at the moment of failure.
    pub buffer: String,
}

impl SyntaxErrorToken {
    pub fn new(msg: impl Into<String>, pos: Position, cursor: usize, buffer: &[char]) -> Self {
        let msg = msg.into();
        let mut message = format!("Syntax Error at {}+{}", pos, cursor);
        if !msg.is_empty() {
            message.push_str(": ");
            message.push_str(&msg);
        }
        Self {
            message,
            pos,
            cursor,
            buffer: buffer.iter().collect(),
        }
    }
}

impl fmt::Display for SyntaxErrorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A token delivered on the engine's output stream.
///
/// Error conditions travel on the same stream as ordinary lexemes; an error
/// token does not by itself stop the machine (see
/// [`Lexer::run`](crate::Lexer::run)).
#[derive(Debug)]
pub enum Token {
    Lexeme(Lexeme),
    Error(ErrorToken),
    Syntax(SyntaxErrorToken),
}

impl Token {
    /// The token's type; [`TokenType::ERROR`] for both error variants.
    pub fn token_type(&self) -> TokenType {
        match self {
            Token::Lexeme(lexeme) => lexeme.ty,
            Token::Error(_) | Token::Syntax(_) => TokenType::ERROR,
        }
    }

    /// The position at which this token's text (or error) begins.
    pub fn position(&self) -> Position {
        match self {
            Token::Lexeme(lexeme) => lexeme.pos,
            Token::Error(err) => err.pos,
            Token::Syntax(err) => err.pos,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Token::Error(_) | Token::Syntax(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Lexeme(lexeme) => f.write_str(&lexeme.text),
            Token::Error(err) => err.fmt(f),
            Token::Syntax(err) => err.fmt(f),
        }
    }
}
