//! Quill lexer engine
//!
//! A framework for building lexers out of small, composable state functions.
//! The engine owns a lookahead cursor over a buffered rune source, tracks
//! line/column positions, and delivers tokens to a consumer over a bounded
//! channel. It defines no grammar of its own: a grammar is a set of
//! [`StateFn`] values that inspect buffered input through the engine and
//! decide what to emit and what state comes next.
//!
//! # Example
//!
//! ```
//! use quill_lexer::{Lexer, StateFn, TokenType};
//! use quill_runes::StringFeeder;
//!
//! const WORD: TokenType = TokenType(1);
//!
//! fn word(lex: &mut Lexer) -> Option<StateFn> {
//!     let (runes, _) = lex.at_least(1);
//!     if runes.is_empty() {
//!         return None;
//!     }
//!     lex.step(1);
//!     lex.emit(WORD);
//!     Some(StateFn::new(word))
//! }
//!
//! let (lexer, tokens) = Lexer::new(StateFn::new(word), StringFeeder::new("ab"), 4);
//! lexer.run();
//! assert_eq!(tokens.iter().count(), 2);
//! ```

pub mod lexer;
pub mod position;
pub mod token;

pub use lexer::{CancelToken, Lexer, StateFn};
pub use position::Position;
pub use quill_runes::{Feed, FeedError};
pub use token::{ErrorToken, Lexeme, SyntaxErrorToken, Token, TokenType};

/// Error carried by an [`ErrorToken`] on the output stream.
///
/// The engine never aborts the process on bad input; every failure travels
/// through the token channel as one of these kinds. Stopping the machine is
/// the state function's decision.
#[derive(Debug, thiserror::Error)]
pub enum LexError {
    /// The rune source failed or ended where more input was required.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// A condition raised by a state function, message only.
    #[error("{0}")]
    Message(String),

    /// The run was cancelled before the grammar finished.
    #[error("lexing cancelled")]
    Cancelled,
}

impl LexError {
    /// Whether this error is the cancellation kind, so consumers can tell
    /// "cancelled" apart from end-of-input and from grammar errors.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LexError::Cancelled)
    }
}
