//! Quill rune sources
//!
//! Supplies runes (Unicode scalar values) to the `quill-lexer` engine.
//! A rune source buffers decoded characters from some underlying input and
//! exposes three operations: make sure at least N runes are buffered, read
//! the buffered runes, and discard a consumed prefix.
//!
//! # Example
//!
//! ```
//! use quill_runes::{Feed, StringFeeder};
//!
//! let mut feed = StringFeeder::new("ab");
//! feed.at_least(2).unwrap();
//! assert_eq!(feed.runes(), &['a', 'b']);
//! feed.skip(1);
//! assert_eq!(feed.runes(), &['b']);
//! ```

pub mod feeder;

pub use feeder::{Feed, Feeder, StringFeeder};

/// Failure reported by a rune source.
///
/// `Eof` is an expected, ordinary condition: it means the underlying input
/// ended before the requested number of runes could be buffered. Anything
/// else is a real failure.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The input ended before the request could be satisfied.
    #[error("end of input")]
    Eof,

    /// The underlying reader failed.
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte stream is not valid UTF-8.
    #[error("invalid UTF-8 sequence in input")]
    Encoding,
}

impl FeedError {
    /// Whether this is the expected end-of-input condition rather than a
    /// real failure.
    pub fn is_eof(&self) -> bool {
        matches!(self, FeedError::Eof)
    }
}
