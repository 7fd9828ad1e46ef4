use std::io::Read;

use crate::FeedError;

/// Read buffer size for [`Feeder`].
const CHUNK_SIZE: usize = 4096;

/// A buffered rune source.
///
/// This is the only interface the lexer engine sees. Implementations buffer
/// decoded runes from some underlying input; the engine asks for lookahead
/// with [`at_least`](Feed::at_least), inspects it through
/// [`runes`](Feed::runes), and commits consumption with [`skip`](Feed::skip).
///
/// After `at_least` fails, whatever partial data was buffered stays readable
/// through `runes()`; callers decide what to do with it.
pub trait Feed {
    /// Ensure at least `n` runes are buffered.
    ///
    /// Returns [`FeedError::Eof`] if the input ends first. That is an
    /// ordinary condition, not a failure; any runes read so far remain
    /// buffered.
    fn at_least(&mut self, n: usize) -> Result<(), FeedError>;

    /// The currently buffered runes. No side effects.
    fn runes(&self) -> &[char];

    /// Discard the first `n` buffered runes permanently.
    fn skip(&mut self, n: usize);
}

/// A rune source decoding UTF-8 incrementally from any [`Read`] stream.
///
/// Multi-byte sequences split across read chunks are handled: undecodable
/// trailing bytes are carried over until the rest of the sequence arrives.
/// A sequence that is outright invalid, or cut off by end of input, reports
/// [`FeedError::Encoding`].
pub struct Feeder<R> {
    reader: R,
    /// Bytes read but not yet decodable (incomplete trailing sequence).
    pending: Vec<u8>,
    runes: Vec<char>,
    eof: bool,
}

impl<R: Read> Feeder<R> {
    /// Create a feeder over `reader`. Nothing is read until the first
    /// [`at_least`](Feed::at_least) call.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            runes: Vec::new(),
            eof: false,
        }
    }

    /// Read one chunk from the underlying reader and decode what it can.
    fn refill(&mut self) -> Result<(), FeedError> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let n = loop {
            match self.reader.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(FeedError::Io(e)),
            }
        };

        if n == 0 {
            self.eof = true;
            if self.pending.is_empty() {
                return Err(FeedError::Eof);
            }
            // Input ended in the middle of a multi-byte sequence.
            return Err(FeedError::Encoding);
        }

        self.pending.extend_from_slice(&chunk[..n]);
        let (valid, invalid) = match std::str::from_utf8(&self.pending) {
            Ok(_) => (self.pending.len(), false),
            // An incomplete trailing sequence is not an error yet; an
            // outright-invalid one is, but the prefix before it still decodes.
            Err(e) => (e.valid_up_to(), e.error_len().is_some()),
        };

        if valid > 0 {
            if let Ok(s) = std::str::from_utf8(&self.pending[..valid]) {
                self.runes.extend(s.chars());
            }
            self.pending.drain(..valid);
        }
        if invalid {
            return Err(FeedError::Encoding);
        }
        Ok(())
    }
}

impl<R: Read> Feed for Feeder<R> {
    fn at_least(&mut self, n: usize) -> Result<(), FeedError> {
        while self.runes.len() < n {
            if self.eof {
                // Undecodable bytes at end of input keep reporting as an
                // encoding error; the kind must not change between calls.
                if !self.pending.is_empty() {
                    return Err(FeedError::Encoding);
                }
                return Err(FeedError::Eof);
            }
            self.refill()?;
        }
        Ok(())
    }

    fn runes(&self) -> &[char] {
        &self.runes
    }

    fn skip(&mut self, n: usize) {
        let n = n.min(self.runes.len());
        self.runes.drain(..n);
    }
}

/// A rune source over an already-loaded string.
///
/// All runes are buffered up front; `at_least` only checks availability.
/// Useful for lexing in-memory sources and in tests.
pub struct StringFeeder {
    runes: Vec<char>,
}

impl StringFeeder {
    pub fn new(source: impl AsRef<str>) -> Self {
        Self {
            runes: source.as_ref().chars().collect(),
        }
    }
}

impl Feed for StringFeeder {
    fn at_least(&mut self, n: usize) -> Result<(), FeedError> {
        if self.runes.len() < n {
            return Err(FeedError::Eof);
        }
        Ok(())
    }

    fn runes(&self) -> &[char] {
        &self.runes
    }

    fn skip(&mut self, n: usize) {
        let n = n.min(self.runes.len());
        self.runes.drain(..n);
    }
}
