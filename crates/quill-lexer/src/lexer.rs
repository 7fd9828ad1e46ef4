use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam::channel::{bounded, Receiver, Sender};
use tracing::{debug, trace};

use quill_runes::{Feed, FeedError};

use crate::position::Position;
use crate::token::{ErrorToken, Lexeme, SyntaxErrorToken, Token, TokenType};
use crate::LexError;

/// A unit of lexing logic.
///
/// A state function inspects buffered input through the [`Lexer`] it is
/// handed and returns the next state to run, or `None` to stop the machine.
/// Plain `fn` items of the right signature coerce, and capturing closures
/// are accepted for grammars that carry data.
pub struct StateFn(Box<dyn FnOnce(&mut Lexer) -> Option<StateFn> + Send>);

impl StateFn {
    pub fn new(f: impl FnOnce(&mut Lexer) -> Option<StateFn> + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Run this state against the engine, yielding the next state if any.
    pub fn call(self, lex: &mut Lexer) -> Option<StateFn> {
        (self.0)(lex)
    }
}

impl fmt::Debug for StateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateFn")
    }
}

/// Cloneable handle that stops a running lexer.
///
/// The trampoline checks the flag between state-function invocations; a
/// cancelled run emits a final [`LexError::Cancelled`] token and stops, so
/// consumers can tell cancellation apart from clean end-of-input.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The lexer engine.
///
/// Owns a lookahead cursor into the rune source, the current position, and
/// the sending half of the token channel. A grammar's state functions drive
/// it through [`at_least`](Lexer::at_least), [`step`](Lexer::step),
/// [`newline`](Lexer::newline), and the emit operations; everything else is
/// private, so there is exactly one writer of the cursor and position.
///
/// Construction hands back the [`Receiver`] the consumer drains; the stream
/// ends when the receiver disconnects, which happens exactly once, when
/// [`run`](Lexer::run) returns. `run` consumes the engine, so a lexer runs
/// at most once.
pub struct Lexer {
    /// Initial state, taken by `run`.
    start: Option<StateFn>,
    feed: Box<dyn Feed + Send>,
    /// Base position for the next emitted token.
    pos: Position,
    /// Runes looked ahead but not yet committed.
    cursor: usize,
    tokens: Sender<Token>,
    cancel: CancelToken,
}

impl Lexer {
    /// Build an engine from a start state, a rune source, and the output
    /// channel capacity.
    ///
    /// Capacity bounds how far the producer may run ahead of the consumer;
    /// `0` gives a rendezvous channel where every emit waits for a matching
    /// receive.
    pub fn new(
        start: StateFn,
        feed: impl Feed + Send + 'static,
        capacity: usize,
    ) -> (Self, Receiver<Token>) {
        let (tokens, receiver) = bounded(capacity);
        let lexer = Self {
            start: Some(start),
            feed: Box::new(feed),
            pos: Position::new(),
            cursor: 0,
            tokens,
            cancel: CancelToken::new(),
        };
        (lexer, receiver)
    }

    /// A handle that cancels this run from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the state machine to completion on the current thread.
    ///
    /// Starting from the configured start state, each state is invoked with
    /// the engine and replaced by its returned successor until one returns
    /// `None`. The token channel disconnects when this returns, on every
    /// path. An emitted error token does not stop the machine by itself;
    /// that is the state function's decision.
    pub fn run(mut self) {
        let mut state = self.start.take();
        while let Some(next) = state {
            if self.cancel.is_cancelled() {
                debug!("lexer run cancelled");
                self.emit_error(LexError::Cancelled);
                return;
            }
            state = next.call(&mut self);
        }
        trace!("state machine finished");
        // Dropping self drops the only Sender, closing the stream.
    }

    /// Run the state machine on a dedicated thread.
    pub fn spawn(self) -> thread::JoinHandle<()> {
        thread::spawn(move || self.run())
    }

    /// The position that will be attached to the next emitted token.
    ///
    /// Pending lookahead does not move it; only [`emit`](Lexer::emit) and
    /// [`discard`](Lexer::discard) do.
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Ensure `n` runes of lookahead beyond what [`step`](Lexer::step) has
    /// already taken, and return the unconsumed suffix of the buffer.
    ///
    /// If the source cannot satisfy the request, whatever partial data is
    /// available comes back together with the source's error; end-of-input
    /// is an ordinary error value there, not a failure. `n == 0` polls the
    /// pending suffix without extending the requirement.
    pub fn at_least(&mut self, n: usize) -> (&[char], Option<FeedError>) {
        let err = self.feed.at_least(self.cursor + n).err();
        let runes = self.feed.runes();
        let pending = runes.get(self.cursor..).unwrap_or_default();
        (pending, err)
    }

    /// Mark `n` more runes as examined but not yet committed.
    pub fn step(&mut self, n: usize) {
        self.cursor += n;
    }

    /// Record a consumed newline rune.
    ///
    /// Position advancement on emit only counts columns; the state function
    /// must call this for every newline it stepped over, before the next
    /// emit, or subsequent token positions will drift.
    pub fn newline(&mut self) {
        self.pos.newline();
    }

    /// Commit the pending lookahead as a token of type `ty`.
    ///
    /// The token's text is the first `cursor` runes of the buffer and its
    /// position is the position before this commit. The committed runes are
    /// discarded from the source, position advances by that many columns,
    /// and the cursor resets. With no pending lookahead this emits a
    /// zero-length token at the current position, which stays put.
    ///
    /// Blocks when the output channel is full; this is the only
    /// backpressure between producer and consumer.
    pub fn emit(&mut self, ty: TokenType) {
        let pos = self.pos;
        let mut text = String::new();
        let n = self.cursor;
        if n > 0 {
            debug_assert!(
                n <= self.feed.runes().len(),
                "cursor outran buffered input"
            );
            text = self.feed.runes()[..n].iter().collect();
            self.feed.skip(n);
            self.pos.advance(n);
            self.cursor = 0;
        }
        trace!(ty = ty.0, len = text.len(), %pos, "emit");
        self.send(Token::Lexeme(Lexeme { ty, text, pos }));
    }

    /// Drop the pending lookahead without emitting anything.
    ///
    /// Consumption bookkeeping matches [`emit`](Lexer::emit): the runes are
    /// discarded from the source and position advances by the cursor count.
    /// Used for input that produces no token, such as separators the
    /// grammar does not report. As with emit, call
    /// [`newline`](Lexer::newline) afterwards for any newline runes the
    /// dropped text contained.
    pub fn discard(&mut self) {
        let n = self.cursor;
        if n > 0 {
            trace!(len = n, "discard");
            self.feed.skip(n);
            self.pos.advance(n);
            self.cursor = 0;
        }
    }

    /// Send an error token at the current position.
    ///
    /// Pending lookahead and position are untouched; this does not stop the
    /// machine.
    pub fn emit_error(&mut self, err: impl Into<LexError>) {
        let err = err.into();
        debug!(%err, pos = %self.pos, "emit error");
        let pos = self.pos;
        self.send(Token::Error(ErrorToken { err, pos }));
    }

    /// Send a plain-message error token at the current position.
    pub fn emit_error_msg(&mut self, msg: impl Into<String>) {
        self.emit_error(LexError::Message(msg.into()));
    }

    /// Send a syntax error capturing the current position, the lookahead
    /// offset, and the full unconsumed buffer.
    ///
    /// The message is prefixed with the standard
    /// `"Syntax Error at <line>.<column>+<cursor>"` header. Like
    /// [`emit_error`](Lexer::emit_error), this consumes nothing.
    pub fn emit_syntax_error(&mut self, msg: impl Into<String>) {
        let token = SyntaxErrorToken::new(msg, self.pos, self.cursor, self.feed.runes());
        debug!(message = %token.message, "emit syntax error");
        self.send(Token::Syntax(token));
    }

    fn send(&mut self, token: Token) {
        if self.tokens.send(token).is_err() {
            // Consumer dropped the receiver; stop at the next trampoline step.
            self.cancel.cancel();
        }
    }
}

impl fmt::Debug for Lexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("pos", &self.pos)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
