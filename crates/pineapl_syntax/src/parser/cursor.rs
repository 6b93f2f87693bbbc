//! Forward, read-only view over a token slice.
//!
//! The cursor is the only mutable state of a parse. Parsers never modify tokens; they move the
//! position forward, and the alternation scan rewinds it with [`TokenCursor::restore`].

use crate::ast::Span;
use crate::lexer::Token;

pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Returned by `current()` once the position runs past the slice
    eof: Token,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let end = tokens.last().map_or(0, |t| t.end);
        Self {
            tokens,
            pos: 0,
            eof: Token::eof(end),
        }
    }

    /// The token at the current position, or a synthetic EOF past the end.
    pub fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Move forward by one token. Does nothing at end of input.
    pub fn advance(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    /// `true` when the current token is the end-of-input marker (real or synthetic).
    pub fn is_eof(&self) -> bool {
        self.current().is_eof()
    }

    /// Number of tokens consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn restore(&mut self, position: usize) {
        self.pos = position.min(self.tokens.len());
    }

    /// Byte span of the tokens consumed since `start`; empty at the current token when nothing
    /// was consumed.
    pub fn span_since(&self, start: usize) -> Span {
        if self.pos > start {
            Span::new(self.tokens[start].start, self.tokens[self.pos - 1].end)
        } else {
            let at = self.current().start;
            Span::new(at, at)
        }
    }
}
