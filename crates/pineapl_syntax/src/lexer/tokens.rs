//! Token types for the pineapl lexer.
//!
//! Tokens keep their raw text, including whitespace, so concatenating the texts of a token
//! stream reproduces the source exactly.

use std::fmt;

use serde::Serialize;

use crate::ast::Span;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Number,
    Whitespace,
    RoundOpen,
    RoundClose,
    CurlyOpen,
    CurlyClose,
    Equals,
    LessThan,
    Comma,
    KeywordFunc,
    Eof,
    Unknown,
}

impl TokenKind {
    /// Upper-case name used by token dumps (`IDENTIFIER`, `ROUND_OPEN`, ...).
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::RoundOpen => "ROUND_OPEN",
            TokenKind::RoundClose => "ROUND_CLOSE",
            TokenKind::CurlyOpen => "CURLY_OPEN",
            TokenKind::CurlyClose => "CURLY_CLOSE",
            TokenKind::Equals => "EQUALS",
            TokenKind::LessThan => "LESS_THAN",
            TokenKind::Comma => "COMMA",
            TokenKind::KeywordFunc => "KEYWORD_FUNC",
            TokenKind::Eof => "EOF",
            TokenKind::Unknown => "UNKNOWN",
        }
    }
}

/// Human-readable form used in diagnostics (`identifier`, `')'`, `end of input`).
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::Whitespace => "whitespace",
            TokenKind::RoundOpen => "'('",
            TokenKind::RoundClose => "')'",
            TokenKind::CurlyOpen => "'{'",
            TokenKind::CurlyClose => "'}'",
            TokenKind::Equals => "'='",
            TokenKind::LessThan => "'<'",
            TokenKind::Comma => "','",
            TokenKind::KeywordFunc => "'func'",
            TokenKind::Eof => "end of input",
            TokenKind::Unknown => "unknown token",
        };
        f.write_str(text)
    }
}

/// A token with its kind, raw text and byte span in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }

    /// The empty end-of-input marker placed at `offset`.
    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", offset, offset)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// One line of a token dump: kind, span and quoted text.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<20} {:>3}..{:<3} {:?}", self.kind.name(), self.start, self.end, self.text)
    }
}

// ============================================================================
// RESERVED WORDS
// ============================================================================

/// Spelling → keyword kind for every reserved word.
pub const KEYWORDS: &[(&str, TokenKind)] = &[("func", TokenKind::KeywordFunc)];

/// Resolve an identifier spelling to a keyword kind, if reserved.
pub fn keyword_kind(spelling: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(word, _)| *word == spelling)
        .map(|(_, kind)| *kind)
}
