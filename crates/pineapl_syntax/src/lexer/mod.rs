//! Lexer for the pineapl language
//!
//! Tokenization is ordered choice over a fixed list of recognizers, tried at the current offset:
//!
//! 1. whitespace (`[\t\n\f\r ]+`)
//! 2. identifier (`[a-zA-Z][a-zA-Z0-9]*`)
//! 3. number (`[-+]?[0-9]+(\.[0-9]+)?`)
//! 4. single-character punctuation `( ) { } = < ,`
//!
//! The first recognizer that matches a non-empty prefix wins; it is not longest-match across
//! recognizers. Reserved words are therefore scanned as identifiers first and reclassified by a
//! second pass over the finished token list.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (`TokenKind`, `Token`) and the reserved-word table

pub mod tokens;

pub use tokens::{KEYWORDS, Token, TokenKind, keyword_kind};

use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostics::LexError;

// ============================================================================
// RECOGNIZERS
// ============================================================================

/// A single token recognizer, anchored at the current offset.
enum Recognizer {
    Pattern(TokenKind, Regex),
    Char(TokenKind, char),
}

impl Recognizer {
    fn pattern(kind: TokenKind, pattern: &str) -> Self {
        let regex = Regex::new(pattern).expect("INVARIANT: lexer patterns are valid regular expressions");
        Recognizer::Pattern(kind, regex)
    }

    /// Length in bytes of the non-empty prefix of `rest` this recognizer accepts.
    fn recognize(&self, rest: &str) -> Option<usize> {
        match self {
            Recognizer::Pattern(_, regex) => regex
                .find(rest)
                .filter(|m| m.start() == 0 && !m.is_empty())
                .map(|m| m.end()),
            Recognizer::Char(_, c) => rest.starts_with(*c).then(|| c.len_utf8()),
        }
    }

    fn kind(&self) -> TokenKind {
        match self {
            Recognizer::Pattern(kind, _) | Recognizer::Char(kind, _) => *kind,
        }
    }
}

/// Recognizers in priority order.
static RECOGNIZERS: LazyLock<Vec<Recognizer>> = LazyLock::new(|| {
    vec![
        Recognizer::pattern(TokenKind::Whitespace, r"^[\t\n\x0C\r ]+"),
        Recognizer::pattern(TokenKind::Identifier, r"^[a-zA-Z][a-zA-Z0-9]*"),
        Recognizer::pattern(TokenKind::Number, r"^[-+]?[0-9]+(\.[0-9]+)?"),
        Recognizer::Char(TokenKind::RoundOpen, '('),
        Recognizer::Char(TokenKind::RoundClose, ')'),
        Recognizer::Char(TokenKind::CurlyOpen, '{'),
        Recognizer::Char(TokenKind::CurlyClose, '}'),
        Recognizer::Char(TokenKind::Equals, '='),
        Recognizer::Char(TokenKind::LessThan, '<'),
        Recognizer::Char(TokenKind::Comma, ','),
    ]
});

// ============================================================================
// LEXER
// ============================================================================

/// Lexer for pineapl source code.
pub struct Lexer<'a> {
    source: &'a str,
    offset: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns every token recognized so far together with the error that stopped the scan, if
    /// any. Lexing does not continue past an unrecognized character. Only a complete scan gets
    /// the trailing [`TokenKind::Eof`] marker.
    pub fn tokenize(mut self) -> (Vec<Token>, Option<LexError>) {
        let mut error = None;

        while self.offset < self.source.len() {
            if let Err(e) = self.scan_token() {
                error = Some(e);
                break;
            }
        }

        if error.is_none() {
            self.tokens.push(Token::eof(self.source.len()));
        }

        reclassify_keywords(&mut self.tokens);
        (self.tokens, error)
    }

    fn scan_token(&mut self) -> Result<(), LexError> {
        let rest = &self.source[self.offset..];

        for recognizer in RECOGNIZERS.iter() {
            if let Some(len) = recognizer.recognize(rest) {
                let end = self.offset + len;
                self.tokens
                    .push(Token::new(recognizer.kind(), &rest[..len], self.offset, end));
                self.offset = end;
                return Ok(());
            }
        }

        // `rest` is non-empty here, the loop in `tokenize` guarantees it.
        let character = rest.chars().next().unwrap_or('\0');
        Err(LexError::unknown_character(self.offset, character))
    }
}

/// Second pass: identifiers spelled like a reserved word become that keyword.
fn reclassify_keywords(tokens: &mut [Token]) {
    for token in tokens.iter_mut().filter(|t| t.kind == TokenKind::Identifier) {
        if let Some(kind) = keyword_kind(&token.text) {
            token.kind = kind;
        }
    }
}

/// Tokenize `source`, keeping the partial token list on failure.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
pub fn tokenize(source: &str) -> (Vec<Token>, Option<LexError>) {
    Lexer::new(source).tokenize()
}

/// Convenience function to lex a source string.
///
/// The token stream always ends with an `Eof` token.
///
/// ## Errors
/// Returns [`LexError::UnknownCharacter`] for the first character no recognizer accepts.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    match tokenize(source) {
        (tokens, None) => {
            tracing::debug!(token_count = tokens.len(), "lexed source");
            Ok(tokens)
        }
        (_, Some(error)) => Err(error),
    }
}

// ============================================================================
// TESTS
// ============================================================================
