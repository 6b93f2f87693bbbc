//! Diagnostics for the syntax frontend
//!
//! Lexing and parsing each have their own error enum; [`SyntaxError`] unifies them for callers
//! that run the whole frontend. All of them are `miette` diagnostics with a labelled span, so a
//! driver only has to attach the source text to get a rendered report.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::lexer::{Token, TokenKind};

/// Error produced while scanning source text. Lexing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LexError {
    #[error("unknown character {character:?} at offset {offset}")]
    #[diagnostic(
        code(pineapl::lex::unknown_character),
        help("tokens are whitespace, identifiers, numbers and the punctuation characters ( ) {{ }} = < ,")
    )]
    UnknownCharacter {
        offset: usize,
        character: char,
        #[label("no token starts here")]
        span: SourceSpan,
    },
}

impl LexError {
    pub fn unknown_character(offset: usize, character: char) -> Self {
        LexError::UnknownCharacter {
            offset,
            character,
            span: (offset, character.len_utf8()).into(),
        }
    }

    /// Byte offset of the offending character.
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnknownCharacter { offset, .. } => *offset,
        }
    }
}

/// Error produced by the combinator parser.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    /// The current token is not one the grammar allows here.
    #[error("expected {}, found {}", describe_kinds(.expected), describe_found(.found, .found_text))]
    #[diagnostic(code(pineapl::parse::unexpected_token))]
    UnexpectedToken {
        /// Every kind that would have been accepted, most specific first
        expected: Vec<TokenKind>,
        found: TokenKind,
        found_text: String,
        /// Byte offset of the found token
        offset: usize,
        /// Number of tokens successfully consumed before the failure
        consumed: usize,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    /// A reduce step could not build its node from the captured values. This is a grammar bug
    /// surfaced as a value.
    #[error("cannot build {rule}: {detail}")]
    #[diagnostic(code(pineapl::parse::construction))]
    Construction { rule: &'static str, detail: String },
}

impl ParseError {
    /// `found` was seen where one of `expected` was required, after `consumed` tokens.
    pub fn unexpected(expected: Vec<TokenKind>, found: &Token, consumed: usize) -> Self {
        ParseError::UnexpectedToken {
            expected,
            found: found.kind,
            found_text: found.text.clone(),
            offset: found.start,
            consumed,
            span: found.span().into(),
        }
    }

    pub fn construction(rule: &'static str, detail: impl Into<String>) -> Self {
        ParseError::Construction {
            rule,
            detail: detail.into(),
        }
    }

    /// Byte offset the error is reported at, if it points into the source.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { offset, .. } => Some(*offset),
            ParseError::Construction { .. } => None,
        }
    }

    /// Number of tokens consumed before the failure.
    pub fn consumed(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { consumed, .. } => *consumed,
            ParseError::Construction { .. } => 0,
        }
    }

    /// Add `kinds` to the expected set, keeping the existing order and skipping duplicates.
    pub(crate) fn widen_expected(&mut self, kinds: &[TokenKind]) {
        if let ParseError::UnexpectedToken { expected, .. } = self {
            for kind in kinds {
                if !expected.contains(kind) {
                    expected.push(*kind);
                }
            }
        }
    }
}

/// Any error the frontend can produce for a source string.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SyntaxError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn offset(&self) -> Option<usize> {
        match self {
            SyntaxError::Lex(e) => Some(e.offset()),
            SyntaxError::Parse(e) => e.offset(),
        }
    }
}

/// `','`, `')' or ','`, `')', whitespace or identifier`
fn describe_kinds(kinds: &[TokenKind]) -> String {
    match kinds {
        [] => "nothing".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let init: Vec<String> = init.iter().map(ToString::to_string).collect();
            format!("{} or {}", init.join(", "), last)
        }
    }
}

fn describe_found(kind: &TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Identifier | TokenKind::Number => format!("{} `{}`", kind, text),
        TokenKind::Whitespace => format!("whitespace {:?}", text),
        _ => kind.to_string(),
    }
}
