//! Syntax frontend for the pineapl language: lexer, combinator parser, AST, diagnostics.
//!
//! The crate is "syntax-only": it turns source text into a [`ast::File`] and stops there. Code
//! generation and the command-line driver live in the `pineapl` crate.
//!
//! ## Pipeline
//!
//! ```text
//! source ──lexer::lex──▶ Vec<Token> ──parser::parse──▶ ast::File
//! ```
//!
//! The parser is a small combinator engine (`parser::engine`) with the concrete grammar
//! (`parser::grammar`) built on top of it.
//!
//! ## Examples
//! ```rust,no_run
//! use pineapl_syntax::parse_source;
//!
//! let file = parse_source("func main() {}").unwrap();
//! assert_eq!(file.functions.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;

pub use diagnostics::{LexError, ParseError, SyntaxError};

/// Lex and parse `source` into a [`ast::File`] using the default [`parser::ParseOptions`].
///
/// ## Errors
/// Returns [`SyntaxError::Lex`] if the source contains a character no token starts with, or
/// [`SyntaxError::Parse`] for the first unrecovered grammar failure.
pub fn parse_source(source: &str) -> Result<ast::File, SyntaxError> {
    parse_source_with(source, &parser::ParseOptions::default())
}

/// Like [`parse_source`], with explicit parser options.
pub fn parse_source_with(source: &str, options: &parser::ParseOptions) -> Result<ast::File, SyntaxError> {
    let tokens = lexer::lex(source)?;
    Ok(parser::parse_with(&tokens, options)?)
}
