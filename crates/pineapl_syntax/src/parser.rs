//! Parser for the pineapl language
//!
//! A small parser-combinator engine plus the concrete grammar built from it. Parsing consumes
//! the token stream produced by [`crate::lexer`] and yields an [`ast::File`].
//!
//! ## Examples
//!
//! ```rust,no_run
//! use pineapl_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("func main(x Int,) { run() }").unwrap();
//! let file = parser::parse(&tokens).unwrap();
//! assert_eq!(file.functions[0].parameters.len(), 1);
//! ```
//!
//! ## Module Structure
//!
//! - `cursor` - forward-only position over the token slice
//! - `engine` - parser values, combinators, first-set dispatch, captures and reduce
//! - `grammar` - the pineapl rules and their reduce functions
//! - `options` - alternation policy and trace sink configuration

pub mod cursor;
pub mod engine;
pub mod grammar;
pub mod options;

pub use cursor::TokenCursor;
pub use engine::{Capture, Parsed, Parser, Reduce, Tag};
pub use grammar::Grammar;
pub use options::{AlternationPolicy, ParseOptions, TopLevel, TraceOutcome, TraceSink, TracingSink};

use std::sync::LazyLock;

use crate::ast;
use crate::diagnostics::ParseError;
use crate::lexer::Token;

// NOTE: The public entrypoints and the end-to-end tests live in separate files but are
// included here so they share this module's imports.

include!("parser/api.rs");
include!("parser/tests.rs");
