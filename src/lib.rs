#![forbid(unsafe_code)]
//! pineapl compiler
//!
//! pineapl is a toy language of functions, typed parameters and zero-argument calls. This crate
//! provides the compiler: the frontend (lexer, combinator parser, AST) re-exported from
//! `pineapl_syntax`, the IR backend, and the command-line driver.
//!
//! ## Examples
//!
//! ```rust,no_run
//! let ir = pineapl::compile("func main(x Int,) { run() }").unwrap();
//! assert!(ir.starts_with("define void @main(i32 %x)"));
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod backend;
pub mod cli;
pub mod compile;

// Syntax components are provided by the pineapl_syntax crate.
pub use pineapl_syntax::{LexError, ParseError, SyntaxError, ast, diagnostics, lexer, parse_source, parse_source_with, parser};

pub use backend::{CodegenError, IrCodegen};
pub use compile::{CompileError, compile, compile_with};
