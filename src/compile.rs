//! Whole-pipeline entry points: source text in, IR text out.

use miette::Diagnostic;
use thiserror::Error;

use pineapl_syntax::parser::ParseOptions;
use pineapl_syntax::{SyntaxError, parse_source_with};

use crate::backend::{CodegenError, IrCodegen};

/// Any error between source text and IR.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CompileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Codegen(#[from] CodegenError),
}

/// Compile `source` to IR with the default parser options.
pub fn compile(source: &str) -> Result<String, CompileError> {
    compile_with(source, &ParseOptions::default())
}

/// Compile `source` to IR.
///
/// ## Errors
/// The first lex, parse or codegen error; later stages do not run.
pub fn compile_with(source: &str, options: &ParseOptions) -> Result<String, CompileError> {
    let file = parse_source_with(source, options)?;
    Ok(IrCodegen::new().generate(&file)?)
}
