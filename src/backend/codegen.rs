//! IR code generation
//!
//! `IrCodegen` turns a parsed [`File`] into LLVM-style IR text:
//!
//! ```text
//! define void @main(i32 %x) {
//! entry:
//!   call void @foo()
//!   ret void
//! }
//! ```
//!
//! Functions are emitted in declaration order, separated by one blank line. Parameter types are
//! mapped through [`IrType`]; a type with no mapping is an error, reported with the parameter's
//! span.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use pineapl_syntax::ast::{File, Function, Parameter};

use super::emitter::IrEmitter;
use super::types::IrType;

/// Error during IR generation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CodegenError {
    #[error("unsupported type `{type_name}` for parameter `{parameter}` of function `{function}`")]
    #[diagnostic(
        code(pineapl::codegen::unsupported_type),
        help("supported parameter types are Bool, Int and Float")
    )]
    UnsupportedType {
        type_name: String,
        parameter: String,
        function: String,
        #[label("no IR type for this parameter")]
        span: SourceSpan,
    },
}

/// IR text generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct IrCodegen;

impl IrCodegen {
    pub fn new() -> Self {
        Self
    }

    /// Generate the IR module for `file`.
    ///
    /// ## Errors
    /// Returns [`CodegenError::UnsupportedType`] for the first parameter whose type has no IR
    /// mapping. Nothing is emitted in that case.
    #[tracing::instrument(skip_all, fields(functions = file.functions.len()))]
    pub fn generate(&self, file: &File) -> Result<String, CodegenError> {
        let mut emitter = IrEmitter::new();
        for function in &file.functions {
            if !emitter.is_empty() {
                emitter.blank_line();
            }
            self.emit_function(&mut emitter, function)?;
        }
        Ok(emitter.finish())
    }

    fn emit_function(&self, emitter: &mut IrEmitter, function: &Function) -> Result<(), CodegenError> {
        tracing::debug!(function = %function.name, parameters = function.parameters.len(), "emitting function");

        let params = function
            .parameters
            .iter()
            .map(|param| lower_parameter(function, param))
            .collect::<Result<Vec<_>, _>>()?;

        let header = format!("define void @{}({})", function.name, params.join(", "));
        emitter.block(&header, |e| {
            e.label("entry");
            for call in &function.body.calls {
                e.linef(format_args!("call void @{}()", call.name));
            }
            e.line("ret void");
        });
        Ok(())
    }
}

fn lower_parameter(function: &Function, param: &Parameter) -> Result<String, CodegenError> {
    let ty = IrType::from_source(&param.type_name).ok_or_else(|| CodegenError::UnsupportedType {
        type_name: param.type_name.clone(),
        parameter: param.name.clone(),
        function: function.name.clone(),
        span: param.span.into(),
    })?;
    Ok(format!("{} %{}", ty, param.name))
}
