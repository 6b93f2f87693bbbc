//! pineapl compiler backend
//!
//! This module lowers a parsed [`File`](pineapl_syntax::ast::File) to LLVM-style IR text.
//!
//! The pipeline is:
//! 1. `ast::File` from the frontend → `IrCodegen` → IR text
//! 2. The CLI prints the text or writes it to the requested output file
//!
//! ## Module Organization
//!
//! - `codegen` - `IrCodegen` and `CodegenError`
//! - `emitter` - indentation-aware text buffer the generator writes into
//! - `types` - mapping from source type names to IR types

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]

pub mod codegen;
pub mod emitter;
pub mod types;

pub use codegen::{CodegenError, IrCodegen};
pub use emitter::IrEmitter;
pub use types::IrType;
