//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use miette::{Diagnostic, NamedSource, Report};
use pineapl_syntax::parser::ParseOptions;
use pineapl_syntax::{lexer, parse_source_with};

use crate::compile::compile_with;

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (16 MiB)
///
/// Files larger than this are rejected before they are read.
const MAX_SOURCE_SIZE: u64 = 16 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (16 MiB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    // Check file size before reading
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Render a diagnostic against its source file.
pub fn render_diagnostic<D>(file_path: &str, source: &str, diagnostic: D) -> CliError
where
    D: Diagnostic + Send + Sync + 'static,
{
    let report = Report::new(diagnostic).with_source_code(NamedSource::new(file_path, source.to_string()));
    CliError::failure(format!("{report:?}"))
}

/// Lex and display tokens, one per line.
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&source).map_err(|e| render_diagnostic(file_path, &source, e))?;

    for tok in &tokens {
        println!("{}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display the syntax tree.
pub fn parse_file(file_path: &str, json: bool, options: &ParseOptions) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let file = parse_source_with(&source, options).map_err(|e| render_diagnostic(file_path, &source, e))?;

    if json {
        let out = serde_json::to_string_pretty(&file)
            .map_err(|e| CliError::failure(format!("Error serializing syntax tree: {}", e)))?;
        println!("{}", out);
    } else {
        println!("{:#?}", file);
    }
    Ok(ExitCode::SUCCESS)
}

/// Compile a source string, rendering any failure against `file_path`.
pub fn compile_source(file_path: &str, source: &str, options: &ParseOptions) -> CliResult<String> {
    compile_with(source, options).map_err(|e| render_diagnostic(file_path, source, e))
}

/// Compile a file and print the IR.
pub fn compile_file(file_path: &str, options: &ParseOptions) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let ir = compile_source(file_path, &source, options)?;
    print!("{}", ir);
    Ok(ExitCode::SUCCESS)
}

/// Compile a file and write the IR to `output`, or to stdout when no output is given.
pub fn build_file(file_path: &str, output: Option<&Path>, options: &ParseOptions) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let ir = compile_source(file_path, &source, options)?;

    let Some(output) = output else {
        print!("{}", ir);
        return Ok(ExitCode::SUCCESS);
    };

    fs::write(output, &ir)
        .map_err(|e| CliError::failure(format!("Error writing output file '{}': {}", output.display(), e)))?;
    tracing::info!(output = %output.display(), bytes = ir.len(), "wrote IR");
    println!("✓ Build successful: {}", output.display());
    Ok(ExitCode::SUCCESS)
}
