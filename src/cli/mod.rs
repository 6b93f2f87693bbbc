//! CLI module for the pineapl compiler
//!
//! This module provides the command-line interface for the compiler.
//!
//! ## Commands
//!
//! - `pineapl <file>` / `pineapl -i <file>` - Compile and print IR
//! - `build <file> [-o <out>]` - Compile and write IR to a file
//! - `--lex <file>` - Dump tokens (debug)
//! - `--parse <file> [--json]` - Dump the syntax tree (debug)
//! - `--strict` - Reject whitespace around top-level functions
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pineapl_syntax::parser::{AlternationPolicy, ParseOptions, TopLevel, TracingSink};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already rendered for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The pineapl compiler
#[derive(Parser, Debug)]
#[command(name = "pineapl")]
#[command(version = VERSION)]
#[command(about = "Compile pineapl source to LLVM-style IR", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to compile (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// File to compile, flag form
    #[arg(short = 'i', long = "input", value_name = "FILE", conflicts_with = "file")]
    pub input: Option<PathBuf>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with_all = ["file", "input"])]
    pub lex_file: Option<PathBuf>,

    /// Parse only (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with_all = ["file", "input"])]
    pub parse_file: Option<PathBuf>,

    /// Print the syntax tree as JSON instead of Rust debug output
    #[arg(long, requires = "parse_file", conflicts_with_all = ["file", "input", "lex_file"])]
    pub json: bool,

    /// How alternatives are chosen when parsing
    #[arg(long, global = true, value_name = "POLICY", default_value_t = AlternationPolicy::FirstSet)]
    pub alternation: AlternationPolicy,

    /// Log every parser step at TRACE level
    #[arg(long, global = true)]
    pub trace: bool,

    /// Only accept functions written back to back, with no whitespace between or around them
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a source file to IR
    Build {
        /// Source file to compile
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(short = 'o', long = "output", value_name = "OUT")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Parser options selected by the global flags.
    pub fn parse_options(&self) -> ParseOptions {
        let top_level = if self.strict { TopLevel::Strict } else { TopLevel::Spaced };
        let options = ParseOptions::new()
            .with_alternation(self.alternation)
            .with_top_level(top_level);
        if self.trace {
            options.with_trace(Arc::new(TracingSink))
        } else {
            options
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Structured logging to stderr with an env-based filter, defaulting to info.
/// `--trace` additionally enables the parser's TRACE events.
fn init_tracing(trace: bool) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if trace {
        if let Ok(directive) = "pineapl_syntax=trace".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let options = cli.parse_options();

    if cli.json && cli.parse_file.is_none() {
        return Err(CliError::failure("Error: --json requires --parse <FILE>"));
    }

    // Handle debug flags first
    if let Some(file) = &cli.lex_file {
        return commands::lex_file(&file.to_string_lossy());
    }
    if let Some(file) = &cli.parse_file {
        return commands::parse_file(&file.to_string_lossy(), cli.json, &options);
    }

    match cli.command {
        Some(Command::Build { file, output }) => commands::build_file(&file.to_string_lossy(), output.as_deref(), &options),
        None => match cli.file.or(cli.input) {
            Some(file) => commands::compile_file(&file.to_string_lossy(), &options),
            // No command and no file - show help
            None => Err(CliError::failure("Error: no input file (try `pineapl --help`)")),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_positional_file() {
        let cli = Cli::try_parse_from(["pineapl", "main.pin"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("main.pin")));
        assert!(cli.command.is_none());
        assert_eq!(cli.alternation, AlternationPolicy::FirstSet);
    }

    #[test]
    fn test_cli_parse_input_flag() {
        let cli = Cli::try_parse_from(["pineapl", "-i", "main.pin"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("main.pin")));
        assert!(Cli::try_parse_from(["pineapl", "a.pin", "-i", "b.pin"]).is_err());
    }

    #[test]
    fn test_cli_parse_build() {
        let cli = Cli::try_parse_from(["pineapl", "build", "main.pin", "-o", "main.ll"]).unwrap();
        if let Some(Command::Build { file, output }) = cli.command {
            assert_eq!(file, PathBuf::from("main.pin"));
            assert_eq!(output, Some(PathBuf::from("main.ll")));
        } else {
            panic!("Expected Build command");
        }
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["pineapl", "--parse", "main.pin", "--json"]).unwrap();
        assert!(cli.json);
        assert!(cli.parse_file.is_some());

        let cli = Cli::try_parse_from(["pineapl", "--lex", "main.pin"]).unwrap();
        assert!(cli.lex_file.is_some());

        // --json only makes sense together with --parse
        assert!(Cli::try_parse_from(["pineapl", "--json", "main.pin"]).is_err());
        assert!(Cli::try_parse_from(["pineapl", "-i", "main.pin", "--json"]).is_err());
        assert!(Cli::try_parse_from(["pineapl", "--lex", "main.pin", "--json"]).is_err());
        assert!(Cli::try_parse_from(["pineapl", "--json"]).is_err());
    }

    #[test]
    fn test_execute_rejects_json_without_parse() {
        let mut cli = Cli::try_parse_from(["pineapl", "main.pin"]).unwrap();
        cli.json = true;
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("--json requires --parse"), "{}", err.message);
    }

    #[test]
    fn test_cli_strict_top_level() {
        let cli = Cli::try_parse_from(["pineapl", "main.pin"]).unwrap();
        assert_eq!(cli.parse_options().top_level, TopLevel::Spaced);

        let cli = Cli::try_parse_from(["pineapl", "build", "main.pin", "--strict"]).unwrap();
        assert!(cli.strict);
        assert_eq!(cli.parse_options().top_level, TopLevel::Strict);
    }

    #[test]
    fn test_cli_parse_alternation_and_trace() {
        let cli = Cli::try_parse_from(["pineapl", "build", "main.pin", "--alternation", "exhaustive", "--trace"]).unwrap();
        assert_eq!(cli.alternation, AlternationPolicy::Exhaustive);
        let options = cli.parse_options();
        assert_eq!(options.alternation, AlternationPolicy::Exhaustive);
        assert!(options.trace().is_some());

        assert!(Cli::try_parse_from(["pineapl", "--alternation", "greedy", "main.pin"]).is_err());
    }

    #[test]
    fn test_execute_without_input_fails() {
        let cli = Cli::try_parse_from(["pineapl"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}
