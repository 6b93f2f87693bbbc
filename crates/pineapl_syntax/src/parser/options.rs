//! Parser configuration
//!
//! [`ParseOptions`] selects how alternation chooses between candidates, which top-level layout a
//! file may have and where engine trace events go. The defaults are what `parser::parse` uses.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::diagnostics::ParseError;
use crate::lexer::Token;

/// How `one_of` picks an alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlternationPolicy {
    /// Run the single alternative whose first-set contains the current token. Only when several
    /// (or none) claim it, scan the candidates in order and keep the best-match error.
    #[default]
    FirstSet,
    /// Always scan every alternative in declaration order.
    Exhaustive,
}

impl fmt::Display for AlternationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlternationPolicy::FirstSet => write!(f, "first-set"),
            AlternationPolicy::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

impl FromStr for AlternationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-set" => Ok(AlternationPolicy::FirstSet),
            "exhaustive" => Ok(AlternationPolicy::Exhaustive),
            other => Err(format!(
                "unknown alternation policy '{}' (expected 'first-set' or 'exhaustive')",
                other
            )),
        }
    }
}

/// Layout accepted between the functions of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopLevel {
    /// Whitespace and newlines may surround and separate functions.
    #[default]
    Spaced,
    /// `function* EOF`: functions back to back and nothing else.
    Strict,
}

impl fmt::Display for TopLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopLevel::Spaced => write!(f, "spaced"),
            TopLevel::Strict => write!(f, "strict"),
        }
    }
}

/// What happened when a traced parser finished.
#[derive(Debug, Clone, Copy)]
pub enum TraceOutcome<'e> {
    Matched { consumed: usize },
    /// Optional parser whose first-set did not match; nothing consumed
    Skipped,
    Failed(&'e ParseError),
}

/// Receiver for engine trace events.
///
/// `depth` is the nesting level of the parser in the grammar, starting at 0 for the parser the
/// parse was started with.
pub trait TraceSink: Send + Sync {
    fn enter(&self, depth: usize, label: &str, token: &Token);
    fn exit(&self, depth: usize, label: &str, outcome: TraceOutcome<'_>);
}

/// Forwards trace events to `tracing` at TRACE level, indented by depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn enter(&self, depth: usize, label: &str, token: &Token) {
        let pad = "  ".repeat(depth);
        tracing::trace!(depth, offset = token.start, "{pad}[{label}] enter at {}", token.kind.name());
    }

    fn exit(&self, depth: usize, label: &str, outcome: TraceOutcome<'_>) {
        let pad = "  ".repeat(depth);
        match outcome {
            TraceOutcome::Matched { consumed } => tracing::trace!(depth, consumed, "{pad}[{label}] matched"),
            TraceOutcome::Skipped => tracing::trace!(depth, "{pad}[{label}] skipped"),
            TraceOutcome::Failed(err) => tracing::trace!(depth, "{pad}[{label}] failed: {err}"),
        }
    }
}

/// Options for a single parse.
#[derive(Clone, Default)]
pub struct ParseOptions {
    pub alternation: AlternationPolicy,
    pub top_level: TopLevel,
    trace: Option<Arc<dyn TraceSink>>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alternation(mut self, alternation: AlternationPolicy) -> Self {
        self.alternation = alternation;
        self
    }

    pub fn with_top_level(mut self, top_level: TopLevel) -> Self {
        self.top_level = top_level;
        self
    }

    /// Send engine trace events to `sink`.
    pub fn with_trace(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn trace(&self) -> Option<&dyn TraceSink> {
        self.trace.as_deref()
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("alternation", &self.alternation)
            .field("top_level", &self.top_level)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}
