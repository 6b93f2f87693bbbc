//! Abstract Syntax Tree definitions for pineapl
//!
//! The tree is built bottom-up by the grammar's reduce steps and is immutable afterwards.
//! Every node except tokens records the byte [`Span`] of the tokens it was built from.

use serde::Serialize;

use crate::lexer::Token;

/// Source location span (byte offsets, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// Identifier spelling
pub type Ident = String;

/// A source file: the root of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct File {
    /// Functions in declaration order
    pub functions: Vec<Function>,
    pub span: Span,
}

/// `func name(params) { body }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: Ident,
    /// Parameters in declaration order (positional)
    pub parameters: Vec<Parameter>,
    pub body: CodeBlock,
    pub span: Span,
}

/// `name Type,`
///
/// The type is an unvalidated identifier; the backend decides which names it supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: Ident,
    #[serde(rename = "type")]
    pub type_name: Ident,
    pub span: Span,
}

/// `{ call() }`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CodeBlock {
    pub calls: Vec<FunctionCall>,
    pub span: Span,
}

/// A zero-argument call `name()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCall {
    pub name: Ident,
    pub span: Span,
}

/// Value threaded through the combinator engine: exactly one kind of node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyntaxNode {
    Token(Token),
    Function(Function),
    Parameter(Parameter),
    File(File),
    CodeBlock(CodeBlock),
    FunctionCall(FunctionCall),
}

impl SyntaxNode {
    /// Short name of the populated variant, for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            SyntaxNode::Token(_) => "token",
            SyntaxNode::Function(_) => "function",
            SyntaxNode::Parameter(_) => "parameter",
            SyntaxNode::File(_) => "file",
            SyntaxNode::CodeBlock(_) => "code block",
            SyntaxNode::FunctionCall(_) => "function call",
        }
    }
}
