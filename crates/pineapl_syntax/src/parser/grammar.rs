//! The pineapl grammar, expressed with the combinator engine.
//!
//! ```text
//! file         := (function | WS)* EOF      (function* EOF under TopLevel::Strict)
//! function     := "func" WS identifier "(" WS? parameter* ")" WS? codeBlock
//! parameter    := WS? identifier WS identifier ","
//! codeBlock    := "{" WS? functionCall? WS? "}"
//! functionCall := identifier "(" ")"
//! ```
//!
//! Every rule has a reduce function that matches on its `(tag, node)` captures and builds the
//! rule's AST node. A capture a reducer does not expect is a grammar bug and surfaces as
//! [`ParseError::Construction`].

use crate::ast::{CodeBlock, File, Function, FunctionCall, Parameter, Span, SyntaxNode};
use crate::diagnostics::ParseError;
use crate::lexer::{Token, TokenKind};

use super::engine::{Capture, Parser, Tag, all_of, one_of, optional_token, repeated, required_token, until};
use super::options::{ParseOptions, TopLevel};

pub const NAME: Tag = Tag("name");
pub const TYPE: Tag = Tag("type");
pub const PARAMETER: Tag = Tag("parameter");
pub const CALL: Tag = Tag("call");
pub const BODY: Tag = Tag("body");
pub const FUNCTION: Tag = Tag("function");

// ============================================================================
// RULES
// ============================================================================

/// `WS? identifier WS identifier ","`. The comma is required after every parameter,
/// including the last one.
pub fn parameter() -> Parser {
    all_of([
        optional_token(TokenKind::Whitespace),
        required_token(TokenKind::Identifier).tag(NAME),
        required_token(TokenKind::Whitespace),
        required_token(TokenKind::Identifier).tag(TYPE),
        required_token(TokenKind::Comma),
    ])
    .reduce(reduce_parameter)
    .label("parameter")
}

pub fn function_call() -> Parser {
    all_of([
        required_token(TokenKind::Identifier).tag(NAME),
        required_token(TokenKind::RoundOpen),
        required_token(TokenKind::RoundClose),
    ])
    .reduce(reduce_function_call)
    .label("function_call")
}

pub fn code_block() -> Parser {
    all_of([
        required_token(TokenKind::CurlyOpen),
        optional_token(TokenKind::Whitespace),
        function_call().optional().tag(CALL),
        optional_token(TokenKind::Whitespace),
        required_token(TokenKind::CurlyClose),
    ])
    .reduce(reduce_code_block)
    .label("code_block")
}

pub fn function() -> Parser {
    all_of([
        required_token(TokenKind::KeywordFunc),
        required_token(TokenKind::Whitespace),
        required_token(TokenKind::Identifier).tag(NAME),
        required_token(TokenKind::RoundOpen),
        optional_token(TokenKind::Whitespace),
        repeated(parameter()).tag(PARAMETER),
        required_token(TokenKind::RoundClose),
        optional_token(TokenKind::Whitespace),
        code_block().tag(BODY),
    ])
    .reduce(reduce_function)
    .label("function")
}

/// Top-level items until end of input. Whitespace between declarations is skipped.
pub fn file() -> Parser {
    let item = one_of([function().tag(FUNCTION), required_token(TokenKind::Whitespace)]).label("item");
    until(item, TokenKind::Eof).reduce(reduce_file).label("file")
}

/// `function* EOF` with no whitespace anywhere outside the functions.
pub fn strict_file() -> Parser {
    until(function().tag(FUNCTION), TokenKind::Eof).reduce(reduce_file).label("file")
}

// ============================================================================
// REDUCERS
// ============================================================================

fn reduce_parameter(span: Span, captures: Vec<Capture>) -> Result<SyntaxNode, ParseError> {
    const RULE: &str = "parameter";
    let mut name = None;
    let mut type_name = None;
    for capture in captures {
        match (capture.tag, capture.node) {
            (NAME, SyntaxNode::Token(token)) => name = Some(token.text),
            (TYPE, SyntaxNode::Token(token)) => type_name = Some(token.text),
            (tag, node) => return Err(unexpected_capture(RULE, tag, &node)),
        }
    }
    Ok(SyntaxNode::Parameter(Parameter {
        name: name.ok_or_else(|| missing(RULE, NAME))?,
        type_name: type_name.ok_or_else(|| missing(RULE, TYPE))?,
        span,
    }))
}

fn reduce_function_call(span: Span, captures: Vec<Capture>) -> Result<SyntaxNode, ParseError> {
    const RULE: &str = "function_call";
    let mut name = None;
    for capture in captures {
        match (capture.tag, capture.node) {
            (NAME, SyntaxNode::Token(token)) => name = Some(token.text),
            (tag, node) => return Err(unexpected_capture(RULE, tag, &node)),
        }
    }
    Ok(SyntaxNode::FunctionCall(FunctionCall {
        name: name.ok_or_else(|| missing(RULE, NAME))?,
        span,
    }))
}

fn reduce_code_block(span: Span, captures: Vec<Capture>) -> Result<SyntaxNode, ParseError> {
    let mut calls = Vec::new();
    for capture in captures {
        match (capture.tag, capture.node) {
            (CALL, SyntaxNode::FunctionCall(call)) => calls.push(call),
            (tag, node) => return Err(unexpected_capture("code_block", tag, &node)),
        }
    }
    Ok(SyntaxNode::CodeBlock(CodeBlock { calls, span }))
}

fn reduce_function(span: Span, captures: Vec<Capture>) -> Result<SyntaxNode, ParseError> {
    const RULE: &str = "function";
    let mut name = None;
    let mut parameters = Vec::new();
    let mut body = None;
    for capture in captures {
        match (capture.tag, capture.node) {
            (NAME, SyntaxNode::Token(token)) => name = Some(token.text),
            (PARAMETER, SyntaxNode::Parameter(parameter)) => parameters.push(parameter),
            (BODY, SyntaxNode::CodeBlock(block)) => body = Some(block),
            (tag, node) => return Err(unexpected_capture(RULE, tag, &node)),
        }
    }
    Ok(SyntaxNode::Function(Function {
        name: name.ok_or_else(|| missing(RULE, NAME))?,
        parameters,
        body: body.ok_or_else(|| missing(RULE, BODY))?,
        span,
    }))
}

fn reduce_file(span: Span, captures: Vec<Capture>) -> Result<SyntaxNode, ParseError> {
    let mut functions = Vec::new();
    for capture in captures {
        match (capture.tag, capture.node) {
            (FUNCTION, SyntaxNode::Function(function)) => functions.push(function),
            (tag, node) => return Err(unexpected_capture("file", tag, &node)),
        }
    }
    Ok(SyntaxNode::File(File { functions, span }))
}

fn unexpected_capture(rule: &'static str, tag: Tag, node: &SyntaxNode) -> ParseError {
    ParseError::construction(rule, format!("unexpected {} tagged `{}`", node.describe(), tag))
}

fn missing(rule: &'static str, tag: Tag) -> ParseError {
    ParseError::construction(rule, format!("no `{}` value captured", tag))
}

// ============================================================================
// GRAMMAR
// ============================================================================

/// The assembled grammar. Immutable; one instance can serve any number of parses.
#[derive(Debug, Clone)]
pub struct Grammar {
    file: Parser,
    strict_file: Parser,
    function: Parser,
    parameter: Parser,
    code_block: Parser,
    function_call: Parser,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            file: file(),
            strict_file: strict_file(),
            function: function(),
            parameter: parameter(),
            code_block: code_block(),
            function_call: function_call(),
        }
    }

    pub fn file(&self) -> &Parser {
        &self.file
    }

    pub fn strict_file(&self) -> &Parser {
        &self.strict_file
    }

    pub fn function(&self) -> &Parser {
        &self.function
    }

    pub fn parameter(&self) -> &Parser {
        &self.parameter
    }

    pub fn code_block(&self) -> &Parser {
        &self.code_block
    }

    pub fn function_call(&self) -> &Parser {
        &self.function_call
    }

    /// Parse a whole token stream into a [`File`], using the top-level rule `options` selects.
    ///
    /// ## Errors
    /// The first unrecovered [`ParseError`]; no partial tree is returned.
    pub fn parse_file(&self, tokens: &[Token], options: &ParseOptions) -> Result<File, ParseError> {
        let rule = match options.top_level {
            TopLevel::Spaced => &self.file,
            TopLevel::Strict => &self.strict_file,
        };
        match rule.parse_tokens(tokens, options)?.node {
            Some(SyntaxNode::File(file)) => Ok(file),
            Some(other) => Err(ParseError::construction(
                "file",
                format!("rule produced a {}", other.describe()),
            )),
            None => Err(ParseError::construction("file", "rule produced no value")),
        }
    }
}
