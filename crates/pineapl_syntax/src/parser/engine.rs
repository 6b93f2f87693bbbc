//! Combinator engine.
//!
//! A [`Parser`] is an immutable value: a body (token, sequence, alternation or until), the
//! first-set of token kinds it can start with, `optional`/`repeated` flags, and optionally a tag
//! and a reduce function. Running a parser is a pure function of the parser and the cursor; the
//! node a rule builds is a local value, never state stored in the parser, so one grammar value
//! can serve any number of parses.
//!
//! ## Captures and reduce
//!
//! A tagged parser hands its value to its ancestors as a [`Capture`]. Captures bubble up, in
//! source order, to the nearest ancestor with a reduce function, which consumes them and returns
//! that ancestor's node. The engine never looks inside the nodes it moves around.
//!
//! ## Dispatch
//!
//! Before running its body, every parser checks the current token against its first-set. On a
//! mismatch an optional (or empty-accepting) parser succeeds without consuming anything and a
//! required one fails with the first-set as the expected kinds. Alternation uses the same sets to
//! pick a branch; see [`AlternationPolicy`].

use std::fmt;
use std::sync::Arc;

use crate::ast::{Span, SyntaxNode};
use crate::diagnostics::ParseError;
use crate::lexer::{Token, TokenKind};

use super::cursor::TokenCursor;
use super::options::{AlternationPolicy, ParseOptions, TraceOutcome};

// ============================================================================
// VALUES
// ============================================================================

/// Label naming which field of the enclosing node a child's value fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub &'static str);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A tagged child value, waiting for a reduce step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub tag: Tag,
    pub node: SyntaxNode,
}

/// Builds a rule's node from the span it consumed and its captures (in source order).
pub type Reduce = fn(Span, Vec<Capture>) -> Result<SyntaxNode, ParseError>;

/// Successful result of running a parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    /// The parser's own value: the token for token parsers, the reduced node for rules.
    /// Moved into `captures` instead when the parser is tagged.
    pub node: Option<SyntaxNode>,
    /// Tagged values not yet consumed by a reduce step
    pub captures: Vec<Capture>,
    /// Kinds that could have extended this match at the position it stopped
    pub trailing: Vec<TokenKind>,
}

impl Parsed {
    fn skipped(first: &[TokenKind]) -> Self {
        Self {
            trailing: first.to_vec(),
            ..Self::default()
        }
    }
}

// ============================================================================
// PARSER
// ============================================================================

#[derive(Debug, Clone)]
enum Body {
    Token(TokenKind),
    AllOf(Arc<[Parser]>),
    OneOf(Arc<[Parser]>),
    Until(Arc<Parser>, TokenKind),
}

/// A composable parser value.
#[derive(Debug, Clone)]
pub struct Parser {
    body: Body,
    first: Vec<TokenKind>,
    /// Can succeed on empty input even when required
    nullable: bool,
    optional: bool,
    repeated: bool,
    tag: Option<Tag>,
    reduce: Option<Reduce>,
    label: &'static str,
}

/// Consume exactly one token of `kind`.
pub fn required_token(kind: TokenKind) -> Parser {
    Parser::new(Body::Token(kind), vec![kind], false, kind.name())
}

/// `required_token(kind)` that succeeds without consuming when the token is absent.
pub fn optional_token(kind: TokenKind) -> Parser {
    required_token(kind).optional()
}

/// Ordered sequence. The first-set is the first child's, extended by each following child's for
/// as long as every child before it can match empty input.
pub fn all_of(children: impl IntoIterator<Item = Parser>) -> Parser {
    let children: Arc<[Parser]> = children.into_iter().collect();
    let mut first = Vec::new();
    let mut nullable = true;
    for child in children.iter() {
        extend_unique(&mut first, &child.first);
        if !child.accepts_empty() {
            nullable = false;
            break;
        }
    }
    Parser::new(Body::AllOf(children), first, nullable, "all_of")
}

/// Alternation over `alternatives`, dispatched by first-set.
pub fn one_of(alternatives: impl IntoIterator<Item = Parser>) -> Parser {
    let alternatives: Arc<[Parser]> = alternatives.into_iter().collect();
    let mut first = Vec::new();
    for alternative in alternatives.iter() {
        extend_unique(&mut first, &alternative.first);
    }
    let nullable = alternatives.iter().any(Parser::accepts_empty);
    Parser::new(Body::OneOf(alternatives), first, nullable, "one_of")
}

/// Zero or more applications of `parser`.
pub fn repeated(parser: Parser) -> Parser {
    parser.optional().repeat()
}

/// Apply `item` until `terminator` is the current token, then consume the terminator.
/// The first-set lists the terminator ahead of the item's kinds.
pub fn until(item: Parser, terminator: TokenKind) -> Parser {
    let first = until_expected(&item, terminator);
    Parser::new(Body::Until(Arc::new(item), terminator), first, false, "until")
}

impl Parser {
    fn new(body: Body, first: Vec<TokenKind>, nullable: bool, label: &'static str) -> Self {
        Self {
            body,
            first,
            nullable,
            optional: false,
            repeated: false,
            tag: None,
            reduce: None,
            label,
        }
    }

    /// Succeed without consuming input when the current token is outside the first-set.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Keep applying the parser while its first-set matches. One or more times, or zero or more
    /// when combined with [`Parser::optional`].
    pub fn repeat(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Emit this parser's value to the enclosing reduce step under `tag`.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Build this parser's node from its captures.
    pub fn reduce(mut self, reduce: Reduce) -> Self {
        self.reduce = Some(reduce);
        self
    }

    /// Name shown in trace output.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn first_set(&self) -> &[TokenKind] {
        &self.first
    }

    pub fn starts_with(&self, kind: TokenKind) -> bool {
        self.first.contains(&kind)
    }

    fn accepts_empty(&self) -> bool {
        self.optional || self.nullable
    }

    /// Run the parser at the cursor's position.
    ///
    /// ## Errors
    /// Returns the first failure, unchanged from the sub-parser that produced it. The cursor is
    /// left wherever the failure happened.
    pub fn parse(&self, cursor: &mut TokenCursor<'_>, options: &ParseOptions) -> Result<Parsed, ParseError> {
        self.run(cursor, Ctx { options, depth: 0 })
    }

    /// Run the parser from the start of `tokens`.
    pub fn parse_tokens(&self, tokens: &[Token], options: &ParseOptions) -> Result<Parsed, ParseError> {
        let mut cursor = TokenCursor::new(tokens);
        self.parse(&mut cursor, options)
    }

    // ========================================================================
    // Running
    // ========================================================================

    fn run(&self, cursor: &mut TokenCursor<'_>, ctx: Ctx<'_>) -> Result<Parsed, ParseError> {
        let current = cursor.current();
        if !self.starts_with(current.kind) {
            if self.accepts_empty() {
                ctx.exit(self.label, TraceOutcome::Skipped);
                return Ok(Parsed::skipped(&self.first));
            }
            return Err(ParseError::unexpected(self.first.clone(), current, cursor.position()));
        }

        ctx.enter(self.label, current);
        let start = cursor.position();
        let result = if self.repeated {
            self.run_repeated(cursor, ctx.deeper())
        } else {
            self.run_once(cursor, ctx.deeper())
        };
        match &result {
            Ok(_) => ctx.exit(self.label, TraceOutcome::Matched {
                consumed: cursor.position() - start,
            }),
            Err(err) => ctx.exit(self.label, TraceOutcome::Failed(err)),
        }
        result
    }

    fn run_repeated(&self, cursor: &mut TokenCursor<'_>, ctx: Ctx<'_>) -> Result<Parsed, ParseError> {
        let mut iteration_start = cursor.position();
        let mut parsed = self.run_once(cursor, ctx)?;
        parsed.node = None;

        // An iteration that consumed nothing would match again forever.
        while cursor.position() > iteration_start && self.starts_with(cursor.current().kind) {
            iteration_start = cursor.position();
            let next = self.run_once(cursor, ctx)?;
            parsed.captures.extend(next.captures);
            parsed.trailing = next.trailing;
        }
        extend_unique(&mut parsed.trailing, &self.first);
        Ok(parsed)
    }

    /// One application: body, then reduce, then tag.
    fn run_once(&self, cursor: &mut TokenCursor<'_>, ctx: Ctx<'_>) -> Result<Parsed, ParseError> {
        let start = cursor.position();
        let mut parsed = match &self.body {
            Body::Token(kind) => run_token(*kind, cursor)?,
            Body::AllOf(children) => run_all_of(children, cursor, ctx)?,
            Body::OneOf(alternatives) => self.run_one_of(alternatives, cursor, ctx)?,
            Body::Until(item, terminator) => run_until(item, *terminator, cursor, ctx)?,
        };

        if let Some(reduce) = self.reduce {
            let captures = std::mem::take(&mut parsed.captures);
            parsed.node = Some(reduce(cursor.span_since(start), captures)?);
        }

        if let Some(tag) = self.tag {
            if let Some(node) = parsed.node.take() {
                parsed.captures.push(Capture { tag, node });
            }
        }

        Ok(parsed)
    }

    fn run_one_of(
        &self,
        alternatives: &[Parser],
        cursor: &mut TokenCursor<'_>,
        ctx: Ctx<'_>,
    ) -> Result<Parsed, ParseError> {
        let kind = cursor.current().kind;
        let mut candidates: Vec<&Parser> = match ctx.options.alternation {
            AlternationPolicy::FirstSet => alternatives.iter().filter(|a| a.starts_with(kind)).collect(),
            AlternationPolicy::Exhaustive => alternatives.iter().collect(),
        };

        if let [only] = candidates.as_slice() {
            return only.run(cursor, ctx);
        }
        if candidates.is_empty() {
            // Absent dispatch: only alternatives that can match empty input are left.
            candidates = alternatives.iter().filter(|a| a.accepts_empty()).collect();
        }
        if candidates.is_empty() {
            return Err(ParseError::unexpected(self.first.clone(), cursor.current(), cursor.position()));
        }

        best_match(&candidates, cursor, ctx)
    }
}

// ============================================================================
// Bodies
// ============================================================================

fn run_token(kind: TokenKind, cursor: &mut TokenCursor<'_>) -> Result<Parsed, ParseError> {
    let current = cursor.current();
    if current.kind != kind {
        return Err(ParseError::unexpected(vec![kind], current, cursor.position()));
    }
    let token = current.clone();
    cursor.advance();
    Ok(Parsed {
        node: Some(SyntaxNode::Token(token)),
        ..Parsed::default()
    })
}

fn run_all_of(children: &[Parser], cursor: &mut TokenCursor<'_>, ctx: Ctx<'_>) -> Result<Parsed, ParseError> {
    let mut parsed = Parsed::default();
    // Kinds that optional children skipped at the current position would have accepted.
    let mut pending: Vec<TokenKind> = Vec::new();

    for child in children {
        let before = cursor.position();
        match child.run(cursor, ctx) {
            Ok(child_parsed) => {
                if cursor.position() > before {
                    pending.clear();
                }
                extend_unique(&mut pending, &child_parsed.trailing);
                parsed.captures.extend(child_parsed.captures);
            }
            Err(mut err) => {
                if err.consumed() == before {
                    err.widen_expected(&pending);
                }
                return Err(err);
            }
        }
    }

    parsed.trailing = pending;
    Ok(parsed)
}

fn run_until(
    item: &Parser,
    terminator: TokenKind,
    cursor: &mut TokenCursor<'_>,
    ctx: Ctx<'_>,
) -> Result<Parsed, ParseError> {
    let mut parsed = Parsed::default();

    loop {
        let current = cursor.current();
        if current.kind == terminator {
            cursor.advance();
            return Ok(parsed);
        }
        if current.is_eof() {
            return Err(ParseError::unexpected(vec![terminator], current, cursor.position()));
        }
        if !item.starts_with(current.kind) {
            return Err(ParseError::unexpected(until_expected(item, terminator), current, cursor.position()));
        }

        let before = cursor.position();
        let item_parsed = item.run(cursor, ctx)?;
        if cursor.position() == before {
            let current = cursor.current();
            return Err(ParseError::unexpected(until_expected(item, terminator), current, before));
        }
        parsed.captures.extend(item_parsed.captures);
    }
}

fn until_expected(item: &Parser, terminator: TokenKind) -> Vec<TokenKind> {
    let mut expected = vec![terminator];
    extend_unique(&mut expected, &item.first);
    expected
}

/// Ordered scan over `candidates` from the same start position.
///
/// The first success wins. If every candidate fails, the error of the one that got furthest is
/// returned; on a tie the earlier candidate's error is kept.
fn best_match(candidates: &[&Parser], cursor: &mut TokenCursor<'_>, ctx: Ctx<'_>) -> Result<Parsed, ParseError> {
    let start = cursor.position();
    let mut best: Option<ParseError> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        cursor.restore(start);
        match candidate.run(cursor, ctx) {
            Ok(parsed) => return Ok(parsed),
            Err(err) => {
                tracing::trace!(index, consumed = err.consumed(), "alternative failed");
                if best.as_ref().is_none_or(|b| err.consumed() > b.consumed()) {
                    best = Some(err);
                }
            }
        }
    }

    cursor.restore(start);
    Err(best.unwrap_or_else(|| ParseError::unexpected(Vec::new(), cursor.current(), start)))
}

fn extend_unique(into: &mut Vec<TokenKind>, kinds: &[TokenKind]) {
    for kind in kinds {
        if !into.contains(kind) {
            into.push(*kind);
        }
    }
}

// ============================================================================
// Context
// ============================================================================

/// Per-call context: options plus the nesting depth reported to the trace sink.
#[derive(Clone, Copy)]
struct Ctx<'o> {
    options: &'o ParseOptions,
    depth: usize,
}

impl<'o> Ctx<'o> {
    fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    fn enter(&self, label: &str, token: &Token) {
        if let Some(sink) = self.options.trace() {
            sink.enter(self.depth, label, token);
        }
    }

    fn exit(&self, label: &str, outcome: TraceOutcome<'_>) {
        if let Some(sink) = self.options.trace() {
            sink.exit(self.depth, label, outcome);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ast::FunctionCall;
    use crate::lexer::lex;
    use crate::lexer::TokenKind::*;
    use crate::parser::options::TraceSink;

    const NAME: Tag = Tag("name");

    fn parse_str(parser: &Parser, source: &str) -> Result<Parsed, ParseError> {
        let tokens = lex(source).unwrap();
        parser.parse_tokens(&tokens, &ParseOptions::default())
    }

    fn expected_of(err: &ParseError) -> Vec<TokenKind> {
        match err {
            ParseError::UnexpectedToken { expected, .. } => expected.clone(),
            other => panic!("expected unexpected-token error, got {other:?}"),
        }
    }

    fn reduce_call(span: Span, captures: Vec<Capture>) -> Result<SyntaxNode, ParseError> {
        let mut name = None;
        for capture in captures {
            match (capture.tag, capture.node) {
                (NAME, SyntaxNode::Token(token)) => name = Some(token.text),
                (tag, node) => {
                    return Err(ParseError::construction("call", format!("{} tagged `{}`", node.describe(), tag)));
                }
            }
        }
        let name = name.ok_or_else(|| ParseError::construction("call", "missing name"))?;
        Ok(SyntaxNode::FunctionCall(FunctionCall { name, span }))
    }

    #[test]
    fn test_required_token() {
        let parsed = parse_str(&required_token(Identifier), "foo").unwrap();
        assert!(matches!(parsed.node, Some(SyntaxNode::Token(ref t)) if t.text == "foo"));

        let err = parse_str(&required_token(Identifier), "(").unwrap_err();
        assert_eq!(expected_of(&err), vec![Identifier]);
        assert_eq!(err.consumed(), 0);
    }

    #[test]
    fn test_optional_token_skips_on_mismatch_and_eof() {
        let parser = optional_token(Whitespace);
        let tokens = lex("foo").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let parsed = parser.parse(&mut cursor, &ParseOptions::default()).unwrap();
        assert!(parsed.node.is_none());
        assert_eq!(cursor.position(), 0);
        assert_eq!(parsed.trailing, vec![Whitespace]);

        assert!(parse_str(&parser, "").unwrap().node.is_none());
    }

    #[test]
    fn test_all_of_first_set_extends_past_optional_children() {
        let parser = all_of([optional_token(Whitespace), optional_token(Comma), required_token(Identifier)]);
        assert_eq!(parser.first_set(), &[Whitespace, Comma, Identifier]);

        let parser = all_of([required_token(Identifier), optional_token(Whitespace)]);
        assert_eq!(parser.first_set(), &[Identifier]);
    }

    #[test]
    fn test_all_of_propagates_first_failure() {
        let parser = all_of([required_token(Identifier), required_token(RoundOpen), required_token(RoundClose)]);
        let err = parse_str(&parser, "foo(}").unwrap_err();
        assert_eq!(expected_of(&err), vec![RoundClose]);
        assert_eq!(err.consumed(), 2);
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn test_all_of_widens_expected_with_skipped_optionals() {
        let parser = all_of([
            required_token(RoundOpen),
            optional_token(Whitespace),
            repeated(required_token(Identifier)),
            required_token(RoundClose),
        ]);
        let err = parse_str(&parser, "(").unwrap_err();
        assert_eq!(expected_of(&err), vec![RoundClose, Whitespace, Identifier]);

        // After consuming an identifier, only the repetition can still continue.
        let err = parse_str(&parser, "( a,").unwrap_err();
        assert_eq!(expected_of(&err), vec![RoundClose, Identifier]);
    }

    #[test]
    fn test_tags_reach_the_nearest_reduce() {
        let call = all_of([required_token(Identifier).tag(NAME), required_token(RoundOpen), required_token(RoundClose)])
            .reduce(reduce_call);
        let parsed = parse_str(&call, "foo()").unwrap();
        match parsed.node {
            Some(SyntaxNode::FunctionCall(call)) => {
                assert_eq!(call.name, "foo");
                assert_eq!(call.span, Span::new(0, 5));
            }
            other => panic!("expected function call, got {other:?}"),
        }
        assert!(parsed.captures.is_empty());
    }

    #[test]
    fn test_untagged_values_are_dropped() {
        let parser = all_of([required_token(Identifier), required_token(Comma)]);
        let parsed = parse_str(&parser, "a,").unwrap();
        assert!(parsed.node.is_none());
        assert!(parsed.captures.is_empty());
    }

    #[test]
    fn test_repeated_collects_in_order() {
        let parser = all_of([repeated(required_token(Identifier).tag(NAME)), required_token(Eof)]);
        let tokens = vec![
            Token::new(Identifier, "a", 0, 1),
            Token::new(Identifier, "b", 1, 2),
            Token::new(Identifier, "c", 2, 3),
            Token::eof(3),
        ];
        let parsed = parser.parse_tokens(&tokens, &ParseOptions::default()).unwrap();
        let names: Vec<_> = parsed
            .captures
            .iter()
            .map(|c| match &c.node {
                SyntaxNode::Token(t) => t.text.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_required_repeat_needs_one_match() {
        let parser = required_token(Identifier).repeat();
        assert!(parse_str(&parser, "(").is_err());
        assert!(parse_str(&parser, "a").is_ok());
    }

    #[test]
    fn test_zero_width_repetition_terminates() {
        // Every child is optional, so an iteration can match without consuming anything.
        let parser = repeated(all_of([optional_token(Whitespace), optional_token(Comma)]));
        let tokens = lex("foo").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        parser.parse(&mut cursor, &ParseOptions::default()).unwrap();
        assert_eq!(cursor.position(), 0);

        let tokens = lex(" , , foo").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        parser.parse(&mut cursor, &ParseOptions::default()).unwrap();
        assert_eq!(cursor.current().text, "foo");
    }

    #[test]
    fn test_one_of_dispatches_by_first_set() {
        let parser = one_of([
            required_token(Identifier).tag(NAME),
            all_of([required_token(RoundOpen), required_token(RoundClose)]),
        ]);
        assert_eq!(parser.first_set(), &[Identifier, RoundOpen]);
        assert_eq!(parse_str(&parser, "x").unwrap().captures.len(), 1);
        assert!(parse_str(&parser, "()").unwrap().captures.is_empty());

        // Dispatch matched, so the selected alternative's failure is final.
        let err = parse_str(&parser, "(x").unwrap_err();
        assert_eq!(expected_of(&err), vec![RoundClose]);

        let err = parse_str(&parser, "{").unwrap_err();
        assert_eq!(expected_of(&err), vec![Identifier, RoundOpen]);
    }

    fn ambiguous() -> Parser {
        // Both alternatives start with an identifier.
        one_of([
            all_of([required_token(Identifier), required_token(RoundOpen), required_token(RoundClose)]),
            all_of([
                required_token(Identifier),
                optional_token(Whitespace),
                required_token(Equals),
                optional_token(Whitespace),
                required_token(Number),
            ]),
        ])
    }

    #[test]
    fn test_ambiguous_dispatch_takes_first_success() {
        let tokens = lex("x = 1").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        ambiguous().parse(&mut cursor, &ParseOptions::default()).unwrap();
        assert!(cursor.is_eof());

        let tokens = lex("x()").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        ambiguous().parse(&mut cursor, &ParseOptions::default()).unwrap();
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_best_match_reports_longest_prefix() {
        // First alternative fails after `x`, second after `x = `.
        let err = parse_str(&ambiguous(), "x = y").unwrap_err();
        assert_eq!(err.consumed(), 4);
        assert_eq!(expected_of(&err), vec![Number]);
    }

    #[test]
    fn test_best_match_tie_keeps_first_declared() {
        let parser = one_of([
            all_of([required_token(Identifier), required_token(RoundOpen)]),
            all_of([required_token(Identifier), required_token(Equals)]),
        ]);
        let err = parse_str(&parser, "x,").unwrap_err();
        assert_eq!(err.consumed(), 1);
        assert_eq!(expected_of(&err), vec![RoundOpen]);
    }

    #[test]
    fn test_exhaustive_policy_scans_in_order() {
        let parser = one_of([
            required_token(Number),
            all_of([required_token(Identifier), required_token(RoundOpen)]),
            all_of([required_token(Identifier), required_token(Comma)]),
        ]);
        let options = ParseOptions::new().with_alternation(AlternationPolicy::Exhaustive);
        let tokens = lex("a,").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        parser.parse(&mut cursor, &options).unwrap();
        assert!(cursor.is_eof());

        let err = parser.parse_tokens(&lex("a)").unwrap(), &options).unwrap_err();
        assert_eq!(err.consumed(), 1);
        assert_eq!(expected_of(&err), vec![RoundOpen]);
    }

    #[test]
    fn test_until_consumes_terminator() {
        let parser = until(required_token(Identifier).tag(NAME), Comma);
        assert_eq!(parser.first_set(), &[Comma, Identifier]);

        let tokens = lex("abc,def").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let parsed = parser.parse(&mut cursor, &ParseOptions::default()).unwrap();
        assert_eq!(parsed.captures.len(), 1);
        assert_eq!(cursor.current().text, "def");
    }

    #[test]
    fn test_until_eof_before_terminator() {
        let parser = until(required_token(Identifier), Comma);
        let err = parse_str(&parser, "abc").unwrap_err();
        assert_eq!(expected_of(&err), vec![Comma]);
        assert!(matches!(err, ParseError::UnexpectedToken { found: Eof, .. }));
    }

    #[test]
    fn test_until_unexpected_token() {
        let parser = until(required_token(Identifier), Comma);
        let err = parse_str(&parser, "abc(").unwrap_err();
        assert_eq!(expected_of(&err), vec![Comma, Identifier]);
        assert!(matches!(err, ParseError::UnexpectedToken { found: RoundOpen, .. }));
    }

    #[test]
    fn test_until_eof_terminator_on_empty_input() {
        let parser = until(required_token(Identifier), Eof);
        let parsed = parse_str(&parser, "").unwrap();
        assert!(parsed.captures.is_empty());
    }

    #[test]
    fn test_grammar_values_are_reusable() {
        let parser = until(required_token(Identifier).tag(NAME), Eof);
        let first = parse_str(&parser, "a").unwrap();
        let second = parse_str(&parser, "a").unwrap();
        assert_eq!(first, second);
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl TraceSink for Recorder {
        fn enter(&self, depth: usize, label: &str, _token: &Token) {
            self.0.lock().unwrap().push(format!("{depth} enter {label}"));
        }

        fn exit(&self, depth: usize, label: &str, outcome: TraceOutcome<'_>) {
            let outcome = match outcome {
                TraceOutcome::Matched { consumed } => format!("matched {consumed}"),
                TraceOutcome::Skipped => "skipped".to_string(),
                TraceOutcome::Failed(_) => "failed".to_string(),
            };
            self.0.lock().unwrap().push(format!("{depth} exit {label} {outcome}"));
        }
    }

    #[test]
    fn test_trace_reports_depth() {
        let recorder = Arc::new(Recorder::default());
        let options = ParseOptions::new().with_trace(recorder.clone());
        let parser = all_of([required_token(Identifier), optional_token(Whitespace)]).label("pair");
        parser.parse_tokens(&lex("a").unwrap(), &options).unwrap();

        let events = recorder.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "0 enter pair",
                "1 enter IDENTIFIER",
                "1 exit IDENTIFIER matched 1",
                "1 exit WHITESPACE skipped",
                "0 exit pair matched 1",
            ]
        );
    }
}
