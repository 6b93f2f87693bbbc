#[cfg(test)]
/// End-to-end parser tests.
///
/// These run the lexer and the default grammar together and check the trees and errors a
/// caller sees.
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::lexer::{self, TokenKind};

    fn parse_str(source: &str) -> Result<ast::File, ParseError> {
        let tokens = lexer::lex(source).expect("test sources lex cleanly");
        parse(&tokens)
    }

    fn signature(function: &ast::Function) -> Vec<(&str, &str)> {
        function
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str()))
            .collect()
    }

    #[test]
    fn test_empty_function() {
        let file = parse_str("func main() {}").unwrap();
        assert_eq!(file.functions.len(), 1);
        let main = &file.functions[0];
        assert_eq!(main.name, "main");
        assert!(main.parameters.is_empty());
        assert!(main.body.calls.is_empty());
        assert_eq!(main.span, Span::new(0, 14));
        assert_eq!(file.span, Span::new(0, 14));
    }

    #[test]
    fn test_single_parameter() {
        let file = parse_str("func main(x Int,) { }").unwrap();
        assert_eq!(signature(&file.functions[0]), vec![("x", "Int")]);
        assert!(file.functions[0].body.calls.is_empty());
    }

    #[test]
    fn test_parameters_keep_order() {
        let file = parse_str("func main(int Int, str String,) { }").unwrap();
        assert_eq!(signature(&file.functions[0]), vec![("int", "Int"), ("str", "String")]);
    }

    #[test]
    fn test_body_call() {
        let file = parse_str("func main() { foo() }").unwrap();
        let calls = &file.functions[0].body.calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "foo");
        assert_eq!(calls[0].span, Span::new(14, 19));
    }

    #[test]
    fn test_unterminated_function() {
        let err = parse_str("func main(").unwrap_err();
        match &err {
            ParseError::UnexpectedToken { expected, found, offset, .. } => {
                assert_eq!(
                    expected,
                    &vec![TokenKind::RoundClose, TokenKind::Whitespace, TokenKind::Identifier]
                );
                assert_eq!(*found, TokenKind::Eof);
                assert_eq!(*offset, 10);
            }
            other => panic!("expected unexpected-token error, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "expected ')', whitespace or identifier, found end of input"
        );
    }

    #[test]
    fn test_missing_trailing_comma_points_at_paren() {
        let source = "func main(x Int) {}";
        let err = parse_str(source).unwrap_err();
        let offset = err.offset().unwrap();
        assert_eq!(offset, source.find(')').unwrap());
        assert_eq!(err.consumed(), 7);
        assert_eq!(err.to_string(), "expected ',', found ')'");
    }

    #[test]
    fn test_empty_and_blank_files() {
        assert!(parse_str("").unwrap().functions.is_empty());
        assert!(parse_str(" \n\t\n").unwrap().functions.is_empty());
    }

    #[test]
    fn test_many_functions_in_order() {
        let names = ["a", "b", "c", "d", "e"];
        let source: String = names
            .iter()
            .map(|n| format!("func {n}(v Int,) {{ {n}() }}\n"))
            .collect();
        let file = parse_str(&source).unwrap();
        let parsed: Vec<_> = file.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(parsed, names);
    }

    #[test]
    fn test_functions_without_separator() {
        let file = parse_str("func a() {}func b() {}").unwrap();
        assert_eq!(file.functions.len(), 2);
    }

    #[test]
    fn test_keyword_is_not_a_name() {
        let err = parse_str("func func() {}").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { found: TokenKind::KeywordFunc, offset: 5, .. }
        ));
    }

    #[test]
    fn test_multiline_source() {
        let source = "func main(\n  x Int,\n  y Float,) {\n  run()\n}\n";
        let file = parse_str(source).unwrap();
        assert_eq!(signature(&file.functions[0]), vec![("x", "Int"), ("y", "Float")]);
        assert_eq!(file.functions[0].body.calls[0].name, "run");
    }

    #[test]
    fn test_whitespace_after_last_parameter_starts_another() {
        // Leading whitespace belongs to the parameter rule, so it commits to a new parameter.
        let err = parse_str("func main(x Int, ) {}").unwrap_err();
        assert_eq!(err.to_string(), "expected identifier, found ')'");
        assert_eq!(err.offset(), Some(17));
    }

    #[test]
    fn test_exhaustive_policy_agrees_with_first_set() {
        let source = "func a(x Int,) { b() }\nfunc b() {}\n";
        let tokens = lexer::lex(source).unwrap();
        let exhaustive = ParseOptions::new().with_alternation(AlternationPolicy::Exhaustive);
        assert_eq!(parse(&tokens).unwrap(), parse_with(&tokens, &exhaustive).unwrap());

        let tokens = lexer::lex("func main(x Int) {}").unwrap();
        assert_eq!(parse(&tokens).unwrap_err(), parse_with(&tokens, &exhaustive).unwrap_err());
    }

    #[test]
    fn test_tracing_sink_does_not_change_result() {
        let tokens = lexer::lex("func main() { foo() }").unwrap();
        let traced = ParseOptions::new().with_trace(std::sync::Arc::new(TracingSink));
        assert_eq!(parse(&tokens).unwrap(), parse_with(&tokens, &traced).unwrap());
    }
}
