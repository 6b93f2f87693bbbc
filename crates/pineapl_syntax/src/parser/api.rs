/// Grammar shared by every call to [`parse`] and [`parse_with`].
static GRAMMAR: LazyLock<Grammar> = LazyLock::new(Grammar::new);

/// Parse a token stream into an AST [`ast::File`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `pineapl_syntax::lexer`.
///
/// ## Errors
/// Returns the first unrecovered [`ParseError`].
pub fn parse(tokens: &[Token]) -> Result<ast::File, ParseError> {
    parse_with(tokens, &ParseOptions::default())
}

/// Like [`parse`], with explicit [`ParseOptions`].
#[tracing::instrument(skip_all, fields(token_count = tokens.len(), alternation = %options.alternation, top_level = %options.top_level))]
pub fn parse_with(tokens: &[Token], options: &ParseOptions) -> Result<ast::File, ParseError> {
    let file = GRAMMAR.parse_file(tokens, options)?;
    tracing::debug!(functions = file.functions.len(), "parsed file");
    Ok(file)
}
