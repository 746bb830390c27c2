use crate::Span;
use crate::lexer::{Token, TokenKind};
use crate::types::Node;
use thiserror::Error;

/// Deepest list nesting the parser accepts. Evaluation recurses once per
/// level, so this also bounds the evaluator's stack use.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse Error [at {open}]: unclosed list, expected ')' before end of input")]
    UnclosedList { open: Span }, // Span of the '(' that was never closed
    #[error("Parse Error [at {}]: Unexpected token '{}', expected {}", .found.span, .found, .expected)]
    UnexpectedToken { found: Token, expected: String },
    #[error("Parse Error: Unexpected end of input, expected {0}")]
    UnexpectedEof(String),
    #[error("Parse Error [at {open}]: lists nested deeper than {max} levels", max = MAX_DEPTH)]
    TooDeep { open: Span }, // Span of the first '(' past the limit
}

// Result type alias for convenience
pub type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over a borrowed token slice.
pub struct Parser<'a> {
    tokens: &'a [Token],
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens }
    }

    /// Parses one expression starting at `start` and returns it together
    /// with the number of tokens it spans.
    ///
    /// An empty token sequence parses to `Nil` and consumes nothing.
    pub fn parse_at(&self, start: usize) -> ParseResult<(Node, usize)> {
        if self.tokens.is_empty() {
            return Ok((Node::new_nil(Span::default()), 0));
        }
        match self.tokens.get(start) {
            Some(Token {
                kind: TokenKind::LParen,
                span,
            }) => self.parse_list(start, *span, 1),
            Some(Token {
                kind: TokenKind::Atom(text),
                span,
            }) => Ok((Node::new_atom(text, *span), 1)),
            Some(found @ Token {
                kind: TokenKind::RParen,
                ..
            }) => Err(ParseError::UnexpectedToken {
                found: found.clone(),
                expected: "an atom or '('".to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("an atom or '('".to_string())),
        }
    }

    /// Parses the list opened by the '(' at `open_index`, which sits `depth`
    /// levels deep.
    fn parse_list(
        &self,
        open_index: usize,
        open: Span,
        depth: usize,
    ) -> ParseResult<(Node, usize)> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { open });
        }
        let mut elements = Vec::new();
        let mut cursor = open_index + 1;
        while let Some(token) = self.tokens.get(cursor) {
            match &token.kind {
                TokenKind::RParen => {
                    cursor += 1;
                    let list = Node::new_list(elements, open.merge(token.span));
                    return Ok((list, cursor - open_index));
                }
                TokenKind::LParen => {
                    let (nested, consumed) = self.parse_list(cursor, token.span, depth + 1)?;
                    elements.push(nested);
                    cursor += consumed;
                }
                TokenKind::Atom(text) => {
                    elements.push(Node::new_atom(text, token.span));
                    cursor += 1;
                }
            }
        }
        // Reached the end of the tokens before finding ')'
        Err(ParseError::UnclosedList { open })
    }

    /// Parses exactly one top-level expression; leftover tokens are an error.
    pub fn parse(self) -> ParseResult<Node> {
        let (expr, consumed) = self.parse_at(0)?;
        tracing::trace!(consumed, total = self.tokens.len(), "parsed expression");
        match self.tokens.get(consumed) {
            Some(found) => Err(ParseError::UnexpectedToken {
                found: found.clone(),
                expected: "end of input".to_string(),
            }),
            None => Ok(expr),
        }
    }
}

/// Parses the expression at `start` in `tokens`, returning it with the
/// number of tokens consumed.
pub fn parse_tokens(tokens: &[Token], start: usize) -> ParseResult<(Node, usize)> {
    Parser::new(tokens).parse_at(start)
}

// Helper function to lex and parse a string directly (useful for tests and REPL)
pub fn parse_str(input: &str) -> ParseResult<Node> {
    let tokens = crate::lexer::tokenize(input);
    Parser::new(&tokens).parse()
}
