use logos::Logos;
use std::fmt;

use crate::Span;

/// Lexical categories. Anything that is neither whitespace nor a parenthesis
/// is an atom; whether an atom is a number is decided by the parser.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\s+")] // Skip whitespace
pub enum TokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r"[^\s()]+", |lex| lex.slice().to_string())]
    Atom(String),
}

impl TokenKind {
    pub fn as_str(&self) -> &str {
        match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Atom(text) => text,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// The source text of this token.
    pub fn text(&self) -> &str {
        self.kind.as_str()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

/// Splits `input` into parenthesis and atom tokens.
///
/// Tokenizing never fails: the atom pattern covers every character that is
/// not whitespace or a parenthesis, so malformed programs are left for the
/// parser to reject.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let kind = result.unwrap_or_else(|_| TokenKind::Atom(lexer.slice().to_string()));
        tokens.push(Token::new(kind, Span::new(range.start, range.end)));
    }
    tracing::trace!(count = tokens.len(), "tokenized input");
    tokens
}
