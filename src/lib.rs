// Declare modules publicly so they are part of the library interface
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod pretty_print;
pub mod primitives;
pub mod source;
pub mod types;

pub use environment::{EnvError, Environment};
pub use evaluator::{EvalError, EvalResult, evaluate};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{MAX_DEPTH, ParseError, Parser, parse_str, parse_tokens};
pub use source::Span;
pub use types::{Node, Sexpr};

use thiserror::Error;

/// Any failure while running a program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    /// Writes a labelled report for this error against `input` to stderr.
    pub fn pretty_print(&self, input: &str) -> std::io::Result<()> {
        match self {
            Error::Parse(err) => err.pretty_print(input),
            Error::Eval(err) => err.pretty_print(input),
        }
    }
}

/// Tokenizes, parses and evaluates a single program.
pub fn run(input: &str, env: &Environment) -> Result<Node, Error> {
    let node = parse_str(input)?;
    Ok(evaluate(&node, env)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_programs() {
        let env = Environment::new_global_populated();
        assert_eq!(run("(+ 10.5 -1.07)", &env).unwrap().kind, Sexpr::Number(9.43));
        assert_eq!(
            run("(+ 10.5 -1.07 (* 10 (+ -1 1)))", &env).unwrap().kind,
            Sexpr::Number(9.43)
        );
        assert_eq!(run("(* 13 10 10)", &env).unwrap().to_string(), "1300");
    }

    #[test]
    fn test_run_reports_both_error_kinds() {
        let env = Environment::new_global_populated();
        assert!(matches!(
            run("(+ 1 2", &env),
            Err(Error::Parse(ParseError::UnclosedList { .. }))
        ));
        assert!(matches!(
            run("(foo 1 2)", &env),
            Err(Error::Eval(EvalError::EnvError(_)))
        ));
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let env = Environment::new_global_populated();
        let nested = |depth: usize| format!("{}0{}", "(+ 1 ".repeat(depth), ")".repeat(depth));

        assert_eq!(
            run(&nested(MAX_DEPTH), &env).unwrap().kind,
            Sexpr::Number(MAX_DEPTH as f64)
        );
        assert!(matches!(
            run(&nested(10_000), &env),
            Err(Error::Parse(ParseError::TooDeep { .. }))
        ));
        // The environment is still usable afterwards
        assert_eq!(run("(+ 1 2)", &env).unwrap().kind, Sexpr::Number(3.0));
    }

    #[test]
    fn test_environment_survives_errors() {
        let env = Environment::new_global_populated();
        assert!(run("(+ 1 foo)", &env).is_err());
        assert_eq!(run("(+ 1 2)", &env).unwrap().kind, Sexpr::Number(3.0));
    }
}
