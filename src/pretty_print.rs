use crate::parser::MAX_DEPTH;
use crate::{EnvError, EvalError, ParseError};
use ariadne::{Config, Label, Report, ReportKind, Source};
use std::ops::Range;

const SOURCE_ID: &str = "REPL";

pub type ReportSpan = (&'static str, Range<usize>);

fn label(range: Range<usize>, message: impl ToString) -> Label<ReportSpan> {
    Label::new((SOURCE_ID, range)).with_message(message)
}

impl EvalError {
    /// Builds a labelled report pointing at the part of the input that failed.
    pub fn report(&self, config: Config) -> Report<'static, ReportSpan> {
        let report = match self {
            EvalError::EnvError(env_error) => match env_error {
                EnvError::UnboundOperation(name, span) => {
                    Report::build(ReportKind::Error, (SOURCE_ID, span.to_range()))
                        .with_message(format!("Unbound operation `{}`", name))
                        .with_label(label(
                            span.to_range(),
                            "No operation with this name is defined",
                        ))
                }
            },
            EvalError::NotAnOperator(sexpr, span) => {
                Report::build(ReportKind::Error, (SOURCE_ID, span.to_range()))
                    .with_message(format!("Not an operation name: {}", sexpr))
                    .with_label(label(
                        span.to_range(),
                        format!("Expected a symbol but found a {}", sexpr.type_name()),
                    ))
            }
            EvalError::MalformedList(span) => {
                Report::build(ReportKind::Error, (SOURCE_ID, span.to_range()))
                    .with_message("Malformed expression")
                    .with_label(label(
                        span.to_range(),
                        "Nil may only terminate an argument list",
                    ))
            }
            EvalError::TypeMismatch {
                operator,
                expected,
                found,
                span,
            } => Report::build(ReportKind::Error, (SOURCE_ID, span.to_range()))
                .with_message(format!("Type mismatch in `{}`", operator))
                .with_label(label(
                    span.to_range(),
                    format!("Expected {}, found {}", expected, found.type_name()),
                )),
        };
        report.with_config(config).finish()
    }

    /// Writes the report for this error against `input` to stderr.
    pub fn pretty_print(&self, input: &str) -> std::io::Result<()> {
        self.report(Config::default())
            .eprint((SOURCE_ID, Source::from(input)))
    }
}

impl ParseError {
    /// Builds a labelled report pointing at the part of the input that failed.
    pub fn report(&self, input: &str, config: Config) -> Report<'static, ReportSpan> {
        let report = match self {
            ParseError::UnclosedList { open } => {
                Report::build(ReportKind::Error, (SOURCE_ID, open.to_range()))
                    .with_message("Unclosed list")
                    .with_label(label(open.to_range(), "This '(' is never closed"))
            }
            ParseError::UnexpectedToken { found, expected } => {
                Report::build(ReportKind::Error, (SOURCE_ID, found.span.to_range()))
                    .with_message(format!("Unexpected token: {}", found.kind))
                    .with_label(label(found.span.to_range(), format!("Expected {expected}")))
            }
            ParseError::TooDeep { open } => {
                Report::build(ReportKind::Error, (SOURCE_ID, open.to_range()))
                    .with_message("Nesting too deep")
                    .with_label(label(
                        open.to_range(),
                        format!("This '(' opens level {}", MAX_DEPTH + 1),
                    ))
                    .with_note(format!("Lists may be nested at most {MAX_DEPTH} levels deep"))
            }
            ParseError::UnexpectedEof(expected) => {
                let idx = input.len();
                Report::build(ReportKind::Error, (SOURCE_ID, idx..idx))
                    .with_message("Unexpected EOF")
                    .with_label(label(idx..idx, format!("Expected {expected}")))
            }
        };
        report.with_config(config).finish()
    }

    /// Writes the report for this error against `input` to stderr.
    pub fn pretty_print(&self, input: &str) -> std::io::Result<()> {
        self.report(input, Config::default())
            .eprint((SOURCE_ID, Source::from(input)))
    }
}
