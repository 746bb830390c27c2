use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{
    Cmd, Completer, Context, EditMode, Editor, EventHandler, KeyCode, KeyEvent, Modifiers,
};
use rustyline::{Helper, Highlighter, Hinter, Validator};
use sprig::{Environment, TokenKind, run, tokenize};

const DEFAULT_HISTORY: &str = "sprig_history.txt";

/// REPL settings, read from `SPRIG_HISTORY` and `SPRIG_EDIT_MODE`.
#[derive(Debug, Clone, PartialEq)]
struct ReplConfig {
    history_path: PathBuf,
    edit_mode: EditMode,
}

impl ReplConfig {
    fn from_env() -> Self {
        let history_path = std::env::var_os("SPRIG_HISTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY));
        let edit_mode = match std::env::var("SPRIG_EDIT_MODE") {
            Ok(mode) => parse_edit_mode(&mode).unwrap_or_else(|| {
                tracing::warn!(%mode, "unknown SPRIG_EDIT_MODE, using emacs");
                EditMode::Emacs
            }),
            Err(_) => EditMode::Emacs,
        };
        ReplConfig {
            history_path,
            edit_mode,
        }
    }
}

fn parse_edit_mode(mode: &str) -> Option<EditMode> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "vi" => Some(EditMode::Vi),
        "emacs" => Some(EditMode::Emacs),
        _ => None,
    }
}

struct SprigCompleter {
    env: Environment,
}

impl SprigCompleter {
    fn new(env: Environment) -> Self {
        SprigCompleter { env }
    }
}

impl rustyline::completion::Completer for SprigCompleter {
    type Candidate = String;
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let tokens = tokenize(&line[..pos]);
        let candidates = match tokens.last() {
            Some(token) if token.span.end == pos => match &token.kind {
                TokenKind::Atom(prefix) => self
                    .env
                    .get_identifiers()
                    .iter()
                    .filter_map(|id| id.strip_prefix(prefix.as_str()).map(str::to_string))
                    .filter(|rest| !rest.is_empty())
                    .collect(),
                _ => vec![],
            },
            _ => vec![],
        };
        Ok((pos, candidates))
    }
}

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct InputValidator {
    #[rustyline(Validator)]
    validator: SprigValidator,
    #[rustyline(Highlighter)]
    highlighter: SprigHighlighter,
    #[rustyline(Completer)]
    completer: SprigCompleter,
}

struct SprigValidator;

/// Checks that every ')' closes an earlier '('. Returns `Ok(true)` when all
/// lists are closed, `Ok(false)` when some are still open.
fn check_balance(input: &str) -> Result<bool, String> {
    let mut depth = 0usize;
    for (i, c) in input.chars().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Err(format!("  - Unmatched ')' at position {}", i));
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    Ok(depth == 0)
}

impl Validator for SprigValidator {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(match check_balance(ctx.input()) {
            Ok(true) => ValidationResult::Valid(None),
            Ok(false) => ValidationResult::Incomplete,
            Err(message) => ValidationResult::Invalid(Some(message)),
        })
    }
}

struct SprigHighlighter;

impl Highlighter for SprigHighlighter {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> std::borrow::Cow<'l, str> {
        // (byte offset in `line`, byte offset in `highlighted`) of each open '('
        let mut stack: Vec<(usize, usize)> = Vec::new();
        let mut highlighted = String::new();

        for (i, c) in line.char_indices() {
            match c {
                '(' => {
                    stack.push((i, highlighted.len()));
                    highlighted.push(c);
                }
                ')' => match stack.pop() {
                    Some((open, matching_pos)) if pos == open + 1 || pos == i + 1 => {
                        highlighted
                            .replace_range(matching_pos..=matching_pos, "\x1b[1;34m(\x1b[0m");
                        highlighted.push_str("\x1b[34m)\x1b[0m"); // Blue for matching brackets
                    }
                    Some(_) => highlighted.push(c),
                    None => highlighted.push_str("\x1b[31m)\x1b[0m"), // Red for unmatched closing brackets
                },
                _ => highlighted.push(c),
            }
        }

        std::borrow::Cow::Owned(highlighted)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn main() -> rustyline::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let repl_config = ReplConfig::from_env();
    tracing::debug!(?repl_config, "starting repl");

    println!("Sprig REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl-D to quit.");

    let global_env = Environment::new_global_populated();
    let h = InputValidator {
        highlighter: SprigHighlighter,
        validator: SprigValidator,
        completer: SprigCompleter::new(global_env.clone()),
    };
    let config = rustyline::config::Config::builder()
        .edit_mode(repl_config.edit_mode)
        .build();
    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(h));
    rl.bind_sequence(
        KeyEvent(KeyCode::Char('s'), Modifiers::CTRL),
        EventHandler::Simple(Cmd::Newline),
    );
    if rl.load_history(&repl_config.history_path).is_err() {
        println!("No previous history.");
    }

    loop {
        let readline = rl.readline("sprig> ");
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let trimmed_input = line.trim();
                if trimmed_input.is_empty() {
                    continue;
                }
                if trimmed_input.eq_ignore_ascii_case("exit") {
                    break;
                }

                match run(trimmed_input, &global_env) {
                    Ok(result_node) => println!("{}", result_node),
                    Err(e) => {
                        if e.pretty_print(trimmed_input).is_err() {
                            eprintln!("Error: {}", e);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("Interrupted. Type 'exit' or Ctrl-D to quit.");
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nExiting.");
                break;
            }
            Err(err) => {
                eprintln!("Readline Error: {:?}", err);
                break;
            }
        }
    }
    rl.save_history(&repl_config.history_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_balance() {
        assert_eq!(check_balance("(+ 1 2)"), Ok(true));
        assert_eq!(check_balance("(+ 1 (* 2"), Ok(false));
        assert_eq!(check_balance("42"), Ok(true));
        assert!(check_balance("(+ 1 2))").is_err());
        assert!(check_balance(")(").is_err());
    }

    #[test]
    fn test_parse_edit_mode() {
        assert_eq!(parse_edit_mode("vi"), Some(EditMode::Vi));
        assert_eq!(parse_edit_mode(" Emacs "), Some(EditMode::Emacs));
        assert_eq!(parse_edit_mode("nano"), None);
    }

    #[test]
    fn test_highlight_marks_unmatched_close() {
        let out = SprigHighlighter.highlight("1)", 0);
        assert_eq!(out, "1\x1b[31m)\x1b[0m");
    }

    #[test]
    fn test_highlight_marks_pair_at_cursor() {
        let out = SprigHighlighter.highlight("(+ 1)", 5);
        assert_eq!(out, "\x1b[1;34m(\x1b[0m+ 1\x1b[34m)\x1b[0m");
        let out = SprigHighlighter.highlight("(+ 1)", 3);
        assert_eq!(out, "(+ 1)");
    }
}
