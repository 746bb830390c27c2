use crate::environment::{EnvError, Environment};
use crate::source::Span;
use crate::types::{Node, Sexpr, list_elements};
use thiserror::Error;

// --- Evaluation Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    EnvError(#[from] EnvError), // The call head names no bound operation
    #[error("Evaluation Error: Expected an operation name, but got: {0}")]
    NotAnOperator(Sexpr, Span), // A list's head does not evaluate to a symbol
    #[error("Evaluation Error: Nil before the end of an argument list")]
    MalformedList(Span), // Span of the offending nil
    #[error("Evaluation Error: '{operator}' expects a {expected}, got {}", .found.type_name())]
    TypeMismatch {
        operator: String,
        expected: &'static str,
        found: Sexpr,
        span: Span,
    },
}

// Result type alias for convenience
pub type EvalResult<T = Node> = Result<T, EvalError>;

// --- Evaluate Function ---

/// Evaluates `node` within `env`, producing a new node. The input is never
/// modified.
pub fn evaluate(node: &Node, env: &Environment) -> EvalResult {
    tracing::trace!(%node, "evaluating");
    match &node.kind {
        // Self-evaluating atoms. Symbols are names of operations, not
        // variables, so they evaluate to themselves.
        Sexpr::Nil | Sexpr::Number(_) | Sexpr::Symbol(_) => Ok(node.clone()),

        Sexpr::Quoted(quoted) => Ok((**quoted).clone()),

        Sexpr::List(elements) => match list_elements(elements) {
            [] => Ok(Node::new_nil(node.span)),
            [operator, ..] => evaluate_call(operator, &elements[1..], env, node.span),
        },
    }
}

/// Dispatches a list to the operation named by its head. Operands are handed
/// over unevaluated, including any trailing terminator.
fn evaluate_call(operator: &Node, operands: &[Node], env: &Environment, span: Span) -> EvalResult {
    let head = evaluate(operator, env)?;
    let name = match head.kind {
        Sexpr::Symbol(name) => name,
        other => return Err(EvalError::NotAnOperator(other, operator.span)),
    };
    let procedure = env.get(&name, operator.span)?;
    tracing::debug!(
        operation = %name,
        operands = list_elements(operands).len(),
        "applying operation"
    );
    procedure.call(operands, env, span)
}
