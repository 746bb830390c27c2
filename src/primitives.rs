use crate::environment::Environment;
use crate::evaluator::{EvalError, EvalResult, evaluate};
use crate::source::Span;
use crate::types::{Node, Sexpr};

// Extracts a number from an operand, evaluating nested forms first
fn operand_value(node: &Node, env: &Environment, operator: &str) -> EvalResult<f64> {
    let value = match &node.kind {
        Sexpr::Number(n) => return Ok(*n),
        _ => evaluate(node, env)?,
    };
    match value.kind {
        Sexpr::Number(n) => Ok(n),
        found => Err(EvalError::TypeMismatch {
            operator: operator.to_string(),
            expected: "number",
            found,
            span: node.span,
        }),
    }
}

/// Folds the operands of a variadic numeric operation into a single number.
///
/// Operands arrive unevaluated. A `Nil` operand is only accepted as the
/// final terminator of the argument list.
pub fn fold_numbers<F: Fn(f64, f64) -> f64>(
    args: &[Node],
    env: &Environment,
    span: Span,
    start: f64,
    func: F,
    operator: &str,
) -> EvalResult {
    let mut acc = start;
    for (i, node) in args.iter().enumerate() {
        if let Sexpr::Nil = node.kind {
            if i + 1 < args.len() {
                return Err(EvalError::MalformedList(node.span));
            }
            continue;
        }
        acc = func(acc, operand_value(node, env, operator)?);
    }
    // The result carries the span of the whole call
    Ok(Node::new_number(acc, span))
}

pub fn prim_add(args: &[Node], env: &Environment, span: Span) -> EvalResult {
    // (+) -> 0
    // (+ 1 2 3) -> 6
    fold_numbers(args, env, span, 0.0, |acc, val| acc + val, "+")
}

pub fn prim_mul(args: &[Node], env: &Environment, span: Span) -> EvalResult {
    // (*) -> 1
    // (* 1 2 3) -> 6
    fold_numbers(args, env, span, 1.0, |acc, val| acc * val, "*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn num(n: f64) -> Node {
        Node::new_number(n, Span::default())
    }

    fn sym(s: &str) -> Node {
        Node::new_symbol(s.to_string(), Span::default())
    }

    fn nil() -> Node {
        Node::new_nil(Span::default())
    }

    fn parsed(input: &str) -> Node {
        parse_str(input).unwrap()
    }

    #[test]
    fn test_add_and_mul_identities() {
        let env = Environment::new_global_populated();
        assert_eq!(prim_add(&[], &env, Span::default()).unwrap(), num(0.0));
        assert_eq!(prim_mul(&[], &env, Span::default()).unwrap(), num(1.0));
        // A lone terminator is still zero operands
        assert_eq!(prim_add(&[nil()], &env, Span::default()).unwrap(), num(0.0));
        assert_eq!(prim_mul(&[nil()], &env, Span::default()).unwrap(), num(1.0));
    }

    #[test]
    fn test_numbers_fold() {
        let env = Environment::new_global_populated();
        let args = [num(1.0), num(2.0), num(3.5), nil()];
        assert_eq!(prim_add(&args, &env, Span::default()).unwrap(), num(6.5));
        assert_eq!(prim_mul(&args, &env, Span::default()).unwrap(), num(7.0));
    }

    #[test]
    fn test_nested_operands_are_evaluated() {
        let env = Environment::new_global_populated();
        let args = [num(1.0), parsed("(* 2 3)")];
        assert_eq!(prim_add(&args, &env, Span::default()).unwrap(), num(7.0));
        let args = [parsed("(+ 1 1)"), parsed("(+ 2 (* 1 1))")];
        assert_eq!(prim_mul(&args, &env, Span::default()).unwrap(), num(6.0));
    }

    #[test]
    fn test_quoted_operand_must_be_a_number() {
        let env = Environment::new_global_populated();
        let args = [Node::new_quoted(num(4.0), Span::default())];
        assert_eq!(prim_add(&args, &env, Span::default()).unwrap(), num(4.0));

        let args = [Node::new_quoted(parsed("(+ 1 2)"), Span::default())];
        assert!(matches!(
            prim_add(&args, &env, Span::default()),
            Err(EvalError::TypeMismatch { found: Sexpr::List(_), .. })
        ));
    }

    #[test]
    fn test_result_uses_call_span() {
        let env = Environment::new_global_populated();
        let span = Span::new(0, 7);
        assert_eq!(prim_add(&[num(1.0)], &env, span).unwrap().span, span);
    }

    #[test]
    fn test_symbol_operand_is_type_mismatch() {
        let env = Environment::new_global_populated();
        let operand = Node::new_symbol("foo".to_string(), Span::new(5, 8));
        assert_eq!(
            prim_add(&[num(1.0), operand], &env, Span::default()),
            Err(EvalError::TypeMismatch {
                operator: "+".to_string(),
                expected: "number",
                found: Sexpr::Symbol("foo".to_string()),
                span: Span::new(5, 8),
            })
        );
    }

    #[test]
    fn test_empty_list_operand_is_type_mismatch() {
        let env = Environment::new_global_populated();
        assert!(matches!(
            prim_mul(&[parsed("()")], &env, Span::default()),
            Err(EvalError::TypeMismatch { found: Sexpr::Nil, .. })
        ));
    }

    #[test]
    fn test_nil_before_end_is_malformed() {
        let env = Environment::new_global_populated();
        let span = Span::new(3, 4);
        let args = [num(1.0), Node::new_nil(span), num(2.0), nil()];
        assert_eq!(
            prim_add(&args, &env, Span::default()),
            Err(EvalError::MalformedList(span))
        );
        assert_eq!(
            prim_mul(&args, &env, Span::default()),
            Err(EvalError::MalformedList(span))
        );
    }

    #[test]
    fn test_errors_from_operands_propagate() {
        let env = Environment::new_global_populated();
        let args = [num(1.0), parsed("(foo 2)")];
        assert!(matches!(
            prim_add(&args, &env, Span::default()),
            Err(EvalError::EnvError(_))
        ));
        let args = [sym("+"), num(1.0)];
        assert!(matches!(
            prim_mul(&args, &env, Span::default()),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}
