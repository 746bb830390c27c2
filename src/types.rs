use crate::{environment::Environment, evaluator::EvalResult, source::Span};
use std::fmt; // For custom display formatting

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: Sexpr, // The actual S-expression data
    pub span: Span,  // The source span it covers
}

impl Node {
    pub fn new(kind: Sexpr, span: Span) -> Self {
        Node { kind, span }
    }

    pub fn new_nil(span: Span) -> Self {
        Node::new(Sexpr::Nil, span)
    }

    pub fn new_number(n: f64, span: Span) -> Self {
        Node::new(Sexpr::Number(n), span)
    }

    pub fn new_symbol(s: String, span: Span) -> Self {
        Node::new(Sexpr::Symbol(s), span)
    }

    pub fn new_list(elements: Vec<Node>, span: Span) -> Self {
        Node::new(Sexpr::List(elements), span)
    }

    pub fn new_quoted(quoted: Node, span: Span) -> Self {
        Node::new(Sexpr::Quoted(Box::new(quoted)), span)
    }

    /// Builds an atom from a single token: a number when the text is a valid
    /// float literal, a symbol otherwise.
    pub fn new_atom(text: &str, span: Span) -> Self {
        match text.parse::<f64>() {
            Ok(n) => Node::new_number(n, span),
            Err(_) => Node::new_symbol(text.to_string(), span),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate to Sexpr's Display implementation
        write!(f, "{}", self.kind)
    }
}

/// A symbolic expression: the value type shared by parsed programs and
/// evaluation results.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexpr {
    Nil,
    Symbol(String), // e.g., +, *, foo
    Number(f64),
    /// List elements in order. A `Nil` in the last position is an explicit
    /// terminator and is not an element.
    List(Vec<Node>),
    Quoted(Box<Node>), // Evaluates to the wrapped node, unevaluated
}

impl Sexpr {
    pub fn type_name(&self) -> &'static str {
        match self {
            Sexpr::Nil => "nil",
            Sexpr::Symbol(_) => "symbol",
            Sexpr::Number(_) => "number",
            Sexpr::List(_) => "list",
            Sexpr::Quoted(_) => "quoted expression",
        }
    }
}

/// Strips an explicit trailing `Nil` terminator from a list body.
pub fn list_elements(elements: &[Node]) -> &[Node] {
    match elements {
        [rest @ .., Node {
            kind: Sexpr::Nil, ..
        }] => rest,
        _ => elements,
    }
}

impl fmt::Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexpr::Nil => write!(f, "()"),
            Sexpr::Symbol(s) => write!(f, "{}", s),
            Sexpr::Number(n) => write!(f, "{}", n),
            Sexpr::List(list) => {
                write!(f, "(")?;
                let mut first = true;
                for expr in list_elements(list) {
                    if !first {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", expr)?;
                    first = false;
                }
                write!(f, ")")
            }
            Sexpr::Quoted(quoted) => write!(f, "'{}", quoted),
        }
    }
}

/// A native operation. It receives its operands unevaluated, along with the
/// environment to evaluate them in and the span of the whole call.
pub type PrimitiveFunc = fn(&[Node], &Environment, Span) -> EvalResult;

#[derive(Clone)]
pub enum Procedure {
    Primitive(PrimitiveFunc, String), // The function pointer and its name (for debug)
}

impl Procedure {
    pub fn name(&self) -> &str {
        match self {
            Procedure::Primitive(_, name) => name,
        }
    }

    pub fn call(&self, args: &[Node], env: &Environment, span: Span) -> EvalResult {
        match self {
            Procedure::Primitive(func, _) => func(args, env, span),
        }
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Procedure::Primitive(_, name) => write!(f, "Primitive({})", name),
        }
    }
}

// Function pointers don't compare reliably, so primitives compare by name.
impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}
