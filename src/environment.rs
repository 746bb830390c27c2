use crate::source::Span;
use crate::types::{PrimitiveFunc, Procedure};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

// --- Environment Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("Unbound operation: '{0}'")]
    UnboundOperation(String, Span), // Operation name, span of the call head
}

// --- Environment Definition ---

/// Operation bindings available to a program. Evaluation only reads from
/// the environment, so it is shared by reference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    bindings: HashMap<String, Procedure>, // Maps operation names to procedures
}

impl Environment {
    /// Creates an environment with no bindings.
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
        }
    }

    /// Creates an environment with the built-in operations registered.
    pub fn new_global_populated() -> Self {
        let mut env = Environment::new();
        env.add_primitive("+", crate::primitives::prim_add);
        env.add_primitive("*", crate::primitives::prim_mul);
        env
    }

    /// Binds `name` to a procedure, replacing any previous binding.
    pub fn define(&mut self, name: String, procedure: Procedure) {
        self.bindings.insert(name, procedure);
    }

    /// Helper to add a primitive procedure to the environment.
    pub fn add_primitive(&mut self, name: &str, func: PrimitiveFunc) {
        self.define(name.to_string(), Procedure::Primitive(func, name.to_string()));
    }

    /// Looks up the operation bound to `name`.
    /// `lookup_span` is the location of the call head, used for error reporting.
    pub fn get(&self, name: &str, lookup_span: Span) -> Result<&Procedure, EnvError> {
        self.bindings
            .get(name)
            .ok_or_else(|| EnvError::UnboundOperation(name.to_string(), lookup_span))
    }

    /// Gets the names of all bound operations
    pub fn get_identifiers(&self) -> HashSet<String> {
        self.bindings.keys().cloned().collect()
    }
}
