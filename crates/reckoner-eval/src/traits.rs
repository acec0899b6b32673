//! The function extension surface: the [`Function`] trait hosts implement
//! and the lazy [`ArgHandle`] arguments are delivered through.

use std::borrow::Cow;

use reckoner_common::{EvalError, Value};
use reckoner_parse::{ASTNode, ASTNodeType};

use crate::interpreter::Interpreter;

/// A lazily evaluated argument. Functions pull values on demand, so a
/// branch a function never takes is never evaluated (this is what makes
/// `IF(cond, a, b)` safe when the untaken branch would fail).
pub struct ArgHandle<'a, 'b> {
    node: &'a ASTNode,
    interp: &'a Interpreter<'b>,
}

impl<'a, 'b> ArgHandle<'a, 'b> {
    pub(crate) fn new(node: &'a ASTNode, interp: &'a Interpreter<'b>) -> Self {
        Self { node, interp }
    }

    /// Evaluate the argument. Literals are borrowed straight out of the
    /// AST; anything else runs through the interpreter.
    pub fn value(&self) -> Result<Cow<'a, Value>, EvalError> {
        if let ASTNodeType::Literal(v) = &self.node.node_type {
            return Ok(Cow::Borrowed(v));
        }
        self.interp.evaluate(self.node).map(Cow::Owned)
    }

    /// The raw argument node, for functions that inspect structure.
    pub fn node(&self) -> &'a ASTNode {
        self.node
    }
}

/// An evaluatable function. Implementations must be stateless or
/// internally synchronized; the registry shares them across calculators.
pub trait Function: Send + Sync + 'static {
    /// Display name, conventionally upper-case (`"SUM"`). Lookup is
    /// case-insensitive.
    fn name(&self) -> &'static str;

    /// Minimum number of arguments accepted.
    fn min_args(&self) -> usize {
        0
    }

    /// Maximum number of arguments accepted, `None` for variadic.
    fn max_args(&self) -> Option<usize> {
        None
    }

    /// Evaluate the call. Arity has already been checked against
    /// `min_args`/`max_args` by the time this runs.
    fn call(&self, args: &[ArgHandle<'_, '_>]) -> Result<Value, EvalError>;
}
