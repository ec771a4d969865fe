//! If statement and conditional expression evaluation

use super::Evaluate;
use crate::ast::Node;
use crate::{EvalContext, EvalError, Scope, Value};

// ═══════════════════════════════════════════════════════════════════════
// if statement
// ═══════════════════════════════════════════════════════════════════════

/// `if (test) consequent [else alternate]`
///
/// The selected arm runs in a fresh block scope. Signals pass through.
pub fn eval_if(
    test: &Node,
    consequent: &Node,
    alternate: Option<&Node>,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    if test.eval(scope, ctx)?.to_boolean() {
        consequent.eval(&scope.enter(), ctx)
    } else if let Some(alternate) = alternate {
        alternate.eval(&scope.enter(), ctx)
    } else {
        Ok(Value::Undefined)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// conditional expression
// ═══════════════════════════════════════════════════════════════════════

/// `test ? consequent : alternate`, evaluating only the selected branch.
pub fn eval_conditional(
    test: &Node,
    consequent: &Node,
    alternate: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    if test.eval(scope, ctx)?.to_boolean() {
        consequent.eval(scope, ctx)
    } else {
        alternate.eval(scope, ctx)
    }
}
