//! Assignment and update expression evaluation

use super::binary::apply_binary;
use super::reference::resolve_reference;
use super::Evaluate;
use crate::ast::{AssignmentOperator, Node, UpdateOperator};
use crate::{EvalContext, EvalError, Scope, Value};

/// Evaluate `left op= right`.
///
/// The right side is evaluated first, then the target is resolved. Plain
/// `=` never reads the target; compound forms read it, combine with the
/// matching binary operator and write back. The written value is the
/// result.
pub fn eval_assignment(
    operator: AssignmentOperator,
    left: &Node,
    right: &Node,
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let rhs = right.eval(scope, ctx)?;
    let target = resolve_reference(left, scope, ctx)?;

    let value = match operator.binary() {
        None => rhs,
        Some(binary) => {
            let current = target.get_value(scope)?;
            apply_binary(binary, &current, &rhs).map_err(|err| err.with_span(node.span))?
        }
    };

    target
        .put_value(value.clone(), scope)
        .map_err(|err| err.with_span(node.span))?;
    Ok(value)
}

/// Evaluate `++x`, `x++`, `--x` or `x--`.
///
/// The prefix form yields the new value, the postfix form the numeric
/// value before the update.
pub fn eval_update(
    operator: UpdateOperator,
    prefix: bool,
    argument: &Node,
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let target = resolve_reference(argument, scope, ctx)?;
    let old = target.get_value(scope)?.to_number();
    let new = match operator {
        UpdateOperator::Increment => old + 1.0,
        UpdateOperator::Decrement => old - 1.0,
    };

    target
        .put_value(Value::Number(new), scope)
        .map_err(|err| err.with_span(node.span))?;
    Ok(Value::Number(if prefix { new } else { old }))
}
