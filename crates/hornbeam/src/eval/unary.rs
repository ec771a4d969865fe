//! Unary operator evaluation

use super::field::delete_property;
use super::reference::{resolve_reference, Reference};
use super::Evaluate;
use crate::ast::{Node, NodeKind, UnaryOperator};
use crate::value::to_int32;
use crate::{EvalContext, EvalError, Scope, Value};

/// Evaluate a unary operation.
///
/// `typeof` evaluates its operand like any other expression, so an
/// undeclared name raises a `NameError`.
pub fn eval_unary(
    operator: UnaryOperator,
    argument: &Node,
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    if operator == UnaryOperator::Delete {
        return eval_delete(argument, scope, ctx).map_err(|err| err.with_span(node.span));
    }

    let value = argument.eval(scope, ctx)?;
    Ok(match operator {
        UnaryOperator::Minus => Value::Number(-value.to_number()),
        UnaryOperator::Plus => Value::Number(value.to_number()),
        UnaryOperator::Not => Value::Bool(!value.to_boolean()),
        UnaryOperator::BitNot => Value::Number(f64::from(!to_int32(value.to_number()))),
        UnaryOperator::TypeOf => Value::string(value.type_of()),
        UnaryOperator::Void | UnaryOperator::Delete => Value::Undefined,
    })
}

/// `delete target`: member targets lose the property; variables cannot
/// be deleted; any other operand is evaluated and `true` returned.
fn eval_delete(argument: &Node, scope: &Scope, ctx: &EvalContext) -> Result<Value, EvalError> {
    match &argument.kind {
        NodeKind::MemberExpression { .. } => match resolve_reference(argument, scope, ctx)? {
            Reference::Property { base, key } => Ok(Value::Bool(delete_property(&base, &key)?)),
            Reference::Binding { .. } => Ok(Value::Bool(false)),
        },
        NodeKind::Identifier { .. } => Ok(Value::Bool(false)),
        _ => {
            argument.eval(scope, ctx)?;
            Ok(Value::Bool(true))
        }
    }
}
