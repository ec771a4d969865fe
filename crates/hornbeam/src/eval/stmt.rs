//! Statement evaluation: programs, blocks, declarations, jumps

use super::{eval_node, unsupported, EvalOptions, Evaluate};
use crate::ast::{Node, VariableDeclarator, VariableKind};
use crate::{DeclarationKind, EvalContext, EvalError, InterruptSignal, Scope, Value};

/// Evaluate the top-level statement list. The result is the value of the
/// last statement.
pub fn eval_program(body: &[Node], scope: &Scope, ctx: &EvalContext) -> Result<Value, EvalError> {
    eval_statements(body, scope, ctx)
}

/// Evaluate a statement list in the given scope.
///
/// Blocks do not open a scope of their own; the construct owning the block
/// decides which scope it runs in. The first signal stops the block.
pub fn eval_block(body: &[Node], scope: &Scope, ctx: &EvalContext) -> Result<Value, EvalError> {
    eval_statements(body, scope, ctx)
}

fn eval_statements(body: &[Node], scope: &Scope, ctx: &EvalContext) -> Result<Value, EvalError> {
    let mut last = Value::Undefined;
    for statement in body {
        last = statement.eval(scope, ctx)?;
    }
    Ok(last)
}

/// `var`/`let`/`const` declarations bind into the current scope when
/// reached. Nothing is hoisted.
pub fn eval_variable_declaration(
    kind: VariableKind,
    declarations: &[VariableDeclarator],
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    for declarator in declarations {
        let name = declarator
            .id
            .as_identifier()
            .ok_or_else(|| unsupported(&declarator.id))?;
        let value = match &declarator.init {
            Some(init) => init.eval(scope, ctx)?,
            None => Value::Undefined,
        };
        scope.declare(DeclarationKind::from(kind), name, value);
    }
    Ok(Value::Undefined)
}

/// `return [argument]`
pub fn eval_return(
    argument: Option<&Node>,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let value = match argument {
        Some(argument) => argument.eval(scope, ctx)?,
        None => Value::Undefined,
    };
    Err(InterruptSignal::Return(value).into())
}

/// `throw argument`
pub fn eval_throw(argument: &Node, scope: &Scope, ctx: &EvalContext) -> Result<Value, EvalError> {
    let value = argument.eval(scope, ctx)?;
    Err(EvalError::Thrown(value))
}

/// `label: body`
///
/// The label is handed to the body; loops use it to match labeled
/// `break`/`continue`. Any other statement absorbs a `break` naming it.
pub fn eval_labeled(
    label: &str,
    body: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let options = EvalOptions { label: Some(label) };
    match eval_node(body, scope, ctx, options) {
        Err(EvalError::Interrupt(InterruptSignal::Break(Some(target))))
            if target == label && !body.is_loop() =>
        {
            Ok(Value::Undefined)
        }
        other => other,
    }
}
