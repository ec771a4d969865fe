//! Call and `new` expression evaluation

use super::field::get_property;
use super::function::call_function;
use super::reference::member_key;
use super::Evaluate;
use crate::ast::{Node, NodeKind};
use crate::value::ObjectRef;
use crate::{EvalContext, EvalError, Scope, Value};

/// Evaluate `callee(args...)`.
///
/// A member callee (`obj.method()`) binds `obj` as the receiver; any other
/// callee inherits the caller's receiver (`this` of the nearest function
/// scope, or the root's ambient receiver). Arguments are evaluated left to
/// right after the callee.
///
/// # Errors
///
/// Returns `TypeError` naming the callee expression when it is not callable.
pub fn eval_call(
    callee: &Node,
    arguments: &[Node],
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let (func, receiver) = match &callee.kind {
        NodeKind::MemberExpression {
            object,
            property,
            computed,
        } => {
            let base = object.eval(scope, ctx)?;
            let key = member_key(property, *computed, scope, ctx)?;
            let func = get_property(&base, &key)
                .map_err(|err| err.with_span(callee.span))?;
            (func, base)
        }
        _ => (callee.eval(scope, ctx)?, scope.receiver()),
    };

    let args = eval_arguments(arguments, scope, ctx)?;

    if !func.is_callable() {
        return Err(EvalError::TypeError {
            message: format!("{} is not a function", ctx.describe(callee)),
            span: Some(node.span),
        });
    }

    call_value(&func, receiver, &args, ctx)
}

/// Evaluate `new callee(args...)`.
///
/// A fresh object inheriting from the constructor's `prototype` becomes the
/// receiver. If the constructor returns an object, array or function, that
/// value replaces the fresh object.
///
/// # Errors
///
/// Returns `TypeError` when the callee is not a constructible function
/// (arrows and builtins are not). The check happens before arguments are
/// evaluated.
pub fn eval_new(
    callee: &Node,
    arguments: &[Node],
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let constructor = callee.eval(scope, ctx)?;

    let (func, prototype) = match &constructor {
        Value::Function(func) if !func.is_arrow => match func.prototype() {
            Some(prototype) => (func, prototype),
            None => return Err(not_a_constructor(callee, node, ctx)),
        },
        _ => return Err(not_a_constructor(callee, node, ctx)),
    };

    let args = eval_arguments(arguments, scope, ctx)?;

    let instance = Value::Object(ObjectRef::with_prototype(Some(prototype)));
    let result = call_function(func, instance.clone(), &args, ctx)?;

    Ok(if result.is_object_like() {
        result
    } else {
        instance
    })
}

fn not_a_constructor(callee: &Node, node: &Node, ctx: &EvalContext) -> EvalError {
    EvalError::TypeError {
        message: format!("{} is not a constructor", ctx.describe(callee)),
        span: Some(node.span),
    }
}

fn eval_arguments(
    arguments: &[Node],
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Vec<Value>, EvalError> {
    arguments.iter().map(|arg| arg.eval(scope, ctx)).collect()
}

/// Call a value as a function with an explicit receiver.
///
/// # Errors
///
/// Returns `TypeError` if the value is not callable, and `BuiltinError`
/// when a native function fails.
pub fn call_value(
    callee: &Value,
    receiver: Value,
    args: &[Value],
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    match callee {
        Value::Function(func) => call_function(func, receiver, args, ctx),
        Value::Builtin(builtin) => builtin.call(args).map_err(|message| EvalError::BuiltinError {
            name: builtin.name.clone(),
            message,
        }),
        other => Err(EvalError::type_error(format!(
            "{} is not a function",
            crate::error::type_name(other)
        ))),
    }
}
