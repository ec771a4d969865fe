//! Try statement evaluation

use tracing::debug;

use super::{unsupported, Evaluate};
use crate::ast::{CatchClause, Node};
use crate::{DeclarationKind, EvalContext, EvalError, Scope, Value};

/// `try block [catch (param) handler] [finally finalizer]`
///
/// The guarded block runs in its own scope and its ordinary result is
/// discarded. A catchable failure is bound to the catch parameter in a
/// fresh scope and the handler's result becomes the statement's result.
/// The finalizer runs afterwards in its own scope whatever happened; a
/// failure or signal it raises replaces the pending outcome.
pub fn eval_try(
    block: &Node,
    handler: Option<&CatchClause>,
    finalizer: Option<&Node>,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let outcome = match block.eval(&scope.enter(), ctx) {
        Ok(_) => Ok(Value::Undefined),
        Err(err) if err.is_catchable() => match handler {
            Some(handler) => eval_handler(handler, err, scope, ctx),
            None => Err(err),
        },
        Err(err) => Err(err),
    };

    if let Some(finalizer) = finalizer {
        finalizer.eval(&scope.enter(), ctx)?;
    }

    outcome
}

fn eval_handler(
    handler: &CatchClause,
    err: EvalError,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let thrown = err.into_thrown_value()?;
    debug!(value = ?thrown, "caught failure");

    let catch_scope = scope.enter();
    if let Some(param) = &handler.param {
        let name = param.as_identifier().ok_or_else(|| unsupported(param))?;
        catch_scope.declare(DeclarationKind::Let, name, thrown);
    }
    handler.body.eval(&catch_scope, ctx)
}
