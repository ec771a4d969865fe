//! Function definitions and invocation of user-defined functions

use std::rc::Rc;

use tracing::debug;

use super::{unsupported, Evaluate};
use crate::ast::{Function, Node, NodeKind};
use crate::value::ObjectRef;
use crate::{
    DeclarationKind, EvalContext, EvalError, FunctionValue, InterruptSignal, Scope, Value,
};

/// Red zone left on the native stack before growing it.
const STACK_RED_ZONE: usize = 100 * 1024;

/// Size of each additional stack segment.
const STACK_GROWTH: usize = 1024 * 1024;

// ═══════════════════════════════════════════════════════════════════════
// Function Creation
// ═══════════════════════════════════════════════════════════════════════

/// Create a closure capturing `scope`.
///
/// A named function expression sees its own name through an intermediate
/// scope, so it can recurse even when the outer binding changes.
/// Non-arrow functions receive a fresh `prototype` object.
///
/// # Errors
///
/// Returns `UnsupportedSyntax` for generators, async functions and
/// non-identifier parameters.
pub fn create_closure(
    function: &Rc<Function>,
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
    is_arrow: bool,
) -> Result<Rc<FunctionValue>, EvalError> {
    if function.generator || function.is_async {
        return Err(unsupported(node));
    }

    let params = function
        .params
        .iter()
        .map(|param| {
            param
                .as_identifier()
                .map(str::to_owned)
                .ok_or_else(|| unsupported(param))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let name = function.id.as_ref().map(|id| id.name.clone());
    let is_expression = matches!(node.kind, NodeKind::FunctionExpression(_));

    let captured = match (&name, is_expression) {
        (Some(_), true) => scope.child(),
        _ => scope.clone(),
    };

    let properties = ObjectRef::new();
    if !is_arrow {
        properties.set("prototype", Value::Object(ObjectRef::new()));
    }

    let closure = Rc::new(FunctionValue {
        name: name.clone(),
        params,
        definition: Rc::clone(function),
        scope: captured.clone(),
        is_arrow,
        source: ctx.source_text(node.span).map(str::to_owned),
        properties,
    });

    if let (Some(name), true) = (name, is_expression) {
        captured.declare(DeclarationKind::Function, name, Value::Function(Rc::clone(&closure)));
    }

    Ok(closure)
}

/// `function name(...) { ... }` binds `name` in the current scope when
/// the declaration is reached.
pub fn eval_function_declaration(
    function: &Rc<Function>,
    node: &Node,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let closure = create_closure(function, node, scope, ctx, false)?;
    let name = function
        .id
        .as_ref()
        .map(|id| id.name.clone())
        .ok_or_else(|| unsupported(node))?;
    scope.declare(DeclarationKind::Function, name, Value::Function(closure));
    Ok(Value::Undefined)
}

// ═══════════════════════════════════════════════════════════════════════
// Invocation
// ═══════════════════════════════════════════════════════════════════════

/// Invoke a user-defined function.
///
/// Parameters are bound positionally in a fresh scope under the closure's
/// captured scope; missing arguments are `undefined` and extra ones are
/// dropped. Arrow functions ignore `receiver` and see the `this` of the
/// scope they were created in.
///
/// # Errors
///
/// Returns `StackOverflow` when the call would exceed the configured
/// depth, and any error raised by the body.
#[tracing::instrument(level = "debug", skip_all, fields(name = func.display_name()))]
pub fn call_function(
    func: &FunctionValue,
    receiver: Value,
    args: &[Value],
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let _guard = ctx.enter_call()?;
    debug!(depth = ctx.call_depth(), argc = args.len(), "call");

    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
        let call_scope = if func.is_arrow {
            func.scope.enter()
        } else {
            func.scope.enter_function(receiver)
        };

        for (index, param) in func.params.iter().enumerate() {
            let arg = args.get(index).cloned().unwrap_or_default();
            call_scope.declare(DeclarationKind::Param, param.as_str(), arg);
        }

        let definition = &func.definition;
        match definition.body.eval(&call_scope, ctx) {
            Ok(value) if definition.expression => Ok(value),
            Ok(_) => Ok(Value::Undefined),
            Err(EvalError::Interrupt(InterruptSignal::Return(value))) => Ok(value),
            Err(EvalError::Interrupt(InterruptSignal::Break(label))) => {
                Err(EvalError::BreakOutsideLoop { label })
            }
            Err(EvalError::Interrupt(InterruptSignal::Continue(label))) => {
                Err(EvalError::ContinueOutsideLoop { label })
            }
            Err(err) => Err(err),
        }
    })
}
