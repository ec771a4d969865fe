//! Loop statement evaluation

use super::field::own_enumerable_keys;
use super::reference::resolve_reference;
use super::{unsupported, Evaluate};
use crate::ast::{Node, NodeKind, VariableKind};
use crate::{DeclarationKind, EvalContext, EvalError, InterruptSignal, Scope, Value};

/// What a loop does after its body finished one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopStep {
    /// Proceed to the update/test
    Next,
    /// Leave the loop
    Exit,
}

/// Absorb `break`/`continue` aimed at this loop. Returns and signals for
/// other labels propagate.
fn absorb(result: Result<Value, EvalError>, label: Option<&str>) -> Result<LoopStep, EvalError> {
    match result {
        Ok(_) => Ok(LoopStep::Next),
        Err(EvalError::Interrupt(signal @ InterruptSignal::Break(_)))
            if signal.matches_label(label) =>
        {
            Ok(LoopStep::Exit)
        }
        Err(EvalError::Interrupt(signal @ InterruptSignal::Continue(_)))
            if signal.matches_label(label) =>
        {
            Ok(LoopStep::Next)
        }
        Err(err) => Err(err),
    }
}

fn check_interrupt(ctx: &EvalContext) -> Result<(), EvalError> {
    if ctx.is_interrupted() {
        return Err(EvalError::Interrupted);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// while statement
// ═══════════════════════════════════════════════════════════════════════

/// `while (test) body`
pub fn eval_while(
    test: &Node,
    body: &Node,
    scope: &Scope,
    ctx: &EvalContext,
    label: Option<&str>,
) -> Result<Value, EvalError> {
    let loop_scope = scope.enter();

    while test.eval(&loop_scope, ctx)?.to_boolean() {
        check_interrupt(ctx)?;

        let iteration = loop_scope.enter();
        if absorb(body.eval(&iteration, ctx), label)? == LoopStep::Exit {
            break;
        }
    }

    Ok(Value::Undefined)
}

// ═══════════════════════════════════════════════════════════════════════
// do-while statement
// ═══════════════════════════════════════════════════════════════════════

/// `do body while (test)`
pub fn eval_do_while(
    body: &Node,
    test: &Node,
    scope: &Scope,
    ctx: &EvalContext,
    label: Option<&str>,
) -> Result<Value, EvalError> {
    let loop_scope = scope.enter();

    loop {
        check_interrupt(ctx)?;

        let iteration = loop_scope.enter();
        if absorb(body.eval(&iteration, ctx), label)? == LoopStep::Exit {
            break;
        }

        if !test.eval(&loop_scope, ctx)?.to_boolean() {
            break;
        }
    }

    Ok(Value::Undefined)
}

// ═══════════════════════════════════════════════════════════════════════
// for statement
// ═══════════════════════════════════════════════════════════════════════

/// `for (init; test; update) body`
///
/// `init` bindings live in a loop scope. When they are `let`/`const`, every
/// iteration works on its own copy of them, so closures created in the body
/// keep that iteration's values. The copies are written back before
/// `update` runs.
pub fn eval_for(
    init: Option<&Node>,
    test: Option<&Node>,
    update: Option<&Node>,
    body: &Node,
    scope: &Scope,
    ctx: &EvalContext,
    label: Option<&str>,
) -> Result<Value, EvalError> {
    let loop_scope = scope.enter();

    let per_iteration = match init {
        Some(init) => {
            init.eval(&loop_scope, ctx)?;
            is_lexical_declaration(init)
        }
        None => false,
    };

    loop {
        check_interrupt(ctx)?;

        if let Some(test) = test {
            if !test.eval(&loop_scope, ctx)?.to_boolean() {
                break;
            }
        }

        let step = if per_iteration {
            let iteration = loop_scope.enter();
            loop_scope.copy_locals_into(&iteration);
            let step = absorb(body.eval(&iteration.enter(), ctx), label);
            iteration.copy_locals_into(&loop_scope);
            step?
        } else {
            absorb(body.eval(&loop_scope.enter(), ctx), label)?
        };

        if step == LoopStep::Exit {
            break;
        }

        if let Some(update) = update {
            update.eval(&loop_scope, ctx)?;
        }
    }

    Ok(Value::Undefined)
}

fn is_lexical_declaration(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::VariableDeclaration {
            kind: VariableKind::Let | VariableKind::Const,
            ..
        }
    )
}

// ═══════════════════════════════════════════════════════════════════════
// for-in statement
// ═══════════════════════════════════════════════════════════════════════

/// `for (left in right) body`
///
/// Keys are snapshotted before the first iteration: object keys in
/// insertion order, array and string indices ascending.
pub fn eval_for_in(
    left: &Node,
    right: &Node,
    body: &Node,
    scope: &Scope,
    ctx: &EvalContext,
    label: Option<&str>,
) -> Result<Value, EvalError> {
    let target = right.eval(scope, ctx)?;
    let keys = own_enumerable_keys(&target);
    let loop_scope = scope.enter();

    for key in keys {
        check_interrupt(ctx)?;

        let iteration = loop_scope.enter();
        bind_for_in_key(left, Value::string(key), &iteration, ctx)?;

        if absorb(body.eval(&iteration, ctx), label)? == LoopStep::Exit {
            break;
        }
    }

    Ok(Value::Undefined)
}

fn bind_for_in_key(
    left: &Node,
    key: Value,
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<(), EvalError> {
    match &left.kind {
        NodeKind::VariableDeclaration { kind, declarations } => {
            let declarator = declarations.first().ok_or_else(|| unsupported(left))?;
            let name = declarator
                .id
                .as_identifier()
                .ok_or_else(|| unsupported(&declarator.id))?;
            scope.declare(DeclarationKind::from(*kind), name, key);
            Ok(())
        }
        _ => resolve_reference(left, scope, ctx)?.put_value(key, scope),
    }
}
