//! Switch statement evaluation

use super::Evaluate;
use crate::ast::{Node, SwitchCase};
use crate::value::strict_equals;
use crate::{EvalContext, EvalError, InterruptSignal, Scope, Value};

/// `switch (discriminant) { cases }`
///
/// The discriminant is evaluated once. Cases are tested in source order
/// with strict equality; from the first match on, every following clause
/// runs without being tested (fallthrough). A `default` clause counts as a
/// match as soon as it is reached, even when a later case would match.
/// An unlabeled `break` ends the switch.
pub fn eval_switch(
    discriminant: &Node,
    cases: &[SwitchCase],
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let value = discriminant.eval(scope, ctx)?;
    let case_scope = scope.enter();

    let mut matched = false;
    let mut last = Value::Undefined;

    for case in cases {
        if !matched {
            matched = match &case.test {
                None => true,
                Some(test) => strict_equals(&test.eval(&case_scope, ctx)?, &value),
            };
        }
        if !matched {
            continue;
        }

        for statement in &case.consequent {
            match statement.eval(&case_scope, ctx) {
                Ok(result) => last = result,
                Err(EvalError::Interrupt(InterruptSignal::Break(None))) => return Ok(last),
                Err(err) => return Err(err),
            }
        }
    }

    Ok(last)
}
