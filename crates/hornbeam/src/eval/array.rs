//! Array literal evaluation

use super::Evaluate;
use crate::ast::Node;
use crate::{EvalContext, EvalError, Scope, Value};

/// Evaluate an array literal, elements left to right.
///
/// Holes (`[1, , 3]`) become `undefined` slots.
///
/// # Errors
///
/// Returns errors from evaluating array elements.
pub fn eval_array(
    elements: &[Option<Node>],
    scope: &Scope,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let items = elements
        .iter()
        .map(|element| match element {
            Some(element) => element.eval(scope, ctx),
            None => Ok(Value::Undefined),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::array(items))
}
